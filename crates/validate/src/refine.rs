//! Structural cleanup applied before validation: currency symbols are
//! stripped from amount strings, the billing block is mirrored into
//! empty shipping fields, and the payment method is inferred from the
//! raw document text when the extractor left it blank.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value};

use crate::fields::{self, value_present, FieldMap};

const AMOUNT_FIELDS: &[&str] = &[
    fields::SUB_TOTAL,
    fields::TAX_AMOUNT,
    fields::TOTAL_AMOUNT,
];

fn re_prepaid() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"(?i)paid|prepaid|credit card|debit card|upi|online").expect("invalid regex")
    })
}

fn re_cod() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?i)cod|cash on delivery|collect").expect("invalid regex"))
}

/// Tidy an extracted field map in place. `ocr_text` is the consolidated
/// document text, used only for payment-method inference.
pub fn refine(fields: &mut FieldMap, ocr_text: &str) {
    clean_amounts(fields);

    // order_items must always be an array so downstream code can
    // iterate it unconditionally.
    match fields.get(fields::ORDER_ITEMS) {
        Some(Value::Array(_)) => {}
        _ => {
            fields.insert(fields::ORDER_ITEMS.to_string(), Value::Array(Vec::new()));
        }
    }

    // Invoices frequently carry only a billing block; shipping defaults
    // to the same party unless the document said otherwise.
    for (billing, shipping) in fields::CROSS_FILL {
        if value_present(fields.get(*shipping)) {
            continue;
        }
        if value_present(fields.get(*billing)) {
            let value = fields[*billing].clone();
            fields.insert((*shipping).to_string(), value);
        }
    }

    if !value_present(fields.get(fields::PAYMENT_METHOD)) {
        if let Some(method) = infer_payment_method(ocr_text) {
            tracing::debug!(method, "inferred payment method from document text");
            fields.insert(
                fields::PAYMENT_METHOD.to_string(),
                Value::String(method.to_string()),
            );
        }
    }
}

/// Amounts extracted as strings often carry currency symbols and
/// thousands separators. Parse them into numbers; values that still
/// do not parse are nulled so validation reports them as missing
/// rather than malformed strings leaking downstream.
fn clean_amounts(fields: &mut FieldMap) {
    for field in AMOUNT_FIELDS {
        let Some(Value::String(raw)) = fields.get(*field) else {
            continue;
        };
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '₹' | '$' | ','))
            .collect();
        let cleaned = cleaned.trim();

        let replacement = Decimal::from_str(cleaned)
            .ok()
            .and_then(|d| d.to_f64())
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number);
        fields.insert((*field).to_string(), replacement);
    }
}

fn infer_payment_method(text: &str) -> Option<&'static str> {
    if re_prepaid().is_match(text) {
        Some("prepaid")
    } else if re_cod().is_match(text) {
        Some("cod")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn currency_symbols_and_separators_are_stripped() {
        let mut fields = map(json!({
            "sub_total": "₹1,234.50",
            "tax_amount": "$99",
            "total_amount": "1,333.50",
        }));
        refine(&mut fields, "");
        assert_eq!(fields["sub_total"], json!(1234.5));
        assert_eq!(fields["tax_amount"], json!(99.0));
        assert_eq!(fields["total_amount"], json!(1333.5));
    }

    #[test]
    fn unparseable_amount_string_becomes_null() {
        let mut fields = map(json!({ "sub_total": "N/A" }));
        refine(&mut fields, "");
        assert_eq!(fields["sub_total"], Value::Null);
    }

    #[test]
    fn numeric_amounts_pass_through_untouched() {
        let mut fields = map(json!({ "total_amount": 250 }));
        refine(&mut fields, "");
        assert_eq!(fields["total_amount"], json!(250));
    }

    #[test]
    fn order_items_forced_to_array() {
        let mut fields = map(json!({ "order_items": "two widgets" }));
        refine(&mut fields, "");
        assert_eq!(fields["order_items"], json!([]));

        let mut fields = map(json!({ "order_items": [{"name": "Widget"}] }));
        refine(&mut fields, "");
        assert_eq!(fields["order_items"], json!([{"name": "Widget"}]));
    }

    #[test]
    fn billing_fills_empty_shipping() {
        let mut fields = map(json!({
            "billing_customer_name": "Asha Traders",
            "billing_city": "Pune",
            "shipping_city": "  ",
        }));
        refine(&mut fields, "");
        assert_eq!(fields["shipping_customer_name"], json!("Asha Traders"));
        assert_eq!(fields["shipping_city"], json!("Pune"));
    }

    #[test]
    fn present_shipping_is_not_overwritten() {
        let mut fields = map(json!({
            "billing_city": "Pune",
            "shipping_city": "Nashik",
        }));
        refine(&mut fields, "");
        assert_eq!(fields["shipping_city"], json!("Nashik"));
    }

    #[test]
    fn payment_method_inferred_from_text() {
        let mut fields = FieldMap::new();
        refine(&mut fields, "Paid via UPI on delivery");
        assert_eq!(fields["payment_method"], json!("prepaid"));

        let mut fields = FieldMap::new();
        refine(&mut fields, "Cash on Delivery - collect Rs. 500");
        assert_eq!(fields["payment_method"], json!("cod"));

        let mut fields = FieldMap::new();
        refine(&mut fields, "Invoice #42");
        assert!(!fields.contains_key("payment_method"));
    }

    #[test]
    fn existing_payment_method_wins() {
        let mut fields = map(json!({ "payment_method": "cod" }));
        refine(&mut fields, "paid online");
        assert_eq!(fields["payment_method"], json!("cod"));
    }
}
