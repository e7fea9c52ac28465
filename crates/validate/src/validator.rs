//! Field-map validation and canonicalization. `validate` never fails
//! and never short-circuits: every rule runs, collecting errors and
//! warnings, and the map is rewritten in place where a canonical form
//! exists (ISO dates, canonical state names, numeric amounts, item
//! quantity and weight defaults). Values that fail a rule are warned
//! about but left untouched, so the caller still sees what the
//! extractor produced.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

use crate::fields::{self, value_present, FieldMap};
use crate::outcome::ValidationOutcome;
use crate::regions::canonical_state;
use crate::rules;

const ITEM_NAME: &str = "name";
const ITEM_UNITS: &str = "units";
const ITEM_SELLING_PRICE: &str = "selling_price";
const ITEM_WEIGHT: &str = "weight";

/// Fallback weight in kilograms for items that do not state one.
pub const DEFAULT_ITEM_WEIGHT: f64 = 0.5;

const REQUIRED_FIELDS: &[&str] = &[fields::BILLING_CUSTOMER_NAME, fields::BILLING_ADDRESS];

/// Validate an extracted field map, canonicalizing in place.
pub fn validate(fields: &mut FieldMap) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for field in REQUIRED_FIELDS {
        if !value_present(fields.get(*field)) {
            outcome.error(format!("Missing required field: {field}"));
        }
    }

    if let Some(gstin) = non_empty_str(fields.get(fields::BILLING_GSTIN)) {
        if !rules::valid_gstin(&gstin) {
            outcome.warn("Invalid GSTIN format");
        }
    }

    for (field, label) in [
        (fields::BILLING_PINCODE, "billing"),
        (fields::SHIPPING_PINCODE, "shipping"),
    ] {
        // Pincodes sometimes arrive as bare numbers; stringify those.
        if let Some(pincode) = non_empty_display(fields.get(field)) {
            if !rules::valid_pincode(&pincode) {
                outcome.warn(format!("Invalid {label} pincode format"));
            }
        }
    }

    for (field, label) in [
        (fields::BILLING_PHONE, "billing"),
        (fields::SHIPPING_PHONE, "shipping"),
    ] {
        if let Some(phone) = non_empty_str(fields.get(field)) {
            if !rules::valid_phone(&phone) {
                outcome.warn(format!("Invalid {label} phone number format"));
            }
        }
    }

    for (field, label) in [
        (fields::BILLING_EMAIL, "billing"),
        (fields::SHIPPING_EMAIL, "shipping"),
    ] {
        if let Some(email) = non_empty_str(fields.get(field)) {
            if !rules::valid_email(&email) {
                outcome.warn(format!("Invalid {label} email format"));
            }
        }
    }

    if let Some(raw) = non_empty_str(fields.get(fields::ORDER_DATE)) {
        match rules::canonical_date(&raw) {
            Some(iso) => {
                fields.insert(fields::ORDER_DATE.to_string(), Value::String(iso));
            }
            None => outcome.warn("Invalid order date format"),
        }
    }

    for (field, label) in [
        (fields::BILLING_STATE, "billing"),
        (fields::SHIPPING_STATE, "shipping"),
    ] {
        if let Some(raw) = non_empty_str(fields.get(field)) {
            match canonical_state(&raw) {
                Some(name) => {
                    fields.insert(field.to_string(), Value::String(name.to_string()));
                }
                None => outcome.warn(format!("Invalid {label} state")),
            }
        }
    }

    for (field, label) in [
        (fields::SUB_TOTAL, "subtotal"),
        (fields::TAX_AMOUNT, "tax"),
        (fields::TOTAL_AMOUNT, "total"),
    ] {
        check_amount(fields, field, label, &mut outcome);
    }

    validate_items(fields, &mut outcome);

    if !outcome.errors.is_empty() || !outcome.warnings.is_empty() {
        tracing::debug!(
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "validation finished with findings"
        );
    }
    outcome
}

/// Amounts should be numbers by this point; strings are coerced and
/// rewritten, anything unparseable is warned about and left alone.
/// Negative amounts are flagged but never clamped.
fn check_amount(fields: &mut FieldMap, field: &str, label: &str, outcome: &mut ValidationOutcome) {
    let Some(value) = fields.get(field).cloned() else {
        return;
    };
    match value {
        Value::Null => {}
        Value::Number(n) => {
            if n.as_f64().is_some_and(|v| v < 0.0) {
                outcome.warn(format!("Negative {label} amount"));
            }
        }
        Value::String(s) => match Decimal::from_str(s.trim()) {
            Ok(amount) => {
                if amount < Decimal::ZERO {
                    outcome.warn(format!("Negative {label} amount"));
                }
                if let Some(number) = amount.to_f64().and_then(Number::from_f64) {
                    fields.insert(field.to_string(), Value::Number(number));
                }
            }
            Err(_) => outcome.warn(format!("Invalid {label} amount format")),
        },
        _ => outcome.warn(format!("Invalid {label} amount format")),
    }
}

fn validate_items(fields: &mut FieldMap, outcome: &mut ValidationOutcome) {
    match fields.get(fields::ORDER_ITEMS) {
        Some(Value::Array(_)) => {}
        None | Some(Value::Null) => return,
        Some(_) => {
            outcome.warn("Order items should be a list");
            fields.insert(fields::ORDER_ITEMS.to_string(), Value::Array(Vec::new()));
            return;
        }
    }
    let Some(Value::Array(items)) = fields.get_mut(fields::ORDER_ITEMS) else {
        return;
    };

    for (index, item) in items.iter_mut().enumerate() {
        let n = index + 1;
        let Some(item) = item.as_object_mut() else {
            outcome.warn(format!("Order item {n} should be an object"));
            continue;
        };

        if !value_present(item.get(ITEM_NAME)) {
            outcome.warn(format!("Order item {n} missing name"));
        }

        check_units(item, n, outcome);
        check_selling_price(item, n, outcome);
        default_weight(item);
    }
}

/// Quantity must end up a positive integer. Missing quantities default
/// to 1 silently; present-but-broken ones are warned about and forced.
fn check_units(item: &mut serde_json::Map<String, Value>, n: usize, outcome: &mut ValidationOutcome) {
    let units = match item.get(ITEM_UNITS) {
        None | Some(Value::Null) => {
            item.insert(ITEM_UNITS.to_string(), Value::from(1));
            return;
        }
        Some(Value::Number(number)) => number.as_f64().map(|v| v.trunc() as i64),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(units) => Some(units),
            Err(_) => None,
        },
        Some(_) => None,
    };

    match units {
        Some(units) if units > 0 => {
            item.insert(ITEM_UNITS.to_string(), Value::from(units));
        }
        Some(_) => {
            outcome.warn(format!("Order item {n} has invalid quantity"));
            item.insert(ITEM_UNITS.to_string(), Value::from(1));
        }
        None => {
            outcome.warn(format!("Order item {n} has invalid quantity format"));
            item.insert(ITEM_UNITS.to_string(), Value::from(1));
        }
    }
}

fn check_selling_price(
    item: &mut serde_json::Map<String, Value>,
    n: usize,
    outcome: &mut ValidationOutcome,
) {
    let Some(value) = item.get(ITEM_SELLING_PRICE).cloned() else {
        return;
    };
    match value {
        Value::Null => {}
        Value::Number(number) => {
            if number.as_f64().is_some_and(|v| v < 0.0) {
                outcome.warn(format!("Order item {n} has negative price"));
            }
        }
        Value::String(s) => match Decimal::from_str(s.trim()) {
            Ok(price) => {
                if price < Decimal::ZERO {
                    outcome.warn(format!("Order item {n} has negative price"));
                }
                if let Some(number) = price.to_f64().and_then(Number::from_f64) {
                    item.insert(ITEM_SELLING_PRICE.to_string(), Value::Number(number));
                }
            }
            Err(_) => outcome.warn(format!("Order item {n} has invalid price format")),
        },
        _ => outcome.warn(format!("Order item {n} has invalid price format")),
    }
}

/// Courier rate calculation needs a weight for every item, so anything
/// missing or non-positive falls back to [`DEFAULT_ITEM_WEIGHT`].
fn default_weight(item: &mut serde_json::Map<String, Value>) {
    let weight = match item.get(ITEM_WEIGHT) {
        Some(Value::Number(number)) => number.as_f64().filter(|w| *w > 0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|w| *w > 0.0),
        _ => None,
    };
    let weight = weight.unwrap_or(DEFAULT_ITEM_WEIGHT);
    if let Some(number) = Number::from_f64(weight) {
        item.insert(ITEM_WEIGHT.to_string(), Value::Number(number));
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn non_empty_display(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
