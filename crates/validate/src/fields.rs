use serde_json::{Map, Value};

/// Loosely-typed field map produced by the external extraction
/// service: canonical field name → string, number, null, or (for
/// order items) a list of records.
pub type FieldMap = Map<String, Value>;

pub const BILLING_CUSTOMER_NAME: &str = "billing_customer_name";
pub const BILLING_ADDRESS: &str = "billing_address";
pub const BILLING_CITY: &str = "billing_city";
pub const BILLING_STATE: &str = "billing_state";
pub const BILLING_PINCODE: &str = "billing_pincode";
pub const BILLING_PHONE: &str = "billing_phone";
pub const BILLING_EMAIL: &str = "billing_email";
pub const BILLING_GSTIN: &str = "billing_gstin";

pub const SHIPPING_CUSTOMER_NAME: &str = "shipping_customer_name";
pub const SHIPPING_ADDRESS: &str = "shipping_address";
pub const SHIPPING_CITY: &str = "shipping_city";
pub const SHIPPING_STATE: &str = "shipping_state";
pub const SHIPPING_PINCODE: &str = "shipping_pincode";
pub const SHIPPING_PHONE: &str = "shipping_phone";
pub const SHIPPING_EMAIL: &str = "shipping_email";

pub const ORDER_DATE: &str = "order_date";
pub const INVOICE_NUMBER: &str = "invoice_number";
pub const ORDER_ITEMS: &str = "order_items";
pub const SUB_TOTAL: &str = "sub_total";
pub const TAX_AMOUNT: &str = "tax_amount";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const PAYMENT_METHOD: &str = "payment_method";

/// Billing → shipping pairs cross-filled by the refinement step.
pub(crate) const CROSS_FILL: &[(&str, &str)] = &[
    (BILLING_CUSTOMER_NAME, SHIPPING_CUSTOMER_NAME),
    (BILLING_ADDRESS, SHIPPING_ADDRESS),
    (BILLING_CITY, SHIPPING_CITY),
    (BILLING_STATE, SHIPPING_STATE),
    (BILLING_PINCODE, SHIPPING_PINCODE),
    (BILLING_PHONE, SHIPPING_PHONE),
    (BILLING_EMAIL, SHIPPING_EMAIL),
];

const SCALAR_FIELDS: &[&str] = &[
    BILLING_CUSTOMER_NAME,
    BILLING_ADDRESS,
    BILLING_CITY,
    BILLING_STATE,
    BILLING_PINCODE,
    BILLING_PHONE,
    BILLING_EMAIL,
    BILLING_GSTIN,
    SHIPPING_CUSTOMER_NAME,
    SHIPPING_ADDRESS,
    SHIPPING_CITY,
    SHIPPING_STATE,
    SHIPPING_PINCODE,
    SHIPPING_PHONE,
    SHIPPING_EMAIL,
    ORDER_DATE,
    INVOICE_NUMBER,
    SUB_TOTAL,
    TAX_AMOUNT,
    TOTAL_AMOUNT,
    PAYMENT_METHOD,
];

/// The all-null skeleton the extraction service contracts to return
/// when it cannot parse anything, so validation always has a
/// well-formed (if empty) input.
pub fn empty_field_map() -> FieldMap {
    let mut map = Map::with_capacity(SCALAR_FIELDS.len() + 1);
    for field in SCALAR_FIELDS {
        map.insert((*field).to_string(), Value::Null);
    }
    map.insert(ORDER_ITEMS.to_string(), Value::Array(Vec::new()));
    map
}

/// Null, absent, and blank strings all count as "no value".
pub(crate) fn value_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
