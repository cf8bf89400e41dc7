//! Provider payload builders
//!
//! Map loosely-typed domain records onto the ERP wire shape. Field names,
//! defaults and coercions are part of the ERP contract and must not drift.
//! Numeric fields accept JSON numbers, booleans and numeric strings; anything
//! else is rejected as malformed input.

use coresuite_domain::{IntegrationError, Record, Result};
use serde_json::Value;

/// Build the ERP customer upsert payload.
///
/// # Errors
/// Returns `IntegrationError::InvalidInput` when `id` is not numeric.
pub fn customer_payload(customer: &Record, synced_at: &str) -> Result<Record> {
    let id = int_field(customer, "id")?.unwrap_or(0);
    let full_name = customer
        .get("fullname")
        .filter(|v| !v.is_null())
        .or_else(|| customer.get("full_name"))
        .map_or_else(String::new, text_of);

    let mut payload = Record::new();
    payload.insert("external_id".into(), Value::from(external_id("customer", id)));
    payload.insert("full_name".into(), Value::from(full_name));
    for key in ["email", "phone", "tax_code", "note"] {
        payload.insert(key.into(), passthrough(customer, key));
    }
    payload.insert("synced_at".into(), Value::from(synced_at));
    Ok(payload)
}

/// Build the ERP product upsert payload.
///
/// # Errors
/// Returns `IntegrationError::InvalidInput` when a numeric field is malformed.
pub fn product_payload(product: &Record, synced_at: &str) -> Result<Record> {
    let id = int_field(product, "id")?.unwrap_or(0);
    let is_active = int_field(product, "is_active")?.unwrap_or(1) == 1;

    let mut payload = Record::new();
    payload.insert("external_id".into(), Value::from(external_id("product", id)));
    payload.insert(
        "name".into(),
        Value::from(product.get("name").map_or_else(String::new, text_of)),
    );
    for key in ["sku", "imei", "category"] {
        payload.insert(key.into(), passthrough(product, key));
    }
    payload.insert("price".into(), optional_float(product, "price")?);
    payload.insert(
        "stock_quantity".into(),
        int_field(product, "stock_quantity")?.map_or(Value::Null, Value::from),
    );
    payload.insert("tax_rate".into(), optional_float(product, "tax_rate")?);
    payload.insert("vat_code".into(), passthrough(product, "vat_code"));
    payload.insert("is_active".into(), Value::Bool(is_active));
    payload.insert("synced_at".into(), Value::from(synced_at));
    Ok(payload)
}

/// Build the ERP sale payload including its line items.
///
/// # Errors
/// Returns `IntegrationError::InvalidInput` when a numeric field of the sale
/// or of any item is malformed.
pub fn sale_payload(sale: &Record, items: &[Record], synced_at: &str) -> Result<Record> {
    let id = int_field(sale, "id")?.unwrap_or(0);
    let customer_external_id = int_field(sale, "customer_id")?
        .map_or(Value::Null, |customer_id| Value::from(external_id("customer", customer_id)));

    let lines = items.iter().map(sale_item_payload).collect::<Result<Vec<_>>>()?;

    let mut payload = Record::new();
    payload.insert("external_id".into(), Value::from(external_id("sale", id)));
    payload.insert("customer_external_id".into(), customer_external_id);
    payload.insert("customer_name".into(), passthrough(sale, "customer_name"));
    payload.insert("total".into(), Value::from(float_field(sale, "total")?.unwrap_or(0.0)));
    payload.insert(
        "total_paid".into(),
        Value::from(float_field(sale, "total_paid")?.unwrap_or(0.0)),
    );
    payload.insert(
        "balance_due".into(),
        Value::from(float_field(sale, "balance_due")?.unwrap_or(0.0)),
    );
    payload.insert("payment_status".into(), passthrough(sale, "payment_status"));
    payload.insert("due_date".into(), passthrough(sale, "due_date"));
    payload.insert("vat_rate".into(), optional_float(sale, "vat")?);
    payload.insert("vat_amount".into(), optional_float(sale, "vat_amount")?);
    payload.insert("discount".into(), optional_float(sale, "discount")?);
    payload.insert("items".into(), Value::Array(lines.into_iter().map(Value::Object).collect()));
    payload.insert("synced_at".into(), Value::from(synced_at));
    Ok(payload)
}

fn sale_item_payload(item: &Record) -> Result<Record> {
    let product_external_id = int_field(item, "product_id")?
        .map_or(Value::Null, |product_id| Value::from(external_id("product", product_id)));

    let mut line = Record::new();
    line.insert("description".into(), passthrough(item, "description"));
    line.insert("quantity".into(), Value::from(int_field(item, "quantity")?.unwrap_or(1)));
    line.insert("unit_price".into(), Value::from(float_field(item, "price")?.unwrap_or(0.0)));
    line.insert("tax_rate".into(), Value::from(float_field(item, "tax_rate")?.unwrap_or(0.0)));
    line.insert(
        "tax_amount".into(),
        Value::from(float_field(item, "tax_amount")?.unwrap_or(0.0)),
    );
    line.insert("product_external_id".into(), product_external_id);
    line.insert("iccid_code".into(), passthrough(item, "iccid_code"));
    Ok(line)
}

/// `"<entity>-<id>"`, the identifier the ERP uses for our records.
pub fn external_id(entity: &str, id: i64) -> String {
    format!("{entity}-{id}")
}

fn passthrough(record: &Record, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn optional_float(record: &Record, key: &str) -> Result<Value> {
    Ok(float_field(record, key)?.map_or(Value::Null, Value::from))
}

/// Integer view of `record[key]`; `None` when missing or null.
fn int_field(record: &Record, key: &str) -> Result<Option<i64>> {
    let Some(value) = record.get(key) else { return Ok(None) };
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(i64::from(*flag))),
        Value::Number(number) => match number.as_i64() {
            Some(int) => Ok(Some(int)),
            None => number.as_f64().map(|f| Some(truncate(f))).ok_or_else(|| malformed(key, value)),
        },
        Value::String(raw) => parse_int(raw).map(Some).ok_or_else(|| malformed(key, value)),
        Value::Array(_) | Value::Object(_) => Err(malformed(key, value)),
    }
}

/// Float view of `record[key]`; `None` when missing or null.
fn float_field(record: &Record, key: &str) -> Result<Option<f64>> {
    let Some(value) = record.get(key) else { return Ok(None) };
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(if *flag { 1.0 } else { 0.0 })),
        Value::Number(number) => number.as_f64().map(Some).ok_or_else(|| malformed(key, value)),
        Value::String(raw) => parse_float(raw).map(Some).ok_or_else(|| malformed(key, value)),
        Value::Array(_) | Value::Object(_) => Err(malformed(key, value)),
    }
}

// Blank strings count as zero, matching how the shop forms submit empty
// numeric inputs.
fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse::<i64>().ok().or_else(|| parse_float(trimmed).map(truncate))
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn malformed(key: &str, value: &Value) -> IntegrationError {
    IntegrationError::InvalidInput(format!("field '{key}' is not numeric: {value}"))
}
