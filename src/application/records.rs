//! JSON category documents
//!
//! Accepts the shapes a catalog endpoint hands out:
//! - a bare array of category objects
//! - `{ "data": [...] }`
//! - `{ "data": { "categories": [...] } }` or `{ "data": { "items": [...] } }`
//!
//! Field names are camelCase. `parentId` may be absent, null or empty (root).
//! Numeric ids are normalized to their decimal string; `7.0` reads as `"7"`,
//! fractional ids are rejected.

use serde_json::{Map, Number, Value};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Category, DomainError, DomainResult};

const ID: &str = "id";
const PARENT_ID: &str = "parentId";
const NAME: &str = "name";
const DISPLAY_NAME: &str = "displayName";

/// Parse a JSON document into categories, in document order.
#[instrument(level = "debug", skip(content))]
pub fn parse_document(content: &str, source_name: &str) -> ApplicationResult<Vec<Category>> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| ApplicationError::Parse {
            source_name: source_name.to_string(),
            source: e,
        })?;

    let records = unwrap_envelope(document)?;
    debug!("parse_document: {} records in {}", records.len(), source_name);

    let categories = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| category_from_value(index, record))
        .collect::<DomainResult<Vec<_>>>()?;
    Ok(categories)
}

fn unwrap_envelope(document: Value) -> DomainResult<Vec<Value>> {
    match document {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Object(mut data)) => match data
                .remove("categories")
                .or_else(|| data.remove("items"))
            {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(DomainError::UnsupportedShape(
                    "expected data.categories or data.items array".to_string(),
                )),
            },
            _ => Err(DomainError::UnsupportedShape(
                "expected top-level array or data array".to_string(),
            )),
        },
        other => Err(DomainError::UnsupportedShape(format!(
            "expected array or object, found {}",
            value_kind(&other)
        ))),
    }
}

/// Convert one JSON record into a category, keeping unknown fields.
pub fn category_from_value(index: usize, record: Value) -> DomainResult<Category> {
    let mut fields = match record {
        Value::Object(fields) => fields,
        other => {
            return Err(DomainError::InvalidRecord {
                index,
                message: format!("expected object, found {}", value_kind(&other)),
            })
        }
    };

    let id = match fields.remove(ID) {
        Some(value) => id_to_string(index, ID, value)?,
        None => None,
    }
    .filter(|id| !id.trim().is_empty())
    .ok_or(DomainError::MissingId { index })?;

    let parent_id = match fields.remove(PARENT_ID) {
        Some(value) => id_to_string(index, PARENT_ID, value)?,
        None => None,
    };
    let name = match fields.remove(NAME) {
        Some(value) => scalar_to_string(index, NAME, value)?,
        None => None,
    }
    .unwrap_or_default();
    let display_name = match fields.remove(DISPLAY_NAME) {
        Some(value) => scalar_to_string(index, DISPLAY_NAME, value)?,
        None => None,
    };

    let mut category = Category::new(id, parent_id.as_deref(), name).with_extra(fields);
    if let Some(display_name) = display_name {
        category = category.with_display_name(display_name);
    }
    Ok(category)
}

fn id_to_string(index: usize, field: &str, value: Value) -> DomainResult<Option<String>> {
    match value {
        Value::Number(n) => number_to_id(index, field, &n).map(Some),
        other => scalar_to_string(index, field, other),
    }
}

/// Largest integer an f64 holds exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn number_to_id(index: usize, field: &str, n: &Number) -> DomainResult<String> {
    if n.is_i64() || n.is_u64() {
        return Ok(n.to_string());
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => Ok((f as i64).to_string()),
        _ => Err(DomainError::InvalidRecord {
            index,
            message: format!("{} must be a whole number or string, found {}", field, n),
        }),
    }
}

fn scalar_to_string(index: usize, field: &str, value: Value) -> DomainResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(DomainError::InvalidRecord {
            index,
            message: format!("{} must be a string, found {}", field, value_kind(&other)),
        }),
    }
}

/// Serialize a category back into its JSON record form.
pub fn category_to_value(category: &Category) -> Value {
    let mut map = Map::new();
    map.insert(ID.to_string(), Value::String(category.id().to_string()));
    map.insert(
        PARENT_ID.to_string(),
        category
            .parent_id()
            .map(|p| Value::String(p.to_string()))
            .unwrap_or(Value::Null),
    );
    map.insert(NAME.to_string(), Value::String(category.name().to_string()));
    if let Some(display_name) = category.display_name() {
        map.insert(
            DISPLAY_NAME.to_string(),
            Value::String(display_name.to_string()),
        );
    }
    for (key, value) in category.extra() {
        map.insert(key.clone(), value.clone());
    }
    Value::Object(map)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
