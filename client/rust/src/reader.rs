//! Remote Object Reader.
//!
//! Reads one field of a ledger object. Absence of the field is a
//! [`ClientError::MalformedResponse`], never a zero.
//!
//! Field names may be dotted paths into nested Move structs, e.g.
//! `total_supply.value` on a `TreasuryCap`. The fullnode renders nested
//! structs as `{"type": ..., "fields": {...}}`; the `fields` wrapper is
//! stepped through transparently.

use serde_json::{Map, Value};
use tracing::debug;

use crate::convert::value_to_u64;
use crate::error::{ClientError, Result};
use crate::traits::ObjectReader;
use crate::types::{ObjectId, RemoteObject};

/// Read a field of an object as raw JSON.
pub async fn read_field<R>(reader: &R, object_id: &str, field: &str) -> Result<Value>
where
    R: ObjectReader + ?Sized,
{
    let id = ObjectId::new(object_id)?;
    let object = reader.get_object(&id).await?;
    debug!(object_id = %id, version = object.version, field, "object read");
    extract_field(&object, field).cloned()
}

/// Read a field of an object as a `u64`.
///
/// Fails closed when the value does not fit, rather than truncating.
pub async fn read_u64_field<R>(reader: &R, object_id: &str, field: &str) -> Result<u64>
where
    R: ObjectReader + ?Sized,
{
    let id = ObjectId::new(object_id)?;
    let object = reader.get_object(&id).await?;
    let value = extract_u64_field(&object, field)?;
    debug!(object_id = %id, version = object.version, field, value, "u64 field read");
    Ok(value)
}

/// Look up a (possibly dotted) field path in an object's content.
pub fn extract_field<'a>(object: &'a RemoteObject, path: &str) -> Result<&'a Value> {
    lookup_path(&object.fields, path).map_err(|segment| {
        ClientError::MalformedResponse(format!(
            "object {} has no field {:?} (missing {:?})",
            object.object_id, path, segment
        ))
    })
}

/// Look up a field path and parse it as a `u64`.
pub fn extract_u64_field(object: &RemoteObject, path: &str) -> Result<u64> {
    let value = extract_field(object, path)?;
    value_to_u64(value).map_err(|e| {
        ClientError::MalformedResponse(format!(
            "field {:?} of object {}: {}",
            path,
            object.object_id,
            e.message()
        ))
    })
}

/// Returns the first missing segment on failure.
fn lookup_path<'a, 'p>(
    fields: &'a Map<String, Value>,
    path: &'p str,
) -> std::result::Result<&'a Value, &'p str> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or(path);
    let mut current = fields.get(first).ok_or(first)?;
    for segment in segments {
        current = step(current, segment).ok_or(segment)?;
    }
    Ok(current)
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(v) = map.get(segment) {
        return Some(v);
    }
    map.get("fields")?.as_object()?.get(segment)
}
