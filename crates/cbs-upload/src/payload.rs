//! Wire payload construction.
//!
//! An event is the remote system's unit of submission: static identifiers
//! plus one data value per mapped field with a non-empty cleaned value.

use serde_json::{Value, json};

use cbs_model::{CleanedRecord, MappingConfig};

/// Build a single event object for a record.
pub fn build_event(record: &CleanedRecord, mapping: &MappingConfig) -> Value {
    let context = &mapping.context;

    let data_values: Vec<Value> = mapping
        .fields
        .iter()
        .filter_map(|field| {
            let value = record.value(&field.name)?;
            Some(json!({
                "dataElement": field.remote_field_id,
                "value": value,
            }))
        })
        .collect();

    let event_date = record.value(&context.event_date_field).unwrap_or_default();
    let date_key = if context.use_occurred_at {
        "occurredAt"
    } else {
        "eventDate"
    };

    let mut event = json!({
        "program": context.program,
        "orgUnit": context.org_unit,
        "programStage": context.program_stage,
        "status": context.status,
        "dataValues": data_values,
    });
    if let Some(object) = event.as_object_mut() {
        object.insert(date_key.to_string(), Value::String(event_date.to_string()));
    }
    event
}

/// Build the request body, wrapping the event in an outer `events`
/// collection when the endpoint requires tracked-entity semantics.
pub fn build_payload(record: &CleanedRecord, mapping: &MappingConfig) -> Value {
    let event = build_event(record, mapping);
    if mapping.context.wrap_events {
        json!({ "events": [event] })
    } else {
        event
    }
}
