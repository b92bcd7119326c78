//! MARC-in-JSON serialization of exported records.
//!
//! # Format
//!
//! A record is a JSON array:
//!
//! - the first element is `{"leader": "..."}`;
//! - control fields follow as `{tag: value}`;
//! - data fields follow as `{tag: {ind1, ind2, subfields: [{code: value}, ...]}}`,
//!   one element per field in emission order.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::record::{Field, Record};

/// Convert an exported record to MARC-in-JSON.
///
/// # Examples
///
/// ```
/// use archmarc::{marcjson, Field, Leader, Record};
///
/// let mut record = Record::new(Leader::archival());
/// let mut field = Field::new("099".to_string(), ' ', '9');
/// field.add_subfield_str('a', "MS.12");
/// record.add_field(field);
///
/// let json = marcjson::record_to_marcjson(&record).unwrap();
/// assert_eq!(json[1]["099"]["ind2"], "9");
/// assert_eq!(json[1]["099"]["subfields"][0]["a"], "MS.12");
/// ```
///
/// # Errors
///
/// Returns an error if the leader is malformed.
pub fn record_to_marcjson(record: &Record) -> Result<Value> {
    let mut fields = Vec::with_capacity(1 + record.control_fields.len() + record.fields.len());
    fields.push(json!({ "leader": record.leader.to_leader_string()? }));

    for (tag, value) in record.control_fields_iter() {
        let mut control = Map::new();
        control.insert(tag.to_string(), Value::String(value.to_string()));
        fields.push(Value::Object(control));
    }

    fields.extend(record.fields().map(data_field));
    Ok(Value::Array(fields))
}

/// Convert several records to a JSON array of MARC-in-JSON records.
///
/// # Errors
///
/// Returns an error if any leader is malformed.
pub fn records_to_marcjson(records: &[Record]) -> Result<Value> {
    records
        .iter()
        .map(record_to_marcjson)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn data_field(field: &Field) -> Value {
    let subfields: Vec<Value> = field
        .subfields()
        .map(|sf| {
            let mut subfield = Map::new();
            subfield.insert(sf.code.to_string(), Value::String(sf.value.clone()));
            Value::Object(subfield)
        })
        .collect();

    let mut wrapper = Map::new();
    wrapper.insert(
        field.tag.clone(),
        json!({
            "ind1": field.indicator1.to_string(),
            "ind2": field.indicator2.to_string(),
            "subfields": subfields,
        }),
    );
    Value::Object(wrapper)
}
