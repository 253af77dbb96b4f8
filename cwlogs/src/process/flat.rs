/*!
Flattened records that are safe to hand to a shipper.

A flattened record only contains strings, numbers and booleans.
Anything else is re-encoded as a JSON string under the same key.
*/

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Number;

use super::Fields;

/**
A field added to every flattened record.

The spelling is relied on by existing dashboards, so it's kept as-is.
*/
pub const VERSION_FIELD: &str = "logVerstion";
pub const VERSION: &str = "v3";

/**
A field whose object value also has its primitive fields promoted
to the top level.
*/
const PROMOTED_FIELD: &str = "data";

/**
A flattened field value.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(Number),
    Bool(bool),
    /**
    A composite value, encoded as JSON.
    */
    Json(String),
}

impl Value {
    fn primitive(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Number(n) => Some(Value::Number(n.clone())),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            _ => None,
        }
    }

    fn from_json(value: &serde_json::Value) -> Self {
        Value::primitive(value).unwrap_or_else(|| Value::Json(value.to_string()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Json(s) => Some(s),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::String(s.to_owned())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) | Value::Json(s) => serializer.serialize_str(s),
            Value::Number(n) => n.serialize(serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/**
A flattened record.

Fields keep the order they were first added in.
*/
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.position(field).map(|i| &self.0[i].1)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k == field)
    }

    /**
    Add a field, replacing the value of an existing field in place.
    */
    fn insert(&mut self, field: &str, value: Value) {
        match self.position(field) {
            Some(i) => self.0[i].1 = value,
            None => self.0.push((field.to_owned(), value)),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }

        map.end()
    }
}

/**
Flatten a normalized record.

Fields are visited in the order they were added to the record, so a field
promoted out of `data` replaces any field with the same name that came
before `data`, and is replaced by any that comes after it.
*/
pub fn flatten(fields: &Fields) -> Record {
    let mut flat = Record::default();

    for (k, v) in fields {
        if let Some(primitive) = Value::primitive(v) {
            flat.insert(k, primitive);
            continue;
        }

        if k == PROMOTED_FIELD {
            if let serde_json::Value::Object(data) = v {
                for (dk, dv) in data {
                    if let Some(primitive) = Value::primitive(dv) {
                        flat.insert(dk, primitive);
                    }
                }
            }
        }

        flat.insert(k, Value::from_json(v));
    }

    flat.insert(VERSION_FIELD, VERSION.into());

    flat
}
