/*!
Metadata shared by every record in a batch.
*/

use std::str::FromStr;

use serde_json::Value;

use super::{Config, Fields};
use crate::{
    context::Context,
    diagnostics::{self, Level},
    receive::Batch,
    Error,
};

pub const DEFAULT_TYPE: &str = "logzio_cloudwatch_lambda";

/**
Extra `key=value` pairs to add to every record.

The list is written as `key=value` pairs separated by `;`, like
`env=prod;team=payments`. Only the first `=` separates a key
from its value.
*/
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Enrich(Vec<(String, String)>);

impl Enrich {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Enrich {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();

        for property in s.split(';').filter(|property| !property.is_empty()) {
            match property.split_once('=') {
                Some((key, value)) => pairs.push((key.to_owned(), value.to_owned())),
                None => bail!(
                    "invalid enrichment {:?}; expected a `key=value` pair",
                    property
                ),
            }
        }

        Ok(Enrich(pairs))
    }
}

/**
Fields merged into every record of a batch.

This is built once per batch and isn't changed afterwards.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalData(Fields);

impl AdditionalData {
    pub fn new(batch: &Batch, context: &dyn Context, config: &Config) -> Self {
        let mut fields = Fields::new();

        fields.insert("logGroup".to_owned(), batch.log_group.as_str().into());
        fields.insert("logStream".to_owned(), batch.log_stream.as_str().into());
        fields.insert("messageType".to_owned(), batch.message_type.as_str().into());
        fields.insert("owner".to_owned(), batch.owner.as_str().into());

        let attributes = [
            ("function_version", context.function_version()),
            ("invoked_function_arn", context.invoked_function_arn()),
        ];

        for (name, value) in attributes.iter() {
            match value {
                Some(value) => {
                    fields.insert((*name).to_owned(), (*value).into());
                }
                None => diagnostics::emit_event(
                    Level::Debug,
                    "Failed to find context value {Attribute}; continuing without it",
                    None,
                    vec![("Attribute", (*name).into())],
                ),
            }
        }

        for (key, value) in config.enrich.iter() {
            fields.insert(key.to_owned(), value.into());
        }

        fields.insert("type".to_owned(), config.log_type.as_str().into());

        AdditionalData(fields)
    }

    /**
    The log group records came from.

    An enrichment pair may replace the one from the batch.
    */
    pub fn log_group(&self) -> &str {
        self.0
            .get("logGroup")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /**
    Merge into a record, replacing any fields it already has with the same name.
    */
    pub(super) fn merge_into(&self, fields: &mut Fields) {
        for (k, v) in &self.0 {
            fields.insert(k.clone(), v.clone());
        }
    }
}
