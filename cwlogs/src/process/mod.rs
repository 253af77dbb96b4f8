pub mod enrich;
pub mod flat;
mod lambda;
pub mod level;

use std::str::FromStr;

use serde_json::{Map, Value};

use self::{
    enrich::{AdditionalData, Enrich},
    level::Levels,
};

use crate::{context::Context, receive::Batch, Error};

metrics! {
    msg,
    kept,
    dropped_housekeeping,
    dropped_level,
    json_expanded
}

/**
The fields of a record while it's being normalized.
*/
pub type Fields = Map<String, Value>;

/**
How JSON embedded in a message is treated.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /**
    Merge every top-level field of the embedded JSON into the record.
    */
    Json,
    /**
    Only pick up a recognized `level` from the embedded JSON.
    */
    Text,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Format::Json)
        } else {
            Ok(Format::Text)
        }
    }
}

/**
Configuration for record processing.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    How to treat JSON found in a message.

    When there's no format, messages are never parsed as JSON.
    */
    pub format: Option<Format>,
    /**
    Extra fields to add to every record.
    */
    pub enrich: Enrich,
    /**
    The value of the `type` field on every record.
    */
    pub log_type: String,
    /**
    Records with a `log_level` or `level` in this list are dropped.
    */
    pub ignore_levels: Levels,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: None,
            enrich: Enrich::default(),
            log_type: enrich::DEFAULT_TYPE.to_owned(),
            ignore_levels: Levels::default(),
        }
    }
}

/**
Build a processor to normalize records.
*/
pub fn build(config: Config) -> Process {
    Process::new(config)
}

/**
The result of processing a single record.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Kept,
    Dropped(Dropped),
}

/**
Why a record was dropped.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    /**
    The record is an invocation lifecycle line written by the platform.
    */
    Housekeeping,
    /**
    The record's level is in the ignore list.
    */
    Level,
}

/**
Process raw log events into flattened records.
*/
#[derive(Debug, Clone)]
pub struct Process {
    config: Config,
}

impl Process {
    pub fn new(config: Config) -> Self {
        Process { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /**
    Build the fields shared by every record in a batch.
    */
    pub fn additional_data(&self, batch: &Batch, context: &dyn Context) -> AdditionalData {
        AdditionalData::new(batch, context, &self.config)
    }

    /**
    Normalize a raw log event and, if it's kept, pass its flattened form to `with`.

    Events that aren't objects, or that have no `message` or timestamp, are
    rejected with an error.
    */
    pub fn with_record(
        &self,
        entry: Value,
        additional: &AdditionalData,
        with: impl FnOnce(flat::Record) -> Result<(), Error>,
    ) -> Result<Outcome, Error> {
        match self.normalize(entry, additional)? {
            Normalized::Kept(fields) => {
                with(flat::flatten(&fields))?;

                Ok(Outcome::Kept)
            }
            Normalized::Dropped(dropped) => Ok(Outcome::Dropped(dropped)),
        }
    }

    /**
    Run a raw log event through the normalization steps, in order:

    1. Use `timestamp` as `@timestamp` if there isn't one.
    2. Infer an `error` level for timeout reports.
    3. For function log groups, drop lifecycle lines and split runtime lines.
    4. Merge in the batch's additional data.
    5. Expand JSON embedded in the message, if a format is configured.
    6. Drop records with an ignored level.
    */
    pub fn normalize(&self, entry: Value, additional: &AdditionalData) -> Result<Normalized, Error> {
        increment!(process.msg);

        let mut fields = match entry {
            Value::Object(fields) => fields,
            other => bail!(
                "expected log inside logEvents to be an object but found {}",
                kind(&other)
            ),
        };

        if !fields.contains_key("message") {
            bail!("expected log inside logEvents to have a message");
        }

        add_timestamp(&mut fields)?;
        level::infer(&mut fields);

        if lambda::is_function_log_group(additional.log_group()) {
            if let Some(message) = fields.get("message").and_then(Value::as_str) {
                if lambda::is_housekeeping(message) {
                    increment!(process.dropped_housekeeping);

                    return Ok(Normalized::Dropped(Dropped::Housekeeping));
                }

                let message = message.to_owned();
                lambda::extract(&mut fields, &message);
            }
        }

        additional.merge_into(&mut fields);

        self.expand_json(&mut fields);

        if level::is_ignored(&fields, &self.config.ignore_levels) {
            increment!(process.dropped_level);

            return Ok(Normalized::Dropped(Dropped::Level));
        }

        increment!(process.kept);

        Ok(Normalized::Kept(fields))
    }

    fn expand_json(&self, fields: &mut Fields) {
        let format = match self.config.format {
            Some(format) => format,
            None => return,
        };

        let embedded = match fields
            .get("message")
            .and_then(Value::as_str)
            .and_then(parse_embedded)
        {
            Some(embedded) => embedded,
            None => return,
        };

        increment!(process.json_expanded);

        match format {
            Format::Json => {
                for (k, v) in embedded {
                    fields.insert(k, v);
                }
            }
            Format::Text => {
                if let Some(level) = embedded_level(&embedded) {
                    fields.insert("log_level".to_owned(), level.into());
                }
            }
        }
    }
}

/**
A record after normalization.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Kept(Fields),
    Dropped(Dropped),
}

/**
Move `timestamp` into `@timestamp` unless the record already has one.
*/
fn add_timestamp(fields: &mut Fields) -> Result<(), Error> {
    if fields.contains_key("@timestamp") {
        return Ok(());
    }

    let timestamp = match fields.shift_remove("timestamp") {
        Some(Value::String(timestamp)) => timestamp,
        Some(other) => other.to_string(),
        None => bail!("expected log inside logEvents to have a timestamp"),
    };

    fields.insert("@timestamp".to_owned(), Value::String(timestamp));

    Ok(())
}

/**
Try parse a message as a JSON object.

Messages that aren't JSON objects are left as plain text.
*/
fn parse_embedded(message: &str) -> Option<Fields> {
    match serde_json::from_str(message) {
        Ok(Value::Object(embedded)) => Some(embedded),
        _ => None,
    }
}

/**
Find a recognized `level` in embedded JSON, keeping its original casing.
*/
fn embedded_level(embedded: &Fields) -> Option<&str> {
    embedded
        .get("level")
        .and_then(Value::as_str)
        .filter(|level| level::is_severity(level))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
