/*!
Severity handling: recognizing levels, inferring them, and filtering on them.
*/

use std::{collections::HashSet, str::FromStr};

use serde_json::Value;

use super::Fields;
use crate::Error;

lazy_static! {
    /**
    The set of level names that are recognized when found in embedded JSON.
    */
    static ref SEVERITIES: HashSet<&'static str> = [
        "alert",
        "trace",
        "debug",
        "notice",
        "info",
        "warn",
        "warning",
        "error",
        "err",
        "critical",
        "crit",
        "fatal",
        "severe",
        "emerg",
        "emergency",
    ]
    .iter()
    .cloned()
    .collect();
}

/**
Text the platform writes when a function runs past its timeout.

These lines don't carry a level of their own.
*/
const TIMEOUT_MARKER: &str = "Task timed out after";

const TIMEOUT_LEVEL: &str = "error";

/**
Whether `level` is a recognized severity, ignoring case.
*/
pub fn is_severity(level: &str) -> bool {
    SEVERITIES.contains(level.to_lowercase().as_str())
}

/**
A list of levels to match against, ignoring case.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels(Vec<String>);

impl Levels {
    pub fn new(levels: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Levels(
            levels
                .into_iter()
                .map(|level| level.as_ref().trim().to_lowercase())
                .filter(|level| !level.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, level: &str) -> bool {
        let level = level.to_lowercase();
        self.0.iter().any(|ignored| *ignored == level)
    }
}

impl Default for Levels {
    fn default() -> Self {
        Levels::new(&["info"])
    }
}

impl FromStr for Levels {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Levels::new(s.split(',')))
    }
}

/**
Set a `level` on records that are timeout reports but don't have one already.
*/
pub(super) fn infer(fields: &mut Fields) {
    if fields.contains_key("level") {
        return;
    }

    let timed_out = fields
        .get("message")
        .and_then(Value::as_str)
        .map(|message| message.contains(TIMEOUT_MARKER))
        .unwrap_or(false);

    if timed_out {
        fields.insert("level".to_owned(), TIMEOUT_LEVEL.into());
    }
}

/**
Whether a record has a `log_level` or `level` in the ignore list.

Non-string levels are never ignored.
*/
pub(super) fn is_ignored(fields: &Fields, ignore: &Levels) -> bool {
    ["log_level", "level"].iter().any(|field| {
        fields
            .get(*field)
            .and_then(Value::as_str)
            .map(|level| ignore.contains(level))
            .unwrap_or(false)
    })
}
