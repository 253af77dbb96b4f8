/*!
Self-diagnostics for the log pipeline.

Diagnostic events are written to `stderr` as CLEF so they can be told apart
from shipped records, which may go to `stdout`.
*/

use std::{
    collections::BTreeMap,
    fmt::Display,
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Error;

/**
Declare a set of counters for the calling module.

Counters live in a `metrics` submodule and are bumped with `increment!`.
*/
macro_rules! metrics {
    ($($metric:ident),+) => {
        #[allow(non_upper_case_globals)]
        pub(crate) mod metrics {
            use std::sync::atomic::{AtomicUsize, Ordering};

            $(
                pub(crate) static $metric: AtomicUsize = AtomicUsize::new(0);
            )+

            pub(crate) fn snapshot() -> Vec<(&'static str, usize)> {
                vec![
                    $(
                        (stringify!($metric), $metric.load(Ordering::Relaxed)),
                    )+
                ]
            }
        }
    };
}

macro_rules! increment {
    ($module:ident . $metric:ident) => {
        $crate::$module::metrics::$metric.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" | "information" => Ok(Level::Info),
            "error" => Ok(Level::Error),
            _ => bail!("unrecognized diagnostic level {:?}", s),
        }
    }
}

/**
Configuration for self-diagnostics.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    The minimum level of diagnostic events to write.
    */
    pub min_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_level: Level::Info,
        }
    }
}

static MIN_LEVEL: AtomicUsize = AtomicUsize::new(Level::Info as usize);

pub fn init(config: Config) {
    MIN_LEVEL.store(config.min_level as usize, Ordering::Relaxed);
}

/**
Write out the final counter values.
*/
pub fn stop() {
    let mut counters = BTreeMap::new();

    for (name, value) in crate::process::metrics::snapshot()
        .into_iter()
        .map(|(name, value)| (format!("process_{}", name), value))
        .chain(
            crate::handler::metrics::snapshot()
                .into_iter()
                .map(|(name, value)| (format!("handler_{}", name), value)),
        )
    {
        counters.insert(name, Value::from(value));
    }

    emit_event(
        Level::Info,
        "Collected diagnostic metrics",
        None,
        vec![("Metrics", Value::Object(counters.into_iter().collect()))],
    );
}

#[derive(Serialize)]
struct DiagnosticEvent<'a> {
    #[serde(rename = "@t")]
    timestamp: DateTime<Utc>,

    #[serde(rename = "@l")]
    level: &'static str,

    #[serde(rename = "@mt")]
    message_template: &'static str,

    #[serde(rename = "@x")]
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,

    #[serde(flatten)]
    properties: BTreeMap<&'static str, Value>,
}

const NO_PROPERTIES: Option<(&'static str, Value)> = None;

fn enabled(level: Level) -> bool {
    level as usize >= MIN_LEVEL.load(Ordering::Relaxed)
}

/**
Write a diagnostic event with a set of named properties.

Property names should match the holes in the message template.
*/
pub fn emit_event(
    level: Level,
    message_template: &'static str,
    error: Option<&str>,
    properties: impl IntoIterator<Item = (&'static str, Value)>,
) {
    if !enabled(level) {
        return;
    }

    let evt = DiagnosticEvent {
        timestamp: Utc::now(),
        level: level.as_str(),
        message_template,
        error,
        properties: properties.into_iter().collect(),
    };

    if let Ok(json) = serde_json::to_string(&evt) {
        eprintln!("{}", json);
    }
}

pub fn emit(message_template: &'static str) {
    emit_event(Level::Info, message_template, None, NO_PROPERTIES)
}

pub fn emit_debug(message_template: &'static str) {
    emit_event(Level::Debug, message_template, None, NO_PROPERTIES)
}

pub fn emit_err(error: &impl Display, message_template: &'static str) {
    let err_str = format!("{:#}", error);
    emit_event(Level::Error, message_template, Some(&err_str), NO_PROPERTIES)
}
