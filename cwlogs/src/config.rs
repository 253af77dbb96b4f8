use std::{env, str::FromStr};

use crate::{diagnostics, process, Error};

/**
Configuration for a single run of the pipeline.

This is read once before any batch is processed and isn't changed afterwards.
*/
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub process: process::Config,
    pub diagnostics: diagnostics::Config,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Config::default();

        config.process.format = read_optional_environment("FORMAT")?;
        read_environment(&mut config.process.enrich, "ENRICH")?;
        read_environment(&mut config.process.ignore_levels, "LOG_LEVELS_IGNORE")?;

        match read_optional_environment("TYPE")? {
            Some(log_type) => config.process.log_type = log_type,
            None => diagnostics::emit_event(
                diagnostics::Level::Debug,
                "Using default TYPE {Type}",
                None,
                vec![("Type", config.process.log_type.clone().into())],
            ),
        }

        if is_truthy("CWLOGS_ENABLE_DIAGNOSTICS")? {
            config.diagnostics.min_level = diagnostics::Level::Debug;
        }

        Ok(config)
    }
}

fn is_truthy(name: impl AsRef<str>) -> Result<bool, Error> {
    match env::var(name.as_ref()) {
        // The environment variable contains a truthy value
        Ok(ref v) if v == "True" || v == "true" || v == "1" => Ok(true),
        // The environment variable is not set or doesn't contain
        // a truthy value
        Ok(_) | Err(env::VarError::NotPresent) => Ok(false),
        // The environment variable is invalid
        Err(e) => Err(e.into()),
    }
}

/**
Read an environment variable into `into`.

Returns `true` if the variable was set to a non-empty value.
Empty and missing variables leave the default in place.
*/
fn read_environment<T>(into: &mut T, name: impl AsRef<str>) -> Result<bool, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    match env::var(name.as_ref()) {
        Ok(ref v) if v.is_empty() => Ok(false),
        Err(env::VarError::NotPresent) => Ok(false),
        Err(e) => Err(e.into()),
        Ok(v) => {
            *into = T::from_str(&v)?;

            Ok(true)
        }
    }
}

/**
Read an environment variable that has no default.

Returns `None` only if the variable is missing. An empty value is still parsed.
*/
fn read_optional_environment<T>(name: impl AsRef<str>) -> Result<Option<T>, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    match env::var(name.as_ref()) {
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
        Ok(v) => Ok(Some(T::from_str(&v)?)),
    }
}
