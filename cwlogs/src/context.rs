/*!
The invocation that a batch is being processed for.
*/

use std::env;

/**
Attributes of the current invocation.

Either attribute may be unavailable; neither is required to process a batch.
*/
pub trait Context {
    fn function_version(&self) -> Option<&str>;
    fn invoked_function_arn(&self) -> Option<&str>;
}

#[derive(Debug, Default, Clone)]
pub struct Invocation {
    pub function_version: Option<String>,
    pub invoked_function_arn: Option<String>,
}

impl Invocation {
    /**
    Read the invocation from the environment of the running function.
    */
    pub fn from_env() -> Self {
        Invocation {
            function_version: non_empty_var("AWS_LAMBDA_FUNCTION_VERSION"),
            invoked_function_arn: non_empty_var("CWLOGS_INVOKED_FUNCTION_ARN"),
        }
    }
}

impl Context for Invocation {
    fn function_version(&self) -> Option<&str> {
        self.function_version.as_deref()
    }

    fn invoked_function_arn(&self) -> Option<&str> {
        self.invoked_function_arn.as_deref()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
