use cwlogs::{
    context::Invocation,
    process::{self, Format},
    receive::Envelope,
};

use serde_json::Value;

use super::Received;

/**
Build a batch of log events to ship.
*/
pub struct Builder {
    log_group: String,
    log_events: Value,
    config: process::Config,
    context: Invocation,
}

pub fn batch() -> Builder {
    Builder::new()
}

impl Builder {
    fn new() -> Self {
        Builder {
            log_group: "/aws/lambda/orders".into(),
            log_events: json!([]),
            config: Default::default(),
            context: Default::default(),
        }
    }

    pub fn log_group(mut self, v: impl Into<String>) -> Self {
        self.log_group = v.into();
        self
    }

    pub fn log_events(mut self, v: Value) -> Self {
        self.log_events = v;
        self
    }

    pub fn format(mut self, v: Format) -> Self {
        self.config.format = Some(v);
        self
    }

    pub fn enrich(mut self, v: &str) -> Self {
        self.config.enrich = v.parse().expect("invalid enrichment");
        self
    }

    pub fn log_type(mut self, v: impl Into<String>) -> Self {
        self.config.log_type = v.into();
        self
    }

    pub fn context(mut self, function_version: &str, invoked_function_arn: &str) -> Self {
        self.context = Invocation {
            function_version: Some(function_version.into()),
            invoked_function_arn: Some(invoked_function_arn.into()),
        };
        self
    }

    pub fn payload(&self) -> Value {
        json!({
            "messageType": "DATA_MESSAGE",
            "owner": "123456789012",
            "logGroup": self.log_group,
            "logStream": "2024/01/01/[$LATEST]0123456789abcdef",
            "subscriptionFilters": ["ship-to-logzio"],
            "logEvents": self.log_events
        })
    }

    pub fn envelope(&self) -> Envelope {
        let payload = serde_json::to_vec(&self.payload()).expect("failed to serialize payload");

        Envelope::new(super::base64(super::gzip(payload)))
    }

    /**
    Ship the batch.
    */
    pub fn ship(self) -> Received {
        let envelope = self.envelope();

        self.ship_envelope(envelope)
    }

    /**
    Ship a specific envelope using the configuration of this builder.
    */
    pub fn ship_envelope(self, envelope: Envelope) -> Received {
        super::ship(self.config, self.context, envelope)
    }
}
