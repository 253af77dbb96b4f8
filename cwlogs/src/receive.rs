use std::{
    error, fmt,
    io::{self, Read},
};

use base64::{engine::general_purpose::STANDARD, Engine};

use bytes::Bytes;

use libflate::gzip;

use serde_json::Value;

/**
The event delivered by a CloudWatch Logs subscription.

The payload is base64 encoded, gzip compressed JSON.
*/
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    awslogs: AwsLogs,
}

#[derive(Debug, Clone, Deserialize)]
struct AwsLogs {
    data: String,
}

impl Envelope {
    pub fn new(data: impl Into<String>) -> Self {
        Envelope {
            awslogs: AwsLogs { data: data.into() },
        }
    }

    /**
    Read an envelope from its JSON form.
    */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::Envelope)
    }

    /**
    Decode the batch carried by this envelope.

    Any failure here is fatal for the whole batch.
    */
    pub fn decode(&self) -> Result<Batch, DecodeError> {
        let compressed = unbase64(&self.awslogs.data)?;
        let payload = gunzip(compressed)?;

        serde_json::from_slice(&payload).map_err(DecodeError::Json)
    }
}

/**
A decoded batch of log events along with the metadata
describing where they came from.
*/
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /**
    The raw log events.

    These aren't validated here; an event that isn't an object
    is rejected when the batch is processed.
    */
    pub log_events: Vec<Value>,
    pub log_group: String,
    pub log_stream: String,
    pub message_type: String,
    pub owner: String,
    #[serde(default)]
    pub subscription_filters: Vec<String>,
}

fn unbase64(data: &str) -> Result<Bytes, DecodeError> {
    STANDARD
        .decode(data.trim())
        .map(Bytes::from)
        .map_err(DecodeError::Base64)
}

fn gunzip(compressed: Bytes) -> Result<Bytes, DecodeError> {
    if !Compression::is_gzip(&compressed) {
        return Err(DecodeError::NotGzip);
    }

    let mut decoder = gzip::Decoder::new(&*compressed).map_err(DecodeError::Gzip)?;

    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(DecodeError::Gzip)?;

    Ok(Bytes::from(payload))
}

struct Compression;

impl Compression {
    const MAGIC_GZIP: [u8; 2] = [0x1f, 0x8b];

    fn is_gzip(src: &[u8]) -> bool {
        src.len() >= 2 && src[0..2] == Self::MAGIC_GZIP
    }
}

/**
An error decoding an envelope.
*/
#[derive(Debug)]
pub enum DecodeError {
    Envelope(serde_json::Error),
    Base64(base64::DecodeError),
    NotGzip,
    Gzip(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Envelope(_) => f.write_str("the event is not a CloudWatch Logs envelope"),
            DecodeError::Base64(_) => f.write_str("the payload is not valid base64"),
            DecodeError::NotGzip => f.write_str("the payload is not gzip compressed"),
            DecodeError::Gzip(_) => f.write_str("the payload could not be decompressed"),
            DecodeError::Json(_) => f.write_str("the payload is not a valid log batch"),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Envelope(e) | DecodeError::Json(e) => Some(e),
            DecodeError::Base64(e) => Some(e),
            DecodeError::Gzip(e) => Some(e),
            DecodeError::NotGzip => None,
        }
    }
}
