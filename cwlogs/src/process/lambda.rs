/*!
Lines written by the Lambda runtime.

Runtimes prefix application output with tab separated metadata:

```text
<timestamp>\t<request id>\t<message>
<timestamp>\t<request id>\t<level>\t<message>
<timestamp>\t<request id>\t<level>\t<...>\t<message>
```

The platform also writes its own lifecycle lines into the same stream,
which aren't application content.
*/

use std::ops::RangeInclusive;

use serde_json::Value;

use super::Fields;

const LOG_GROUP_MARKER: &str = "/aws/lambda/";

const HOUSEKEEPING_MARKERS: [&str; 4] = ["START", "END", "REPORT", "INIT_START"];

/**
The number of tab separated parts a runtime line may have.
*/
const RUNTIME_PARTS: RangeInclusive<usize> = 3..=5;

/**
The number of parts in runtime lines that carry a level.
*/
const LEVELLED_PARTS: RangeInclusive<usize> = 4..=5;

const TIMESTAMP_PART: usize = 0;
const REQUEST_ID_PART: usize = 1;
const LEVEL_PART: usize = 2;

pub(super) fn is_function_log_group(log_group: &str) -> bool {
    log_group.contains(LOG_GROUP_MARKER)
}

/**
Whether a message marks an invocation boundary, like `START RequestId: ...`.
*/
pub(super) fn is_housekeeping(message: &str) -> bool {
    HOUSEKEEPING_MARKERS
        .iter()
        .any(|marker| message.starts_with(marker))
}

/**
Split a runtime line into its timestamp, request id, level and message.

Messages that don't look like runtime lines are left alone.
*/
pub(super) fn extract(fields: &mut Fields, message: &str) {
    let parts: Vec<&str> = message.split('\t').collect();

    if !RUNTIME_PARTS.contains(&parts.len()) {
        return;
    }

    fields.insert("@timestamp".to_owned(), parts[TIMESTAMP_PART].into());
    fields.insert("requestID".to_owned(), parts[REQUEST_ID_PART].into());

    if LEVELLED_PARTS.contains(&parts.len()) {
        fields.insert(
            "log_level".to_owned(),
            Value::String(parts[LEVEL_PART].to_lowercase()),
        );
    }

    fields.insert("message".to_owned(), parts[parts.len() - 1].into());
}
