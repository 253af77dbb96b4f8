use crate::support::*;

use cwlogs::receive::{DecodeError, Envelope};

pub fn test() {
    let received = batch().ship_envelope(Envelope::new("!!not-base64!!"));

    let err = received.result.expect_err("expected a failure");

    assert!(matches!(
        err.downcast_ref::<DecodeError>(),
        Some(DecodeError::Base64(_))
    ));
    assert!(received.records.is_empty());
    assert_eq!(0, received.flushed);
}
