use crate::support::*;

use cwlogs::process::Format;

pub fn test() {
    let received = batch()
        .format(Format::Json)
        .log_events(json!([
            {
                "timestamp": 1,
                "message": "{\"data\":{\"orderId\":42,\"paid\":true,\"items\":[1,2],\"customer\":{\"id\":7}}}"
            },
            {
                "timestamp": 2,
                "message": "{\"data\":{\"message\":\"inner\",\"type\":\"custom\"}}"
            }
        ]))
        .ship();

    let record = &received.records[0];

    assert_eq!(42, record["orderId"]);
    assert_eq!(true, record["paid"]);
    assert!(record.get("items").is_none());
    assert!(record.get("customer").is_none());
    assert_eq!(
        "{\"orderId\":42,\"paid\":true,\"items\":[1,2],\"customer\":{\"id\":7}}",
        record["data"]
    );
    assert_eq!("v3", record["logVerstion"]);

    let overridden = &received.records[1];

    assert_eq!("inner", overridden["message"]);
    assert_eq!("custom", overridden["type"]);
    assert_eq!("/aws/lambda/orders", overridden["logGroup"]);
}
