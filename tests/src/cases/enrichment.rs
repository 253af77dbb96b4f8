use crate::support::*;

pub fn test() {
    let received = batch()
        .enrich("env=prod;team=payments")
        .log_type("orders")
        .context(
            "$LATEST",
            "arn:aws:lambda:us-east-1:123456789012:function:orders",
        )
        .log_events(json!([
            { "timestamp": 1, "env": "dev", "message": "one" },
            { "timestamp": 2, "message": "two" }
        ]))
        .ship();

    for record in &received.records {
        assert_eq!("prod", record["env"]);
        assert_eq!("payments", record["team"]);
        assert_eq!("orders", record["type"]);
        assert_eq!("$LATEST", record["function_version"]);
        assert_eq!(
            "arn:aws:lambda:us-east-1:123456789012:function:orders",
            record["invoked_function_arn"]
        );
        assert_eq!("/aws/lambda/orders", record["logGroup"]);
    }

    // Without a context the attributes are left off
    let received = batch()
        .log_events(json!([{ "timestamp": 1, "message": "one" }]))
        .ship();

    assert!(received.records[0].get("function_version").is_none());
    assert!(received.records[0].get("invoked_function_arn").is_none());
}
