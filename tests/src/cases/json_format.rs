use crate::support::*;

use cwlogs::process::Format;

pub fn test() {
    let received = batch()
        .format(Format::Json)
        .log_events(json!([
            { "timestamp": 1, "message": "{\"level\":\"error\",\"code\":500}" },
            { "timestamp": 2, "message": "{\"level\":\"info\",\"code\":200}" },
            { "timestamp": 3, "message": "{\"user\":{\"id\":7},\"ok\":true}" },
            { "timestamp": 4, "message": "{broken" }
        ]))
        .ship();

    assert_eq!(3, received.summary().shipped);
    assert_eq!(1, received.summary().dropped);

    let error = &received.records[0];
    assert_eq!("error", error["level"]);
    assert_eq!(500, error["code"]);
    assert!(error.get("log_level").is_none());

    let nested = &received.records[1];
    assert_eq!("{\"id\":7}", nested["user"]);
    assert_eq!(true, nested["ok"]);

    assert_eq!("{broken", received.records[2]["message"]);
}
