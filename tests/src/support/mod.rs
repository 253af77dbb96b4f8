use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine};

use libflate::gzip;

use cwlogs::{
    context::Invocation,
    handler::{self, Summary},
    process::{self, flat::Record},
    receive::Envelope,
    ship::Ship,
    Error,
};

pub use serde_json::Value;

pub mod batch;

pub use self::batch::{batch, Builder};

/**
Everything a batch handed to the shipper.
*/
pub struct Received {
    pub records: Vec<Value>,
    pub flushed: usize,
    pub result: Result<Summary, Error>,
}

impl Received {
    pub fn summary(&self) -> Summary {
        match self.result {
            Ok(summary) => summary,
            Err(ref err) => panic!("failed to handle batch: {:#}", err),
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record["message"].as_str().expect("missing message"))
            .collect()
    }
}

#[derive(Default)]
struct Recording {
    records: Vec<Value>,
    flushed: usize,
}

impl Ship for Recording {
    fn add(&mut self, record: Record) -> Result<(), Error> {
        self.records.push(serde_json::to_value(record)?);

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flushed += 1;

        Ok(())
    }
}

pub(crate) fn gzip(bytes: impl AsRef<[u8]>) -> Vec<u8> {
    let mut encoder = gzip::Encoder::new(Vec::new()).expect("failed to build gzip");

    encoder
        .write_all(bytes.as_ref())
        .expect("failed to encode bytes");

    encoder
        .finish()
        .into_result()
        .expect("failed to finish encoding")
}

pub(crate) fn base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn ship(
    config: process::Config,
    context: Invocation,
    envelope: Envelope,
) -> Received {
    let process = process::build(config);
    let mut ship = Recording::default();

    let result = handler::handle(&process, &envelope, &context, &mut ship);

    Received {
        records: ship.records,
        flushed: ship.flushed,
        result,
    }
}

pub(crate) fn test_child(name: &str) -> bool {
    use std::{
        env,
        process::{
            Command,
            Stdio,
        },
    };

    let self_bin = env::args().next().expect("missing self command");

    let mut test = Command::new(self_bin)
        .arg(name)
        .stdout(Stdio::inherit())
        .spawn()
        .expect("failed to start child process");

    test.wait().expect("test execution failed").success()
}

macro_rules! cases {
    ($($case:ident),+) => {
        $(
            mod $case;
        )+

        pub(crate) fn test_all() {
            use std::process;

            let mut failed = Vec::new();

            $(
                if !$crate::support::test_child(stringify!($case)) {
                    failed.push(stringify!($case));
                }
            )+

            if failed.len() > 0 {
                eprintln!("test execution failed. Failures: {:#?}", failed);
                process::exit(1);
            }
        }

        pub(crate) fn test(name: impl AsRef<str>) {
            let name = name.as_ref();

            $(
                if name == stringify!($case) {
                    use cwlogs::diagnostics;

                    diagnostics::init(diagnostics::Config {
                        min_level: diagnostics::Level::Debug,
                        ..Default::default()
                    });

                    println!("running {}...", stringify!($case));
                    self::$case::test();

                    diagnostics::stop();
                }
            )+
        }
    }
}
