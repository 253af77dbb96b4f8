use std::{
    io::{self, Read},
    process,
};

use cwlogs::{
    config::Config,
    context::Invocation,
    diagnostics::{self, emit, emit_err},
    handler,
    process as pipeline,
    receive::Envelope,
    ship, Error,
};

fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            emit_err(&err, "Failed to read configuration");
            process::exit(1);
        }
    };

    diagnostics::init(config.diagnostics.clone());

    let result = run(config);

    diagnostics::stop();

    if let Err(err) = result {
        emit_err(&err, "Failed to ship the batch");
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Error> {
    let mut event = Vec::new();
    io::stdin().read_to_end(&mut event)?;

    let envelope = Envelope::from_slice(&event)?;
    let process = pipeline::build(config.process);

    let summary = handler::handle(&process, &envelope, &Invocation::from_env(), ship::stdout())?;

    if summary.shipped == 0 {
        emit("No logs were shipped");
    }

    Ok(())
}
