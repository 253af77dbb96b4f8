/*!
Run a whole batch through the pipeline.
*/

use crate::{
    context::Context,
    diagnostics::{self, Level},
    process::{Outcome, Process},
    receive::Envelope,
    ship::Ship,
    Error,
};

metrics! {
    batch_ok,
    batch_err
}

/**
Counts of what happened to the events in a batch.
*/
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub received: usize,
    pub shipped: usize,
    pub dropped: usize,
}

/**
Decode an envelope and ship each of its records.

Records are added to the shipper in the order they appear in the batch.
The shipper is flushed once after the last record, even if no records
were kept.

If the envelope can't be decoded then nothing is shipped. If an event in the
batch is malformed then processing stops there without flushing; records
already added to the shipper aren't taken back.
*/
pub fn handle(
    process: &Process,
    envelope: &Envelope,
    context: &dyn Context,
    mut ship: impl Ship,
) -> Result<Summary, Error> {
    match handle_batch(process, envelope, context, &mut ship) {
        Ok(summary) => {
            increment!(handler.batch_ok);

            Ok(summary)
        }
        Err(err) => {
            increment!(handler.batch_err);

            Err(err)
        }
    }
}

fn handle_batch(
    process: &Process,
    envelope: &Envelope,
    context: &dyn Context,
    ship: &mut impl Ship,
) -> Result<Summary, Error> {
    let batch = envelope.decode()?;
    let additional = process.additional_data(&batch, context);

    diagnostics::emit_event(
        Level::Info,
        "About to send {Count} logs from {LogGroup}",
        None,
        vec![
            ("Count", batch.log_events.len().into()),
            ("LogGroup", batch.log_group.as_str().into()),
        ],
    );

    let mut summary = Summary {
        received: batch.log_events.len(),
        ..Default::default()
    };

    for (index, entry) in batch.log_events.into_iter().enumerate() {
        let outcome = process
            .with_record(entry, &additional, |record| ship.add(record))
            .map_err(|e| e.context(format!("failed to process log event {}", index)))?;

        match outcome {
            Outcome::Kept => summary.shipped += 1,
            Outcome::Dropped(_) => summary.dropped += 1,
        }
    }

    ship.flush()?;

    diagnostics::emit_event(
        Level::Debug,
        "Shipped {Shipped} logs and dropped {Dropped}",
        None,
        vec![
            ("Shipped", summary.shipped.into()),
            ("Dropped", summary.dropped.into()),
        ],
    );

    Ok(summary)
}
