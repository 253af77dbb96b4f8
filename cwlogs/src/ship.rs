/*!
Shipping flattened records.

A shipper accumulates records as they're added and delivers them when it's
flushed. Batching, transport and retries are all up to the shipper.
*/

use std::io::{self, Write};

use crate::{process::flat::Record, Error};

/**
A destination for flattened records.
*/
pub trait Ship {
    /**
    Add a record to be shipped.
    */
    fn add(&mut self, record: Record) -> Result<(), Error>;

    /**
    Deliver any records that have been added.

    This is called once at the end of every batch.
    */
    fn flush(&mut self) -> Result<(), Error>;
}

impl<'a, S> Ship for &'a mut S
where
    S: Ship + ?Sized,
{
    fn add(&mut self, record: Record) -> Result<(), Error> {
        (**self).add(record)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}

/**
A shipper that writes records as newline-delimited JSON.

Records are buffered until the shipper is flushed.
*/
#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    pending: Vec<Record>,
}

/**
Build a shipper that writes to `stdout`.
*/
pub fn stdout() -> Writer<io::Stdout> {
    Writer::new(io::stdout())
}

impl<W> Writer<W>
where
    W: Write,
{
    pub fn new(inner: W) -> Self {
        Writer {
            inner,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> Ship for Writer<W>
where
    W: Write,
{
    fn add(&mut self, record: Record) -> Result<(), Error> {
        self.pending.push(record);

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        for record in self.pending.drain(..) {
            serde_json::to_writer(&mut self.inner, &record)?;
            self.inner.write_all(b"\n")?;
        }

        self.inner.flush()?;

        Ok(())
    }
}
