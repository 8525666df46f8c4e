// src/pipeline/sink.rs

//! Gzip line sink.
//!
//! Records are appended one per line in arrival order. The gzip stream is
//! finished on every exit path, so a run cut short by a fatal error still
//! leaves a readable file holding everything written before it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use futures::{Stream, StreamExt};

use crate::error::{AppError, Result};
use crate::models::ResultRecord;

/// Compressed, append-only record writer.
pub struct GzipSink<W: Write> {
    encoder: GzEncoder<W>,
}

impl GzipSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> GzipSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            encoder: GzEncoder::new(writer, Compression::default()),
        }
    }

    /// Drain `records` into the sink and close it.
    ///
    /// Returns the number of lines written. An error from the stream stops
    /// consumption, the file is still closed, and the error is returned.
    pub async fn persist<St>(self, records: St) -> Result<u64>
    where
        St: Stream<Item = Result<ResultRecord>>,
    {
        let mut encoder = self.encoder;
        let mut records = std::pin::pin!(records);
        let mut written = 0u64;

        let drained = loop {
            match records.next().await {
                Some(Ok(record)) => {
                    if let Err(e) = write_line(&mut encoder, &record) {
                        break Err(e);
                    }
                    written += 1;
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        };

        let closed = encoder.finish().and_then(|mut inner| inner.flush());

        match (drained, closed) {
            (Ok(()), Ok(())) => Ok(written),
            (Ok(()), Err(e)) => Err(AppError::Io(e)),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    log::error!("Failed to close output after abort: {}", close_err);
                }
                log::info!("Output closed with {} records before abort", written);
                Err(e)
            }
        }
    }
}

fn write_line<W: Write>(out: &mut W, record: &ResultRecord) -> Result<()> {
    out.write_all(record.ascii_bytes()?)?;
    out.write_all(b"\n")?;
    Ok(())
}
