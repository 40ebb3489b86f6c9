//! NDJSON writer for sink messages.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{SinkMessage, WireError};

pub struct SinkWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> SinkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write each message as one line and flush. A message that fails to
    /// encode is logged and skipped; I/O errors end the write.
    pub async fn send_all(&mut self, messages: &[SinkMessage]) -> Result<(), WireError> {
        if messages.is_empty() {
            return Ok(());
        }

        for message in messages {
            match message.encode() {
                Ok(mut line) => {
                    line.push('\n');
                    self.inner.write_all(line.as_bytes()).await?;
                }
                Err(e) => tracing::error!(error = %e, "dropping sink message"),
            }
        }
        self.inner.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
