//! Byte channel between a session driver and one remote terminal.
//!
//! The driver only needs to read what the visitor typed, write frames, and
//! close.  Anything protocol-specific (telnet option negotiation, line-ending
//! quirks) stays behind this trait.

use std::future::Future;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub trait Transport: Send {
    /// Read keyboard bytes into `buf`.  `Ok(0)` means the client went away.
    ///
    /// Must be cancel-safe: the driver races it against timers and state
    /// events, and a dropped read must not lose input.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Write and flush one frame.
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Close the channel.  Called exactly once, after the final write.
    fn close(&mut self) -> impl Future<Output = io::Result<()>> + Send;
}

/// Transport over any raw duplex stream, with no framing of its own.
pub struct StreamTransport<S> {
    stream: S,
}

impl<S> StreamTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf).await
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
