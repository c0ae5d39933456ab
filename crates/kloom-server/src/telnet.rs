//! Minimal telnet server side: enough for `telnet host 2222` to behave like a
//! raw terminal.
//!
//! On accept the server offers to echo and to suppress go-ahead, which puts
//! common clients into character-at-a-time mode without local echo.
//! Everything the client negotiates back is swallowed, and the CR LF / CR NUL
//! that telnet sends for Enter is collapsed to a single CR.

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::transport::Transport;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;

/// Sent once, right after accept.
pub const NEGOTIATION: [u8; 6] = [IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FilterState {
    #[default]
    Data,
    /// Previous data byte was CR.
    Cr,
    Iac,
    /// After WILL/WONT/DO/DONT, expecting the option byte.
    Option,
    Sub,
    SubIac,
}

/// Strips telnet commands from the inbound byte stream.  State carries over
/// between chunks, so a command split across reads is still removed.
#[derive(Debug, Default)]
pub struct TelnetFilter {
    state: FilterState,
}

impl TelnetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the data bytes of `raw` to `out`.
    pub fn filter(&mut self, raw: &[u8], out: &mut Vec<u8>) {
        for &b in raw {
            self.state = match self.state {
                FilterState::Cr if b == b'\n' || b == 0 => FilterState::Data,
                FilterState::Data | FilterState::Cr => match b {
                    IAC => FilterState::Iac,
                    b'\r' => {
                        out.push(b);
                        FilterState::Cr
                    }
                    _ => {
                        out.push(b);
                        FilterState::Data
                    }
                },
                FilterState::Iac => match b {
                    // Escaped 0xFF data byte.
                    IAC => {
                        out.push(IAC);
                        FilterState::Data
                    }
                    WILL | WONT | DO | DONT => FilterState::Option,
                    SB => FilterState::Sub,
                    _ => FilterState::Data,
                },
                FilterState::Option => FilterState::Data,
                FilterState::Sub => match b {
                    IAC => FilterState::SubIac,
                    _ => FilterState::Sub,
                },
                FilterState::SubIac => match b {
                    SE => FilterState::Data,
                    _ => FilterState::Sub,
                },
            };
        }
    }
}

/// Double every 0xFF so it is not read as a command.
fn escape_iac(data: &[u8]) -> std::borrow::Cow<'_, [u8]> {
    if !data.contains(&IAC) {
        return data.into();
    }
    let mut out = Vec::with_capacity(data.len() + 8);
    for &b in data {
        out.push(b);
        if b == IAC {
            out.push(IAC);
        }
    }
    out.into()
}

pub struct TelnetTransport {
    stream: TcpStream,
    filter: TelnetFilter,
    raw: Vec<u8>,
    data: Vec<u8>,
}

impl TelnetTransport {
    /// Take over an accepted connection and send the option offers.
    pub async fn accept(mut stream: TcpStream) -> io::Result<Self> {
        stream.set_nodelay(true)?;
        stream.write_all(&NEGOTIATION).await?;
        Ok(Self {
            stream,
            filter: TelnetFilter::new(),
            raw: vec![0u8; 1024],
            data: Vec::with_capacity(1024),
        })
    }
}

impl Transport for TelnetTransport {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let want = buf.len().min(self.raw.len());
            let n = self.stream.read(&mut self.raw[..want]).await?;
            if n == 0 {
                return Ok(0);
            }
            self.data.clear();
            self.filter.filter(&self.raw[..n], &mut self.data);
            // A chunk of pure negotiation is not EOF; wait for real input.
            if !self.data.is_empty() {
                buf[..self.data.len()].copy_from_slice(&self.data);
                return Ok(self.data.len());
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(&escape_iac(data)).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
