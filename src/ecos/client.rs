// src/ecos/client.rs
// =============================================================================
// This module owns the single TCP connection to the ECoS.
//
// How a request works:
// 1. Write the command line (for example "help(lok,get)") to the socket
// 2. Keep reading until nothing arrives for IDLE_TIMEOUT
// 3. Hand the collected bytes to parse_response()
//
// There is no framing in the protocol we rely on: the ECoS sends its answer
// as one burst, and a quiet socket means the answer is complete.
// Only one request is ever in flight.
// =============================================================================

use super::{parse_response, HelpSource};
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

// ECoSNet listens on this TCP port
pub const DEFAULT_PORT: u16 = 15471;

// A read that sees no data for this long ends the response
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 4096;

pub struct EcosClient {
    stream: TcpStream,
}

impl EcosClient {
    // Opens the connection. It stays open for the lifetime of the client.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))
            .await
            .with_context(|| format!("Failed to connect to ECoS at {}:{}", host, port))?;

        info!("Connected to ECoS at {}:{}", host, port);
        Ok(Self { stream })
    }

    // Reads until the socket has been quiet for IDLE_TIMEOUT
    // (or the ECoS closed its side)
    async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match timeout(IDLE_TIMEOUT, self.stream.read(&mut chunk)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(e).context("Failed to read from ECoS"),
                Err(_elapsed) => break,
            }
        }

        Ok(response)
    }
}

impl HelpSource for EcosClient {
    async fn request(&mut self, command: &str) -> Result<Option<String>> {
        if !command.is_ascii() {
            bail!("Request '{}' is not ASCII", command);
        }

        debug!(command, "sending request");
        self.stream
            .write_all(command.as_bytes())
            .await
            .with_context(|| format!("Failed to send '{}' to ECoS", command))?;

        let bytes = self.read_response().await?;
        debug!(command, bytes = bytes.len(), "received response");

        Ok(parse_response(&bytes)?)
    }
}
