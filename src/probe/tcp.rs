//! TCP connect probe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time;

use super::{Probe, ProbeError};

/// Opens a TCP connection and closes it immediately.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn run(&self) -> Result<(), ProbeError> {
        match time::timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(source)) => Err(ProbeError::Connect {
                addr: self.addr.clone(),
                source,
            }),
            Err(_) => Err(ProbeError::Timeout {
                target: self.addr.clone(),
                after: self.timeout,
            }),
        }
    }
}
