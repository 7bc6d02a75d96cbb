//! Sending receipts to a thermal printer over raw TCP

use crate::error::{PrintError, PrintResult};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

/// Raw printing port used by network receipt printers
pub const DEFAULT_PORT: u16 = 9100;

/// Bound on connecting, and again on sending the job
const PRINT_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination for a finished print job
#[allow(async_fn_in_trait)]
pub trait Printer {
    async fn print(&self, job: &[u8]) -> PrintResult<()>;
}

/// Receipt printer reachable over the LAN
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
}

impl NetworkPrinter {
    /// Parse "192.168.1.50:9100", or a bare IP which gets port 9100
    pub fn parse(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim();
        let parsed = addr
            .parse::<SocketAddr>()
            .or_else(|_| addr.parse::<IpAddr>().map(|ip| SocketAddr::new(ip, DEFAULT_PORT)))
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid printer address: {}", addr)))?;

        Ok(Self { addr: parsed })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(job), fields(addr = %self.addr, bytes = job.len()))]
    async fn print(&self, job: &[u8]) -> PrintResult<()> {
        let mut stream = tokio::time::timeout(PRINT_TIMEOUT, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connecting to {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        tokio::time::timeout(PRINT_TIMEOUT, async {
            stream.write_all(job).await?;
            stream.shutdown().await
        })
        .await
        .map_err(|_| PrintError::Timeout(format!("Sending job to {}", self.addr)))??;

        info!("Print job sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_parse_address() {
        let printer = NetworkPrinter::parse("192.168.1.50:9101").unwrap();
        assert_eq!(printer.addr().port(), 9101);

        let printer = NetworkPrinter::parse(" 192.168.1.50 ").unwrap();
        assert_eq!(printer.addr().port(), DEFAULT_PORT);

        assert!(matches!(
            NetworkPrinter::parse("kitchen-printer"),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_print_sends_job() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let printer = NetworkPrinter::parse(&addr.to_string()).unwrap();
        printer.print(b"\x1B\x40hello").await.unwrap();

        assert_eq!(server.await.unwrap(), b"\x1B\x40hello");
    }

    #[tokio::test]
    async fn test_print_to_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let printer = NetworkPrinter::parse(&addr.to_string()).unwrap();
        assert!(matches!(
            printer.print(b"x").await,
            Err(PrintError::Connection(_) | PrintError::Timeout(_))
        ));
    }
}
