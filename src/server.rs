//! The datagram dispatcher: receive → decode → dispatch → echo.
//!
//! A [`Server`] owns the bound socket and its configuration, constructed
//! once with an explicit lifecycle: [`Server::bind`] enters the single
//! persistent "listening" state, [`Server::run`] drives the loop until a
//! shutdown signal or a fatal socket error, and dropping the server closes
//! the socket.
//!
//! Per-datagram errors (short header, wrong body size, failed echo) are
//! diagnostics, never fatal: the server must not crash on malformed or
//! unexpected client input.  Only a failure of the listening socket itself
//! propagates out of the loop; there is no retry policy — restarting is an
//! external supervision concern.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::codec::{Header, HEADER_LEN};
use crate::dispatch::{Dispatch, Registry};
use crate::socket::Socket;

/// Default UDP port the server listens on.
pub const DEFAULT_PORT: u16 = 30279;

/// Default receive buffer size; longer datagrams are truncated.
pub const DEFAULT_RECV_BUFFER: usize = 1024;

/// Bind address, port, and buffer size for a [`Server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Local address to bind.
    pub bind_addr: IpAddr,
    /// UDP port to listen on.
    pub port: u16,
    /// Receive buffer size in bytes.
    pub recv_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            recv_buffer: DEFAULT_RECV_BUFFER,
        }
    }
}

/// Fatal server errors.
///
/// Everything here ends the serving loop.  Per-datagram conditions are
/// logged and recovered inside the loop instead.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The receive call on the listening socket failed.
    #[error("receive failed on listening socket: {0}")]
    Receive(#[source] io::Error),
}

/// A UDP message echo server.
pub struct Server {
    socket: Socket,
    registry: Registry,
}

impl Server {
    /// Bind the listening socket and install the built-in message handlers.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_registry(config, Registry::with_defaults()).await
    }

    /// Bind the listening socket with a caller-supplied dispatch table.
    ///
    /// Use this to serve additional message types beyond the built-ins.
    pub async fn with_registry(
        config: ServerConfig,
        registry: Registry,
    ) -> Result<Self, ServerError> {
        let addr = SocketAddr::new(config.bind_addr, config.port);
        let socket = Socket::bind(addr, config.recv_buffer)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        log::info!("listening on {}", socket.local_addr);
        Ok(Self { socket, registry })
    }

    /// The address the listening socket is actually bound to.
    ///
    /// Differs from the configured address when port 0 was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.socket.local_addr
    }

    /// Serve datagrams until `shutdown` fires or the listening socket fails.
    ///
    /// Each iteration receives one datagram, inspects it (header decode plus
    /// type dispatch, both purely observational), and echoes the original
    /// bytes back to the sender.  A failed echo is logged and the loop
    /// continues; a failed receive is fatal and returns
    /// [`ServerError::Receive`].
    pub async fn run(&self, mut shutdown: oneshot::Receiver<()>) -> Result<(), ServerError> {
        loop {
            let (datagram, peer) = tokio::select! {
                _ = &mut shutdown => {
                    log::info!("shutdown signal received, closing socket");
                    return Ok(());
                }
                received = self.socket.recv_from() => {
                    received.map_err(ServerError::Receive)?
                }
            };

            self.handle_datagram(&datagram, peer).await;
        }
    }

    /// Process one datagram: log, decode, dispatch, echo.
    ///
    /// Never fails — every per-datagram condition is reported through the
    /// log and the original bytes are echoed regardless.
    async fn handle_datagram(&self, datagram: &[u8], peer: SocketAddr) {
        log::info!("received {} bytes from {}", datagram.len(), peer);

        match Header::decode(datagram) {
            Ok(header) => {
                log::info!(
                    "  header: msg_id {:#06x}, version {:#04x}, flags {:#04x}, source {:#06x}, spare {:#06x}",
                    header.msg_id,
                    header.version,
                    header.flags,
                    header.source,
                    header.spare
                );

                match self.registry.dispatch(&header, &datagram[HEADER_LEN..]) {
                    Ok(Dispatch::Handled) => {}
                    Ok(Dispatch::Unknown(msg_id)) => {
                        log::warn!("  unknown message type {msg_id:#06x}");
                    }
                    Err(e) => log::warn!("  {e}"),
                }
            }
            // Short datagrams skip decode and dispatch but are still echoed.
            Err(e) => log::warn!("  {e}"),
        }

        match self.socket.send_to(datagram, peer).await {
            Ok(sent) => log::debug!("echoed {sent} bytes to {peer}"),
            // One client's failed echo must not halt service to others.
            Err(e) => log::warn!("failed to echo to {peer}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_protocol_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.port, 30279);
        assert_eq!(config.recv_buffer, 1024);
    }

    #[tokio::test]
    async fn bind_to_ephemeral_port_resolves_local_addr() {
        let config = ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            ..ServerConfig::default()
        };
        let server = Server::bind(config).await.expect("bind server");
        assert_ne!(server.local_addr().port(), 0);
    }
}
