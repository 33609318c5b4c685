//! Async UDP socket abstraction.
//!
//! [`Socket`] is a thin wrapper around `tokio::net::UdpSocket` that speaks
//! raw datagrams paired with their peer address.  No decoding happens here —
//! the server must echo exactly the bytes it received, so the socket layer
//! never interprets them.

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;

/// An async, datagram-oriented UDP socket with a capped receive buffer.
///
/// All methods are `&self` so the socket can be shared across tasks if
/// needed.
#[derive(Debug)]
pub struct Socket {
    /// Address the socket is actually bound to, resolved after binding.
    pub local_addr: SocketAddr,
    inner: UdpSocket,
    /// Receive buffer size; longer datagrams are truncated by the OS.
    recv_len: usize,
}

impl Socket {
    /// Bind a new socket to `local_addr`, receiving at most `recv_len`
    /// bytes per datagram.
    ///
    /// Passing port 0 lets the OS choose an ephemeral port.
    pub async fn bind(local_addr: SocketAddr, recv_len: usize) -> io::Result<Self> {
        let inner = UdpSocket::bind(local_addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self {
            local_addr,
            inner,
            recv_len,
        })
    }

    /// Receive the next datagram.
    ///
    /// Returns `(bytes, sender_address)`.  Datagrams longer than the
    /// configured buffer are truncated by the receive call, not reassembled.
    pub async fn recv_from(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        let mut buf = vec![0u8; self.recv_len];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        buf.truncate(n);
        Ok((buf, addr))
    }

    /// Send `bytes` as a single UDP datagram to `dest`.
    pub async fn send_to(&self, bytes: &[u8], dest: SocketAddr) -> io::Result<usize> {
        self.inner.send_to(bytes, dest).await
    }
}
