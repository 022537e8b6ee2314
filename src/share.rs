use crate::{conf::SocketConf, QueryErr};
use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::{net::UdpSocket, sync::watch};
use tracing::{debug, trace};

// Largest payload a UDP datagram can carry.
const MAX_DATAGRAM_SIZE: usize = 65_507;

static NEXT_TRANSPORT_ID: AtomicU64 = AtomicU64::new(1);

/// A UDP socket fixed to one query server.
///
/// UDP is connectionless, "connecting" only fixes the destination of every
/// send and filters datagrams from other peers. The socket is released by
/// [Transport::close] or when the transport is dropped.
#[derive(Debug)]
pub struct Transport {
    id: u64,
    socket: UdpSocket,
    peer: SocketAddr,
    closed: Arc<watch::Sender<bool>>,
    bufs: Vec<u8>,
}

/// Closes a [Transport] from another task.
///
/// A pending receive fails with [QueryErr::ClosedErr] instead of waiting for
/// its deadline, and later sends fail with [QueryErr::EncodingErr].
#[derive(Debug, Clone)]
pub struct CloseHandle(Arc<watch::Sender<bool>>);

impl CloseHandle {
    pub fn close(&self) {
        self.0.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.0.borrow()
    }
}

impl Transport {
    /// Resolve `host` and bind a local socket aimed at it.
    pub async fn connect(
        host: &str,
        port: u16,
        socket_conf: &SocketConf,
    ) -> Result<Self, QueryErr> {
        let addr = format!("{}:{}", host, port);
        let connect_err = |source: std::io::Error| QueryErr::ConnectErr {
            addr: addr.clone(),
            source,
        };

        let peer = tokio::net::lookup_host((host, port))
            .await
            .map_err(connect_err)?
            .next()
            .ok_or_else(|| {
                connect_err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "host resolved to no address",
                ))
            })?;
        let socket = create_udp_socket(socket_conf, &peer)
            .await
            .map_err(connect_err)?;

        socket.connect(peer).await.map_err(connect_err)?;
        debug!(%peer, local = ?socket.local_addr().ok(), "udp transport connected");

        Ok(Self {
            id: NEXT_TRANSPORT_ID.fetch_add(1, Ordering::Relaxed),
            socket,
            peer,
            closed: Arc::new(watch::Sender::new(false)),
            bufs: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    /// Identifies this transport, challenge tokens are bound to it.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> Result<SocketAddr, QueryErr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle(Arc::clone(&self.closed))
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Send one request datagram.
    pub async fn send(&self, packet: &[u8]) -> Result<(), QueryErr> {
        if self.is_closed() {
            return Err(QueryErr::EncodingErr(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "transport closed",
            )));
        }

        let sent = self.socket.send(packet).await.map_err(QueryErr::EncodingErr)?;

        if sent != packet.len() {
            return Err(QueryErr::EncodingErr(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, packet.len()),
            )));
        }

        trace!(peer = %self.peer, bytes = sent, "sent datagram");
        Ok(())
    }

    /// Wait for the next datagram from the server.
    ///
    /// Only the [CloseHandle] ends the wait early, callers bound it with a timeout.
    pub async fn recv(&mut self) -> Result<&[u8], QueryErr> {
        let mut closed = self.closed.subscribe();

        if *closed.borrow_and_update() {
            return Err(QueryErr::ClosedErr);
        }

        let len = tokio::select! {
            result = self.socket.recv(&mut self.bufs) => result?,
            _ = closed.wait_for(|closed| *closed) => return Err(QueryErr::ClosedErr),
        };

        trace!(peer = %self.peer, bytes = len, "received datagram");
        Ok(&self.bufs[..len])
    }

    /// Drop datagrams already queued on the socket.
    ///
    /// These are late answers to a request whose wait was abandoned. A late
    /// answer that is still in flight is not caught here.
    pub fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;

        while let Ok(len) = self.socket.try_recv(&mut self.bufs) {
            debug!(peer = %self.peer, bytes = len, "discarded stale datagram");
            discarded += 1;
        }

        discarded
    }

    /// Release the socket. Consuming `self` makes a second close impossible.
    pub fn close(self) {
        self.closed.send_replace(true);
        debug!(peer = %self.peer, "udp transport closed");
    }
}

/// Bind the local end, using the wildcard address of the peer's family unless
/// an explicit IPv4 address is configured.
async fn create_udp_socket(
    socket_conf: &SocketConf,
    peer: &SocketAddr,
) -> std::io::Result<UdpSocket> {
    let ip = match peer {
        SocketAddr::V6(_) if socket_conf.rep_udp_ipv4 == Ipv4Addr::UNSPECIFIED => {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        }
        _ => IpAddr::V4(socket_conf.rep_udp_ipv4),
    };

    UdpSocket::bind((ip, socket_conf.rep_udp_port)).await
}
