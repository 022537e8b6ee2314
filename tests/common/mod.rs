#![allow(dead_code)]

use mcquery::{
    codec::{decode_request, HandshakeResponse, Request, ResponseHeader},
    BasicStat, FullStat,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{net::UdpSocket, task::JoinHandle};

pub const TOKEN: i32 = 9513307;

/// How the fake server reacts to one request.
pub enum Answer {
    Now(Vec<u8>),
    After(Duration, Vec<u8>),
    Silent,
}

/// In-process query server on 127.0.0.1.
pub struct FakeServer {
    pub addr: SocketAddr,
    received: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    /// `respond` gets the index of the request (starting at 0) and the decoded request.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(usize, Request) -> Answer + Send + 'static,
    {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let addr = socket.local_addr().unwrap();
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);

        let handle = tokio::spawn(async move {
            let mut bufs = [0u8; 1024];

            loop {
                let Ok((len, src)) = socket.recv_from(&mut bufs).await else {
                    return;
                };
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let Ok(request) = decode_request(&bufs[..len]) else {
                    continue;
                };

                match respond(index, request) {
                    Answer::Now(packet) => {
                        let _ = socket.send_to(&packet, src).await;
                    }
                    Answer::After(delay, packet) => {
                        let socket = Arc::clone(&socket);
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = socket.send_to(&packet, src).await;
                        });
                    }
                    Answer::Silent => {}
                }
            }
        });

        Self {
            addr,
            received,
            handle,
        }
    }

    /// A well behaved server answering with [basic_stat] and [full_stat].
    pub async fn minecraft() -> Self {
        Self::start(|_, request| minecraft_answer(request)).await
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Number of datagrams received so far.
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn minecraft_answer(request: Request) -> Answer {
    match request {
        Request::Handshake { session_id } => Answer::Now(handshake_packet(session_id, TOKEN)),
        Request::BasicStat {
            challenge_token, ..
        } if challenge_token == TOKEN => Answer::Now(basic_stat().encode()),
        Request::FullStat {
            challenge_token, ..
        } if challenge_token == TOKEN => Answer::Now(full_stat(&["Alice", "Bob"]).encode()),
        // Real servers stay silent on a wrong token.
        _ => Answer::Silent,
    }
}

pub fn handshake_packet(session_id: i32, token: i32) -> Vec<u8> {
    HandshakeResponse {
        header: ResponseHeader::handshake(session_id),
        challenge_token: token,
    }
    .encode()
}

pub fn basic_stat() -> BasicStat {
    BasicStat {
        header: ResponseHeader::stat(1),
        motd: "A Server".into(),
        game_type: "SMP".into(),
        map: "world".into(),
        num_players: "3".into(),
        max_players: "20".into(),
        host_port: 25565,
        host_ip: "127.0.0.1".into(),
    }
}

pub fn full_stat(players: &[&str]) -> FullStat {
    FullStat {
        header: ResponseHeader::stat(1),
        key_values: [
            ("hostname", "A Server"),
            ("gametype", "SMP"),
            ("game_id", "MINECRAFT"),
            ("version", "1.20.4"),
            ("plugins", ""),
            ("map", "world"),
            ("numplayers", "2"),
            ("maxplayers", "20"),
            ("hostport", "25565"),
            ("hostip", "127.0.0.1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
        players: players.iter().map(|p| p.to_string()).collect(),
    }
}
