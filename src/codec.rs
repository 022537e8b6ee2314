//! Wire format of the [Query](https://wiki.vg/Query) protocol.
//!
//! Everything here is pure: requests are built into byte vectors and
//! responses are decoded from a single received datagram.
//! All integers are big-endian, except the `hostport` field of the basic
//! stat response which servers write little-endian.

use crate::QueryErr;
use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of every request packet.
pub const MAGIC: [u8; 2] = [0xFE, 0xFD];
/// Packet type of the handshake request and response.
pub const HANDSHAKE_TYPE: u8 = 0x09;
/// Packet type of both stat requests. Basic and full are told apart by length.
pub const STAT_TYPE: u8 = 0x00;
/// Session id used by this client for every request.
pub const SESSION_ID: i32 = 1;
/// Upper bound of key/value pairs and of player names in a full stat response.
pub const ENTRY_LIMIT: usize = 512;

// Full query except the payload must be padded to 8 bytes.
const FULL_STAT_REQUEST_PADDING: [u8; 4] = [0x00; 4];
// "splitnum\0\x80\0" and "\x01player_\0\0", meaningless to clients.
const KV_SECTION_PADDING: &[u8; 11] = b"splitnum\x00\x80\x00";
const PLAYER_SECTION_PADDING: &[u8; 10] = b"\x01player_\x00\x00";

/// Type and session id, the first five bytes of every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub kind: u8,
    pub session_id: i32,
}

impl ResponseHeader {
    pub fn handshake(session_id: i32) -> Self {
        Self {
            kind: HANDSHAKE_TYPE,
            session_id,
        }
    }

    pub fn stat(session_id: i32) -> Self {
        Self {
            kind: STAT_TYPE,
            session_id,
        }
    }

    fn write_to(&self, bufs: &mut Vec<u8>) {
        bufs.push(self.kind);
        bufs.extend_from_slice(&self.session_id.to_be_bytes());
    }
}

/// A decoded client request, as seen by a query server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Handshake {
        session_id: i32,
    },
    BasicStat {
        session_id: i32,
        challenge_token: i32,
    },
    FullStat {
        session_id: i32,
        challenge_token: i32,
    },
}

impl Request {
    pub fn session_id(&self) -> i32 {
        match *self {
            Request::Handshake { session_id }
            | Request::BasicStat { session_id, .. }
            | Request::FullStat { session_id, .. } => session_id,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Request::Handshake { session_id } => encode_handshake(session_id),
            Request::BasicStat {
                session_id,
                challenge_token,
            } => encode_basic_stat_request(session_id, challenge_token),
            Request::FullStat {
                session_id,
                challenge_token,
            } => encode_full_stat_request(session_id, challenge_token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    pub header: ResponseHeader,
    pub challenge_token: i32,
}

impl HandshakeResponse {
    pub fn encode(&self) -> Vec<u8> {
        let mut bufs = Vec::with_capacity(16);

        self.header.write_to(&mut bufs);
        push_nt_str(&mut bufs, &self.challenge_token.to_string());
        bufs
    }
}

/// Basic [status](https://wiki.vg/Query#Basic_stat) of a server.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BasicStat {
    #[serde(skip)]
    pub header: ResponseHeader,
    pub motd: String,
    pub game_type: String,
    pub map: String,
    pub num_players: String,
    pub max_players: String,
    pub host_port: u16,
    pub host_ip: String,
}

impl BasicStat {
    /// Build the response packet. String fields must not contain NUL bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bufs = Vec::with_capacity(64);

        self.header.write_to(&mut bufs);
        for field in [
            &self.motd,
            &self.game_type,
            &self.map,
            &self.num_players,
            &self.max_players,
        ] {
            push_nt_str(&mut bufs, field);
        }
        bufs.extend_from_slice(&self.host_port.to_le_bytes());
        push_nt_str(&mut bufs, &self.host_ip);
        bufs
    }
}

impl std::fmt::Display for BasicStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

/// Full [status](https://wiki.vg/Query#Full_stat) of a server.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FullStat {
    #[serde(skip)]
    pub header: ResponseHeader,
    pub key_values: BTreeMap<String, String>,
    pub players: Vec<String>,
}

impl FullStat {
    /// Build the response packet. Keys, values and names must not contain NUL bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bufs = Vec::with_capacity(256);

        self.header.write_to(&mut bufs);
        bufs.extend_from_slice(KV_SECTION_PADDING);
        for (key, value) in &self.key_values {
            push_nt_str(&mut bufs, key);
            push_nt_str(&mut bufs, value);
        }
        bufs.push(0x00);
        bufs.extend_from_slice(PLAYER_SECTION_PADDING);
        for player in &self.players {
            push_nt_str(&mut bufs, player);
        }
        bufs.push(0x00);
        bufs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.get(key).map(String::as_str)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.get("hostname")
    }

    pub fn game_type(&self) -> Option<&str> {
        self.get("gametype")
    }

    pub fn game_id(&self) -> Option<&str> {
        self.get("game_id")
    }

    pub fn version(&self) -> Option<&str> {
        self.get("version")
    }

    pub fn map(&self) -> Option<&str> {
        self.get("map")
    }

    pub fn num_players(&self) -> Option<&str> {
        self.get("numplayers")
    }

    pub fn max_players(&self) -> Option<&str> {
        self.get("maxplayers")
    }

    pub fn host_port(&self) -> Option<u16> {
        self.get("hostport").and_then(|port| port.trim().parse().ok())
    }

    pub fn host_ip(&self) -> Option<&str> {
        self.get("hostip")
    }

    /// Server software and plugins, from the `plugins` key.
    ///
    /// Plugin format: `[SERVER_MOD_NAME[: PLUGIN_NAME(; PLUGIN_NAME...)]]`.
    /// Vanilla servers send an empty string.
    pub fn plugins(&self) -> Option<ModPlugin> {
        let plugin_str = self.get("plugins")?.trim();

        if plugin_str.is_empty() {
            return None;
        }

        Some(match plugin_str.split_once(':') {
            Some((mod_name, plugins)) => ModPlugin {
                mod_name: mod_name.trim().into(),
                plugins: plugins
                    .split(';')
                    .map(str::trim)
                    .filter(|x| !x.is_empty())
                    .map(Into::into)
                    .collect(),
            },
            None => ModPlugin {
                mod_name: plugin_str.into(),
                plugins: vec![],
            },
        })
    }
}

impl std::fmt::Display for FullStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModPlugin {
    pub mod_name: String,
    pub plugins: Vec<String>,
}

/// Handshake request: magic + type(9) + session id.
pub fn encode_handshake(session_id: i32) -> Vec<u8> {
    let mut bufs = Vec::with_capacity(7);

    bufs.extend_from_slice(&MAGIC);
    bufs.push(HANDSHAKE_TYPE);
    bufs.extend_from_slice(&session_id.to_be_bytes());
    bufs
}

/// Basic stat request: magic + type(0) + session id + challenge token.
pub fn encode_basic_stat_request(session_id: i32, challenge_token: i32) -> Vec<u8> {
    let mut bufs = Vec::with_capacity(15);

    bufs.extend_from_slice(&MAGIC);
    bufs.push(STAT_TYPE);
    bufs.extend_from_slice(&session_id.to_be_bytes());
    bufs.extend_from_slice(&challenge_token.to_be_bytes());
    bufs
}

/// Full stat request: the basic stat request followed by four zero bytes.
pub fn encode_full_stat_request(session_id: i32, challenge_token: i32) -> Vec<u8> {
    let mut bufs = encode_basic_stat_request(session_id, challenge_token);

    bufs.extend_from_slice(&FULL_STAT_REQUEST_PADDING);
    bufs
}

/// Decode a request packet received by a server.
pub fn decode_request(bufs: &[u8]) -> Result<Request, QueryErr> {
    let mut reader = PacketReader::create(bufs);

    if reader.take(2, "magic")? != MAGIC {
        return Err(QueryErr::protocol(format!(
            "request must start with 0xFE 0xFD, but got: {:02X?}",
            &bufs[..2]
        )));
    }

    let kind = reader.read_u8("type")?;
    let session_id = reader.read_i32_be("session id")?;

    match kind {
        HANDSHAKE_TYPE => Ok(Request::Handshake { session_id }),
        STAT_TYPE => {
            let challenge_token = reader.read_i32_be("challenge token")?;

            match reader.remaining() {
                0 => Ok(Request::BasicStat {
                    session_id,
                    challenge_token,
                }),
                4 => Ok(Request::FullStat {
                    session_id,
                    challenge_token,
                }),
                n => Err(QueryErr::protocol(format!(
                    "stat request has {} trailing bytes, expected 0 or 4",
                    n
                ))),
            }
        }
        other => Err(QueryErr::protocol(format!(
            "unknown request type: 0x{:02X}",
            other
        ))),
    }
}

/// Process a handshake response [packet](https://wiki.vg/Query#Response).
pub fn decode_handshake_response(bufs: &[u8]) -> Result<HandshakeResponse, QueryErr> {
    let mut reader = PacketReader::create(bufs);
    let header = reader.read_header(HANDSHAKE_TYPE)?;
    let payload = reader.read_nt_bytes("challenge token")?;

    Ok(HandshakeResponse {
        header,
        challenge_token: parse_challenge_token(payload)?,
    })
}

pub fn decode_basic_stat_response(bufs: &[u8]) -> Result<BasicStat, QueryErr> {
    let mut reader = PacketReader::create(bufs);

    Ok(BasicStat {
        header: reader.read_header(STAT_TYPE)?,
        motd: reader.read_nt_str("motd")?,
        game_type: reader.read_nt_str("gametype")?,
        map: reader.read_nt_str("map")?,
        num_players: reader.read_nt_str("numplayers")?,
        max_players: reader.read_nt_str("maxplayers")?,
        host_port: reader.read_u16_le("hostport")?,
        host_ip: reader.read_nt_str("hostip")?,
    })
}

pub fn decode_full_stat_response(bufs: &[u8]) -> Result<FullStat, QueryErr> {
    let mut reader = PacketReader::create(bufs);
    let header = reader.read_header(STAT_TYPE)?;

    reader.skip(KV_SECTION_PADDING.len(), "key/value padding")?;

    let mut key_values = BTreeMap::new();
    let mut terminated = false;

    for _ in 0..=ENTRY_LIMIT {
        let key = reader.read_nt_str("key")?;

        if key.is_empty() {
            terminated = true;
            break;
        }

        let value = reader.read_nt_str("value")?;
        key_values.insert(key, value);
    }

    if !terminated {
        return Err(QueryErr::protocol("too many entries in key/value section"));
    }

    reader.skip(PLAYER_SECTION_PADDING.len(), "player padding")?;

    let mut players = Vec::new();

    loop {
        let player = reader.read_nt_str("player name")?;

        if player.is_empty() {
            break;
        }
        if players.len() == ENTRY_LIMIT {
            return Err(QueryErr::protocol("too many entries in player section"));
        }

        players.push(player);
    }

    Ok(FullStat {
        header,
        key_values,
        players,
    })
}

/// Parse the decimal challenge token.
///
/// Some servers append stray bytes after the digits, those are dropped.
/// Tokens above `i32::MAX` are spelled unsigned and wrap into the negative range.
fn parse_challenge_token(payload: &[u8]) -> Result<i32, QueryErr> {
    let digits_end = payload
        .iter()
        .rposition(u8::is_ascii_digit)
        .map_or(0, |idx| idx + 1);
    let invalid = || {
        QueryErr::protocol(format!(
            "challenge token is not a number: {:02X?}",
            payload
        ))
    };
    let token = std::str::from_utf8(&payload[..digits_end])
        .map_err(|_| invalid())?
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid())?;

    if token < i64::from(i32::MIN) || token > i64::from(u32::MAX) {
        return Err(invalid());
    }

    Ok(token as i32)
}

fn push_nt_str(bufs: &mut Vec<u8>, s: &str) {
    bufs.extend_from_slice(s.as_bytes());
    bufs.push(0x00);
}

/// Strings are UTF-8 when valid, otherwise every byte is taken as Latin-1.
///
/// Compatible with `server.properties` files saved as ISO-8859-1,
/// where characters such as § © ® are a single byte.
fn decode_text(bufs: &[u8]) -> String {
    match std::str::from_utf8(bufs) {
        Ok(s) => s.into(),
        Err(_) => bufs.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Cursor over one received datagram.
struct PacketReader<'a> {
    bufs: &'a [u8],
    current_idx: usize,
}

impl<'a> PacketReader<'a> {
    fn create(bufs: &'a [u8]) -> Self {
        Self {
            bufs,
            current_idx: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.bufs.len() - self.current_idx
    }

    fn take(&mut self, size: usize, field: &str) -> Result<&'a [u8], QueryErr> {
        if self.remaining() < size {
            return Err(QueryErr::protocol(format!(
                "packet truncated in {}: need {} bytes at offset {}, have {}",
                field,
                size,
                self.current_idx,
                self.remaining()
            )));
        }

        let bufs = &self.bufs[self.current_idx..self.current_idx + size];
        self.current_idx += size;
        Ok(bufs)
    }

    fn skip(&mut self, size: usize, field: &str) -> Result<(), QueryErr> {
        self.take(size, field).map(|_| ())
    }

    fn read_u8(&mut self, field: &str) -> Result<u8, QueryErr> {
        Ok(self.take(1, field)?[0])
    }

    fn read_i32_be(&mut self, field: &str) -> Result<i32, QueryErr> {
        let bufs = self.take(4, field)?;
        Ok(i32::from_be_bytes([bufs[0], bufs[1], bufs[2], bufs[3]]))
    }

    fn read_u16_le(&mut self, field: &str) -> Result<u16, QueryErr> {
        let bufs = self.take(2, field)?;
        Ok(u16::from_le_bytes([bufs[0], bufs[1]]))
    }

    fn read_header(&mut self, expected_kind: u8) -> Result<ResponseHeader, QueryErr> {
        let kind = self.read_u8("type")?;

        if kind != expected_kind {
            return Err(QueryErr::protocol(format!(
                "response type mismatch, expected: 0x{:02X}, but got: 0x{:02X}",
                expected_kind, kind
            )));
        }

        Ok(ResponseHeader {
            kind,
            session_id: self.read_i32_be("session id")?,
        })
    }

    /// Bytes up to the next NUL. The NUL is consumed but not returned.
    fn read_nt_bytes(&mut self, field: &str) -> Result<&'a [u8], QueryErr> {
        let rest = &self.bufs[self.current_idx..];

        match rest.iter().position(|&b| b == 0x00) {
            Some(end) => {
                self.current_idx += end + 1;
                Ok(&rest[..end])
            }
            None => Err(QueryErr::protocol(format!(
                "packet truncated in {}: missing NUL terminator",
                field
            ))),
        }
    }

    fn read_nt_str(&mut self, field: &str) -> Result<String, QueryErr> {
        self.read_nt_bytes(field).map(decode_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_stat() -> BasicStat {
        BasicStat {
            header: ResponseHeader::stat(SESSION_ID),
            motd: "A Server".into(),
            game_type: "SMP".into(),
            map: "world".into(),
            num_players: "3".into(),
            max_players: "20".into(),
            host_port: 25565,
            host_ip: "127.0.0.1".into(),
        }
    }

    fn full_stat_bufs(keys: usize, players: usize) -> Vec<u8> {
        let mut bufs = vec![STAT_TYPE, 0, 0, 0, 1];

        bufs.extend_from_slice(KV_SECTION_PADDING);
        for i in 0..keys {
            push_nt_str(&mut bufs, &format!("key{}", i));
            push_nt_str(&mut bufs, "value");
        }
        bufs.push(0x00);
        bufs.extend_from_slice(PLAYER_SECTION_PADDING);
        for i in 0..players {
            push_nt_str(&mut bufs, &format!("player{}", i));
        }
        bufs.push(0x00);
        bufs
    }

    fn is_protocol_err(result: Result<impl std::fmt::Debug, QueryErr>, needle: &str) -> bool {
        matches!(result, Err(QueryErr::ProtocolErr(msg)) if msg.contains(needle))
    }

    #[test]
    fn handshake_request_bytes() {
        assert_eq!(
            encode_handshake(SESSION_ID),
            [0xFE, 0xFD, 0x09, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn stat_request_bytes() {
        let basic = encode_basic_stat_request(1, 0x0091_295B);
        let full = encode_full_stat_request(1, 0x0091_295B);

        assert_eq!(
            basic,
            [0xFE, 0xFD, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x91, 0x29, 0x5B]
        );
        assert_eq!(full.len(), 15);
        assert_eq!(&full[..11], basic.as_slice());
        assert_eq!(&full[11..], &[0u8; 4]);
    }

    #[test]
    fn requests_decode_back() {
        for request in [
            Request::Handshake { session_id: 1 },
            Request::BasicStat {
                session_id: 1,
                challenge_token: -7,
            },
            Request::FullStat {
                session_id: 1,
                challenge_token: 9513307,
            },
        ] {
            assert_eq!(decode_request(&request.encode()).unwrap(), request);
        }
    }

    #[test]
    fn request_without_magic_is_rejected() {
        assert!(is_protocol_err(
            decode_request(&[0xFF, 0xFD, 0x09, 0, 0, 0, 1]),
            "0xFE 0xFD"
        ));
        assert!(is_protocol_err(decode_request(&[0xFE]), "magic"));
    }

    #[test]
    fn handshake_response_token() {
        let response = decode_handshake_response(b"\x09\x00\x00\x00\x0112345\x00").unwrap();

        assert_eq!(response.header, ResponseHeader::handshake(1));
        assert_eq!(response.challenge_token, 12345);
    }

    #[test]
    fn handshake_response_strips_trailing_garbage() {
        let response = decode_handshake_response(b"\x09\x00\x00\x00\x019513307\x01\xFF\x00").unwrap();

        assert_eq!(response.challenge_token, 9513307);
    }

    #[test]
    fn handshake_response_wraps_unsigned_token() {
        let response = decode_handshake_response(b"\x09\x00\x00\x00\x014294967295\x00").unwrap();

        assert_eq!(response.challenge_token, -1);
    }

    #[test]
    fn handshake_response_rejects_non_numeric_token() {
        assert!(is_protocol_err(
            decode_handshake_response(b"\x09\x00\x00\x00\x01abc\x00"),
            "not a number"
        ));
        assert!(is_protocol_err(
            decode_handshake_response(b"\x09\x00\x00\x00\x01\x00"),
            "not a number"
        ));
        assert!(is_protocol_err(
            decode_handshake_response(b"\x09\x00\x00\x00\x0199999999999\x00"),
            "not a number"
        ));
    }

    #[test]
    fn handshake_response_rejects_wrong_type_and_truncation() {
        assert!(is_protocol_err(
            decode_handshake_response(b"\x00\x00\x00\x00\x0112345\x00"),
            "type mismatch"
        ));
        assert!(is_protocol_err(
            decode_handshake_response(b"\x09\x00\x00"),
            "session id"
        ));
        assert!(is_protocol_err(
            decode_handshake_response(b"\x09\x00\x00\x00\x0112345"),
            "NUL"
        ));
    }

    #[test]
    fn basic_stat_response_fields() {
        let mut bufs = vec![0x00, 0x00, 0x00, 0x00, 0x01];

        bufs.extend_from_slice(b"A Server\x00SMP\x00world\x003\x0020\x00");
        bufs.extend_from_slice(&[0xDD, 0x63]);
        bufs.extend_from_slice(b"127.0.0.1\x00");

        assert_eq!(decode_basic_stat_response(&bufs).unwrap(), basic_stat());
    }

    #[test]
    fn basic_stat_response_encodes_port_little_endian() {
        let bufs = basic_stat().encode();
        let port_idx = bufs.len() - "127.0.0.1".len() - 3;

        assert_eq!(&bufs[port_idx..port_idx + 2], &[0xDDu8, 0x63]);
        assert_eq!(decode_basic_stat_response(&bufs).unwrap(), basic_stat());
    }

    #[test]
    fn basic_stat_response_truncated() {
        let bufs = basic_stat().encode();

        assert!(is_protocol_err(
            decode_basic_stat_response(&bufs[..bufs.len() - 4]),
            "hostip"
        ));
        assert!(is_protocol_err(
            decode_basic_stat_response(&bufs[..22]),
            "packet truncated"
        ));
    }

    #[test]
    fn latin1_motd_is_decoded() {
        let mut bufs = vec![0x00, 0x00, 0x00, 0x00, 0x01];

        bufs.extend_from_slice(b"\xA7aHello\x00SMP\x00world\x000\x0010\x00");
        bufs.extend_from_slice(&25565u16.to_le_bytes());
        bufs.extend_from_slice(b"10.0.0.1\x00");

        assert_eq!(decode_basic_stat_response(&bufs).unwrap().motd, "§aHello");
    }

    #[test]
    fn full_stat_response_fields() {
        let mut bufs = vec![0x00, 0x00, 0x00, 0x00, 0x01];

        bufs.extend_from_slice(KV_SECTION_PADDING);
        bufs.extend_from_slice(b"hostname\x00A Server\x00map\x00world\x00\x00");
        bufs.extend_from_slice(PLAYER_SECTION_PADDING);
        bufs.extend_from_slice(b"Alice\x00Bob\x00\x00");

        let full = decode_full_stat_response(&bufs).unwrap();

        assert_eq!(full.key_values.len(), 2);
        assert_eq!(full.hostname(), Some("A Server"));
        assert_eq!(full.map(), Some("world"));
        assert_eq!(full.players, ["Alice", "Bob"]);
    }

    #[test]
    fn full_stat_response_encodes_and_decodes() {
        let full = FullStat {
            header: ResponseHeader::stat(1),
            key_values: [("hostname", "A Server"), ("plugins", ""), ("hostport", "25565")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            players: vec![],
        };
        let decoded = decode_full_stat_response(&full.encode()).unwrap();

        assert_eq!(decoded, full);
        assert_eq!(decoded.host_port(), Some(25565));
        assert_eq!(decoded.plugins(), None);
    }

    #[test]
    fn full_stat_entry_limit() {
        assert!(decode_full_stat_response(&full_stat_bufs(ENTRY_LIMIT, ENTRY_LIMIT)).is_ok());
        assert!(is_protocol_err(
            decode_full_stat_response(&full_stat_bufs(ENTRY_LIMIT + 1, 0)),
            "too many entries"
        ));
        assert!(is_protocol_err(
            decode_full_stat_response(&full_stat_bufs(1, ENTRY_LIMIT + 1)),
            "too many entries"
        ));
    }

    #[test]
    fn full_stat_missing_terminator_is_truncation() {
        let mut bufs = full_stat_bufs(2, 2);
        bufs.truncate(bufs.len() - 1);

        assert!(is_protocol_err(
            decode_full_stat_response(&bufs),
            "player name"
        ));
        assert!(is_protocol_err(
            decode_full_stat_response(&bufs[..10]),
            "key/value padding"
        ));
    }

    #[test]
    fn plugins_are_parsed() {
        let mut full = FullStat {
            header: ResponseHeader::stat(1),
            key_values: BTreeMap::new(),
            players: vec![],
        };

        full.key_values.insert(
            "plugins".into(),
            "CraftBukkit on Bukkit 1.2.5-R4.0: WorldEdit 5.3; CommandBook 2.1".into(),
        );
        assert_eq!(
            full.plugins(),
            Some(ModPlugin {
                mod_name: "CraftBukkit on Bukkit 1.2.5-R4.0".into(),
                plugins: vec!["WorldEdit 5.3".into(), "CommandBook 2.1".into()],
            })
        );

        full.key_values.insert("plugins".into(), "Paper".into());
        assert_eq!(full.plugins().unwrap().plugins.len(), 0);
    }
}
