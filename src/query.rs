use crate::{
    codec::{
        decode_basic_stat_response, decode_full_stat_response, decode_handshake_response,
        encode_basic_stat_request, encode_full_stat_request, encode_handshake, ResponseHeader,
        SESSION_ID,
    },
    share::CloseHandle,
    BasicStat, FullStat, QueryErr, Transport,
};
use std::time::Duration;
use tracing::debug;

/// Deadline of one round trip.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Token issued by a successful handshake, bound to the transport it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeToken {
    value: i32,
    transport_id: u64,
}

impl ChallengeToken {
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl std::fmt::Display for ChallengeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Send the handshake and wait for the challenge token.
pub async fn handshake(
    transport: &mut Transport,
    timeout: Duration,
) -> Result<ChallengeToken, QueryErr> {
    let response = exchange(
        transport,
        &encode_handshake(SESSION_ID),
        timeout,
        decode_handshake_response,
    )
    .await?;

    check_session_id(&response.header)?;
    debug!(token = response.challenge_token, "handshake completed");

    Ok(ChallengeToken {
        value: response.challenge_token,
        transport_id: transport.id(),
    })
}

/// Get basic [status](https://wiki.vg/Query#Basic_stat).
pub async fn basic_stat(
    transport: &mut Transport,
    token: &ChallengeToken,
    timeout: Duration,
) -> Result<BasicStat, QueryErr> {
    check_token(transport, token)?;

    let response = exchange(
        transport,
        &encode_basic_stat_request(SESSION_ID, token.value),
        timeout,
        decode_basic_stat_response,
    )
    .await?;

    check_session_id(&response.header)?;
    Ok(response)
}

/// Get full [status](https://wiki.vg/Query#Full_stat).
pub async fn full_stat(
    transport: &mut Transport,
    token: &ChallengeToken,
    timeout: Duration,
) -> Result<FullStat, QueryErr> {
    check_token(transport, token)?;

    let response = exchange(
        transport,
        &encode_full_stat_request(SESSION_ID, token.value),
        timeout,
        decode_full_stat_response,
    )
    .await?;

    check_session_id(&response.header)?;
    Ok(response)
}

/// One send and one bounded receive.
///
/// On timeout the round trip future is dropped, which abandons the pending
/// receive. A late datagram already queued when the next exchange starts is
/// discarded. One arriving while the next receive is pending is taken as
/// that request's reply, the protocol carries nothing to tell them apart.
async fn exchange<T>(
    transport: &mut Transport,
    request: &[u8],
    timeout: Duration,
    decode: fn(&[u8]) -> Result<T, QueryErr>,
) -> Result<T, QueryErr> {
    transport.discard_pending();

    let peer = transport.peer_addr();
    let round_trip = async {
        transport.send(request).await?;
        decode(transport.recv().await?)
    };

    match tokio::time::timeout(timeout, round_trip).await {
        Ok(result) => result,
        Err(_) => {
            debug!(%peer, ?timeout, "query timed out");
            Err(QueryErr::TimeoutErr(timeout))
        }
    }
}

fn check_token(transport: &Transport, token: &ChallengeToken) -> Result<(), QueryErr> {
    if token.transport_id != transport.id() {
        return Err(QueryErr::NoChallenge);
    }

    Ok(())
}

fn check_session_id(header: &ResponseHeader) -> Result<(), QueryErr> {
    if header.session_id != SESSION_ID {
        return Err(QueryErr::ProtocolErr(format!(
            "Response session_id({}) is inconsistent with the client({}).",
            header.session_id, SESSION_ID
        )));
    }

    Ok(())
}

/// Where a [Session] is in the query sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Handshaking,
    Ready(ChallengeToken),
    Querying(ChallengeToken),
    Done(ChallengeToken),
    Failed,
}

/// A transport plus the challenge token it was issued.
///
/// Stat requests are refused until a handshake succeeded. A failed round trip
/// drops the token, the caller may handshake again or close the session.
#[derive(Debug)]
pub struct Session {
    transport: Transport,
    state: SessionState,
    timeout: Duration,
}

impl Session {
    pub fn create(transport: Transport) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            timeout: QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.transport.close_handle()
    }

    /// Handshake, replacing any token held before.
    pub async fn handshake(&mut self) -> Result<ChallengeToken, QueryErr> {
        self.state = SessionState::Handshaking;

        let result = handshake(&mut self.transport, self.timeout).await;

        self.state = match &result {
            Ok(token) => SessionState::Ready(*token),
            Err(_) => SessionState::Failed,
        };
        result
    }

    pub async fn basic_stat(&mut self) -> Result<BasicStat, QueryErr> {
        let token = self.token()?;

        self.state = SessionState::Querying(token);
        let result = basic_stat(&mut self.transport, &token, self.timeout).await;
        self.settle(token, result)
    }

    pub async fn full_stat(&mut self) -> Result<FullStat, QueryErr> {
        let token = self.token()?;

        self.state = SessionState::Querying(token);
        let result = full_stat(&mut self.transport, &token, self.timeout).await;
        self.settle(token, result)
    }

    /// Release the transport.
    pub fn close(self) {
        self.transport.close();
    }

    fn token(&self) -> Result<ChallengeToken, QueryErr> {
        match self.state {
            SessionState::Ready(token)
            | SessionState::Querying(token)
            | SessionState::Done(token) => Ok(token),
            SessionState::Idle | SessionState::Handshaking | SessionState::Failed => {
                Err(QueryErr::NoChallenge)
            }
        }
    }

    fn settle<T>(
        &mut self,
        token: ChallengeToken,
        result: Result<T, QueryErr>,
    ) -> Result<T, QueryErr> {
        self.state = match &result {
            Ok(_) => SessionState::Done(token),
            Err(_) => SessionState::Failed,
        };
        result
    }
}
