//! Client for the Minecraft [Query](https://wiki.vg/Query) protocol, the
//! GameSpy4 style UDP status protocol enabled by `enable-query=true`.
//!
//! ```no_run
//! use mcquery::{Conf, QueryErr};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QueryErr> {
//!     let server = Conf::create_with_port("www.example.com", 25565);
//!
//!     println!("{}", server.query().await?);
//!     println!("{}", server.query_full().await?);
//!     Ok(())
//! }
//! ```
//!
//! [Conf::query] and [Conf::query_full] run handshake and stat request on a
//! fresh transport and close it afterwards. [Session] exposes the single
//! steps for callers that want to retry or reuse the challenge token.

pub mod bot;
pub mod codec;
mod conf;
mod error;
mod query;
mod share;

pub use codec::{BasicStat, FullStat, ModPlugin};
pub use conf::{BotConf, Conf, SocketConf, DEFAULT_PORT};
pub use error::QueryErr;
pub use query::{
    basic_stat, full_stat, handshake, ChallengeToken, Session, SessionState, QUERY_TIMEOUT,
};
pub use share::{CloseHandle, Transport};
