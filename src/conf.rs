use crate::{
    query::{Session, QUERY_TIMEOUT},
    BasicStat, FullStat, QueryErr, Transport,
};
use serde::Deserialize;
use std::{net::Ipv4Addr, path::Path, time::Duration};
use tracing::info;

/// Default port of a Java Edition server, also the default query port.
pub const DEFAULT_PORT: u16 = 25565;

/// Main struct used for configuring the connection.
#[derive(Debug, Clone)]
pub struct Conf {
    /// Server IP address or a domain name.
    pub host: String,
    /// Server query port (`query.port` in `server.properties`).
    pub port: u16,
    /// See [SocketConf].
    pub socket_conf: SocketConf,
}

/// Additional socket configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConf {
    /// Deadline of each round trip (handshake, basic stat, full stat).
    /// The default value is two seconds.
    pub timeout: Duration,
    /// Specify the local address for the UDP socket.
    /// The default value is [Ipv4Addr::UNSPECIFIED].
    pub rep_udp_ipv4: Ipv4Addr,
    /// Specify the local port for the UDP socket.
    /// The default value is 0, letting the OS pick one.
    pub rep_udp_port: u16,
}

impl Default for SocketConf {
    fn default() -> Self {
        Self {
            timeout: QUERY_TIMEOUT,
            rep_udp_ipv4: Ipv4Addr::UNSPECIFIED,
            rep_udp_port: 0,
        }
    }
}

impl std::fmt::Display for Conf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Conf {
    /// Create a connection configuration using the default port(25565).
    ///
    /// # Examples
    ///
    /// ```
    /// # use mcquery::{Conf, SocketConf};
    /// #
    /// let conf = Conf::create("www.example.com");
    /// #
    /// # assert_eq!(conf.host, "www.example.com");
    /// # assert_eq!(conf.port, 25565);
    /// # assert_eq!(conf.socket_conf, SocketConf::default());
    /// ```
    pub fn create(host: &str) -> Self {
        Self::create_with_port(host, DEFAULT_PORT)
    }

    /// Create a connection configuration using the specified port.
    ///
    /// # Example
    ///
    /// ```
    /// # use mcquery::Conf;
    /// #
    /// let conf = Conf::create_with_port("www.example.com", 25575);
    /// #
    /// # assert_eq!(conf.port, 25575);
    /// ```
    pub fn create_with_port(host: &str, port: u16) -> Self {
        Self {
            host: host.trim().into(),
            port,
            socket_conf: SocketConf::default(),
        }
    }

    /// Create a connection configuration by using a `host:port` string.
    ///
    /// IPv6 hosts are written in brackets, `[::1]:25565`. If the port
    /// cannot be converted to [u16], it will return a [QueryErr::DataErr].
    ///
    /// # Example
    ///
    /// ```
    /// # use mcquery::{Conf, QueryErr};
    /// #
    /// # fn main() -> Result<(), QueryErr> {
    ///     let conf = Conf::create_from_str("www.example.com:25565")?;
    /// #
    /// #   assert_eq!(conf.host, "www.example.com");
    /// #   assert_eq!(conf.port, 25565);
    /// #
    /// #   assert!(Conf::create_from_str("25565").is_err());
    /// #   assert!(Conf::create_from_str("www.example.com:-1").is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn create_from_str(addr: &str) -> Result<Self, QueryErr> {
        let (host, port) = addr
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| {
                QueryErr::DataErr(format!("Invalid socket address syntax: {}", addr))
            })?;
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');

        if host.is_empty() {
            return Err(QueryErr::DataErr(format!("Missing host: {}", addr)));
        }

        match port.trim().parse::<u16>() {
            Ok(port) => Ok(Self::create_with_port(host, port)),
            Err(_) => Err(QueryErr::DataErr(format!("Invalid port: {}", port))),
        }
    }

    /// Replace the round trip deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.socket_conf.timeout = timeout;
        self
    }

    /// Open a UDP transport to the server.
    pub async fn connect(&self) -> Result<Transport, QueryErr> {
        Transport::connect(&self.host, self.port, &self.socket_conf).await
    }

    /// Open a transport and wrap it into a [Session] using this deadline.
    pub async fn session(&self) -> Result<Session, QueryErr> {
        Ok(Session::create(self.connect().await?).with_timeout(self.socket_conf.timeout))
    }

    /// Perform only the handshake and return the challenge token.
    pub async fn handshake(&self) -> Result<i32, QueryErr> {
        let mut session = self.session().await?;
        let result = session.handshake().await;

        session.close();
        result.map(|token| token.value())
    }

    /// Get **basic** info from a server using the [Query](https://wiki.vg/Query) protocol.
    ///
    /// To use this protocol, you need to enable the `enable-query` option on the server side.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mcquery::{Conf, QueryErr};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), QueryErr> {
    ///     let server = Conf::create_with_port("www.example.com", 25565);
    ///     let info = server.query().await?;
    ///
    ///     println!("{}", info);
    ///     Ok(())
    /// }
    /// ```
    pub async fn query(&self) -> Result<BasicStat, QueryErr> {
        let mut session = self.session().await?;
        let result = async {
            session.handshake().await?;
            session.basic_stat().await
        }
        .await;

        session.close();
        if result.is_ok() {
            info!(server = %self, "basic stat received");
        }
        result
    }

    /// Get **full** info from a server using the [Query](https://wiki.vg/Query) protocol,
    /// including the key/value section and the player list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mcquery::{Conf, QueryErr};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), QueryErr> {
    ///     let server = Conf::create("www.example.com");
    ///     let info = server.query_full().await?;
    ///
    ///     println!("{:?}", info.players);
    ///     Ok(())
    /// }
    /// ```
    pub async fn query_full(&self) -> Result<FullStat, QueryErr> {
        let mut session = self.session().await?;
        let result = async {
            session.handshake().await?;
            session.full_stat().await
        }
        .await;

        session.close();
        if let Ok(full) = &result {
            info!(server = %self, players = full.players.len(), "full stat received");
        }
        result
    }
}

/// Webhook configuration, read once at startup.
///
/// The file is JSON, for example:
///
/// ```json
/// { "HiddenByDefault": false, "DefaultPort": 25565, "DefaultIp": "mc.example.com", "SlackToken": "secret" }
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BotConf {
    /// Replies are only visible to the caller unless `--public` is given.
    pub hidden_by_default: bool,
    /// Port used when the command names none.
    pub default_port: u16,
    /// Host used when the command names none.
    #[serde(alias = "DefaultHost")]
    pub default_ip: String,
    /// Shared secret every request must carry. Empty disables the check.
    pub slack_token: String,
}

impl Default for BotConf {
    fn default() -> Self {
        Self {
            hidden_by_default: false,
            default_port: DEFAULT_PORT,
            default_ip: String::new(),
            slack_token: String::new(),
        }
    }
}

// The shared secret never ends up in logs.
impl std::fmt::Debug for BotConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConf")
            .field("hidden_by_default", &self.hidden_by_default)
            .field("default_port", &self.default_port)
            .field("default_ip", &self.default_ip)
            .field(
                "slack_token",
                &if self.slack_token.is_empty() { "" } else { "***" },
            )
            .finish()
    }
}

impl BotConf {
    /// Load the configuration file, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, QueryErr> {
        let Some(path) = path else {
            info!("No configuration file, using default");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .map_err(|err| QueryErr::ConfErr(format!("{}: {}", path.display(), err)))?;

        Self::create_from_str(&content)
            .map_err(|err| QueryErr::ConfErr(format!("{}: {}", path.display(), err)))
    }

    pub fn create_from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_from_str_accepts_bracketed_ipv6() {
        let conf = Conf::create_from_str("[::1]:25575").unwrap();

        assert_eq!(conf.host, "::1");
        assert_eq!(conf.port, 25575);
        assert_eq!(conf.to_string(), "[::1]:25575");
    }

    #[test]
    fn create_from_str_rejects_bad_input() {
        assert!(matches!(
            Conf::create_from_str(":25565"),
            Err(QueryErr::DataErr(_))
        ));
        assert!(matches!(
            Conf::create_from_str("example.com:70000"),
            Err(QueryErr::DataErr(_))
        ));
    }

    #[test]
    fn default_timeout_is_two_seconds() {
        assert_eq!(SocketConf::default().timeout, Duration::from_secs(2));
        assert_eq!(
            Conf::create("localhost")
                .with_timeout(Duration::from_millis(300))
                .socket_conf
                .timeout,
            Duration::from_millis(300)
        );
    }

    #[test]
    fn bot_conf_from_json() {
        let conf = BotConf::create_from_str(
            r#"{"HiddenByDefault": true, "DefaultIp": "mc.example.com", "SlackToken": "s3cret"}"#,
        )
        .unwrap();

        assert!(conf.hidden_by_default);
        assert_eq!(conf.default_port, DEFAULT_PORT);
        assert_eq!(conf.default_ip, "mc.example.com");
        assert_eq!(conf.slack_token, "s3cret");
        assert!(!format!("{:?}", conf).contains("s3cret"));
    }

    #[test]
    fn bot_conf_without_file_is_default() {
        assert_eq!(BotConf::load(None).unwrap(), BotConf::default());
        assert!(matches!(
            BotConf::load(Some(Path::new("/nonexistent/mcquery.json"))),
            Err(QueryErr::ConfErr(_))
        ));
    }
}
