use mcquery::{Conf, QueryErr, SocketConf};
use std::time::Duration;

fn main() -> Result<(), QueryErr> {
    let conf = Conf::create("www.example.com");

    assert_eq!(conf.host, "www.example.com");
    assert_eq!(conf.port, 25565);
    assert_eq!(conf.socket_conf, SocketConf::default());

    let conf = Conf::create_from_str("192.168.1.10:25575")?.with_timeout(Duration::from_secs(5));

    assert_eq!(conf.host, "192.168.1.10");
    assert_eq!(conf.port, 25575);
    assert_eq!(conf.socket_conf.timeout, Duration::from_secs(5));

    let conf = Conf::create_from_str("[2001:db8::1]:25565")?;

    assert_eq!(conf.host, "2001:db8::1");
    assert_eq!(conf.to_string(), "[2001:db8::1]:25565");
    Ok(())
}
