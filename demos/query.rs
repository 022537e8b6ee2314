use mcquery::{Conf, QueryErr};

#[tokio::main]
async fn main() -> Result<(), QueryErr> {
    let server = Conf::create_with_port("www.example.com", 25565);

    println!("{}", server.query_full().await?);

    Ok(())
}
