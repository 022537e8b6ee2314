use clap::{Args, Parser, Subcommand};
use mcquery::{
    bot::{self, QueryType},
    BotConf, Conf, QueryErr, DEFAULT_PORT,
};
use std::{path::PathBuf, process, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info, Level};
use tracing_subscriber::fmt;

#[derive(Debug, Parser)]
#[command(name = "mcquery", version)]
#[command(about = "Query Minecraft servers over the UDP query protocol")]
struct Cli {
    /// Log protocol details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print server status as JSON
    Query {
        #[command(flatten)]
        server: ServerArgs,

        /// What to ask the server for
        #[arg(long = "type", value_enum, default_value_t = QueryType::Basic)]
        query_type: QueryType,
    },
    /// Only perform the handshake and print the challenge token
    Handshake {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Run the chat webhook
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 80)]
        port: u16,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render one command and exit instead of serving
        #[arg(long)]
        debug: Option<String>,
    },
}

#[derive(Debug, Args)]
struct ServerArgs {
    /// Server host name or IP
    host: String,

    /// Server query port
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Deadline of each round trip in milliseconds
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,
}

impl ServerArgs {
    fn conf(&self) -> Conf {
        Conf::create_with_port(&self.host, self.port)
            .with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command).await {
        error!(error = %err, "mcquery failed");
        process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Query { server, query_type } => {
            let conf = server.conf();

            match query_type {
                QueryType::Basic => println!("{}", conf.query().await?),
                QueryType::Full => println!("{}", conf.query_full().await?),
                QueryType::Players => {
                    let full = conf.query_full().await?;
                    println!("{}", serde_json::to_string_pretty(&full.players)?);
                }
            }
        }
        Commands::Handshake { server } => {
            let conf = server.conf();

            println!("{}", conf.handshake().await?);
        }
        Commands::Serve {
            bind,
            port,
            config,
            debug,
        } => {
            info!("Loading configuration");
            let bot_conf = BotConf::load(config.as_deref())?;
            info!(conf = ?bot_conf, "Configuration loaded");

            if let Some(text) = debug {
                info!(command = %text, "Running debug command");
                let (command, reply) = bot::handle_command(&text, &bot_conf).await?;
                info!(?command, "Command parsed");
                println!("{}", reply);
                return Ok(());
            }

            let listener = TcpListener::bind((bind.as_str(), port))
                .await
                .map_err(|err| {
                    QueryErr::ConfErr(format!("can not bind {}:{}: {}", bind, port, err))
                })?;

            bot::serve(listener, bot_conf).await?;
        }
    }

    Ok(())
}
