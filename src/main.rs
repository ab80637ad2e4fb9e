//! FlashKV Client - command-line interface
//!
//! Issues a single command against a Redis-compatible server and prints the
//! reply the way `redis-cli` does. `SUBSCRIBE` and `PSUBSCRIBE` instead enter
//! the subscribe loop and print messages until the server goes away.

use anyhow::{bail, Context};
use flashkv_client::pubsub::Handlers;
use flashkv_client::{ClientConfig, Command, Redis, RespValue, TcpTransport};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// CLI configuration
struct Config {
    client: ClientConfig,
    /// Log at debug level instead of warn
    verbose: bool,
    /// Command name followed by its arguments
    command: Vec<String>,
}

impl Config {
    /// Parse configuration from command-line arguments
    ///
    /// Precedence: defaults, then the environment, then `--url`, then
    /// `--host`/`--port`/`--auth`.
    fn from_args() -> anyhow::Result<Self> {
        let mut client = ClientConfig::from_env().context("invalid Redis environment")?;
        let mut verbose = false;
        let mut host = None;
        let mut port = None;
        let mut auth = None;
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    host = Some(option_value(&args, i)?.to_string());
                    i += 2;
                }
                "--port" | "-p" => {
                    let value = option_value(&args, i)?;
                    let parsed = value
                        .parse::<u16>()
                        .with_context(|| format!("invalid port number: {}", value))?;
                    port = Some(parsed);
                    i += 2;
                }
                "--auth" | "-a" => {
                    auth = Some(option_value(&args, i)?.to_string());
                    i += 2;
                }
                "--url" => {
                    client = ClientConfig::from_url(option_value(&args, i)?)?;
                    i += 2;
                }
                "--verbose" => {
                    verbose = true;
                    i += 1;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("flashkv-client version {}", flashkv_client::VERSION);
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    eprintln!("Unknown argument: {}", arg);
                    print_help();
                    std::process::exit(1);
                }
                _ => break,
            }
        }

        if let Some(host) = host {
            client.host = host;
        }
        if let Some(port) = port {
            client.port = port;
        }
        if auth.is_some() {
            client.password = auth;
        }

        let mut command: Vec<String> = args[i..].to_vec();
        if command.is_empty() {
            command.push("PING".to_string());
        }

        Ok(Self {
            client,
            verbose,
            command,
        })
    }
}

fn option_value(args: &[String], i: usize) -> anyhow::Result<&str> {
    match args.get(i + 1) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires a value", args[i]),
    }
}

fn print_help() {
    println!(
        r#"
FlashKV Client - A Lightweight Blocking Redis Client

USAGE:
    flashkv-client [OPTIONS] [COMMAND [ARGS...]]

OPTIONS:
    -h, --host <HOST>    Server host (default: 127.0.0.1)
    -p, --port <PORT>    Server port (default: 6379)
    -a, --auth <PASS>    Password sent with AUTH after connecting
        --url <URL>      redis://[password@]host[:port][/db]
        --verbose        Log protocol activity
    -v, --version        Print version information
        --help           Print this help message

ENVIRONMENT:
    REDIS_URL, or REDIS_HOST / REDIS_PORT / REDIS_AUTH

EXAMPLES:
    flashkv-client                          # PING 127.0.0.1:6379
    flashkv-client SET name Ariz            # OK
    flashkv-client GET name                 # "Ariz"
    flashkv-client -p 6380 LRANGE queue 0 -1
    flashkv-client SUBSCRIBE news alerts    # print messages until disconnected
    flashkv-client PSUBSCRIBE 'news.*'
"#
    );
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args()?;

    // Set up logging; RUST_LOG wins over --verbose
    let level = if config.verbose { "debug" } else { "warn" };
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(config = ?config.client, "Connecting");
    let mut redis = Redis::connect(&config.client)
        .with_context(|| format!("could not connect to {}", config.client.address()))?;

    let name = config.command[0].to_ascii_uppercase();
    let args = &config.command[1..];

    let result = match name.as_str() {
        "SUBSCRIBE" | "PSUBSCRIBE" => run_subscriber(&mut redis, &name, args),
        _ => run_command(&mut redis, &name, args),
    };

    redis.close();
    result
}

fn run_command(redis: &mut Redis<TcpTransport>, name: &str, args: &[String]) -> anyhow::Result<()> {
    let reply = redis.client_mut().issue(Command::new(name, args));
    if let RespValue::InternalError(err) = &reply {
        bail!("{} failed: {}", name, err);
    }

    println!("{}", reply);
    Ok(())
}

fn run_subscriber(redis: &mut Redis<TcpTransport>, name: &str, targets: &[String]) -> anyhow::Result<()> {
    if targets.is_empty() {
        bail!("{} requires at least one channel", name);
    }

    for target in targets {
        if name == "PSUBSCRIBE" {
            redis.psubscribe(target);
        } else {
            redis.subscribe(target);
        }
    }

    info!(targets = ?targets, "Waiting for messages");
    let handlers = Handlers::new()
        .on_message(|_, msg| match &msg.pattern {
            Some(pattern) => println!("[{} via {}] {}", msg.channel, pattern, msg.payload_text()),
            None => println!("[{}] {}", msg.channel, msg.payload_text()),
        })
        .on_error(|_, err| eprintln!("(error) {}", err));

    redis.start_subscribing(handlers)?;
    Ok(())
}
