use clap::{Parser, ValueEnum};
use radius_client::{
    AcctSession, AuthSession, ClientConfig, ClientError, ConfigError, ErrorKind, RequestAttribute,
    Session,
};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_FAILURE: i32 = 1;
const EXIT_FATAL: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RequestType {
    /// Access-Request
    Auth,
    /// Accounting-Request
    Acct,
}

/// Send a single RADIUS authentication or accounting request
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radclient")]
struct Cli {
    /// Request type
    #[arg(value_enum, required_unless_present = "validate")]
    request: Option<RequestType>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server hostname or address ([addr] for IPv6 literals)
    #[arg(short, long)]
    server: Option<String>,

    /// Server port (default: services lookup, then 1812/1813)
    #[arg(short, long)]
    port: Option<u16>,

    /// Shared secret
    #[arg(long)]
    secret: Option<String>,

    /// User-Name to send
    #[arg(short, long)]
    user: Option<String>,

    /// User-Password to send (auth only)
    #[arg(long)]
    password: Option<String>,

    /// Extra request attribute, repeatable
    #[arg(short = 'a', long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    attributes: Vec<RequestAttribute>,

    /// Reply timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout: Option<u64>,

    /// Dump packets to stdout
    #[arg(short, long)]
    debug: bool,

    /// Fail on attribute values that do not convert
    #[arg(long)]
    strict: bool,

    /// Validate configuration and exit (doesn't send anything)
    #[arg(long)]
    validate: bool,
}

fn parse_attribute(arg: &str) -> Result<RequestAttribute, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected NAME=VALUE, got '{}'", arg));
    }
    Ok(RequestAttribute {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn load_config(cli: &Cli) -> ClientConfig {
    let Some(path) = &cli.config else {
        return ClientConfig::default();
    };

    match ClientConfig::from_file(path) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound && !cli.validate => {
            eprintln!("Could not load config file from: {}", path.display());
            eprintln!("Creating example configuration at: {}", path.display());
            if let Err(e) = ClientConfig::example().to_file(path) {
                eprintln!("Error creating example config: {}", e);
                process::exit(EXIT_FAILURE);
            }
            eprintln!("Please edit {} and run again", path.display());
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Configuration validation failed!");
            eprintln!("   Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Command-line options win over the file
fn merge_cli(config: &mut ClientConfig, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server = Some(server.clone());
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(secret) = &cli.secret {
        config.secret = secret.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_ms = timeout;
    }
    config.debug |= cli.debug;
    config.strict_values |= cli.strict;
    config.attributes.extend(cli.attributes.iter().cloned());
}

fn exit_code(err: &ClientError) -> i32 {
    match err.kind() {
        ErrorKind::FatalInit => EXIT_FATAL,
        _ => EXIT_FAILURE,
    }
}

fn print_reply(session: &dyn Session) {
    if let Some(reply) = session.reply() {
        println!("Received {} (id {})", reply.code(), reply.identifier());
    }
}

fn run_auth(config: &ClientConfig, cli: &Cli) -> Result<(), ClientError> {
    let mut session = AuthSession::from_config(config)?;
    if let Some(user) = &cli.user {
        session.set_username(user)?;
    }
    if let Some(password) = &cli.password {
        session.set_password(password)?;
    }

    let result = session.send();
    print_reply(&session);

    // a rejected reply still carries attributes worth showing
    let names: Vec<String> = match session.reply() {
        Some(reply) => {
            let mut names: Vec<String> = Vec::new();
            for pair in reply.pairs() {
                if !names.iter().any(|n| n == pair.name()) {
                    names.push(pair.name().to_string());
                }
            }
            names
        }
        None => Vec::new(),
    };
    for name in names {
        match session.get_attribute(&name) {
            Ok(attr) => println!("\t{} {} {}", attr.name, attr.operator, attr.value),
            Err(e) => warn!(attribute = %name, error = %e, "Cannot render reply attribute"),
        }
    }

    result
}

fn run_acct(config: &ClientConfig, cli: &Cli) -> Result<(), ClientError> {
    let mut session = AcctSession::from_config(config)?;
    if let Some(user) = &cli.user {
        session.set_username(user)?;
    }
    if cli.password.is_some() {
        warn!("--password is ignored for accounting requests");
    }

    let result = session.send();
    print_reply(&session);
    result
}

fn main() {
    let cli = Cli::parse();

    let mut config = load_config(&cli);
    merge_cli(&mut config, &cli);

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation failed!");
        eprintln!("   Error: {}", e);
        process::exit(EXIT_FAILURE);
    }

    if cli.validate {
        println!("Configuration validated successfully!");
        println!();
        println!("Configuration summary:");
        println!("  Server: {}", config.server.as_deref().unwrap_or("(none)"));
        if config.port == 0 {
            println!("  Port: services lookup");
        } else {
            println!("  Port: {}", config.port);
        }
        println!("  Timeout: {} ms", config.timeout_ms);
        println!("  Address family: {:?}", config.address_family);
        println!("  Strict values: {}", config.strict_values);
        if let Some(path) = &config.dictionary {
            println!("  Dictionary: {}", path.display());
        }
        println!("  Request attributes: {}", config.attributes.len());
        process::exit(0);
    }

    let log_level = config.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let result = match cli.request {
        Some(RequestType::Auth) => run_auth(&config, &cli),
        Some(RequestType::Acct) => run_acct(&config, &cli),
        None => {
            error!("No request type given");
            process::exit(EXIT_FAILURE);
        }
    };

    match result {
        Ok(()) => info!("Request completed"),
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            eprintln!("{}", e);
            process::exit(exit_code(&e));
        }
    }
}
