//! Server Configuration
//!
//! Command-line options and the string-to-string configuration map shared
//! with the keyspace. The map is what CONFIG GET/SET and INFO read, what
//! SAVE writes into the snapshot metadata section, and where the
//! replication role lives.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Options parsed from the command line.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Port to listen on
    pub port: u16,
    /// Directory holding the snapshot file
    pub dir: Option<String>,
    /// Snapshot file name
    pub dbfilename: Option<String>,
    /// Upstream to replicate from, as `(host, port)`
    pub replicaof: Option<(String, u16)>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            dir: None,
            dbfilename: None,
            replicaof: None,
        }
    }
}

impl ServerOptions {
    /// Parses configuration from the process arguments, printing usage and
    /// exiting on invalid input.
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match Self::parse(&args) {
            Ok(options) => options,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!("{}", usage());
                std::process::exit(1);
            }
        }
    }

    /// Parses an argument list.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = ServerOptions::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--dir" => {
                    options.dir = Some(take_value(args, &mut i, "--dir")?);
                }
                "--dbfilename" => {
                    options.dbfilename = Some(take_value(args, &mut i, "--dbfilename")?);
                }
                "--port" | "-p" => {
                    let raw = take_value(args, &mut i, "--port")?;
                    options.port = raw
                        .parse()
                        .map_err(|_| format!("invalid port number '{}'", raw))?;
                }
                "--replicaof" => {
                    let raw = take_value(args, &mut i, "--replicaof")?;
                    options.replicaof = Some(parse_replicaof(&raw)?);
                }
                "--help" => {
                    println!("{}", usage());
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("emberkv version {}", crate::VERSION);
                    std::process::exit(0);
                }
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 1;
        }

        Ok(options)
    }

    /// Returns the bind address. The server listens on all interfaces.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", crate::DEFAULT_HOST, self.port)
    }
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Splits the `--replicaof` argument, given as one string `"<host> <port>"`.
fn parse_replicaof(raw: &str) -> Result<(String, u16), String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!("--replicaof expects \"<host> <port>\", got '{}'", raw));
    }
    let port = parts[1]
        .parse()
        .map_err(|_| format!("invalid replicaof port '{}'", parts[1]))?;
    Ok((parts[0].to_string(), port))
}

/// Usage text for `--help` and argument errors.
pub fn usage() -> String {
    format!(
        r#"emberkv - a Redis-compatible in-memory key-value store

USAGE:
    emberkv [OPTIONS]

OPTIONS:
    --dir <path>              Directory for the snapshot file (default: .)
    --dbfilename <name>       Snapshot file name (default: dump.rdb)
    -p, --port <number>       Port to listen on (default: {})
    --replicaof "<host> <port>"
                              Replicate from an upstream server
    -v, --version             Print version information
    --help                    Print this help message
"#,
        crate::DEFAULT_PORT
    )
}

/// Builds the initial configuration map from defaults and options.
///
/// A server started with `--replicaof` reports `role=slave` along with its
/// upstream coordinates whether or not the handshake later succeeds.
pub fn initial_config(options: &ServerOptions) -> HashMap<String, String> {
    let mut config = HashMap::new();

    config.insert(
        "dir".to_string(),
        options.dir.clone().unwrap_or_else(|| ".".to_string()),
    );
    config.insert(
        "dbfilename".to_string(),
        options
            .dbfilename
            .clone()
            .unwrap_or_else(|| "dump.rdb".to_string()),
    );
    config.insert("redis-version".to_string(), "7.4.0".to_string());
    config.insert("connected_slaves".to_string(), "0".to_string());
    config.insert("master_replid".to_string(), generate_replid());
    config.insert("master_repl_offset".to_string(), "0".to_string());

    match &options.replicaof {
        Some((host, port)) => {
            config.insert("role".to_string(), "slave".to_string());
            config.insert("master_host".to_string(), host.clone());
            config.insert("master_port".to_string(), port.to_string());
        }
        None => {
            config.insert("role".to_string(), "master".to_string());
        }
    }

    config
}

/// Generates a 40-character hex replication id from the clock and pid.
fn generate_replid() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut hasher = DefaultHasher::new();
    timestamp.hash(&mut hasher);
    std::process::id().hash(&mut hasher);
    let hash = hasher.finish();

    format!("{:016x}{:016x}{:08x}", hash, timestamp as u64, std::process::id())
        .chars()
        .take(40)
        .collect()
}
