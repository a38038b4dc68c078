//! Command Handler Module
//!
//! Parses incoming RESP arrays and dispatches them to the appropriate
//! handlers. Dispatch is keyed on the uppercased first array element, which
//! must be a string variant; unknown commands get an error reply.
//!
//! ## Supported Commands
//!
//! - `PING` - liveness check
//! - `ECHO message` - echo the argument back
//! - `INFO [section]` - replication-related configuration listing
//! - `SET key value [EX seconds | PX milliseconds]` - store an entry
//! - `GET key` - fetch an entry
//! - `KEYS pattern` - list keys matching a glob pattern
//! - `CONFIG GET name` / `CONFIG SET name value` - configuration access
//! - `SAVE` - write the snapshot file
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │  execute()  │───>│  dispatch() │───>│  cmd_*()    │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                                           Keyspace          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler validates arity and argument types first, then takes the
//! keyspace lock exactly once through the storage API.

use crate::protocol::Value;
use crate::storage::keyspace::now_ms;
use crate::storage::Keyspace;
use std::sync::Arc;
use tracing::warn;

/// Configuration keys INFO reports, in output order.
const REPLICATION_FIELDS: &[&str] = &[
    "role",
    "connected_slaves",
    "master_replid",
    "master_repl_offset",
    "master_host",
    "master_port",
];

/// Executes commands against the shared keyspace.
#[derive(Clone)]
pub struct CommandHandler {
    keyspace: Arc<Keyspace>,
}

impl CommandHandler {
    /// Creates a new command handler over the given keyspace.
    pub fn new(keyspace: Arc<Keyspace>) -> Self {
        Self { keyspace }
    }

    /// Executes a parsed request and returns the reply.
    ///
    /// The request must be a non-empty array whose first element is a
    /// string variant; anything else yields an error reply and the
    /// connection stays open.
    pub fn execute(&self, request: Value) -> Value {
        let args = match request {
            Value::Array(args) => args,
            _ => return Value::err("invalid command format"),
        };

        if args.is_empty() {
            return Value::err("empty command");
        }

        let name = match args[0].as_str() {
            Some(s) => s.to_uppercase(),
            None => return Value::err("invalid command name"),
        };

        self.dispatch(&name, &args[1..])
    }

    fn dispatch(&self, name: &str, args: &[Value]) -> Value {
        match name {
            "PING" => Value::pong(),
            "ECHO" => self.cmd_echo(args),
            "INFO" => self.cmd_info(args),
            "SET" => self.cmd_set(args),
            "GET" => self.cmd_get(args),
            "KEYS" => self.cmd_keys(args),
            "CONFIG" => self.cmd_config(args),
            "SAVE" => self.cmd_save(args),
            _ => Value::err(format!("unknown command '{}'", name)),
        }
    }

    /// ECHO x
    fn cmd_echo(&self, args: &[Value]) -> Value {
        if args.len() != 1 {
            return Value::err("wrong number of arguments for 'echo' command");
        }
        if args[0].as_str().is_none() {
            return Value::err("echo value must be a string");
        }
        args[0].clone()
    }

    /// INFO [section]
    ///
    /// The section argument is accepted and ignored; the reply always lists
    /// the replication-related configuration keys.
    fn cmd_info(&self, _args: &[Value]) -> Value {
        let config = self.keyspace.config_all();

        let listing: Vec<String> = REPLICATION_FIELDS
            .iter()
            .filter_map(|field| {
                config
                    .get(*field)
                    .map(|value| format!("{}:{}", field, value))
            })
            .collect();

        Value::bulk(listing.join("\n"))
    }

    /// SET key value [EX seconds | PX milliseconds]
    fn cmd_set(&self, args: &[Value]) -> Value {
        if args.len() != 2 && args.len() != 4 {
            return Value::err("wrong number of arguments for 'set' command");
        }

        let key = match args[0].as_str() {
            Some(k) => k.to_string(),
            None => return Value::err("set key must be a string"),
        };
        if key.is_empty() {
            return Value::err("set key must not be empty");
        }

        if args[1].as_str().is_none() {
            return Value::err("set value must be a string");
        }
        let value = args[1].clone();

        let mut expires_at = None;
        if args.len() == 4 {
            let mode = match args[2].as_str() {
                Some(m) => m.to_uppercase(),
                None => return Value::err("set expiration type must be a string"),
            };
            let amount = match args[3].as_integer() {
                Some(n) => n,
                None => return Value::err("set expiration value must be an integer"),
            };
            let millis = match mode.as_str() {
                "EX" => amount.saturating_mul(1000),
                "PX" => amount,
                _ => return Value::err("set expiration type must be 'EX' or 'PX'"),
            };
            let deadline = (now_ms() as i64).saturating_add(millis).max(0) as u64;
            expires_at = Some(deadline);
        }

        self.keyspace.set(key, value, expires_at);
        Value::ok()
    }

    /// GET key
    fn cmd_get(&self, args: &[Value]) -> Value {
        if args.len() != 1 {
            return Value::err("wrong number of arguments for 'get' command");
        }

        let key = match args[0].as_str() {
            Some(k) => k,
            None => return Value::err("get key must be a string"),
        };

        match self.keyspace.get(key) {
            Some(value) => value,
            None => Value::Null,
        }
    }

    /// KEYS pattern
    fn cmd_keys(&self, args: &[Value]) -> Value {
        if args.len() != 1 {
            return Value::err("wrong number of arguments for 'keys' command");
        }

        let pattern = match args[0].as_str() {
            Some(p) => p,
            None => return Value::err("keys pattern must be a string"),
        };

        let keys = self.keyspace.keys(pattern);
        Value::array(keys.into_iter().map(Value::bulk).collect())
    }

    /// CONFIG GET name / CONFIG SET name value
    fn cmd_config(&self, args: &[Value]) -> Value {
        if args.is_empty() {
            return Value::err("wrong number of arguments for 'config' command");
        }

        let subcommand = match args[0].as_str() {
            Some(s) => s.to_uppercase(),
            None => return Value::err("config subcommand must be a string"),
        };

        match subcommand.as_str() {
            "GET" => {
                if args.len() != 2 {
                    return Value::err("wrong number of arguments for 'config get' command");
                }
                let name = match args[1].as_str() {
                    Some(n) => n.to_string(),
                    None => return Value::err("config parameter must be a string"),
                };
                match self.keyspace.config_get(&name) {
                    Some(value) => Value::array(vec![Value::bulk(name), Value::bulk(value)]),
                    None => Value::Null,
                }
            }
            "SET" => {
                if args.len() != 3 {
                    return Value::err("wrong number of arguments for 'config set' command");
                }
                let name = match args[1].as_str() {
                    Some(n) => n.to_string(),
                    None => return Value::err("config parameter must be a string"),
                };
                let value = match args[2].as_str() {
                    Some(v) => v.to_string(),
                    None => return Value::err("config value must be a string"),
                };
                self.keyspace.config_set(name, value);
                Value::bulk("OK")
            }
            _ => Value::err(format!("unknown CONFIG subcommand '{}'", subcommand)),
        }
    }

    /// SAVE
    fn cmd_save(&self, args: &[Value]) -> Value {
        if !args.is_empty() {
            return Value::err("wrong number of arguments for 'save' command");
        }

        match self.keyspace.save() {
            Ok(()) => Value::ok(),
            Err(e) => {
                warn!(error = %e, "SAVE failed");
                Value::err(format!("saving snapshot failed: {}", e))
            }
        }
    }
}
