//! IRC network records owned by a user.

use super::channel::Channel;
use super::modules::LoadedModules;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_FLOOD_BURST: u16 = 4;
pub const DEFAULT_FLOOD_RATE: f64 = 1.0;
pub const DEFAULT_IRC_PORT: u16 = 6667;

/// An upstream IRC network of one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub name: String,
    pub alt_nick: String,
    pub bind_host: String,
    pub encoding: String,
    pub flood_burst: u16,
    pub flood_rate: f64,
    pub ident: String,
    pub join_delay: u16,
    pub nick: String,
    pub quit_msg: String,
    pub real_name: String,
    pub trusted_fingerprints: Vec<String>,
    pub irc_connect_enabled: bool,
    pub modules: LoadedModules,
    #[serde(rename = "server")]
    pub servers: Vec<Server>,
    #[serde(rename = "channel")]
    pub channels: Vec<Channel>,
    /// Index into `servers` of the live upstream connection, if any.
    #[serde(skip)]
    pub current_server: Option<usize>,
    /// Index into `servers` to try on the next connection attempt.
    #[serde(skip)]
    pub next_server: Option<usize>,
    #[serde(skip)]
    pub bytes_read: u64,
    #[serde(skip)]
    pub bytes_written: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self::new("")
    }
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alt_nick: String::new(),
            bind_host: String::new(),
            encoding: String::new(),
            flood_burst: DEFAULT_FLOOD_BURST,
            flood_rate: DEFAULT_FLOOD_RATE,
            ident: String::new(),
            join_delay: 0,
            nick: String::new(),
            quit_msg: String::new(),
            real_name: String::new(),
            trusted_fingerprints: Vec::new(),
            irc_connect_enabled: true,
            modules: LoadedModules::default(),
            servers: Vec::new(),
            channels: Vec::new(),
            current_server: None,
            next_server: None,
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// Network names are alphanumeric plus `-` and `_`.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn find_channel(&self, name: &str) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn find_channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn current_server(&self) -> Option<&Server> {
        self.current_server.and_then(|i| self.servers.get(i))
    }

    pub fn find_server(&self, host: &str) -> Option<usize> {
        self.servers
            .iter()
            .position(|s| s.host.eq_ignore_ascii_case(host))
    }

    pub fn add_trusted_fingerprint(&mut self, fingerprint: &str) -> bool {
        if fingerprint.is_empty() || self.trusted_fingerprints.iter().any(|f| f == fingerprint) {
            return false;
        }
        self.trusted_fingerprints.push(fingerprint.to_string());
        true
    }

    /// Add a server from `host [[+]port] [pass]`; false on duplicates or bad input.
    pub fn add_server(&mut self, line: &str) -> bool {
        let Some(server) = Server::parse(line) else {
            return false;
        };
        if self.servers.contains(&server) {
            return false;
        }
        self.servers.push(server);
        true
    }

    /// Delete the first server matching host and, when given, port and password.
    pub fn del_server(&mut self, host: &str, port: Option<u16>, password: &str) -> bool {
        let position = self.servers.iter().position(|s| {
            s.host.eq_ignore_ascii_case(host)
                && port.is_none_or(|p| s.port == p)
                && (password.is_empty() || s.password == password)
        });
        let Some(index) = position else {
            return false;
        };
        self.servers.remove(index);
        // Indices past the removed entry shift down by one.
        let fix = |slot: &mut Option<usize>| {
            *slot = match *slot {
                Some(i) if i == index => None,
                Some(i) if i > index => Some(i - 1),
                other => other,
            };
        };
        fix(&mut self.current_server);
        fix(&mut self.next_server);
        true
    }

    /// Copy settings, servers and channels of `source`, keeping the name and
    /// the live connection state.
    pub fn clone_from_network(&mut self, source: &Network) {
        let name = std::mem::take(&mut self.name);
        let (current, next) = (self.current_server, self.next_server);
        let (read, written) = (self.bytes_read, self.bytes_written);
        *self = source.clone();
        self.name = name;
        self.current_server = current.filter(|&i| i < self.servers.len());
        self.next_server = next.filter(|&i| i < self.servers.len());
        self.bytes_read = read;
        self.bytes_written = written;
    }
}

/// An upstream IRC server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    #[serde(default = "default_irc_port")]
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub password: String,
}

fn default_irc_port() -> u16 {
    DEFAULT_IRC_PORT
}

impl Server {
    /// Parse `host [[+]port] [pass]`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let host = tokens.next()?;
        let (port, ssl) = match tokens.next() {
            Some(port) => {
                let ssl = port.starts_with('+');
                let port: u16 = port.trim_start_matches('+').parse().ok()?;
                if port == 0 {
                    return None;
                }
                (port, ssl)
            }
            None => (DEFAULT_IRC_PORT, false),
        };
        let password = tokens.collect::<Vec<_>>().join(" ");
        Some(Self {
            host: host.to_string(),
            port,
            ssl,
            password,
        })
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}",
            self.host,
            if self.ssl { "+" } else { "" },
            self.port
        )
    }
}
