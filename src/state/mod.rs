//! Host object model.
//!
//! The bouncer's users, networks and channels as the console sees them. The
//! connection layer owns live sockets; this module only holds configuration
//! records plus the few live fields (clients, joined flags, traffic counters)
//! the console reports on.

mod channel;
mod global;
mod modules;
mod network;
mod password;
mod user;

pub use channel::Channel;
pub use global::{
    AVAILABLE_SSL_PROTOCOLS, AcceptType, AddrType, DEFAULT_ANON_IP_LIMIT, DEFAULT_CONNECT_DELAY,
    DEFAULT_MAX_BUFFER_SIZE, DEFAULT_SERVER_THROTTLE, DEFAULT_SSL_CERT_FILE,
    DEFAULT_STATUS_PREFIX, Global, Listener,
};
pub use modules::{LoadedModules, ModuleInfo, ModuleKind, find_module};
pub use network::{DEFAULT_FLOOD_BURST, DEFAULT_FLOOD_RATE, Network, Server};
pub use password::{hash_password, verify_password};
pub use user::{
    Client, DEFAULT_BUFFER_SIZE, DEFAULT_JOIN_TRIES, DEFAULT_MAX_NETWORKS,
    DEFAULT_MAX_QUERY_BUFFERS, DEFAULT_TIMESTAMP_FORMAT, User,
};

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk layout of the bouncer configuration file.
#[derive(Debug, Default, Deserialize)]
struct BouncerFile {
    #[serde(default)]
    global: Global,
    #[serde(default, rename = "user")]
    users: Vec<User>,
}

#[derive(Serialize)]
struct BouncerFileRef<'a> {
    global: &'a Global,
    #[serde(rename = "user")]
    users: Vec<&'a User>,
}

/// The bouncer: global settings plus every user, keyed by user name.
#[derive(Debug, Default)]
pub struct Host {
    pub global: Global,
    users: BTreeMap<String, User>,
    config_file: Option<PathBuf>,
}

impl Host {
    /// Create a host with no backing configuration file.
    pub fn new(global: Global) -> Self {
        Self {
            global,
            users: BTreeMap::new(),
            config_file: None,
        }
    }

    /// Load the bouncer configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let path = path.as_ref();
        let parsed = read_bouncer_file(path)?;
        let mut host = Self::new(parsed.global);
        for user in parsed.users {
            if let Err(reason) = host.add_user(user) {
                warn!(path = %path.display(), reason = %reason, "Skipping user record");
            }
        }
        host.config_file = Some(path.to_path_buf());
        info!(path = %path.display(), users = host.users.len(), "Loaded bouncer config");
        Ok(host)
    }

    /// Re-read the configuration file, replacing all persisted state.
    ///
    /// Live client sessions of users that survive the reload are kept.
    pub fn rehash(&mut self) -> Result<(), StateError> {
        let path = self.config_file.clone().ok_or(StateError::NoConfigFile)?;
        let mut reloaded = Self::load(&path)?;
        for (name, user) in reloaded.users.iter_mut() {
            if let Some(old) = self.users.get_mut(name) {
                user.clients = std::mem::take(&mut old.clients);
            }
        }
        *self = reloaded;
        Ok(())
    }

    /// Write the configuration back to its file.
    ///
    /// Writes a sibling temporary file and renames it over the original so a
    /// failed write never truncates the existing configuration.
    pub fn write_config(&self) -> Result<(), StateError> {
        let path = self.config_file.as_ref().ok_or(StateError::NoConfigFile)?;
        let contents = toml::to_string_pretty(&BouncerFileRef {
            global: &self.global,
            users: self.users.values().collect(),
        })?;

        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents).map_err(|source| StateError::Io {
            path: tmp.display().to_string(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| StateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Wrote bouncer config");
        Ok(())
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn set_config_file(&mut self, path: impl Into<PathBuf>) {
        self.config_file = Some(path.into());
    }

    // ========== Users ==========

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn user_mut(&mut self, name: &str) -> Option<&mut User> {
        self.users.get_mut(name)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn add_user(&mut self, user: User) -> Result<(), String> {
        if !User::is_valid_name(&user.name) {
            return Err(format!("invalid username '{}'", user.name));
        }
        if self.users.contains_key(&user.name) {
            return Err(format!("user '{}' already exists", user.name));
        }
        self.users.insert(user.name.clone(), user);
        Ok(())
    }

    pub fn delete_user(&mut self, name: &str) -> bool {
        self.users.remove(name).is_some()
    }

    // ========== Networks / Channels ==========

    pub fn network(&self, user: &str, network: &str) -> Option<&Network> {
        self.user(user)?.find_network(network)
    }

    pub fn network_mut(&mut self, user: &str, network: &str) -> Option<&mut Network> {
        self.user_mut(user)?.find_network_mut(network)
    }

    pub fn channel(&self, user: &str, network: &str, channel: &str) -> Option<&Channel> {
        self.network(user, network)?.find_channel(channel)
    }

    pub fn channel_mut(
        &mut self,
        user: &str,
        network: &str,
        channel: &str,
    ) -> Option<&mut Channel> {
        self.network_mut(user, network)?.find_channel_mut(channel)
    }

    /// Number of scopes that currently have `module` loaded.
    pub fn module_instances(&self, module: &str) -> usize {
        let mut count = usize::from(self.global.modules.is_loaded(module));
        for user in self.users.values() {
            count += usize::from(user.modules.is_loaded(module));
            count += user
                .networks
                .iter()
                .filter(|n| n.modules.is_loaded(module))
                .count();
        }
        count
    }
}

fn read_bouncer_file(path: &Path) -> Result<BouncerFile, StateError> {
    let content = std::fs::read_to_string(path).map_err(|source| StateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
