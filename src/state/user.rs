//! Bouncer user records.

use super::modules::LoadedModules;
use super::network::Network;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUFFER_SIZE: u32 = 50;
pub const DEFAULT_JOIN_TRIES: u32 = 10;
pub const DEFAULT_MAX_NETWORKS: u32 = 1;
pub const DEFAULT_MAX_QUERY_BUFFERS: u32 = 50;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "[%H:%M:%S]";

/// A bouncer user account and its default IRC identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    /// Argon2 PHC string; empty when no password is set.
    pub password: String,
    pub admin: bool,
    pub allow: Vec<String>,
    pub alt_nick: String,
    pub append_timestamp: bool,
    pub auto_clear_chan_buffer: bool,
    pub auto_clear_query_buffer: bool,
    pub bind_host: String,
    pub chan_buffer_size: u32,
    pub chan_modes: String,
    pub client_encoding: String,
    /// `(request, reply)` pairs in the order they were added; requests are uppercase.
    pub ctcp_replies: Vec<(String, String)>,
    pub dcc_bind_host: String,
    pub deny_load_mod: bool,
    pub deny_set_bind_host: bool,
    pub ident: String,
    pub join_tries: u32,
    pub max_joins: u32,
    pub max_networks: u32,
    pub max_query_buffers: u32,
    pub multi_clients: bool,
    pub nick: String,
    pub prepend_timestamp: bool,
    pub query_buffer_size: u32,
    pub quit_msg: String,
    pub real_name: String,
    pub skin: String,
    pub status_prefix: String,
    pub timestamp_format: String,
    pub timezone: String,
    pub modules: LoadedModules,
    #[serde(rename = "network")]
    pub networks: Vec<Network>,
    /// Connected client sessions, owned by the connection layer.
    #[serde(skip)]
    pub clients: Vec<Client>,
}

/// A client connected to the bouncer as this user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub remote_ip: String,
    pub full_name: String,
}

impl Default for User {
    fn default() -> Self {
        Self::new("")
    }
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: String::new(),
            admin: false,
            allow: Vec::new(),
            alt_nick: String::new(),
            append_timestamp: false,
            auto_clear_chan_buffer: true,
            auto_clear_query_buffer: true,
            bind_host: String::new(),
            chan_buffer_size: DEFAULT_BUFFER_SIZE,
            chan_modes: String::new(),
            client_encoding: String::new(),
            ctcp_replies: Vec::new(),
            dcc_bind_host: String::new(),
            deny_load_mod: false,
            deny_set_bind_host: false,
            ident: String::new(),
            join_tries: DEFAULT_JOIN_TRIES,
            max_joins: 0,
            max_networks: DEFAULT_MAX_NETWORKS,
            max_query_buffers: DEFAULT_MAX_QUERY_BUFFERS,
            multi_clients: true,
            nick: String::new(),
            prepend_timestamp: true,
            query_buffer_size: DEFAULT_BUFFER_SIZE,
            quit_msg: String::new(),
            real_name: String::new(),
            skin: String::new(),
            status_prefix: super::global::DEFAULT_STATUS_PREFIX.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            timezone: String::new(),
            modules: LoadedModules::default(),
            networks: Vec::new(),
            clients: Vec::new(),
        }
    }

    /// Usernames are alphanumeric plus `@ . - _`.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_'))
    }

    pub fn find_network(&self, name: &str) -> Option<&Network> {
        self.networks
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn find_network_mut(&mut self, name: &str) -> Option<&mut Network> {
        self.networks
            .iter_mut()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn has_space_for_new_network(&self) -> bool {
        (self.networks.len() as u64) < u64::from(self.max_networks)
    }

    pub fn add_network(&mut self, name: &str) -> Result<(), String> {
        if self.find_network(name).is_some() {
            return Err(format!("network '{}' already exists", name));
        }
        self.networks.push(Network::new(name));
        Ok(())
    }

    pub fn delete_network(&mut self, name: &str) -> bool {
        let before = self.networks.len();
        self.networks.retain(|n| !n.name.eq_ignore_ascii_case(name));
        self.networks.len() != before
    }

    pub fn add_allowed_host(&mut self, host: &str) -> bool {
        if host.is_empty() || self.allow.iter().any(|h| h == host) {
            return false;
        }
        self.allow.push(host.to_string());
        true
    }

    /// Add a reply, replacing the text in place when the request is known.
    pub fn add_ctcp_reply(&mut self, request: &str, reply: &str) -> bool {
        if request.is_empty() {
            return false;
        }
        let request = request.to_ascii_uppercase();
        match self.ctcp_replies.iter_mut().find(|(r, _)| *r == request) {
            Some((_, existing)) => *existing = reply.to_string(),
            None => self.ctcp_replies.push((request, reply.to_string())),
        }
        true
    }

    pub fn ctcp_reply(&self, request: &str) -> Option<&str> {
        self.ctcp_replies
            .iter()
            .find(|(r, _)| r.eq_ignore_ascii_case(request))
            .map(|(_, reply)| reply.as_str())
    }

    pub fn del_ctcp_reply(&mut self, request: &str) -> bool {
        let before = self.ctcp_replies.len();
        self.ctcp_replies
            .retain(|(r, _)| !r.eq_ignore_ascii_case(request));
        self.ctcp_replies.len() != before
    }

    /// Copy every attribute of `source` except the user name and live clients.
    pub fn clone_from_user(&mut self, source: &User) {
        let name = std::mem::take(&mut self.name);
        let clients = std::mem::take(&mut self.clients);
        *self = source.clone();
        self.name = name;
        self.clients = clients;
    }

    pub fn bytes_read(&self) -> u64 {
        self.networks.iter().map(|n| n.bytes_read).sum()
    }

    pub fn bytes_written(&self) -> u64 {
        self.networks.iter().map(|n| n.bytes_written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_names_are_case_insensitive() {
        let mut user = User::new("alice");
        user.add_network("freenode").unwrap();
        assert!(user.find_network("FreeNode").is_some());
        assert!(user.add_network("FREENODE").is_err());
        assert!(user.delete_network("Freenode"));
        assert!(user.networks.is_empty());
    }

    #[test]
    fn ctcp_requests_are_uppercased() {
        let mut user = User::new("alice");
        assert!(user.add_ctcp_reply("version", "slbnc"));
        assert_eq!(user.ctcp_reply("VERSION"), Some("slbnc"));
        assert!(user.del_ctcp_reply("Version"));
        assert!(!user.del_ctcp_reply("VERSION"));
    }

    #[test]
    fn ctcp_replies_keep_insertion_order() {
        let mut user = User::new("alice");
        user.add_ctcp_reply("version", "slbnc");
        user.add_ctcp_reply("ping", "pong");
        user.add_ctcp_reply("VERSION", "slbnc 2");
        assert_eq!(
            user.ctcp_replies,
            vec![
                ("VERSION".to_string(), "slbnc 2".to_string()),
                ("PING".to_string(), "pong".to_string()),
            ]
        );
    }

    #[test]
    fn allowed_hosts_reject_duplicates() {
        let mut user = User::new("alice");
        assert!(user.add_allowed_host("192.168.1.*"));
        assert!(user.add_allowed_host("10.0.0.1"));
        assert!(!user.add_allowed_host("192.168.1.*"));
        assert!(!user.add_allowed_host(""));
        assert_eq!(user.allow, vec!["192.168.1.*", "10.0.0.1"]);
    }

    #[test]
    fn clone_keeps_identity() {
        let mut source = User::new("template");
        source.nick = "tmpl".to_string();
        source.add_network("libera").unwrap();
        let mut target = User::new("bob");
        target.clone_from_user(&source);
        assert_eq!(target.name, "bob");
        assert_eq!(target.nick, "tmpl");
        assert_eq!(target.networks.len(), 1);
    }

    #[test]
    fn user_names_are_validated() {
        assert!(User::is_valid_name("alice@home.net"));
        assert!(!User::is_valid_name("al ice"));
        assert!(!User::is_valid_name(""));
    }
}
