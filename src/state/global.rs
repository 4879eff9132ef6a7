//! Bouncer-wide settings and listeners.

use super::modules::{LoadedModules, ModuleInfo};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANON_IP_LIMIT: u32 = 10;
pub const DEFAULT_CONNECT_DELAY: u32 = 5;
pub const DEFAULT_MAX_BUFFER_SIZE: u32 = 500;
pub const DEFAULT_SERVER_THROTTLE: u32 = 30;
pub const DEFAULT_STATUS_PREFIX: &str = "*";
pub const DEFAULT_SSL_CERT_FILE: &str = "slbnc.pem";

/// Protocol names accepted by the `SSLProtocols` setting.
pub const AVAILABLE_SSL_PROTOCOLS: &[&str] = &["SSLv2", "SSLv3", "TLSv1", "TLSv1.1", "TLSv1.2"];

/// The global service singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub anon_ip_limit: u32,
    pub connect_delay: u32,
    pub hide_version: bool,
    /// Playback buffer ceiling for non-admin users.
    pub max_buffer_size: u32,
    pub motd: Vec<String>,
    pub protect_web_sessions: bool,
    pub server_throttle: u32,
    pub skin: String,
    pub ssl_cert_file: String,
    pub ssl_ciphers: String,
    pub ssl_protocols: String,
    /// Default status prefix for new users.
    pub status_prefix: String,
    pub trusted_proxies: Vec<String>,
    #[serde(rename = "listener")]
    pub listeners: Vec<Listener>,
    /// Modules the host knows how to load.
    #[serde(rename = "available_module")]
    pub available_modules: Vec<ModuleInfo>,
    pub modules: LoadedModules,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            anon_ip_limit: DEFAULT_ANON_IP_LIMIT,
            connect_delay: DEFAULT_CONNECT_DELAY,
            hide_version: false,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            motd: Vec::new(),
            protect_web_sessions: true,
            server_throttle: DEFAULT_SERVER_THROTTLE,
            skin: String::new(),
            ssl_cert_file: DEFAULT_SSL_CERT_FILE.to_string(),
            ssl_ciphers: String::new(),
            ssl_protocols: String::new(),
            status_prefix: DEFAULT_STATUS_PREFIX.to_string(),
            trusted_proxies: Vec::new(),
            listeners: Vec::new(),
            available_modules: Vec::new(),
            modules: LoadedModules::default(),
        }
    }
}

impl Global {
    /// Set the accepted TLS protocol list.
    ///
    /// Syntax is a space separated list of `[+|-]<protocol>` tokens, where
    /// `all` stands for every available protocol. Returns false and leaves
    /// the value untouched when any token is unknown.
    pub fn set_ssl_protocols(&mut self, value: &str) -> bool {
        let valid = value.split_whitespace().all(|token| {
            let name = token.trim_start_matches(['+', '-']);
            name.eq_ignore_ascii_case("all")
                || AVAILABLE_SSL_PROTOCOLS
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(name))
        });
        if valid {
            self.ssl_protocols = value.to_string();
        }
        valid
    }

    pub fn add_motd(&mut self, line: &str) {
        self.motd.push(line.to_string());
    }

    pub fn add_trusted_proxy(&mut self, proxy: &str) -> bool {
        if proxy.is_empty() || self.trusted_proxies.iter().any(|p| p == proxy) {
            return false;
        }
        self.trusted_proxies.push(proxy.to_string());
        true
    }

    pub fn find_listener(&self, port: u16, bind_host: &str, addr: AddrType) -> Option<usize> {
        self.listeners
            .iter()
            .position(|l| l.port == port && l.bind_host == bind_host && l.addr == addr)
    }
}

/// Address family a listener accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddrType {
    Ipv4,
    Ipv6,
    All,
}

impl AddrType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" => Some(Self::Ipv4),
            "ipv6" => Some(Self::Ipv6),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Protocols a listener accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptType {
    Irc,
    Web,
    All,
}

impl AcceptType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "irc" => Some(Self::Irc),
            "web" => Some(Self::Web),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A configured listening port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    pub addr: AddrType,
    pub accept: AcceptType,
    #[serde(default)]
    pub bind_host: String,
    #[serde(default)]
    pub uri_prefix: String,
}

impl Listener {
    /// Option labels shown by `ListPorts` and matched by its filter.
    pub fn options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(5);
        options.push(if self.bind_host.is_empty() {
            "*".to_string()
        } else {
            self.bind_host.clone()
        });
        if matches!(self.addr, AddrType::Ipv6 | AddrType::All) {
            options.push("IPv6".to_string());
        }
        if matches!(self.addr, AddrType::Ipv4 | AddrType::All) {
            options.push("IPv4".to_string());
        }
        if matches!(self.accept, AcceptType::Irc | AcceptType::All) {
            options.push("IRC".to_string());
        }
        if matches!(self.accept, AcceptType::Web | AcceptType::All) {
            options.push("WEB".to_string());
            if !self.uri_prefix.is_empty() {
                options.push(format!("{}/", self.uri_prefix));
            }
        }
        options
    }

    pub fn port_label(&self) -> String {
        if self.ssl {
            format!("+{}", self.port)
        } else {
            self.port.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssl_protocols_accepts_known_tokens() {
        let mut global = Global::default();
        assert!(global.set_ssl_protocols("-all +TLSv1.2"));
        assert_eq!(global.ssl_protocols, "-all +TLSv1.2");
    }

    #[test]
    fn ssl_protocols_rejects_unknown_tokens() {
        let mut global = Global::default();
        assert!(!global.set_ssl_protocols("+TLSv9"));
        assert_eq!(global.ssl_protocols, "");
    }

    #[test]
    fn listener_options_follow_address_and_accept_types() {
        let listener = Listener {
            port: 6697,
            ssl: true,
            addr: AddrType::Ipv4,
            accept: AcceptType::All,
            bind_host: String::new(),
            uri_prefix: "znc".to_string(),
        };
        assert_eq!(listener.options(), vec!["*", "IPv4", "IRC", "WEB", "znc/"]);
        assert_eq!(listener.port_label(), "+6697");
    }

    #[test]
    fn duplicate_trusted_proxy_is_ignored() {
        let mut global = Global::default();
        assert!(global.add_trusted_proxy("10.0.0.1"));
        assert!(!global.add_trusted_proxy("10.0.0.1"));
        assert_eq!(global.trusted_proxies.len(), 1);
    }
}
