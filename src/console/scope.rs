//! Configuration scopes and handles onto host objects.

use crate::state::{Channel, DEFAULT_BUFFER_SIZE, Global, Host, Network, User};
use std::fmt;

/// The four nested configuration scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    User,
    Network,
    Channel,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Global => "global",
            Self::User => "user",
            Self::Network => "network",
            Self::Channel => "channel",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkKey {
    pub user: String,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelKey {
    pub user: String,
    pub network: String,
    pub channel: String,
}

/// A resolved reference to a live host object.
///
/// Handles carry canonical names, never borrows; the object is looked up in
/// the [`Host`] each time a descriptor runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeHandle {
    Global,
    User(String),
    Network(NetworkKey),
    Channel(ChannelKey),
}

impl ScopeHandle {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Global => ScopeKind::Global,
            Self::User(_) => ScopeKind::User,
            Self::Network(_) => ScopeKind::Network,
            Self::Channel(_) => ScopeKind::Channel,
        }
    }

    /// Name of the user that owns the scope; `None` for the global scope.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::User(user) => Some(user),
            Self::Network(key) => Some(&key.user),
            Self::Channel(key) => Some(&key.user),
        }
    }

    pub fn network(user: &str, network: &str) -> Self {
        Self::Network(NetworkKey {
            user: user.to_string(),
            network: network.to_string(),
        })
    }

    pub fn channel(user: &str, network: &str, channel: &str) -> Self {
        Self::Channel(ChannelKey {
            user: user.to_string(),
            network: network.to_string(),
            channel: channel.to_string(),
        })
    }
}

/// Settings a scope inherits from its owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inherited {
    pub chan_buffer_size: u32,
    pub auto_clear_chan_buffer: bool,
}

impl Default for Inherited {
    fn default() -> Self {
        Self {
            chan_buffer_size: DEFAULT_BUFFER_SIZE,
            auto_clear_chan_buffer: true,
        }
    }
}

impl Inherited {
    fn from_user(user: &User) -> Self {
        Self {
            chan_buffer_size: user.chan_buffer_size,
            auto_clear_chan_buffer: user.auto_clear_chan_buffer,
        }
    }
}

/// A host object type addressable by the console.
pub trait Scope: Sized {
    type Key: fmt::Debug;
    const KIND: ScopeKind;

    fn lookup<'h>(host: &'h Host, key: &Self::Key) -> Option<&'h Self>;

    fn lookup_mut<'h>(host: &'h mut Host, key: &Self::Key) -> Option<&'h mut Self>;

    /// Name of the user owning the object behind `key`.
    fn owner(_key: &Self::Key) -> Option<&str> {
        None
    }

    fn inherited(_host: &Host, _key: &Self::Key) -> Inherited {
        Inherited::default()
    }
}

impl Scope for Global {
    type Key = ();
    const KIND: ScopeKind = ScopeKind::Global;

    fn lookup<'h>(host: &'h Host, _key: &()) -> Option<&'h Self> {
        Some(&host.global)
    }

    fn lookup_mut<'h>(host: &'h mut Host, _key: &()) -> Option<&'h mut Self> {
        Some(&mut host.global)
    }
}

impl Scope for User {
    type Key = String;
    const KIND: ScopeKind = ScopeKind::User;

    fn lookup<'h>(host: &'h Host, key: &String) -> Option<&'h Self> {
        host.user(key)
    }

    fn lookup_mut<'h>(host: &'h mut Host, key: &String) -> Option<&'h mut Self> {
        host.user_mut(key)
    }

    fn owner(key: &String) -> Option<&str> {
        Some(key)
    }
}

impl Scope for Network {
    type Key = NetworkKey;
    const KIND: ScopeKind = ScopeKind::Network;

    fn lookup<'h>(host: &'h Host, key: &NetworkKey) -> Option<&'h Self> {
        host.network(&key.user, &key.network)
    }

    fn lookup_mut<'h>(host: &'h mut Host, key: &NetworkKey) -> Option<&'h mut Self> {
        host.network_mut(&key.user, &key.network)
    }

    fn owner(key: &NetworkKey) -> Option<&str> {
        Some(&key.user)
    }

    fn inherited(host: &Host, key: &NetworkKey) -> Inherited {
        host.user(&key.user)
            .map(Inherited::from_user)
            .unwrap_or_default()
    }
}

impl Scope for Channel {
    type Key = ChannelKey;
    const KIND: ScopeKind = ScopeKind::Channel;

    fn lookup<'h>(host: &'h Host, key: &ChannelKey) -> Option<&'h Self> {
        host.channel(&key.user, &key.network, &key.channel)
    }

    fn lookup_mut<'h>(host: &'h mut Host, key: &ChannelKey) -> Option<&'h mut Self> {
        host.channel_mut(&key.user, &key.network, &key.channel)
    }

    fn owner(key: &ChannelKey) -> Option<&str> {
        Some(&key.user)
    }

    fn inherited(host: &Host, key: &ChannelKey) -> Inherited {
        host.user(&key.user)
            .map(Inherited::from_user)
            .unwrap_or_default()
    }
}
