//! Channel records owned by a network.

use serde::{Deserialize, Serialize};

/// A channel the bouncer keeps for one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub name: String,
    /// Overrides the owning user's setting when set.
    pub auto_clear_chan_buffer: Option<bool>,
    /// Overrides the owning user's channel buffer size when set.
    pub buffer: Option<u32>,
    pub detached: bool,
    pub disabled: bool,
    pub in_config: bool,
    pub key: String,
    pub modes: String,
    /// Whether the upstream connection is currently joined.
    #[serde(skip)]
    pub joined: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self::new("")
    }
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_clear_chan_buffer: None,
            buffer: None,
            detached: false,
            disabled: false,
            in_config: true,
            key: String::new(),
            modes: String::new(),
            joined: false,
        }
    }

    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn attach(&mut self) {
        self.detached = false;
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    /// Status label shown by `ListChans`.
    pub fn status(&self) -> &'static str {
        if self.joined {
            if self.detached { "Detached" } else { "Joined" }
        } else if self.disabled {
            "Disabled"
        } else {
            "Trying"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_join_state() {
        let mut chan = Channel::new("#znc");
        assert_eq!(chan.status(), "Trying");
        chan.disable();
        assert_eq!(chan.status(), "Disabled");
        chan.joined = true;
        chan.detach();
        assert_eq!(chan.status(), "Detached");
        chan.attach();
        assert_eq!(chan.status(), "Joined");
    }
}
