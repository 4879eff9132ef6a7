//! Integration test common infrastructure.
//!
//! Provides a fixture host and a console driven through the same entry
//! points the binary uses.
//!
//! Fixture:
//! - `alice` (non-admin): network `freenode` with channel `#znc` (key `secret`)
//! - `bob` (non-admin): no networks
//! - `root` (admin)
//! - module catalog: `log` (user, network), `webadmin` (global)

#![allow(dead_code)]

use slbnc_admin::console::DEFAULT_MODULE_NAME;
use slbnc_admin::console::effect::ConsoleEffect;
use slbnc_admin::console::permission::Principal;
use slbnc_admin::console::scope::ScopeHandle;
use slbnc_admin::console::store::MemoryStore;
use slbnc_admin::state::{Channel, Global, ModuleInfo, ModuleKind, Network, User};
use slbnc_admin::{Console, Host, Session};

pub fn fixture_host() -> Host {
    let mut global = Global::default();
    global.available_modules = vec![
        ModuleInfo {
            name: "log".to_string(),
            description: "Writes IRC logs.".to_string(),
            kinds: vec![ModuleKind::User, ModuleKind::Network],
        },
        ModuleInfo {
            name: "webadmin".to_string(),
            description: "Web based administration.".to_string(),
            kinds: vec![ModuleKind::Global],
        },
    ];
    let mut host = Host::new(global);

    let mut znc = Channel::new("#znc");
    znc.key = "secret".to_string();
    let mut freenode = Network::new("freenode");
    freenode.channels.push(znc);
    let mut alice = User::new("alice");
    alice.networks.push(freenode);
    host.add_user(alice).unwrap();

    host.add_user(User::new("bob")).unwrap();

    let mut root = User::new("root");
    root.admin = true;
    host.add_user(root).unwrap();
    host
}

/// Reply texts, in order; other effects are dropped.
pub fn texts(effects: Vec<ConsoleEffect>) -> Vec<String> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            ConsoleEffect::Reply { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

pub fn user_scope(name: &str) -> ScopeHandle {
    ScopeHandle::User(name.to_string())
}

pub struct TestConsole {
    pub host: Host,
    pub console: Console,
}

impl TestConsole {
    pub fn new() -> Self {
        Self::with_host(fixture_host())
    }

    pub fn with_host(host: Host) -> Self {
        Self {
            host,
            console: Console::new(DEFAULT_MODULE_NAME, Box::new(MemoryStore::new())),
        }
    }

    pub fn principal(&self, name: &str) -> Principal {
        Principal::from_user(self.host.user(name).expect("fixture user"))
    }

    /// Dispatch `line` as `user` against an already resolved scope.
    pub fn effects(&mut self, user: &str, handle: &ScopeHandle, line: &str) -> Vec<ConsoleEffect> {
        let principal = self.principal(user);
        self.console
            .dispatch(&mut self.host, &principal, handle, "test", line)
    }

    pub fn run(&mut self, user: &str, handle: &ScopeHandle, line: &str) -> Vec<String> {
        texts(self.effects(user, handle, line))
    }

    /// Send `text` to the query `target` from `user`'s session.
    pub fn query(
        &mut self,
        user: &str,
        network: Option<&str>,
        target: &str,
        text: &str,
    ) -> Option<Vec<ConsoleEffect>> {
        let session = Session::new(user, network);
        self.console
            .on_private_message(&mut self.host, &session, target, text)
    }

    pub fn query_texts(
        &mut self,
        user: &str,
        network: Option<&str>,
        target: &str,
        text: &str,
    ) -> Vec<String> {
        texts(self.query(user, network, target, text).expect("query handled"))
    }
}
