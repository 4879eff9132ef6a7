//! The admin console: routing, scope authorization and verb dispatch.
//!
//! Every console line is handled synchronously against the host object
//! model and produces a list of [`ConsoleEffect`]s. Nothing here performs
//! I/O except the persisted infix setting in [`store`].

pub mod address;
pub mod command;
pub mod commands;
pub mod effect;
pub mod permission;
pub mod scope;
pub mod store;
pub mod table;
pub mod variable;
pub mod vars;

use crate::error::ConsoleError;
use crate::state::{Channel, Global, Host, Network, User};
use crate::telemetry::{DispatchTimer, spans};
use address::{Caller, resolve};
use command::{Command, CommandContext, next_token};
use effect::{ConsoleEffect, Output};
use permission::{Principal, authorize, authorize_scope};
use scope::{Scope, ScopeHandle, ScopeKind};
use store::{NvStore, load_infix};
use table::{Table, Wildcard, starts_with_ignore_case};
use tracing::{debug, info, warn};
use variable::{VarContext, Variable};

/// Default module name; the global scope is reached by messaging
/// `<status prefix>admin`.
pub const DEFAULT_MODULE_NAME: &str = "admin";

/// The session a line arrives from: the principal's user name and the
/// network the client is attached to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub network: Option<String>,
}

impl Session {
    pub fn new(user: impl Into<String>, network: Option<&str>) -> Self {
        Self {
            user: user.into(),
            network: network.map(str::to_string),
        }
    }

    fn caller(&self) -> Caller<'_> {
        Caller {
            user: &self.user,
            network: self.network.as_deref(),
        }
    }
}

/// Variables and commands of one scope kind, in display order.
pub struct Registry<S: Scope> {
    pub variables: Vec<Variable<S>>,
    pub commands: Vec<Command<S>>,
}

impl<S: Scope> Registry<S> {
    fn command(&self, verb: &str) -> Option<&Command<S>> {
        self.commands
            .iter()
            .find(|c| c.verb().eq_ignore_ascii_case(verb))
    }

    fn variables_matching<'r>(&'r self, pattern: &str) -> Vec<&'r Variable<S>> {
        let pattern = Wildcard::new(pattern);
        self.variables
            .iter()
            .filter(|v| pattern.matches(v.name))
            .collect()
    }
}

pub struct Registries {
    pub global: Registry<Global>,
    pub user: Registry<User>,
    pub network: Registry<Network>,
    pub channel: Registry<Channel>,
}

impl Default for Registries {
    fn default() -> Self {
        Self {
            global: Registry {
                variables: vars::global::variables(),
                commands: commands::global::commands(),
            },
            user: Registry {
                variables: vars::user::variables(),
                commands: commands::user::commands(),
            },
            network: Registry {
                variables: vars::network::variables(),
                commands: commands::network::commands(),
            },
            channel: Registry {
                variables: vars::channel::variables(),
                commands: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Help,
    List,
    Get,
    Set,
    Reset,
}

/// Reserved verbs with their help summaries.
const RESERVED: &[(Verb, &str, &str)] = &[
    (Verb::Help, "Help [filter]", "Show commands matching the filter."),
    (
        Verb::List,
        "List [filter]",
        "List variables by name, pattern or type.",
    ),
    (Verb::Get, "Get <variable>", "Show the value of matching variables."),
    (Verb::Set, "Set <variable> <value>", "Set matching variables."),
    (
        Verb::Reset,
        "Reset <variable>",
        "Reset matching variables to their defaults.",
    ),
];

impl Verb {
    fn parse(token: &str) -> Option<Self> {
        RESERVED
            .iter()
            .find(|(_, syntax, _)| verb_of(syntax).eq_ignore_ascii_case(token))
            .map(|(verb, _, _)| *verb)
    }
}

fn verb_of(syntax: &str) -> &str {
    syntax.split_whitespace().next().unwrap_or(syntax)
}

/// Everything a verb path needs for one dispatch.
struct Env<'a> {
    host: &'a mut Host,
    principal: &'a Principal,
    out: &'a mut Output,
    store: &'a mut dyn NvStore,
}

/// The admin console module.
pub struct Console {
    module_name: String,
    registries: Registries,
    store: Box<dyn NvStore>,
}

impl Console {
    pub fn new(module_name: impl Into<String>, store: Box<dyn NvStore>) -> Self {
        Self {
            module_name: module_name.into(),
            registries: Registries::default(),
            store,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Handle a raw client line. Returns `None` when the line isn't addressed
    /// to the console and should be passed through.
    pub fn on_user_raw(
        &mut self,
        host: &mut Host,
        session: &Session,
        raw: &str,
    ) -> Option<Vec<ConsoleEffect>> {
        let (target, text) = crate::router::parse_client_line(raw)?;
        self.on_private_message(host, session, target, text)
    }

    /// Handle a message sent to `target`. Returns `None` when `target` is not
    /// one of the console's queries.
    pub fn on_private_message(
        &mut self,
        host: &mut Host,
        session: &Session,
        target: &str,
        text: &str,
    ) -> Option<Vec<ConsoleEffect>> {
        let user = host.user(&session.user)?;
        let principal = Principal::from_user(user);
        let global_target = format!("{}{}", user.status_prefix, self.module_name);
        let infix = load_infix(self.store.as_ref(), user);
        let prefix = format!("{}{}", user.status_prefix, infix);

        if target.eq_ignore_ascii_case(&global_target) {
            return Some(self.on_module_message(host, session, &principal, text));
        }

        let token = target.strip_prefix(prefix.as_str())?;
        let reply_to = format!("{}{}", infix, token);
        match resolve(host, token, &session.caller()) {
            Ok(Some(handle)) => Some(self.dispatch(host, &principal, &handle, &reply_to, text)),
            Ok(None) => None,
            Err(e) => {
                let mut out = Output::new(reply_to);
                out.fail(&ConsoleError::from(e));
                Some(out.into_effects())
            }
        }
    }

    /// A line sent to the module's own query: either a global-scope command
    /// or an address token followed by a command for that scope.
    fn on_module_message(
        &mut self,
        host: &mut Host,
        session: &Session,
        principal: &Principal,
        text: &str,
    ) -> Vec<ConsoleEffect> {
        let reply_to = self.module_name.clone();
        let (first, rest) = next_token(text);
        let is_global_verb =
            Verb::parse(first).is_some() || self.registries.global.command(first).is_some();
        if !first.is_empty() && !is_global_verb {
            match resolve(host, first, &session.caller()) {
                Ok(Some(handle)) => {
                    return self.dispatch(host, principal, &handle, &reply_to, rest);
                }
                Ok(None) => {}
                Err(e) => {
                    let mut out = Output::new(reply_to);
                    out.fail(&ConsoleError::from(e));
                    return out.into_effects();
                }
            }
        }
        self.dispatch(host, principal, &ScopeHandle::Global, &reply_to, text)
    }

    /// Run one command line against a resolved scope.
    pub fn dispatch(
        &mut self,
        host: &mut Host,
        principal: &Principal,
        handle: &ScopeHandle,
        reply_to: &str,
        line: &str,
    ) -> Vec<ConsoleEffect> {
        let (verb, args) = next_token(line);
        if verb.is_empty() {
            return Vec::new();
        }

        let kind = handle.kind();
        let span = spans::dispatch(&kind.to_string(), &principal.name, reply_to);
        let _enter = span.enter();
        let _timer = DispatchTimer::new(verb);
        debug!(verb, "Dispatching console line");

        let mut out = Output::new(reply_to);
        if !authorize_scope(principal, handle, verb) {
            warn!(principal = %principal.name, scope = %kind, verb, "Scope access denied");
            out.fail(&ConsoleError::AccessDenied);
            return out.into_effects();
        }

        let Self {
            registries, store, ..
        } = self;
        let mut env = Env {
            host,
            principal,
            out: &mut out,
            store: store.as_mut(),
        };
        match handle {
            ScopeHandle::Global => run(&registries.global, &mut env, &(), verb, args),
            ScopeHandle::User(name) => run(&registries.user, &mut env, name, verb, args),
            ScopeHandle::Network(key) => run(&registries.network, &mut env, key, verb, args),
            ScopeHandle::Channel(key) => run(&registries.channel, &mut env, key, verb, args),
        }
        out.into_effects()
    }
}

fn run<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, key: &S::Key, verb: &str, args: &str) {
    if S::lookup(env.host, key).is_none() {
        let target = env.out.target().to_string();
        env.out.fail(&ConsoleError::UnknownTarget(target));
        return;
    }

    match Verb::parse(verb) {
        Some(Verb::Help) => help(registry, env, args),
        Some(Verb::List) => list(registry, env, args),
        Some(Verb::Get) => get(registry, env, key, args),
        Some(Verb::Set) => set(registry, env, key, args),
        Some(Verb::Reset) => reset(registry, env, key, args),
        None => match registry.command(verb) {
            Some(command) => {
                let mut ctx = CommandContext {
                    host: &mut *env.host,
                    principal: env.principal,
                    out: &mut *env.out,
                };
                (command.exec)(&mut ctx, key, args);
            }
            None => env.out.fail(&ConsoleError::UnknownCommand),
        },
    }
}

fn filter_matches(name: &str, filter: &str, pattern: &Wildcard) -> bool {
    filter.is_empty() || starts_with_ignore_case(name, filter) || pattern.matches(name)
}

fn no_matches(out: &mut Output, filter: &str) {
    out.line(format!("No matches for '{}'", filter));
}

fn help<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, args: &str) {
    let (filter, _) = next_token(args);
    let pattern = Wildcard::new(filter);

    let reserved = RESERVED.iter().map(|(_, syntax, description)| (*syntax, *description));
    let custom = registry.commands.iter().map(|c| (c.syntax, c.description));
    let mut rows: Vec<_> = reserved
        .chain(custom)
        .filter(|(syntax, _)| filter_matches(verb_of(syntax), filter, &pattern))
        .collect();
    rows.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut table = Table::new(&["Command", "Description"]);
    for (syntax, description) in rows {
        table.add_row([syntax, description]);
    }

    if table.is_empty() {
        no_matches(env.out, filter);
        return;
    }
    env.out.table(&table);

    if S::KIND == ScopeKind::Global && filter.is_empty() {
        addressing_guide(env);
    }
}

/// How to reach the other scopes, using the principal's own query prefix.
fn addressing_guide(env: &mut Env<'_>) {
    let Some(user) = env.host.user(&env.principal.name) else {
        return;
    };
    let prefix = format!("{}{}", user.status_prefix, load_infix(&*env.store, user));

    let mut table = Table::new(&["Query", "Scope"]);
    for (target, scope) in [
        ("user", "your user"),
        ("network", "your current network"),
        ("<user>", "a user"),
        ("<network>", "one of your networks"),
        ("<#chan>", "a channel on your current network"),
        ("<user>/<network>", "a network of a user"),
        ("<network>/<#chan>", "a channel on one of your networks"),
        ("<user>/<network>/<#chan>", "a channel of a user"),
    ] {
        table.add_row([format!("{}{}", prefix, target), scope.to_string()]);
    }
    env.out
        .line("Other scopes are configured by messaging a query named after them:");
    env.out.table(&table);
}

fn list<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, args: &str) {
    let (filter, _) = next_token(args);
    let pattern = Wildcard::new(filter);

    let mut table = Table::new(&["Variable", "Description"]);
    for variable in &registry.variables {
        if filter_matches(variable.name, filter, &pattern)
            || variable.ty.name().eq_ignore_ascii_case(filter)
        {
            table.add_row([variable.label(), variable.description.to_string()]);
        }
    }

    if table.is_empty() {
        no_matches(env.out, filter);
    } else {
        env.out.table(&table);
    }
}

/// Emit `Name = value`, one line per element of multi-line values.
fn emit_value(out: &mut Output, name: &str, value: &str) {
    if value.is_empty() {
        out.line(format!("{} = ", name));
        return;
    }
    for element in value.split('\n') {
        out.line(format!("{} = {}", name, element));
    }
}

fn get<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, key: &S::Key, args: &str) {
    let (pattern, _) = next_token(args);
    if pattern.is_empty() {
        env.out.usage("Get <variable>");
        return;
    }
    let matched = registry.variables_matching(pattern);
    if matched.is_empty() {
        env.out.fail(&ConsoleError::UnknownVariable);
        return;
    }

    let inherited = S::inherited(env.host, key);
    let max_buffer_size = env.host.global.max_buffer_size;
    let Some(scope) = S::lookup(env.host, key) else {
        return;
    };
    let ctx = VarContext {
        principal: env.principal,
        max_buffer_size,
        inherited,
        store: &mut *env.store,
    };
    for variable in matched {
        emit_value(env.out, variable.name, &(variable.get)(scope, &ctx));
    }
}

/// The principal as seen by per-variable gates of the scope behind `key`.
fn gate_principal<S: Scope>(env: &Env<'_>, key: &S::Key) -> Principal {
    match S::owner(key).and_then(|name| env.host.user(name)) {
        Some(owner) => env.principal.acting_on(owner),
        None => env.principal.clone(),
    }
}

/// Apply `mutate` to every variable matching `pattern`, reporting each
/// outcome on its own line. Matches are independent: a failure doesn't undo
/// or stop the others.
fn fan_out<S: Scope>(
    registry: &Registry<S>,
    env: &mut Env<'_>,
    key: &S::Key,
    pattern: &str,
    action: &str,
    mutate: impl Fn(&Variable<S>, &mut S, &mut VarContext<'_>) -> Result<(), ConsoleError>,
) {
    let matched = registry.variables_matching(pattern);
    if matched.is_empty() {
        env.out.fail(&ConsoleError::UnknownVariable);
        return;
    }
    let gate = gate_principal::<S>(env, key);

    for variable in matched {
        if !authorize(&gate, variable.permissions) {
            warn!(
                scope = %S::KIND,
                variable = variable.name,
                principal = %env.principal.name,
                "Variable access denied"
            );
            env.out.fail(&ConsoleError::AccessDenied);
            continue;
        }

        let inherited = S::inherited(env.host, key);
        let max_buffer_size = env.host.global.max_buffer_size;
        let Some(scope) = S::lookup_mut(env.host, key) else {
            return;
        };
        let mut ctx = VarContext {
            principal: env.principal,
            max_buffer_size,
            inherited,
            store: &mut *env.store,
        };
        match mutate(variable, &mut *scope, &mut ctx) {
            Ok(()) => {
                info!(
                    scope = %S::KIND,
                    variable = variable.name,
                    principal = %env.principal.name,
                    "Variable {}",
                    action
                );
                emit_value(env.out, variable.name, &(variable.get)(scope, &ctx));
            }
            Err(e) => env.out.fail(&e),
        }
    }
}

fn set<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, key: &S::Key, args: &str) {
    let (pattern, value) = next_token(args);
    if value.is_empty() {
        env.out.usage("Set <variable> <value>");
        return;
    }
    fan_out(registry, env, key, pattern, "set", |variable, scope, ctx| {
        (variable.set)(scope, value, ctx).map_err(ConsoleError::Validation)
    });
}

fn reset<S: Scope>(registry: &Registry<S>, env: &mut Env<'_>, key: &S::Key, args: &str) {
    let (pattern, _) = next_token(args);
    if pattern.is_empty() {
        env.out.usage("Reset <variable>");
        return;
    }
    fan_out(registry, env, key, pattern, "reset", |variable, scope, ctx| {
        let resetter = variable.reset.ok_or(ConsoleError::ResetUnsupported)?;
        resetter(scope, ctx).map_err(ConsoleError::Validation)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::store::MemoryStore;
    use crate::state::{Channel, Global, Network, User};

    fn host() -> Host {
        let mut host = Host::new(Global::default());
        let mut alice = User::new("alice");
        let mut freenode = Network::new("freenode");
        let mut znc = Channel::new("#znc");
        znc.key = "sekrit".to_string();
        freenode.channels.push(znc);
        alice.networks.push(freenode);
        host.add_user(alice).unwrap();
        let mut root = User::new("root");
        root.admin = true;
        host.add_user(root).unwrap();
        host
    }

    fn console() -> Console {
        Console::new(DEFAULT_MODULE_NAME, Box::new(MemoryStore::new()))
    }

    fn texts(effects: Vec<ConsoleEffect>) -> Vec<String> {
        effects
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEffect::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn principal(host: &Host, name: &str) -> Principal {
        Principal::from_user(host.user(name).unwrap())
    }

    #[test]
    fn reserved_verbs_are_case_insensitive() {
        assert_eq!(Verb::parse("help"), Some(Verb::Help));
        assert_eq!(Verb::parse("RESET"), Some(Verb::Reset));
        assert_eq!(Verb::parse("Traffic"), None);
    }

    #[test]
    fn own_channel_key_is_readable() {
        let mut host = host();
        let alice = principal(&host, "alice");
        let handle = ScopeHandle::channel("alice", "freenode", "#znc");
        let out = console().dispatch(&mut host, &alice, &handle, "*#znc", "Get Key");
        assert_eq!(texts(out), vec!["Key = sekrit"]);
    }

    #[test]
    fn unknown_verb_is_reported() {
        let mut host = host();
        let alice = principal(&host, "alice");
        let handle = ScopeHandle::User("alice".to_string());
        let out = console().dispatch(&mut host, &alice, &handle, "*user", "Frobnicate");
        assert_eq!(texts(out), vec!["Error: unknown command"]);
    }

    #[test]
    fn reply_target_follows_address() {
        let mut host = host();
        let session = Session::new("alice", Some("freenode"));
        let effects = console()
            .on_private_message(&mut host, &session, "**freenode", "Get Nick")
            .unwrap();
        assert_eq!(
            effects,
            vec![ConsoleEffect::Reply {
                target: "*freenode".to_string(),
                text: "Nick = ".to_string(),
            }]
        );
    }

    #[test]
    fn unrelated_queries_pass_through() {
        let mut host = host();
        let session = Session::new("alice", None);
        let mut console = console();
        assert!(console.on_private_message(&mut host, &session, "bob", "hi").is_none());
        assert!(console
            .on_private_message(&mut host, &session, "**nobody", "Help")
            .is_none());
    }

    #[test]
    fn global_query_can_carry_an_address() {
        let mut host = host();
        let session = Session::new("alice", None);
        let effects = console()
            .on_private_message(&mut host, &session, "*admin", "freenode/#znc Get Key")
            .unwrap();
        assert_eq!(texts(effects), vec!["Key = sekrit"]);
    }

    #[test]
    fn global_help_includes_addressing_guide() {
        let mut host = host();
        let session = Session::new("alice", None);
        let lines = texts(
            console()
                .on_private_message(&mut host, &session, "*admin", "Help")
                .unwrap(),
        );
        assert!(lines.iter().any(|l| l.contains("Set <variable> <value>")));
        assert!(lines.iter().any(|l| l.contains("**<user>/<network>/<#chan>")));
    }

    #[test]
    fn help_filter_without_matches() {
        let mut host = host();
        let alice = principal(&host, "alice");
        let handle = ScopeHandle::User("alice".to_string());
        let out = console().dispatch(&mut host, &alice, &handle, "*user", "Help Zzz*");
        assert_eq!(texts(out), vec!["No matches for 'Zzz*'"]);
    }
}
