//! Network-scope commands.

use super::{byte_str, empty_listing};
use super::modules::{list_mods, load_mod, reload_mod, unload_mod};
use crate::console::command::{Command, CommandContext, next_token};
use crate::console::scope::NetworkKey;
use crate::console::table::{Table, Wildcard};
use crate::error::ConsoleError;
use crate::state::Network;
use tracing::info;

type C = Command<Network>;

pub fn commands() -> Vec<C> {
    vec![
        C {
            syntax: "AddServer <host> [[+]port] [password]",
            description: "Add an IRC server.",
            exec: add_server,
        },
        C {
            syntax: "CloneNetwork <network> [user]",
            description: "Copy another network's settings, servers and channels.",
            exec: clone_network,
        },
        C {
            syntax: "Connect [server]",
            description: "Connect to IRC, optionally to the given server.",
            exec: connect,
        },
        C {
            syntax: "DelServer <host> [[+]port] [password]",
            description: "Delete an IRC server.",
            exec: del_server,
        },
        C {
            syntax: "Disconnect [message]",
            description: "Disconnect from IRC.",
            exec: disconnect,
        },
        C {
            syntax: "ListChans [filter]",
            description: "List channels.",
            exec: list_chans,
        },
        C {
            syntax: "ListMods [filter]",
            description: "List network modules.",
            exec: list_mods::<Network>,
        },
        C {
            syntax: "ListServers [filter]",
            description: "List IRC servers.",
            exec: list_servers,
        },
        C {
            syntax: "LoadMod <module> [args]",
            description: "Load a network module.",
            exec: load_mod::<Network>,
        },
        C {
            syntax: "ReloadMod <module> [args]",
            description: "Reload a network module.",
            exec: reload_mod::<Network>,
        },
        C {
            syntax: "Traffic",
            description: "Show traffic for this network.",
            exec: traffic,
        },
        C {
            syntax: "UnloadMod <module> [args]",
            description: "Unload a network module.",
            exec: unload_mod::<Network>,
        },
    ]
}

fn add_server(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    if args.trim().is_empty() {
        ctx.out.usage("AddServer <host> [[+]port] [password]");
        return;
    }
    let Some(network) = ctx.host.network_mut(&key.user, &key.network) else {
        return;
    };
    if network.add_server(args) {
        info!(user = %key.user, network = %key.network, principal = %ctx.principal.name, "Server added");
        ctx.out.success("server added");
    } else {
        ctx.out.error("could not add server (duplicate or invalid entry)");
    }
}

fn clone_network(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let (name, rest) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("CloneNetwork <network> [user]");
        return;
    }
    let (user, _) = next_token(rest);
    let user = if user.is_empty() { key.user.as_str() } else { user };
    if user != key.user && !ctx.principal.is_admin {
        ctx.out.fail(&ConsoleError::AccessDenied);
        return;
    }
    let Some(owner) = ctx.host.user(user) else {
        ctx.out.error("unknown user");
        return;
    };
    let Some(template) = owner.find_network(name).cloned() else {
        ctx.out.fail(&ConsoleError::UnknownNetwork);
        return;
    };
    let Some(network) = ctx.host.network_mut(&key.user, &key.network) else {
        return;
    };
    if user == key.user && template.name == network.name {
        ctx.out.error("cannot clone a network onto itself");
        return;
    }
    network.clone_from_network(&template);
    info!(
        user = %key.user,
        network = %key.network,
        source_user = %user,
        source = %template.name,
        principal = %ctx.principal.name,
        "Network cloned"
    );
    ctx.out.success("cloned");
}

fn connect(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let (server, _) = next_token(args);
    let Some(network) = ctx.host.network_mut(&key.user, &key.network) else {
        return;
    };
    let next = if server.is_empty() {
        None
    } else {
        match network.find_server(server) {
            Some(index) => Some(index),
            None => {
                ctx.out.error("unknown server");
                return;
            }
        }
    };

    // Drop any live connection; the next attempt starts at `next_server`.
    let was_connected = network.current_server.take().is_some();
    network.irc_connect_enabled = true;
    if let Some(index) = next {
        network.next_server = Some(index);
    }
    info!(user = %key.user, network = %key.network, server = %server, "Network queued for connect");

    let reply = match next.and_then(|index| network.servers.get(index)) {
        Some(server) => format!("Connecting to '{}'...", server.host),
        None if was_connected => "Jumping to the next server on the list...".to_string(),
        None => "Connecting...".to_string(),
    };
    ctx.out.line(reply);
}

fn del_server(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let mut tokens = args.split_whitespace();
    let Some(host) = tokens.next() else {
        ctx.out.usage("DelServer <host> [[+]port] [password]");
        return;
    };
    let port = match tokens.next() {
        Some(token) => match token.trim_start_matches('+').parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                ctx.out.error(format!("invalid port '{}'", token));
                return;
            }
        },
        None => None,
    };
    let password = tokens.collect::<Vec<_>>().join(" ");

    let Some(network) = ctx.host.network_mut(&key.user, &key.network) else {
        return;
    };
    if network.del_server(host, port, &password) {
        info!(user = %key.user, network = %key.network, server = %host, "Server deleted");
        ctx.out.success("server deleted");
    } else {
        ctx.out.error("no such server");
    }
}

fn disconnect(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let user_quit_msg = ctx
        .host
        .user(&key.user)
        .map(|u| u.quit_msg.clone())
        .unwrap_or_default();
    let Some(network) = ctx.host.network_mut(&key.user, &key.network) else {
        return;
    };
    network.irc_connect_enabled = false;
    if network.current_server.take().is_none() {
        ctx.out.error("not connected");
        return;
    }
    let message = [args.trim(), network.quit_msg.as_str(), user_quit_msg.as_str()]
        .into_iter()
        .find(|m| !m.is_empty())
        .unwrap_or_default();
    info!(user = %key.user, network = %key.network, quit = %message, "IRC connection closed");
    ctx.out.line("Disconnected");
}

fn list_chans(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let Some(network) = ctx.host.network(&key.user, &key.network) else {
        return;
    };
    let (filter, _) = next_token(args);
    let wildcard = Wildcard::new(filter);
    let mut table = Table::new(&["Channel", "Status", "Modes"]);
    for channel in &network.channels {
        if filter.is_empty() || wildcard.matches(&channel.name) {
            table.add_row([
                channel.name.as_str(),
                channel.status(),
                channel.modes.as_str(),
            ]);
        }
    }
    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No channels"));
    } else {
        ctx.out.table(&table);
    }
}

fn list_servers(ctx: &mut CommandContext<'_>, key: &NetworkKey, args: &str) {
    let Some(network) = ctx.host.network(&key.user, &key.network) else {
        return;
    };
    let (filter, _) = next_token(args);
    let wildcard = Wildcard::new(filter);
    let mut table = Table::new(&["Host", "Port", "SSL", "Current"]);
    for (index, server) in network.servers.iter().enumerate() {
        if !filter.is_empty() && !wildcard.matches(&server.host) {
            continue;
        }
        table.add_row([
            server.host.clone(),
            server.port.to_string(),
            String::from(if server.ssl { "SSL" } else { "" }),
            String::from(if network.current_server == Some(index) { "*" } else { "" }),
        ]);
    }
    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No servers"));
    } else {
        ctx.out.table(&table);
    }
}

fn traffic(ctx: &mut CommandContext<'_>, key: &NetworkKey, _: &str) {
    let Some(network) = ctx.host.network(&key.user, &key.network) else {
        return;
    };
    let (read, written) = (network.bytes_read, network.bytes_written);
    let mut table = Table::new(&["Network", "Sent", "Received", "Total"]);
    table.add_row([
        network.name.clone(),
        byte_str(written),
        byte_str(read),
        byte_str(read + written),
    ]);
    ctx.out.table(&table);
}
