//! User-scope commands.

use super::{byte_str, empty_listing};
use super::modules::{list_mods, load_mod, reload_mod, unload_mod};
use crate::console::command::{Command, CommandContext, next_token};
use crate::console::table::{Table, Wildcard};
use crate::error::ConsoleError;
use crate::state::{Network, User};
use tracing::info;

type C = Command<User>;

pub fn commands() -> Vec<C> {
    vec![
        C {
            syntax: "AddNetwork <network>",
            description: "Add a network.",
            exec: add_network,
        },
        C {
            syntax: "CloneUser <user>",
            description: "Copy every attribute of another user into this one.",
            exec: clone_user,
        },
        C {
            syntax: "DelNetwork <network>",
            description: "Delete a network.",
            exec: del_network,
        },
        C {
            syntax: "ListClients [filter]",
            description: "List connected clients.",
            exec: list_clients,
        },
        C {
            syntax: "ListMods [filter]",
            description: "List user modules.",
            exec: list_mods::<User>,
        },
        C {
            syntax: "ListNetworks [filter]",
            description: "List networks.",
            exec: list_networks,
        },
        C {
            syntax: "LoadMod <module> [args]",
            description: "Load a user module.",
            exec: load_mod::<User>,
        },
        C {
            syntax: "ReloadMod <module> [args]",
            description: "Reload a user module.",
            exec: reload_mod::<User>,
        },
        C {
            syntax: "Traffic",
            description: "Show traffic per network.",
            exec: traffic,
        },
        C {
            syntax: "UnloadMod <module> [args]",
            description: "Unload a user module.",
            exec: unload_mod::<User>,
        },
    ]
}

fn add_network(ctx: &mut CommandContext<'_>, key: &String, args: &str) {
    let (name, _) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("AddNetwork <network>");
        return;
    }
    if !Network::is_valid_name(name) {
        ctx.out.error(format!("invalid network name '{}'", name));
        return;
    }
    let Some(user) = ctx.host.user_mut(key) else {
        return;
    };
    if !ctx.principal.is_admin && !user.has_space_for_new_network() {
        ctx.out.error(format!(
            "network limit of {} reached; ask an admin to raise it or delete unneeded networks",
            user.max_networks
        ));
        return;
    }
    match user.add_network(name) {
        Ok(()) => {
            info!(user = %key, network = %name, principal = %ctx.principal.name, "Network added");
            ctx.out.success(format!("network '{}' added", name));
        }
        Err(reason) => ctx.out.error(reason),
    }
}

fn clone_user(ctx: &mut CommandContext<'_>, key: &String, args: &str) {
    if !ctx.principal.is_admin {
        ctx.out.fail(&ConsoleError::AccessDenied);
        return;
    }
    let (name, _) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("CloneUser <user>");
        return;
    }
    let Some(source) = ctx.host.user(name).cloned() else {
        ctx.out.error("unknown user");
        return;
    };
    let Some(user) = ctx.host.user_mut(key) else {
        return;
    };
    user.clone_from_user(&source);
    info!(user = %key, source = %name, principal = %ctx.principal.name, "User cloned");
    ctx.out.success("cloned");
}

fn del_network(ctx: &mut CommandContext<'_>, key: &String, args: &str) {
    let (name, _) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("DelNetwork <network>");
        return;
    }
    let Some(user) = ctx.host.user_mut(key) else {
        return;
    };
    if user.delete_network(name) {
        info!(user = %key, network = %name, principal = %ctx.principal.name, "Network deleted");
        ctx.out.success(format!("network '{}' deleted", name));
    } else {
        ctx.out.error(format!("network '{}' doesn't exist", name));
    }
}

fn list_clients(ctx: &mut CommandContext<'_>, key: &String, args: &str) {
    let Some(user) = ctx.host.user(key) else {
        return;
    };
    let (filter, _) = next_token(args);
    let wildcard = Wildcard::new(filter);
    let mut table = Table::new(&["Host", "Name"]);
    for client in &user.clients {
        if filter.is_empty()
            || wildcard.matches(&client.remote_ip)
            || wildcard.matches(&client.full_name)
        {
            table.add_row([client.remote_ip.as_str(), client.full_name.as_str()]);
        }
    }
    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No connected clients"));
    } else {
        ctx.out.table(&table);
    }
}

fn list_networks(ctx: &mut CommandContext<'_>, key: &String, args: &str) {
    let Some(user) = ctx.host.user(key) else {
        return;
    };
    let (filter, _) = next_token(args);
    let wildcard = Wildcard::new(filter);
    let mut table = Table::new(&["Network", "Status", "Channels"]);
    for network in &user.networks {
        if !filter.is_empty() && !wildcard.matches(&network.name) {
            continue;
        }
        let status = match network.current_server() {
            Some(server) => format!("Online ({})", server.host),
            None if network.irc_connect_enabled => "Offline".to_string(),
            None => "Disabled".to_string(),
        };
        table.add_row([
            network.name.clone(),
            status,
            network.channels.len().to_string(),
        ]);
    }
    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No networks"));
    } else {
        ctx.out.table(&table);
    }
}

fn traffic(ctx: &mut CommandContext<'_>, key: &String, _: &str) {
    let Some(user) = ctx.host.user(key) else {
        return;
    };
    let mut table = Table::new(&["Network", "Sent", "Received", "Total"]);
    for network in &user.networks {
        let (read, written) = (network.bytes_read, network.bytes_written);
        table.add_row([
            network.name.clone(),
            byte_str(written),
            byte_str(read),
            byte_str(read + written),
        ]);
    }
    let (read, written) = (user.bytes_read(), user.bytes_written());
    table.add_row([
        "<Total>".to_string(),
        byte_str(written),
        byte_str(read),
        byte_str(read + written),
    ]);
    ctx.out.table(&table);
}
