//! Global-scope commands. The dispatcher only lets admins reach these.

use super::{byte_str, empty_listing};
use super::modules::{list_mods, load_mod, reload_mod, unload_mod};
use crate::console::command::{Command, CommandContext, next_token};
use crate::console::effect::{ConsoleEffect, TerminateKind};
use crate::console::table::{Table, Wildcard};
use crate::error::ConsoleError;
use crate::state::{AcceptType, AddrType, Global, Listener, User, hash_password};
use tracing::{info, warn};

type C = Command<Global>;

pub fn commands() -> Vec<C> {
    vec![
        C {
            syntax: "AddPort <[+]port> <ipv4|ipv6|all> <web|irc|all> [bindhost [uriprefix]]",
            description: "Add a listening port.",
            exec: add_port,
        },
        C {
            syntax: "AddUser <username> <password>",
            description: "Add a new user.",
            exec: add_user,
        },
        C {
            syntax: "Broadcast <message>",
            description: "Send a message to every connected client.",
            exec: broadcast,
        },
        C {
            syntax: "DelPort <[+]port> <ipv4|ipv6|all> [bindhost]",
            description: "Delete a listening port.",
            exec: del_port,
        },
        C {
            syntax: "DelUser <username>",
            description: "Delete a user.",
            exec: del_user,
        },
        C {
            syntax: "ListMods [filter]",
            description: "List global modules.",
            exec: list_mods::<Global>,
        },
        C {
            syntax: "ListPorts [filter]",
            description: "List listening ports.",
            exec: list_ports,
        },
        C {
            syntax: "ListUsers [filter]",
            description: "List all users.",
            exec: list_users,
        },
        C {
            syntax: "LoadMod <module> [args]",
            description: "Load a global module.",
            exec: load_mod::<Global>,
        },
        C {
            syntax: "Rehash",
            description: "Reload the bouncer configuration file.",
            exec: rehash,
        },
        C {
            syntax: "ReloadMod <module> [args]",
            description: "Reload a global module.",
            exec: reload_mod::<Global>,
        },
        C {
            syntax: "Restart [--force] [message]",
            description: "Save the configuration and restart.",
            exec: restart,
        },
        C {
            syntax: "SaveConfig",
            description: "Write the bouncer configuration file.",
            exec: save_config,
        },
        C {
            syntax: "Shutdown [--force] [message]",
            description: "Save the configuration and shut down.",
            exec: shutdown,
        },
        C {
            syntax: "Traffic",
            description: "Show traffic per user.",
            exec: traffic,
        },
        C {
            syntax: "UnloadMod <module> [args]",
            description: "Unload a global module.",
            exec: unload_mod::<Global>,
        },
        C {
            syntax: "UpdateMod <module>",
            description: "Reload every instance of a module.",
            exec: update_mod,
        },
    ]
}

/// `[+]port`; the plus selects TLS.
fn parse_port(token: &str) -> Option<(u16, bool)> {
    let ssl = token.starts_with('+');
    let port = token.trim_start_matches('+').parse::<u16>().ok()?;
    (port != 0).then_some((port, ssl))
}

fn config_path(ctx: &CommandContext<'_>) -> String {
    ctx.host
        .config_file()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn add_port(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    const USAGE: &str = "AddPort <[+]port> <ipv4|ipv6|all> <web|irc|all> [bindhost [uriprefix]]";
    let mut tokens = args.split_whitespace();
    let port = tokens.next().and_then(parse_port);
    let addr = tokens.next().and_then(AddrType::parse);
    let accept = tokens.next().and_then(AcceptType::parse);
    let (Some((port, ssl)), Some(addr), Some(accept)) = (port, addr, accept) else {
        ctx.out.usage(USAGE);
        return;
    };
    let bind_host = tokens.next().unwrap_or_default().to_string();
    let uri_prefix = tokens.next().unwrap_or_default().to_string();

    let global = &mut ctx.host.global;
    if global.find_listener(port, &bind_host, addr).is_some() {
        ctx.out.error("port already configured");
        return;
    }
    global.listeners.push(Listener {
        port,
        ssl,
        addr,
        accept,
        bind_host,
        uri_prefix,
    });
    info!(port, ssl, principal = %ctx.principal.name, "Listener added");
    ctx.out.success("port added");
}

fn add_user(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let (name, rest) = next_token(args);
    let (password, _) = next_token(rest);
    if password.is_empty() {
        ctx.out.usage("AddUser <username> <password>");
        return;
    }
    if let Some(existing) = ctx.host.user(name) {
        ctx.out
            .error(format!("user '{}' already exists", existing.name));
        return;
    }

    let mut user = User::new(name);
    user.status_prefix = ctx.host.global.status_prefix.clone();
    user.password = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!(user = %name, error = %e, "Password hashing failed");
            ctx.out.error("unable to hash password");
            return;
        }
    };
    match ctx.host.add_user(user) {
        Ok(()) => {
            info!(user = %name, principal = %ctx.principal.name, "User added");
            ctx.out.success(format!("user '{}' added", name));
        }
        Err(reason) => ctx.out.error(reason),
    }
}

fn broadcast(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    if args.is_empty() {
        ctx.out.usage("Broadcast <message>");
        return;
    }
    ctx.out.effect(ConsoleEffect::Broadcast {
        message: args.to_string(),
    });
}

fn del_port(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let mut tokens = args.split_whitespace();
    let port = tokens.next().and_then(parse_port);
    let addr = tokens.next().and_then(AddrType::parse);
    let (Some((port, _)), Some(addr)) = (port, addr) else {
        ctx.out.usage("DelPort <[+]port> <ipv4|ipv6|all> [bindhost]");
        return;
    };
    let bind_host = tokens.next().unwrap_or_default();

    let global = &mut ctx.host.global;
    match global.find_listener(port, bind_host, addr) {
        Some(index) => {
            global.listeners.remove(index);
            info!(port, principal = %ctx.principal.name, "Listener deleted");
            ctx.out.success("port deleted");
        }
        None => ctx.out.error("no matching port"),
    }
}

fn del_user(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let (name, _) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("DelUser <username>");
        return;
    }
    if ctx.host.user(name).is_none() {
        ctx.out.error(format!("user '{}' doesn't exist", name));
        return;
    }
    if name == ctx.principal.name {
        ctx.out.fail(&ConsoleError::AccessDenied);
        return;
    }
    ctx.host.delete_user(name);
    info!(user = %name, principal = %ctx.principal.name, "User deleted");
    ctx.out.success(format!("user '{}' deleted", name));
}

fn list_ports(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let (filter, _) = next_token(args);
    let pattern = Wildcard::new(filter.trim_start_matches('+'));

    let mut table = Table::new(&["Port", "Options"]);
    for listener in &ctx.host.global.listeners {
        let options = listener.options();
        if !filter.is_empty()
            && !pattern.matches(&listener.port.to_string())
            && !options.iter().any(|o| o.eq_ignore_ascii_case(filter))
        {
            continue;
        }
        table.add_row([listener.port_label(), options.join(", ")]);
    }

    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No ports"));
    } else {
        ctx.out.table(&table);
    }
}

fn list_users(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let (filter, _) = next_token(args);
    let pattern = Wildcard::new(filter);

    let mut table = Table::new(&["Username", "Networks", "Clients"]);
    for user in ctx.host.users() {
        if filter.is_empty() || pattern.matches(&user.name) {
            table.add_row([
                user.name.clone(),
                user.networks.len().to_string(),
                user.clients.len().to_string(),
            ]);
        }
    }

    if table.is_empty() {
        ctx.out.line(empty_listing(filter, "No users"));
    } else {
        ctx.out.table(&table);
    }
}

fn rehash(ctx: &mut CommandContext<'_>, _: &(), _: &str) {
    match ctx.host.rehash() {
        Ok(()) => {
            info!(principal = %ctx.principal.name, "Configuration reloaded");
            ctx.out.success(format!("read '{}'", config_path(ctx)));
        }
        Err(e) => {
            warn!(error = %e, "Rehash failed");
            ctx.out.error(format!("failed to read '{}'", config_path(ctx)));
        }
    }
}

fn save_config(ctx: &mut CommandContext<'_>, _: &(), _: &str) {
    match ctx.host.write_config() {
        Ok(()) => ctx.out.success(format!("wrote '{}'", config_path(ctx))),
        Err(e) => {
            warn!(error = %e, "Writing configuration failed");
            ctx.out.error(format!("failed to write '{}'", config_path(ctx)));
        }
    }
}

/// Persist, then broadcast and terminate; refuses when persisting fails
/// unless `--force` is given.
fn terminate(ctx: &mut CommandContext<'_>, args: &str, kind: TerminateKind, default: &str) {
    let (first, rest) = next_token(args);
    let force = first.eq_ignore_ascii_case("--force");
    let message = if force { rest } else { args.trim() };
    let message = if message.is_empty() { default } else { message };

    if let Err(e) = ctx.host.write_config() {
        warn!(error = %e, force, "Saving configuration before termination failed");
        if !force {
            ctx.out.error("saving config failed");
            ctx.out.line("Aborting. Use --force to ignore.");
            return;
        }
    }

    warn!(?kind, principal = %ctx.principal.name, "Terminating on console request");
    ctx.out.effect(ConsoleEffect::Broadcast {
        message: message.to_string(),
    });
    ctx.out.effect(ConsoleEffect::Terminate {
        kind,
        message: message.to_string(),
    });
}

fn restart(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    terminate(
        ctx,
        args,
        TerminateKind::Restart,
        "The bouncer is being restarted NOW!",
    );
}

fn shutdown(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    terminate(
        ctx,
        args,
        TerminateKind::Shutdown,
        "The bouncer is being shut down NOW!",
    );
}

fn traffic(ctx: &mut CommandContext<'_>, _: &(), _: &str) {
    let mut table = Table::new(&["User", "Sent", "Received", "Total"]);
    for user in ctx.host.users() {
        let (read, written) = (user.bytes_read(), user.bytes_written());
        table.add_row([
            user.name.clone(),
            byte_str(written),
            byte_str(read),
            byte_str(read + written),
        ]);
    }
    if table.is_empty() {
        ctx.out.line("No users");
    } else {
        ctx.out.table(&table);
    }
}

fn update_mod(ctx: &mut CommandContext<'_>, _: &(), args: &str) {
    let (name, _) = next_token(args);
    if name.is_empty() {
        ctx.out.usage("UpdateMod <module>");
        return;
    }
    if let Err(reason) = crate::state::find_module(&ctx.host.global.available_modules, name) {
        ctx.out.error(reason);
        return;
    }
    let instances = ctx.host.module_instances(name);
    if instances == 0 {
        ctx.out.error(format!("module '{}' not updated", name));
        return;
    }
    info!(module = %name, instances, principal = %ctx.principal.name, "Module updated");
    ctx.out.success(format!("module '{}' updated", name));
}
