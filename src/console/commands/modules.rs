//! Module commands shared by the global, user and network scopes.

use crate::console::command::{CommandContext, next_token};
use crate::console::scope::Scope;
use crate::console::table::{Table, Wildcard, starts_with_ignore_case};
use crate::error::ConsoleError;
use crate::state::{Global, LoadedModules, ModuleInfo, ModuleKind, Network, User, find_module};
use tracing::info;

/// Longest module description `ListMods` shows.
const MAX_DESCRIPTION: usize = 128;

/// A scope that can host module instances.
pub trait ModuleScope: Scope {
    const MODULE_KIND: ModuleKind;

    fn modules(&self) -> &LoadedModules;
    fn modules_mut(&mut self) -> &mut LoadedModules;
}

impl ModuleScope for Global {
    const MODULE_KIND: ModuleKind = ModuleKind::Global;

    fn modules(&self) -> &LoadedModules {
        &self.modules
    }

    fn modules_mut(&mut self) -> &mut LoadedModules {
        &mut self.modules
    }
}

impl ModuleScope for User {
    const MODULE_KIND: ModuleKind = ModuleKind::User;

    fn modules(&self) -> &LoadedModules {
        &self.modules
    }

    fn modules_mut(&mut self) -> &mut LoadedModules {
        &mut self.modules
    }
}

impl ModuleScope for Network {
    const MODULE_KIND: ModuleKind = ModuleKind::Network;

    fn modules(&self) -> &LoadedModules {
        &self.modules
    }

    fn modules_mut(&mut self) -> &mut LoadedModules {
        &mut self.modules
    }
}

fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

pub fn list_mods<S: ModuleScope>(ctx: &mut CommandContext<'_>, key: &S::Key, args: &str) {
    let (filter, _) = next_token(args);
    let Some(scope) = S::lookup(ctx.host, key) else {
        return;
    };
    let pattern = Wildcard::new(filter);

    let mut table = Table::new(&["Module", "Description"]);
    for info in ctx
        .host
        .global
        .available_modules
        .iter()
        .filter(|m| m.supports(S::MODULE_KIND))
    {
        if !filter.is_empty()
            && !starts_with_ignore_case(&info.name, filter)
            && !pattern.matches(&info.name)
        {
            continue;
        }
        let name = if scope.modules().is_loaded(&info.name) {
            format!("{} (loaded)", info.name)
        } else {
            info.name.clone()
        };
        table.add_row([name, ellipsize(&info.description, MAX_DESCRIPTION)]);
    }

    if table.is_empty() {
        ctx.out.error(format!("no matches for '{}'", filter));
    } else {
        ctx.out.table(&table);
    }
}

/// Resolve the catalog entry for `LoadMod`/`ReloadMod`/`UnloadMod`.
///
/// Reports and returns `None` when the principal may not manage modules, the
/// module name is missing, or the catalog doesn't know it.
fn prepare<'l>(
    ctx: &mut CommandContext<'_>,
    args: &'l str,
    syntax: &str,
) -> Option<(ModuleInfo, &'l str)> {
    if !ctx.principal.may_load_modules() {
        ctx.out.fail(&ConsoleError::AccessDenied);
        return None;
    }
    let (name, module_args) = next_token(args);
    if name.is_empty() {
        ctx.out.usage(syntax);
        return None;
    }
    match find_module(&ctx.host.global.available_modules, name) {
        Ok(info) => Some((info.clone(), module_args)),
        Err(reason) => {
            ctx.out.error(reason);
            None
        }
    }
}

pub fn load_mod<S: ModuleScope>(ctx: &mut CommandContext<'_>, key: &S::Key, args: &str) {
    let Some((info, module_args)) = prepare(ctx, args, "LoadMod <module> [args]") else {
        return;
    };
    let name = &info.name;
    let Some(scope) = S::lookup_mut(ctx.host, key) else {
        return;
    };
    match scope
        .modules_mut()
        .load(&info, S::MODULE_KIND, module_args)
    {
        Ok(()) => {
            info!(module = %name, scope = %S::KIND, principal = %ctx.principal.name, "Module loaded");
            ctx.out.success(format!("module '{}' loaded", name));
        }
        Err(reason) => ctx.out.error(reason),
    }
}

pub fn reload_mod<S: ModuleScope>(ctx: &mut CommandContext<'_>, key: &S::Key, args: &str) {
    let Some((ModuleInfo { name, .. }, module_args)) =
        prepare(ctx, args, "ReloadMod <module> [args]")
    else {
        return;
    };
    let Some(scope) = S::lookup_mut(ctx.host, key) else {
        return;
    };
    match scope.modules_mut().reload(&name, module_args) {
        Ok(()) => {
            info!(module = %name, scope = %S::KIND, principal = %ctx.principal.name, "Module reloaded");
            ctx.out.success(format!("module '{}' reloaded", name));
        }
        Err(reason) => ctx.out.error(reason),
    }
}

pub fn unload_mod<S: ModuleScope>(ctx: &mut CommandContext<'_>, key: &S::Key, args: &str) {
    let Some((ModuleInfo { name, .. }, _)) = prepare(ctx, args, "UnloadMod <module> [args]")
    else {
        return;
    };
    let Some(scope) = S::lookup_mut(ctx.host, key) else {
        return;
    };
    match scope.modules_mut().unload(&name) {
        Ok(()) => {
            info!(module = %name, scope = %S::KIND, principal = %ctx.principal.name, "Module unloaded");
            ctx.out.success(format!("module '{}' unloaded", name));
        }
        Err(reason) => ctx.out.error(reason),
    }
}
