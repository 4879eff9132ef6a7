//! Permission gate.

use super::scope::ScopeHandle;
use crate::state::User;

/// The identity a console line executes as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub is_admin: bool,
    pub denies_bind_host_change: bool,
    pub denies_module_load: bool,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            is_admin: user.admin,
            denies_bind_host_change: user.deny_set_bind_host,
            denies_module_load: user.deny_load_mod,
        }
    }

    pub fn may_change_bind_host(&self) -> bool {
        self.is_admin || !self.denies_bind_host_change
    }

    pub fn may_load_modules(&self) -> bool {
        self.is_admin || !self.denies_module_load
    }

    /// The principal as checked against variables of `target`'s objects:
    /// the bind-host policy flag is the target user's, admins still bypass.
    pub fn acting_on(&self, target: &User) -> Self {
        Self {
            denies_bind_host_change: target.deny_set_bind_host,
            ..self.clone()
        }
    }
}

/// Per-variable permission flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    RequiresAdmin,
    RequiresBindHostPolicy,
}

/// Whether `principal` may mutate a variable carrying `permissions`.
pub fn authorize(principal: &Principal, permissions: &[Permission]) -> bool {
    permissions.iter().all(|permission| match permission {
        Permission::RequiresAdmin => principal.is_admin,
        Permission::RequiresBindHostPolicy => principal.may_change_bind_host(),
    })
}

/// Verbs a non-admin may use against the global scope.
const GLOBAL_READ_VERBS: &[&str] = &["Help", "List", "Get"];

/// Scope-level check done once per line, before the verb runs.
///
/// Scopes owned by another user require admin. The global scope is readable
/// by everyone and writable only by admins.
pub fn authorize_scope(principal: &Principal, handle: &ScopeHandle, verb: &str) -> bool {
    if principal.is_admin {
        return true;
    }
    match handle.owner() {
        Some(owner) => owner == principal.name,
        None => GLOBAL_READ_VERBS
            .iter()
            .any(|v| v.eq_ignore_ascii_case(verb)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(admin: bool, deny_bind_host: bool) -> Principal {
        Principal {
            name: "alice".to_string(),
            is_admin: admin,
            denies_bind_host_change: deny_bind_host,
            denies_module_load: false,
        }
    }

    #[test]
    fn unflagged_variables_are_open() {
        assert!(authorize(&principal(false, true), &[]));
    }

    #[test]
    fn admin_flag_requires_admin() {
        let flags = [Permission::RequiresAdmin];
        assert!(!authorize(&principal(false, false), &flags));
        assert!(authorize(&principal(true, false), &flags));
    }

    #[test]
    fn bind_host_policy_has_admin_bypass() {
        let flags = [Permission::RequiresBindHostPolicy];
        assert!(authorize(&principal(false, false), &flags));
        assert!(!authorize(&principal(false, true), &flags));
        assert!(authorize(&principal(true, true), &flags));
    }

    #[test]
    fn bind_host_policy_follows_target_user() {
        let mut target = User::new("bob");
        target.deny_set_bind_host = true;
        let flags = [Permission::RequiresBindHostPolicy];
        assert!(!authorize(&principal(false, false).acting_on(&target), &flags));
        assert!(authorize(&principal(true, false).acting_on(&target), &flags));
        target.deny_set_bind_host = false;
        assert!(authorize(&principal(false, true).acting_on(&target), &flags));
    }

    #[test]
    fn foreign_scopes_require_admin() {
        let bob = ScopeHandle::User("bob".to_string());
        let own = ScopeHandle::network("alice", "freenode");
        assert!(!authorize_scope(&principal(false, false), &bob, "Get"));
        assert!(authorize_scope(&principal(false, false), &own, "Set"));
        assert!(authorize_scope(&principal(true, false), &bob, "Set"));
    }

    #[test]
    fn global_scope_is_read_only_for_users() {
        let user = principal(false, false);
        assert!(authorize_scope(&user, &ScopeHandle::Global, "get"));
        assert!(authorize_scope(&user, &ScopeHandle::Global, "HELP"));
        assert!(!authorize_scope(&user, &ScopeHandle::Global, "Set"));
        assert!(!authorize_scope(&user, &ScopeHandle::Global, "AddUser"));
        assert!(authorize_scope(&principal(true, false), &ScopeHandle::Global, "Set"));
    }
}
