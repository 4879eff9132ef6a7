//! Module catalog and per-scope module instances.
//!
//! Module code itself lives in the host; the console only tracks which
//! catalog entries are loaded at a scope and with which arguments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scope a module can be loaded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Global,
    User,
    Network,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Global => "Global",
            Self::User => "User",
            Self::Network => "Network",
        })
    }
}

/// A loadable module known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kinds: Vec<ModuleKind>,
}

impl ModuleInfo {
    pub fn supports(&self, kind: ModuleKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Look up a catalog entry by exact name.
pub fn find_module<'a>(catalog: &'a [ModuleInfo], name: &str) -> Result<&'a ModuleInfo, String> {
    catalog
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| format!("Unable to find module [{}]", name))
}

/// Modules loaded at one scope, keyed by name, valued by their arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadedModules(BTreeMap<String, String>);

impl LoadedModules {
    pub fn is_loaded(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn load(&mut self, info: &ModuleInfo, kind: ModuleKind, args: &str) -> Result<(), String> {
        if !info.supports(kind) {
            return Err(format!(
                "Module [{}] does not support module type [{}].",
                info.name, kind
            ));
        }
        if self.is_loaded(&info.name) {
            return Err(format!("Module [{}] already loaded.", info.name));
        }
        self.0.insert(info.name.clone(), args.to_string());
        Ok(())
    }

    pub fn reload(&mut self, name: &str, args: &str) -> Result<(), String> {
        match self.0.get_mut(name) {
            Some(current) => {
                *current = args.to_string();
                Ok(())
            }
            None => Err(format!("Module [{}] not loaded.", name)),
        }
    }

    pub fn unload(&mut self, name: &str) -> Result<(), String> {
        self.0
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| format!("Module [{}] not loaded.", name))
    }

    /// Loaded modules and their arguments, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, args)| (name.as_str(), args.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_module() -> ModuleInfo {
        ModuleInfo {
            name: "log".to_string(),
            description: "Writes IRC logs.".to_string(),
            kinds: vec![ModuleKind::User, ModuleKind::Network],
        }
    }

    #[test]
    fn load_rejects_unsupported_kind() {
        let mut mods = LoadedModules::default();
        let err = mods.load(&log_module(), ModuleKind::Global, "").unwrap_err();
        assert_eq!(err, "Module [log] does not support module type [Global].");
        assert!(mods.is_empty());
    }

    #[test]
    fn load_twice_fails() {
        let mut mods = LoadedModules::default();
        mods.load(&log_module(), ModuleKind::User, "-sanitize").unwrap();
        assert!(mods.load(&log_module(), ModuleKind::User, "").is_err());
        assert_eq!(mods.len(), 1);
    }

    #[test]
    fn unload_requires_loaded_module() {
        let mut mods = LoadedModules::default();
        assert_eq!(mods.unload("log").unwrap_err(), "Module [log] not loaded.");
    }

    #[test]
    fn unknown_module_is_reported() {
        let catalog = vec![log_module()];
        assert!(find_module(&catalog, "log").is_ok());
        assert_eq!(
            find_module(&catalog, "perform").unwrap_err(),
            "Unable to find module [perform]"
        );
    }
}
