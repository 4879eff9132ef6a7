//! Variable descriptors and value canonicalization.

use super::permission::{Permission, Principal};
use super::scope::Inherited;
use super::store::NvStore;
use std::fmt;
use std::str::FromStr;

/// Declared value type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    String,
    Boolean,
    Integer,
    Double,
    /// Newline-joined; `Set` appends.
    List,
}

impl VarType {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Double => "Double",
            Self::List => "List",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit inputs available to every descriptor closure.
pub struct VarContext<'a> {
    pub principal: &'a Principal,
    /// Playback buffer ceiling for non-admins.
    pub max_buffer_size: u32,
    /// Defaults the scope inherits from its owning user.
    pub inherited: Inherited,
    /// The console's own persisted settings.
    pub store: &'a mut dyn NvStore,
}

impl VarContext<'_> {
    /// Enforce the buffer ceiling unless the principal is an admin.
    pub fn check_buffer_limit(&self, size: u32) -> Result<(), String> {
        if !self.principal.is_admin && size > self.max_buffer_size {
            return Err(format!("exceeded limit {}", self.max_buffer_size));
        }
        Ok(())
    }
}

pub type Getter<S> = fn(&S, &VarContext<'_>) -> String;
pub type Setter<S> = fn(&mut S, &str, &mut VarContext<'_>) -> Result<(), String>;
pub type Resetter<S> = fn(&mut S, &mut VarContext<'_>) -> Result<(), String>;

/// A named setting of scope type `S`.
pub struct Variable<S> {
    pub name: &'static str,
    pub ty: VarType,
    pub permissions: &'static [Permission],
    pub description: &'static str,
    pub get: Getter<S>,
    pub set: Setter<S>,
    /// `None` when the variable has no documented default.
    pub reset: Option<Resetter<S>>,
}

impl<S> Variable<S> {
    /// `Name (Type)` as shown by `List`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.ty)
    }
}

/// Lenient boolean parsing: empty, `false`, `off`, `no`, `n` and `0` are false.
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || ["false", "off", "no", "n", "0"]
            .iter()
            .any(|f| value.eq_ignore_ascii_case(f)))
}

pub fn format_bool(value: bool) -> String {
    String::from(if value { "true" } else { "false" })
}

/// Strict integer parsing.
pub fn parse_int<T: FromStr>(value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid integer '{}'", value.trim()))
}

pub fn parse_double(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid number '{}'", value.trim()))
}

pub fn format_double(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn join_lines<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_parse_leniently() {
        for value in ["", "false", "OFF", "no", "n", "0"] {
            assert!(!parse_bool(value), "{value:?} should be false");
        }
        for value in ["true", "yes", "1", "on", "anything"] {
            assert!(parse_bool(value), "{value:?} should be true");
        }
    }

    #[test]
    fn integers_parse_strictly() {
        assert_eq!(parse_int::<u32>(" 42 "), Ok(42));
        assert_eq!(
            parse_int::<u32>("lots"),
            Err("invalid integer 'lots'".to_string())
        );
        assert!(parse_int::<u32>("-1").is_err());
    }

    #[test]
    fn doubles_render_with_two_decimals() {
        assert_eq!(format_double(parse_double("1").unwrap()), "1.00");
        assert_eq!(format_double(parse_double("0.333").unwrap()), "0.33");
        assert!(parse_double("NaN").is_err());
        assert!(parse_double("fast").is_err());
    }

    #[test]
    fn type_names_match_list_filters() {
        assert_eq!(VarType::Integer.to_string(), "Integer");
        assert_eq!(VarType::Boolean.name(), "Boolean");
    }
}
