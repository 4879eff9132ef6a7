//! Per-scope variable tables.

pub mod channel;
pub mod global;
pub mod network;
pub mod user;
