//! Server plumbing: listener construction and shutdown signals.

pub mod listener;
pub mod signal;

pub use listener::{bind, BindError};
