//! Request handling: dispatch and static file resolution.

pub mod router;
pub mod static_files;

pub use router::handle_request;
