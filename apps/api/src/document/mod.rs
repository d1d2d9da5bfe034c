//! The resume document: sanitizing untrusted input, the edit reducer, and the
//! live session that owns the current copy.

pub mod edit;
pub mod handlers;
pub mod sanitize;
pub mod session;
