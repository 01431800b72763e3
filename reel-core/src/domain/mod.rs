//! Core domain types
//!
//! These types describe a remote job as the status endpoint reports it.
//! They are shared between the client (which fetches them) and the CLI
//! (which displays them).

pub mod job;
