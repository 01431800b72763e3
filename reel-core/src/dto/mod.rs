//! Data Transfer Objects for the job API
//!
//! Request bodies sent to the push endpoint and the minimal response
//! shapes read back from it.

pub mod job;
