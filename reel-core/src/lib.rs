//! Reel Core
//!
//! Core types for the Reel video job workflow.
//!
//! This crate contains:
//! - Domain types: jobs as reported by the remote job API (status, outputs)
//! - DTOs: request and response bodies exchanged with the job API

pub mod domain;
pub mod dto;
