//! Domain vocabulary shared by every view: partitions, roles, routes and content rules.

pub mod access;
pub mod content;
pub mod error;
pub mod posts;
