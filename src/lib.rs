//! Client library for drafting, reviewing and publishing posts on a blog REST API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
