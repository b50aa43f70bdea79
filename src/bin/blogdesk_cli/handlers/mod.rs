#![deny(clippy::all, clippy::pedantic)]

pub mod dashboard;
pub mod posts;
pub mod session;
