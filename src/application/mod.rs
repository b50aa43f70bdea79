//! View models and services driving each screen over the remote API.

pub mod access;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod listing;
pub mod notice;
pub mod pagination;
pub mod reader;
pub mod repos;
pub mod selection;
pub mod session;

#[cfg(test)]
mod testing;
