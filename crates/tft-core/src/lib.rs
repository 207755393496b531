//! Core types and trait definitions for the TFT match tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, the Riot client and the tracker all depend on it.

pub mod account;
pub mod api;
pub mod dto;
pub mod error;
pub mod list;
pub mod record;
pub mod store;
pub mod time;

pub use error::{Error, Result};
