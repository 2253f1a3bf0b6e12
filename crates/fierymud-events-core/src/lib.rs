//! Shared abstractions for the FieryMUD event relay.
//!
//! This crate defines the game event model, the category → channel routing
//! table, publisher configuration and the `Transport` trait that broker
//! implementations provide. It contains no infrastructure code.

pub mod category;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod transport;
