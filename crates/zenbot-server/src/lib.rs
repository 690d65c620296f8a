//! HTTP surface of ZenBot.

pub mod bootstrap;
pub mod routes;
pub mod server;

pub use server::{AppState, router, run};
