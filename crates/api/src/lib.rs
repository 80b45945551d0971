//! BetterMe analysis relay server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! WebSocket session registry, background sweep) so integration tests and the
//! binary entrypoint can both access them.

pub mod app;
pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;
