//! Realtime chat backend.
//!
//! Persists chat messages over a REST API and pushes every created, edited
//! or deleted message to the WebSocket listeners of its chat room.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
