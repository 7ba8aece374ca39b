//! Tablescrape host process: HTTP endpoint, interactive client and their wiring.
pub mod client;
pub mod config;
pub mod logging;
pub mod server;
