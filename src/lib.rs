pub mod config;
pub mod error;
pub mod models;
pub mod token_store;
pub mod client;
pub mod api;
pub mod session;
pub mod routes;
pub mod cli;
