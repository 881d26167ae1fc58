pub mod app;
pub mod auth;
pub mod classes;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;
