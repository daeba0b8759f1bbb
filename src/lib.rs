pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod shell;
pub mod state;
pub mod view;
