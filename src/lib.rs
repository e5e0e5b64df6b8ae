pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod mime;
pub mod types;
