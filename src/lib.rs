pub mod capture;
pub mod config;
pub mod server;
pub mod signal;
pub mod tracker;
pub mod vision;
