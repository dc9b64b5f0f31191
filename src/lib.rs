pub mod app_state;
pub mod bot;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod forum;
pub mod health;
pub mod posts;
pub mod search;
pub mod server;
pub mod summarize;
pub mod telemetry;
