pub mod alerts;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod store;
pub mod util;
