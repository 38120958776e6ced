pub mod api;
pub mod blockchain_manager;
pub mod config;
pub mod errors;
pub mod models;
pub mod quote_service;
pub mod read_service;
pub mod state_cache;
pub mod state_refresher;
pub mod tx_builder;
pub mod utils;
