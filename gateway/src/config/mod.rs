mod env_helper;
mod local_config;

pub use local_config::*;
