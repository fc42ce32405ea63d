pub mod config;

pub use config::{StyleConfig, StyleOverrides, CONFIG_ENV};
