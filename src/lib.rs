#![doc = include_str!("../README.md")]
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod indicator;
pub mod logging;
pub mod pulse;
pub mod trigger;
