// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod model;
pub mod specs;

pub mod csv;
pub mod file;
pub mod gui;
pub mod pipeline;
pub mod progress;
pub mod runner;
pub mod session;
pub mod stats;
pub mod store;
