// src/gui/components/mod.rs
pub mod export_bar;
pub mod history_table;
pub mod run_bar;
