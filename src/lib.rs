#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod curriculum;
pub mod kv_store;
pub mod lesson_card;
pub mod logging;
pub mod platform;
pub mod progress;
pub mod render;
pub mod scroll_spy;
pub mod shell;
pub mod view;
