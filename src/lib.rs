pub mod clipboard;
pub mod commands;
pub mod config;
pub mod editor;
pub mod errors;
pub mod export;
pub mod import;
pub mod storage;
