pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod scanner;
pub mod storage;
pub mod telegram;
pub mod utils;
