pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod storage;
pub mod sync;
