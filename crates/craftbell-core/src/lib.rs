pub mod config;
pub mod dispatch;
pub mod error;
pub mod instance;
pub mod message;
pub mod startup;
pub mod webhook;

pub use error::{BotError, Result};
