use thiserror::Error;

use crate::config::ConfigError;
use crate::event_bus::EventError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Event error: {0}")]
    Event(#[from] EventError),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BotResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
