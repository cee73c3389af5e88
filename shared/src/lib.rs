// shared/src/lib.rs

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value '{value}' for {var}")]
    InvalidVar { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
