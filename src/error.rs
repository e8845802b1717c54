// src/error.rs
//! Error types for the NMEA decoder

use std::fmt;

pub type Result<T> = std::result::Result<T, NmeaError>;

#[derive(Debug)]
pub enum NmeaError {
    /// Scanner matched fewer/more fields than the sentence type requires
    FieldCount(String),
    /// A field decoded but fell outside its allowed value set
    Enumeration(String),
    /// Time sub-string length matched no recognized format
    TimeFormat(String),
    /// General parse failure
    Parse(String),
    Other(String),
}

impl fmt::Display for NmeaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NmeaError::FieldCount(msg) => write!(f, "Field count error: {}", msg),
            NmeaError::Enumeration(msg) => write!(f, "Enumeration error: {}", msg),
            NmeaError::TimeFormat(msg) => write!(f, "Time format error: {}", msg),
            NmeaError::Parse(msg) => write!(f, "Parse error: {}", msg),
            NmeaError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for NmeaError {}

impl From<anyhow::Error> for NmeaError {
    fn from(error: anyhow::Error) -> Self {
        NmeaError::Other(error.to_string())
    }
}
