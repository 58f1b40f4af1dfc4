//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A required credential is missing; no network call was attempted.
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Categories of errors that can occur while checking a domain.
///
/// These categorize actual failures; "no listing found" is a normal
/// outcome and is not counted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/network errors against the Places API
    PlacesRequestTimeout,
    PlacesRequestConnectError,
    PlacesRequestStatusError,
    PlacesRequestTooManyRequests,
    PlacesResponseDecodeError,
    PlacesRequestOtherError,
    // Enrichment providers (soft failures, but still tracked)
    DataForSeoError,
    AhrefsError,
    // Storage
    CacheReadError,
    CacheWriteError,
    // Orchestration
    DomainProcessingTimeout,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::PlacesRequestTimeout => "Places request timeout",
            ErrorType::PlacesRequestConnectError => "Places connect error",
            ErrorType::PlacesRequestStatusError => "Places HTTP status error",
            ErrorType::PlacesRequestTooManyRequests => "Places rate limited (429)",
            ErrorType::PlacesResponseDecodeError => "Places response decode error",
            ErrorType::PlacesRequestOtherError => "Places other error",
            ErrorType::DataForSeoError => "DataForSEO error",
            ErrorType::AhrefsError => "Ahrefs error",
            ErrorType::CacheReadError => "Cache read error",
            ErrorType::CacheWriteError => "Cache write error",
            ErrorType::DomainProcessingTimeout => "Domain processing timeout",
        }
    }
}
