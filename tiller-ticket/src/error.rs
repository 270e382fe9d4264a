//! Error types for the ticket rendering library

use thiserror::Error;

/// Ticket rendering error types
#[derive(Debug, Error)]
pub enum TicketError {
    /// PDF backend error (font registration, byte emission)
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The sale has no printable content
    #[error("Empty ticket: {0}")]
    Empty(String),
}

/// Result type for ticket operations
pub type TicketResult<T> = Result<T, TicketError>;
