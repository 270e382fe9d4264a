//! # tiller-ticket
//!
//! Sale document rendering - turns a completed sale into a printable PDF.
//!
//! ## Scope
//!
//! This crate handles HOW to lay out a document:
//! - Fixed-width receipt composition (80mm thermal roll)
//! - Full-page invoice composition (A4)
//! - PDF emission with builtin fonts
//!
//! Business logic (WHAT is on the ticket) stays in application code:
//! the server loads the sale, its lines and the store profile, and hands
//! a [`TicketData`] to [`render`].
//!
//! ## Example
//!
//! ```ignore
//! use tiller_ticket::{render, TicketData, TicketFormat};
//!
//! let pdf: Vec<u8> = render(&data, TicketFormat::Thermal)?;
//! ```

mod error;
mod invoice;
mod layout;
mod pdf;
mod thermal;
mod types;

// Re-exports
pub use error::{TicketError, TicketResult};
pub use types::{StoreProfile, TicketData, TicketFormat, TicketLine, TicketSale};

/// Render a sale into PDF bytes using the requested layout.
pub fn render(data: &TicketData, format: TicketFormat) -> TicketResult<Vec<u8>> {
    match format {
        TicketFormat::Thermal => thermal::ThermalRenderer::new().render(data),
        TicketFormat::Invoice => invoice::InvoiceRenderer::new().render(data),
    }
}
