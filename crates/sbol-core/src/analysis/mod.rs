//! Read-only passes over a complete [`SbolDocument`](crate::core::models::document::SbolDocument).
//!
//! - [`precedes`] - Queries over the precedes graph between annotations
//! - [`validation`] - Document-wide consistency report

pub mod precedes;
pub mod validation;
