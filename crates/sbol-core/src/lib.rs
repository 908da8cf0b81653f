//! # SBOL Core Library
//!
//! An in-memory model of the Synthetic Biology Open Language core: DNA
//! components, their nucleotide sequences, positioned sequence annotations
//! and collections of components.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Entity types, the
//!   [`SbolDocument`](core::models::document::SbolDocument) arena that owns
//!   them, value equality, and the [`ModelPolicy`](core::policy::ModelPolicy)
//!   switches that decide how strictly each invariant is enforced.
//!
//! - **[`analysis`]: Whole-document passes.** Precedes-graph queries (cycle
//!   detection, ordering) and a validation pass that reports problems the
//!   mutating operations do not reject on their own.

pub mod analysis;
pub mod core;
