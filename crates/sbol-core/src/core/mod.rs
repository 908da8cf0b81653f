//! # Core Module
//!
//! The SBOL entities and the rules that keep them consistent.
//!
//! - **Entities** ([`models`]) - Sequences, components, annotations, collections and the
//!   document arena
//! - **Alphabets** ([`alphabet`]) - Nucleotide symbol sets used to check sequence text
//! - **Policy** ([`policy`]) - Switches that select how strictly invariants are enforced
//! - **Errors** ([`error`]) - Failures reported by mutating operations

pub mod alphabet;
pub mod error;
pub mod models;
pub mod policy;
