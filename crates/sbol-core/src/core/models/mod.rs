//! # Core Models Module
//!
//! Data structures for the SBOL core object model: DNA sequences, DNA
//! components, sequence annotations and collections, held together in an
//! [`SbolDocument`](document::SbolDocument) arena.
//!
//! ## Key Components
//!
//! - [`sequence`] - Nucleotide text of a component
//! - [`component`] - Named DNA segments with ontology types and annotations
//! - [`annotation`] - Positioned, stranded features and the precedes relation
//! - [`collection`] - User-defined groups of components
//! - [`document`] - The arena and every relation-changing operation
//! - [`equality`] - Value equality and fingerprints over the arena
//! - [`builder`] - String-keyed construction of whole documents
//! - [`ids`] - Arena keys for each entity kind
//! - [`uri`] - Validated identity URIs
//!
//! ## Usage
//!
//! ```ignore
//! use sbol::core::models::{
//!     annotation::{SequenceAnnotation, Strand},
//!     component::DnaComponent,
//!     document::SbolDocument,
//!     sequence::DnaSequence,
//! };
//!
//! let mut doc = SbolDocument::new();
//! let part = doc.insert_component(DnaComponent::new("BBa_R0010").with_name("pLac"))?;
//! let seq = doc.insert_sequence(DnaSequence::new("caatacgcaaaccgcctctcc"))?;
//! doc.set_dna_sequence(part, Some(seq))?;
//!
//! let site = doc.insert_annotation(SequenceAnnotation::located(10, 20, Strand::Forward)?)?;
//! doc.add_annotation(part, site)?;
//! ```

pub mod annotation;
pub mod builder;
pub mod collection;
pub mod component;
pub mod document;
pub mod equality;
pub mod ids;
pub mod sequence;
pub mod uri;
