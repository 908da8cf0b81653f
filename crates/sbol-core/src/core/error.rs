use super::models::ids::EntityKind;
use super::models::uri::UriError;
use thiserror::Error;

/// Errors raised synchronously by the mutating call that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid range: end coordinate {end} precedes start coordinate {start}")]
    InvalidRange { start: usize, end: usize },

    #[error("Invalid position {position}: coordinates are 1-based")]
    InvalidPosition { position: usize },

    #[error("Invalid strand '{value}': expected '+' or '-'")]
    InvalidStrand { value: String },

    #[error("{container} already contains a member equal to {member}")]
    DuplicateMember {
        container: EntityKind,
        member: String,
    },

    #[error("Symbol {symbol:?} at offset {offset} is not in the {alphabet} alphabet")]
    InvalidNucleotide {
        offset: usize,
        symbol: char,
        alphabet: &'static str,
    },

    #[error(
        "Invalid display id '{value}': use letters, digits and underscores, starting with a letter or underscore"
    )]
    InvalidDisplayId { value: String },

    #[error(transparent)]
    InvalidUri(#[from] UriError),

    #[error("A sequence annotation cannot precede itself")]
    SelfPrecedence,

    #[error("Precedes link would close a cycle among sequence annotations")]
    PrecedesCycle,

    #[error("Precedes link joins annotations owned by different components")]
    PrecedesAcrossComponents,

    #[error("Sequence annotation is already owned by another component")]
    AnnotationOwned,

    #[error("{kind} not found in document")]
    MissingEntity { kind: EntityKind },
}

impl ModelError {
    pub(crate) fn missing(kind: EntityKind) -> Self {
        ModelError::MissingEntity { kind }
    }
}
