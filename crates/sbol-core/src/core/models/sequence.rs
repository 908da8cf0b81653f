use super::uri::Uri;
use std::hash::{Hash, Hasher};

/// The nucleotide text of a DNA component.
///
/// Text is stored verbatim: no case folding and no trimming. Alphabet
/// checks are applied by the owning document, which knows the active
/// [`NucleotidePolicy`](crate::core::policy::NucleotidePolicy).
///
/// Two sequences are equal when their nucleotide text is equal; the
/// identity URI does not take part in equality or hashing.
#[derive(Debug, Clone, Default)]
pub struct DnaSequence {
    pub uri: Option<Uri>,
    nucleotides: String,
}

impl DnaSequence {
    pub fn new(nucleotides: impl Into<String>) -> Self {
        Self {
            uri: None,
            nucleotides: nucleotides.into(),
        }
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn nucleotides(&self) -> &str {
        &self.nucleotides
    }

    /// Replaces the text. Sequences already inside a document are changed
    /// through `SbolDocument::set_nucleotides`, which checks the alphabet.
    pub fn set_nucleotides(&mut self, nucleotides: impl Into<String>) {
        self.nucleotides = nucleotides.into();
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.nucleotides.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.nucleotides.is_empty()
    }
}

impl PartialEq for DnaSequence {
    fn eq(&self, other: &Self) -> bool {
        self.nucleotides == other.nucleotides
    }
}

impl Eq for DnaSequence {}

impl Hash for DnaSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nucleotides.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stores_text_verbatim() {
        let seq = DnaSequence::new("acgtNNac");
        assert_eq!(seq.nucleotides(), "acgtNNac");
        assert_eq!(seq.len(), 8);
        assert!(!seq.is_empty());
    }

    #[test]
    fn set_nucleotides_overwrites() {
        let mut seq = DnaSequence::new("AAAA");
        seq.set_nucleotides("ACGT");
        assert_eq!(seq.nucleotides(), "ACGT");
    }

    #[test]
    fn default_sequence_is_empty() {
        let seq = DnaSequence::default();
        assert!(seq.is_empty());
        assert!(seq.uri.is_none());
    }

    #[test]
    fn equality_ignores_identity() {
        let a = DnaSequence::new("ACGT").with_uri(Uri::new("https://example.org/seq/1").unwrap());
        let b = DnaSequence::new("ACGT");
        assert_eq!(a, b);
        assert_ne!(a, DnaSequence::new("acgt"));
    }

    #[test]
    fn hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(DnaSequence::new("ACGT").with_uri(Uri::new("https://example.org/a").unwrap()));
        set.insert(DnaSequence::new("ACGT"));
        set.insert(DnaSequence::new("TTTT"));
        assert_eq!(set.len(), 2);
    }
}
