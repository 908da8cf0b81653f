use super::ids::{AnnotationId, SequenceId};
use super::uri::Uri;

/// A named, engineerable DNA segment (promoter, coding sequence, plasmid...).
///
/// Descriptive metadata is public. The set-valued relations are private and
/// only grow through [`SbolDocument`](super::document::SbolDocument), which
/// enforces the dedupe-on-add rule; readers get slices. Value equality
/// needs the referenced entities, so it lives on the document too.
#[derive(Debug, Clone, Default)]
pub struct DnaComponent {
    pub uri: Option<Uri>,
    pub display_id: Option<String>, // Identifier shown to users (e.g. "BBa_R0010")
    pub name: Option<String>,       // Common name, often ambiguous (e.g. "pLac-O1")
    pub description: Option<String>,
    pub is_circular: bool,
    types: Vec<Uri>,                           // Sequence Ontology terms, unique
    pub(crate) sequence: Option<SequenceId>,   // Shared, may be reused by other components
    pub(crate) annotations: Vec<AnnotationId>, // Owned annotations, value-distinct
}

impl DnaComponent {
    pub fn new(display_id: &str) -> Self {
        Self {
            display_id: Some(display_id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn circular(mut self, is_circular: bool) -> Self {
        self.is_circular = is_circular;
        self
    }

    pub fn types(&self) -> &[Uri] {
        &self.types
    }

    pub fn has_type(&self, uri: &Uri) -> bool {
        self.types.contains(uri)
    }

    /// Adds an ontology term. Returns `false` if the term was already present.
    pub fn add_type(&mut self, uri: Uri) -> bool {
        if self.has_type(&uri) {
            return false;
        }
        self.types.push(uri);
        true
    }

    pub fn dna_sequence(&self) -> Option<SequenceId> {
        self.sequence
    }

    pub fn annotations(&self) -> &[AnnotationId] {
        &self.annotations
    }

    /// The display id, or a placeholder for messages.
    pub(crate) fn label(&self) -> String {
        self.display_id
            .clone()
            .unwrap_or_else(|| String::from("<unnamed component>"))
    }
}
