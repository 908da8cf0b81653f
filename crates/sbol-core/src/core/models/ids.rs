use slotmap::new_key_type;

new_key_type! {
    pub struct SequenceId;
    pub struct ComponentId;
    pub struct AnnotationId;
    pub struct CollectionId;
}

/// The kind of entity an arena id points at, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Sequence,
    Component,
    Annotation,
    Collection,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntityKind::Sequence => "DnaSequence",
                EntityKind::Component => "DnaComponent",
                EntityKind::Annotation => "SequenceAnnotation",
                EntityKind::Collection => "Collection",
            }
        )
    }
}
