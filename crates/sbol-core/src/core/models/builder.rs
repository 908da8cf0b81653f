use super::annotation::SequenceAnnotation;
use super::collection::Collection;
use super::component::DnaComponent;
use super::document::SbolDocument;
use super::ids::{AnnotationId, CollectionId, ComponentId, EntityKind, SequenceId};
use super::sequence::DnaSequence;
use super::uri::Uri;
use crate::core::error::ModelError;
use crate::core::policy::ModelPolicy;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Unknown {kind} key '{key}'")]
    UnknownKey { kind: EntityKind, key: String },
    #[error("{kind} key '{key}' is defined more than once")]
    DuplicateKey { kind: EntityKind, key: String },
    #[error("{kind} has no display id to register it under")]
    MissingKey { kind: EntityKind },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Assembles an [`SbolDocument`] from entities named by string keys.
///
/// Sequences and annotations are keyed by caller-chosen names; components
/// and collections by their display ids. Every reference must name an entity
/// registered earlier, so callers register in dependency order: sequences,
/// components, annotations, then the links between them. Annotations are
/// best attached to their components last, once their own links are in
/// place, since those links are part of their value.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: SbolDocument,
    sequence_map: HashMap<String, SequenceId>,
    component_map: HashMap<String, ComponentId>,
    annotation_map: HashMap<String, AnnotationId>,
    collection_map: HashMap<String, CollectionId>,
}

impl DocumentBuilder {
    pub fn new(policy: ModelPolicy) -> Self {
        Self {
            doc: SbolDocument::with_policy(policy),
            ..Self::default()
        }
    }

    pub fn sequence(
        &mut self,
        key: &str,
        sequence: DnaSequence,
    ) -> Result<SequenceId, BuildError> {
        ensure_vacant(&self.sequence_map, EntityKind::Sequence, key)?;
        let id = self.doc.insert_sequence(sequence)?;
        self.sequence_map.insert(key.to_string(), id);
        Ok(id)
    }

    /// Registers a component under its display id, optionally pointing it
    /// at a previously registered sequence.
    pub fn component(
        &mut self,
        component: DnaComponent,
        sequence_key: Option<&str>,
    ) -> Result<ComponentId, BuildError> {
        let key = component
            .display_id
            .clone()
            .ok_or(BuildError::MissingKey {
                kind: EntityKind::Component,
            })?;
        ensure_vacant(&self.component_map, EntityKind::Component, &key)?;
        let sequence = sequence_key
            .map(|k| lookup(&self.sequence_map, EntityKind::Sequence, k))
            .transpose()?;

        let id = self.doc.insert_component(component)?;
        self.doc.set_dna_sequence(id, sequence)?;
        self.component_map.insert(key, id);
        Ok(id)
    }

    pub fn component_type(&mut self, component_key: &str, uri: &str) -> Result<bool, BuildError> {
        let component = lookup(&self.component_map, EntityKind::Component, component_key)?;
        let uri = Uri::new(uri).map_err(ModelError::from)?;
        Ok(self.doc.add_type(component, uri)?)
    }

    /// Registers an annotation and adds it to the annotation set of a
    /// component in one step.
    ///
    /// The annotation is compared with the component's members as it is
    /// now, so features and precedes links attached later take no part in
    /// the duplicate check. Use [`register_annotation`](Self::register_annotation)
    /// and [`attach_annotation`](Self::attach_annotation) when those links
    /// should count.
    pub fn annotation(
        &mut self,
        component_key: &str,
        key: &str,
        annotation: SequenceAnnotation,
    ) -> Result<AnnotationId, BuildError> {
        lookup(&self.component_map, EntityKind::Component, component_key)?;
        self.register_annotation(key, annotation)?;
        self.attach_annotation(component_key, key)
    }

    /// Stores an annotation under `key` without giving it an owner.
    pub fn register_annotation(
        &mut self,
        key: &str,
        annotation: SequenceAnnotation,
    ) -> Result<AnnotationId, BuildError> {
        ensure_vacant(&self.annotation_map, EntityKind::Annotation, key)?;
        let id = self.doc.insert_annotation(annotation)?;
        self.annotation_map.insert(key.to_string(), id);
        Ok(id)
    }

    /// Adds a registered annotation to the annotation set of a component.
    ///
    /// When the component already holds a value-equal annotation and the
    /// policy ignores duplicates, the key is rebound to that existing member
    /// and the registered annotation stays unowned.
    pub fn attach_annotation(
        &mut self,
        component_key: &str,
        key: &str,
    ) -> Result<AnnotationId, BuildError> {
        let component = lookup(&self.component_map, EntityKind::Component, component_key)?;
        let id = lookup(&self.annotation_map, EntityKind::Annotation, key)?;

        if self.doc.add_annotation(component, id)? {
            return Ok(id);
        }
        let bound = self.equal_member(component, id).unwrap_or(id);
        if bound != id {
            debug!(key, component = component_key, "Annotation key bound to an equal member");
            self.annotation_map.insert(key.to_string(), bound);
        }
        Ok(bound)
    }

    /// Locates a registered component at a registered annotation.
    pub fn feature(
        &mut self,
        annotation_key: &str,
        component_key: &str,
    ) -> Result<bool, BuildError> {
        let annotation = lookup(&self.annotation_map, EntityKind::Annotation, annotation_key)?;
        let component = lookup(&self.component_map, EntityKind::Component, component_key)?;
        Ok(self.doc.add_feature(annotation, component)?)
    }

    pub fn precede(&mut self, from_key: &str, to_key: &str) -> Result<bool, BuildError> {
        let from = lookup(&self.annotation_map, EntityKind::Annotation, from_key)?;
        let to = lookup(&self.annotation_map, EntityKind::Annotation, to_key)?;
        Ok(self.doc.add_precede(from, to)?)
    }

    pub fn collection(&mut self, collection: Collection) -> Result<CollectionId, BuildError> {
        let key = collection
            .display_id
            .clone()
            .ok_or(BuildError::MissingKey {
                kind: EntityKind::Collection,
            })?;
        ensure_vacant(&self.collection_map, EntityKind::Collection, &key)?;
        let id = self.doc.insert_collection(collection)?;
        self.collection_map.insert(key, id);
        Ok(id)
    }

    pub fn member(
        &mut self,
        collection_key: &str,
        component_key: &str,
    ) -> Result<bool, BuildError> {
        let collection = lookup(&self.collection_map, EntityKind::Collection, collection_key)?;
        let component = lookup(&self.component_map, EntityKind::Component, component_key)?;
        Ok(self.doc.add_component(collection, component)?)
    }

    pub fn annotation_id(&self, key: &str) -> Option<AnnotationId> {
        self.annotation_map.get(key).copied()
    }

    pub fn document(&self) -> &SbolDocument {
        &self.doc
    }

    pub fn build(self) -> SbolDocument {
        self.doc
    }

    fn equal_member(
        &self,
        component: ComponentId,
        annotation: AnnotationId,
    ) -> Option<AnnotationId> {
        self.doc
            .component(component)?
            .annotations()
            .iter()
            .copied()
            .find(|&existing| self.doc.annotations_equal(existing, annotation))
    }
}

fn ensure_vacant<V>(
    map: &HashMap<String, V>,
    kind: EntityKind,
    key: &str,
) -> Result<(), BuildError> {
    if map.contains_key(key) {
        return Err(BuildError::DuplicateKey {
            kind,
            key: key.to_string(),
        });
    }
    Ok(())
}

fn lookup<V: Copy>(
    map: &HashMap<String, V>,
    kind: EntityKind,
    key: &str,
) -> Result<V, BuildError> {
    map.get(key).copied().ok_or_else(|| BuildError::UnknownKey {
        kind,
        key: key.to_string(),
    })
}
