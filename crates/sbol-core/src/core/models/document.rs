use super::annotation::SequenceAnnotation;
use super::collection::Collection;
use super::component::DnaComponent;
use super::ids::{AnnotationId, CollectionId, ComponentId, EntityKind, SequenceId};
use super::sequence::DnaSequence;
use super::uri::Uri;
use crate::core::error::ModelError;
use crate::core::policy::{DuplicatePolicy, ModelPolicy, is_valid_display_id};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Arena holding every SBOL entity of one design.
///
/// Entities refer to each other by id, so a sequence can be shared by many
/// components and a component can sit in many collections without shared
/// mutable ownership. The precedes relation between annotations is an
/// adjacency list over [`AnnotationId`]s and may contain cycles.
///
/// Every set-valued relation is grown through a method of this type, which
/// applies the dedupe-on-add rule and the checks selected by the
/// [`ModelPolicy`]. Readers only ever see slices.
#[derive(Debug, Clone, Default)]
pub struct SbolDocument {
    policy: ModelPolicy,
    sequences: SlotMap<SequenceId, DnaSequence>,
    components: SlotMap<ComponentId, DnaComponent>,
    annotations: SlotMap<AnnotationId, SequenceAnnotation>,
    collections: SlotMap<CollectionId, Collection>,
    /// Reverse precedes edges, indexed by the successor annotation.
    predecessors: SecondaryMap<AnnotationId, Vec<AnnotationId>>,
}

impl SbolDocument {
    /// Creates an empty document with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document that enforces `policy`.
    pub fn with_policy(policy: ModelPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &ModelPolicy {
        &self.policy
    }

    // --- Lookup ---

    pub fn sequence(&self, id: SequenceId) -> Option<&DnaSequence> {
        self.sequences.get(id)
    }

    pub fn sequences_iter(&self) -> impl Iterator<Item = (SequenceId, &DnaSequence)> {
        self.sequences.iter()
    }

    pub fn component(&self, id: ComponentId) -> Option<&DnaComponent> {
        self.components.get(id)
    }

    /// Mutable access to a component's metadata. Set-valued relations are
    /// not reachable through the returned reference, but edits can make
    /// the component value-equal to another member of a set it belongs to;
    /// [`validate`](crate::analysis::validation::validate) reports such
    /// pairs.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut DnaComponent> {
        self.components.get_mut(id)
    }

    pub fn components_iter(&self) -> impl Iterator<Item = (ComponentId, &DnaComponent)> {
        self.components.iter()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&SequenceAnnotation> {
        self.annotations.get(id)
    }

    /// Mutable access to an annotation's coordinates and strand; the
    /// setters keep validating the range. Moving an annotation onto the
    /// location of a sibling is not refused here and shows up as a
    /// duplicate member in validation.
    pub fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut SequenceAnnotation> {
        self.annotations.get_mut(id)
    }

    pub fn annotations_iter(&self) -> impl Iterator<Item = (AnnotationId, &SequenceAnnotation)> {
        self.annotations.iter()
    }

    pub fn collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn collection_mut(&mut self, id: CollectionId) -> Option<&mut Collection> {
        self.collections.get_mut(id)
    }

    pub fn collections_iter(&self) -> impl Iterator<Item = (CollectionId, &Collection)> {
        self.collections.iter()
    }

    /// Finds the first component with the given display id.
    pub fn find_component_by_display_id(&self, display_id: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|(_, c)| c.display_id.as_deref() == Some(display_id))
            .map(|(id, _)| id)
    }

    /// Finds the first collection with the given display id.
    pub fn find_collection_by_display_id(&self, display_id: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|(_, c)| c.display_id.as_deref() == Some(display_id))
            .map(|(id, _)| id)
    }

    /// Annotations that list `id` in their precedes set.
    pub fn predecessors(&self, id: AnnotationId) -> Option<&[AnnotationId]> {
        self.predecessors.get(id).map(|v| v.as_slice())
    }

    // --- Insertion ---

    /// Stores a sequence after checking its text against the active
    /// nucleotide policy.
    pub fn insert_sequence(&mut self, sequence: DnaSequence) -> Result<SequenceId, ModelError> {
        self.policy.nucleotides.check(sequence.nucleotides())?;
        let id = self.sequences.insert(sequence);
        trace!(?id, "Inserted DnaSequence");
        Ok(id)
    }

    /// Stores a component.
    ///
    /// A component cloned out of a document keeps its relation ids; they are
    /// checked here, and annotations already owned elsewhere are refused.
    pub fn insert_component(
        &mut self,
        mut component: DnaComponent,
    ) -> Result<ComponentId, ModelError> {
        self.check_display_id(component.display_id.as_deref())?;
        if let Some(sequence) = component.sequence {
            self.require_sequence(sequence)?;
        }
        let annotations = std::mem::take(&mut component.annotations);
        for &annotation in &annotations {
            if self.require_annotation(annotation)?.owner.is_some() {
                return Err(ModelError::AnnotationOwned);
            }
        }

        let id = self.components.insert(component);
        for annotation in annotations {
            self.add_annotation(id, annotation)?;
        }
        trace!(?id, "Inserted DnaComponent");
        Ok(id)
    }

    /// Stores an annotation. Its owner is set later by
    /// [`add_annotation`](Self::add_annotation).
    pub fn insert_annotation(
        &mut self,
        mut annotation: SequenceAnnotation,
    ) -> Result<AnnotationId, ModelError> {
        for &component in &annotation.sub_components {
            self.require_component(component)?;
        }
        for &successor in &annotation.precedes {
            self.require_annotation(successor)?;
        }
        annotation.owner = None;

        let successors = annotation.precedes.clone();
        let id = self.annotations.insert(annotation);
        self.predecessors.insert(id, Vec::new());
        for successor in successors {
            self.predecessors[successor].push(id);
        }
        trace!(?id, "Inserted SequenceAnnotation");
        Ok(id)
    }

    pub fn insert_collection(
        &mut self,
        collection: Collection,
    ) -> Result<CollectionId, ModelError> {
        self.check_display_id(collection.display_id.as_deref())?;
        for &component in &collection.components {
            self.require_component(component)?;
        }
        let id = self.collections.insert(collection);
        trace!(?id, "Inserted Collection");
        Ok(id)
    }

    // --- DnaSequence ---

    /// Replaces the text of a stored sequence, checking the alphabet first.
    pub fn set_nucleotides(
        &mut self,
        id: SequenceId,
        nucleotides: &str,
    ) -> Result<(), ModelError> {
        self.policy.nucleotides.check(nucleotides)?;
        let sequence = self
            .sequences
            .get_mut(id)
            .ok_or(ModelError::missing(EntityKind::Sequence))?;
        sequence.set_nucleotides(nucleotides);
        Ok(())
    }

    // --- DnaComponent ---

    /// Sets or clears the sequence of a component. No check is made against
    /// the coordinates of its annotations.
    pub fn set_dna_sequence(
        &mut self,
        component: ComponentId,
        sequence: Option<SequenceId>,
    ) -> Result<(), ModelError> {
        if let Some(sequence) = sequence {
            self.require_sequence(sequence)?;
        }
        self.require_component_mut(component)?.sequence = sequence;
        Ok(())
    }

    /// Adds an ontology term to a component's type set.
    ///
    /// Returns `Ok(false)` when the term was already present and the
    /// duplicate policy ignores repeats.
    pub fn add_type(&mut self, component: ComponentId, uri: Uri) -> Result<bool, ModelError> {
        let duplicate = self.require_component(component)?.has_type(&uri);
        if !self.admit(EntityKind::Component, duplicate, || uri.to_string())? {
            return Ok(false);
        }
        Ok(self.require_component_mut(component)?.add_type(uri))
    }

    /// Adds an annotation to a component's annotation set.
    ///
    /// The add is a duplicate when the annotation is already a member or
    /// when a value-equal annotation is. An annotation belongs to at most
    /// one component. Precedes links made before the annotation had an
    /// owner are checked here when the policy keeps them within one
    /// component.
    pub fn add_annotation(
        &mut self,
        component: ComponentId,
        annotation: AnnotationId,
    ) -> Result<bool, ModelError> {
        let members = &self.require_component(component)?.annotations;
        let candidate = self.require_annotation(annotation)?;
        if let Some(owner) = candidate.owner {
            if owner != component {
                return Err(ModelError::AnnotationOwned);
            }
        }

        if self.policy.precedes_same_component {
            let linked = candidate
                .precedes
                .iter()
                .chain(self.predecessors.get(annotation).into_iter().flatten());
            let foreign = linked
                .filter_map(|&other| self.annotations.get(other)?.owner)
                .any(|other_owner| other_owner != component);
            if foreign {
                return Err(ModelError::PrecedesAcrossComponents);
            }
        }

        let duplicate = members
            .iter()
            .any(|&existing| self.annotations_equal(existing, annotation));
        if !self.admit(EntityKind::Component, duplicate, || candidate.label())? {
            return Ok(false);
        }

        self.require_component_mut(component)?.annotations.push(annotation);
        self.annotations[annotation].owner = Some(component);
        Ok(true)
    }

    // --- SequenceAnnotation ---

    /// Adds a component to the sub-features located at an annotation.
    pub fn add_feature(
        &mut self,
        annotation: AnnotationId,
        component: ComponentId,
    ) -> Result<bool, ModelError> {
        let members = &self.require_annotation(annotation)?.sub_components;
        let candidate = self.require_component(component)?;
        let duplicate = members
            .iter()
            .any(|&existing| self.components_equal(existing, component));
        if !self.admit(EntityKind::Annotation, duplicate, || candidate.label())? {
            return Ok(false);
        }
        self.annotations[annotation].sub_components.push(component);
        Ok(true)
    }

    /// Records that `annotation` precedes `successor`.
    ///
    /// Edges are unique by id. Self-loops are always refused; cycles and
    /// cross-component links are refused only when the policy says so.
    pub fn add_precede(
        &mut self,
        annotation: AnnotationId,
        successor: AnnotationId,
    ) -> Result<bool, ModelError> {
        self.check_precede(annotation, successor)?;
        let duplicate = self.annotations[annotation].precedes.contains(&successor);
        if !self.admit(EntityKind::Annotation, duplicate, || {
            self.annotations[successor].label()
        })? {
            return Ok(false);
        }
        self.annotations[annotation].precedes.push(successor);
        self.predecessors[successor].push(annotation);
        Ok(true)
    }

    /// Replaces the whole precedes set of `annotation`. Nothing changes if
    /// any of the new successors is refused.
    pub fn set_precedes(
        &mut self,
        annotation: AnnotationId,
        successors: impl IntoIterator<Item = AnnotationId>,
    ) -> Result<(), ModelError> {
        self.require_annotation(annotation)?;
        let mut unique = Vec::new();
        let mut seen = HashSet::new();
        for successor in successors {
            self.check_precede(annotation, successor)?;
            if seen.insert(successor) {
                unique.push(successor);
            }
        }

        let previous =
            std::mem::replace(&mut self.annotations[annotation].precedes, unique.clone());
        for old in previous {
            if let Some(back) = self.predecessors.get_mut(old) {
                back.retain(|&id| id != annotation);
            }
        }
        for successor in unique {
            self.predecessors[successor].push(annotation);
        }
        Ok(())
    }

    // --- Collection ---

    /// Adds a component to a collection unless a value-equal component is
    /// already a member.
    pub fn add_component(
        &mut self,
        collection: CollectionId,
        component: ComponentId,
    ) -> Result<bool, ModelError> {
        let members = &self.require_collection(collection)?.components;
        let candidate = self.require_component(component)?;
        let duplicate = members
            .iter()
            .any(|&existing| self.components_equal(existing, component));
        if !self.admit(EntityKind::Collection, duplicate, || candidate.label())? {
            return Ok(false);
        }
        self.collections[collection].components.push(component);
        Ok(true)
    }

    // --- Graph queries ---

    /// Whether a chain of precedes links leads from `from` to `to`.
    pub fn precedes_path_exists(&self, from: AnnotationId, to: AnnotationId) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(annotation) = self.annotations.get(current) {
                stack.extend(annotation.precedes.iter().copied());
            }
        }
        false
    }

    // --- Internal helpers ---

    /// Applies the duplicate policy. `Ok(true)` means the member goes in.
    fn admit(
        &self,
        container: EntityKind,
        duplicate: bool,
        member: impl FnOnce() -> String,
    ) -> Result<bool, ModelError> {
        if !duplicate {
            return Ok(true);
        }
        match self.policy.duplicates {
            DuplicatePolicy::Ignore => {
                debug!(%container, member = %member(), "Ignoring duplicate member");
                Ok(false)
            }
            DuplicatePolicy::Reject => Err(ModelError::DuplicateMember {
                container,
                member: member(),
            }),
        }
    }

    fn check_precede(
        &self,
        annotation: AnnotationId,
        successor: AnnotationId,
    ) -> Result<(), ModelError> {
        let from = self.require_annotation(annotation)?;
        let to = self.require_annotation(successor)?;
        if annotation == successor {
            return Err(ModelError::SelfPrecedence);
        }
        if self.policy.precedes_same_component {
            if let (Some(a), Some(b)) = (from.owner, to.owner) {
                if a != b {
                    return Err(ModelError::PrecedesAcrossComponents);
                }
            }
        }
        if !self.policy.allow_precedes_cycles && self.precedes_path_exists(successor, annotation) {
            return Err(ModelError::PrecedesCycle);
        }
        Ok(())
    }

    fn check_display_id(&self, display_id: Option<&str>) -> Result<(), ModelError> {
        match display_id {
            Some(value) if self.policy.check_display_ids && !is_valid_display_id(value) => {
                Err(ModelError::InvalidDisplayId {
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn require_sequence(&self, id: SequenceId) -> Result<&DnaSequence, ModelError> {
        self.sequences
            .get(id)
            .ok_or(ModelError::missing(EntityKind::Sequence))
    }

    fn require_component(&self, id: ComponentId) -> Result<&DnaComponent, ModelError> {
        self.components
            .get(id)
            .ok_or(ModelError::missing(EntityKind::Component))
    }

    fn require_component_mut(
        &mut self,
        id: ComponentId,
    ) -> Result<&mut DnaComponent, ModelError> {
        self.components
            .get_mut(id)
            .ok_or(ModelError::missing(EntityKind::Component))
    }

    fn require_annotation(&self, id: AnnotationId) -> Result<&SequenceAnnotation, ModelError> {
        self.annotations
            .get(id)
            .ok_or(ModelError::missing(EntityKind::Annotation))
    }

    fn require_collection(&self, id: CollectionId) -> Result<&Collection, ModelError> {
        self.collections
            .get(id)
            .ok_or(ModelError::missing(EntityKind::Collection))
    }
}
