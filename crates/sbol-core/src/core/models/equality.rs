//! Value equality and fingerprints for entities stored in an [`SbolDocument`].
//!
//! Equality follows the SBOL object model: components compare display id,
//! name, description, circularity, type set, sequence and annotation set;
//! annotations compare coordinates, strand and sub-feature set (plus the
//! precedes set when [`ModelPolicy::compare_precedes`] is on); collections
//! compare their metadata and component set. Identity URIs never take part.
//!
//! Components and annotations can reach themselves through sub-features, so
//! the comparison keeps the pairs currently under comparison and treats a
//! revisited pair as equal.
//!
//! Fingerprints hash a subset of the same fields, so equal values always
//! have equal fingerprints.
//!
//! [`ModelPolicy::compare_precedes`]: crate::core::policy::ModelPolicy::compare_precedes

use super::document::SbolDocument;
use super::ids::{AnnotationId, CollectionId, ComponentId, SequenceId};
use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pair {
    Components(ComponentId, ComponentId),
    Annotations(AnnotationId, AnnotationId),
}

struct ValueComparator<'a> {
    doc: &'a SbolDocument,
    compare_precedes: bool,
    in_progress: HashSet<Pair>,
}

impl<'a> ValueComparator<'a> {
    fn new(doc: &'a SbolDocument) -> Self {
        Self {
            doc,
            compare_precedes: doc.policy().compare_precedes,
            in_progress: HashSet::new(),
        }
    }

    fn sequences(&self, a: Option<SequenceId>, b: Option<SequenceId>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) if a == b => true,
            (Some(a), Some(b)) => match (self.doc.sequence(a), self.doc.sequence(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
            _ => false,
        }
    }

    fn components(&mut self, a: ComponentId, b: ComponentId) -> bool {
        if a == b {
            return true;
        }
        let doc = self.doc;
        let (Some(x), Some(y)) = (doc.component(a), doc.component(b)) else {
            return false;
        };
        if x.display_id != y.display_id
            || x.name != y.name
            || x.description != y.description
            || x.is_circular != y.is_circular
            || !same_members(x.types(), y.types(), |p, q| p == q)
            || !self.sequences(x.dna_sequence(), y.dna_sequence())
        {
            return false;
        }

        let pair = Pair::Components(a, b);
        if !self.in_progress.insert(pair) {
            return true;
        }
        let equal = self.id_sets(x.annotations(), y.annotations(), Self::annotations);
        self.in_progress.remove(&pair);
        equal
    }

    fn annotations(&mut self, a: AnnotationId, b: AnnotationId) -> bool {
        if a == b {
            return true;
        }
        let doc = self.doc;
        let (Some(x), Some(y)) = (doc.annotation(a), doc.annotation(b)) else {
            return false;
        };
        if x.bio_start() != y.bio_start()
            || x.bio_end() != y.bio_end()
            || x.strand() != y.strand()
        {
            return false;
        }

        let pair = Pair::Annotations(a, b);
        if !self.in_progress.insert(pair) {
            return true;
        }
        let mut equal = self.id_sets(x.sub_components(), y.sub_components(), Self::components);
        if equal && self.compare_precedes {
            equal = self.id_sets(x.precedes(), y.precedes(), Self::annotations);
        }
        self.in_progress.remove(&pair);
        equal
    }

    fn collections(&mut self, a: CollectionId, b: CollectionId) -> bool {
        if a == b {
            return true;
        }
        let doc = self.doc;
        let (Some(x), Some(y)) = (doc.collection(a), doc.collection(b)) else {
            return false;
        };
        x.display_id == y.display_id
            && x.name == y.name
            && x.description == y.description
            && self.id_sets(x.components(), y.components(), Self::components)
    }

    /// Unordered comparison of two id sets under a value equality.
    fn id_sets<K: Copy>(&mut self, xs: &[K], ys: &[K], eq: fn(&mut Self, K, K) -> bool) -> bool {
        xs.len() == ys.len()
            && xs.iter().all(|&x| ys.iter().any(|&y| eq(self, x, y)))
            && ys.iter().all(|&y| xs.iter().any(|&x| eq(self, x, y)))
    }
}

fn same_members<T>(xs: &[T], ys: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    xs.len() == ys.len()
        && xs.iter().all(|x| ys.iter().any(|y| eq(x, y)))
        && ys.iter().all(|y| xs.iter().any(|x| eq(x, y)))
}

fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Order-independent hash of a set of values.
fn hash_unordered<'x, T: Hash + 'x>(items: impl IntoIterator<Item = &'x T>) -> u64 {
    items
        .into_iter()
        .map(hash_one)
        .fold(0u64, u64::wrapping_add)
}

impl SbolDocument {
    pub fn sequences_equal(&self, a: SequenceId, b: SequenceId) -> bool {
        ValueComparator::new(self).sequences(Some(a), Some(b))
    }

    pub fn components_equal(&self, a: ComponentId, b: ComponentId) -> bool {
        ValueComparator::new(self).components(a, b)
    }

    pub fn annotations_equal(&self, a: AnnotationId, b: AnnotationId) -> bool {
        ValueComparator::new(self).annotations(a, b)
    }

    pub fn collections_equal(&self, a: CollectionId, b: CollectionId) -> bool {
        ValueComparator::new(self).collections(a, b)
    }

    /// Hash consistent with [`components_equal`](Self::components_equal).
    /// Returns `None` for an unknown id.
    pub fn component_fingerprint(&self, id: ComponentId) -> Option<u64> {
        let component = self.component(id)?;
        let nucleotides = component
            .dna_sequence()
            .and_then(|s| self.sequence(s))
            .map(|s| s.nucleotides());
        let mut hasher = DefaultHasher::new();
        component.display_id.hash(&mut hasher);
        component.name.hash(&mut hasher);
        component.description.hash(&mut hasher);
        component.is_circular.hash(&mut hasher);
        hash_unordered(component.types()).hash(&mut hasher);
        nucleotides.hash(&mut hasher);
        component.annotations().len().hash(&mut hasher);
        Some(hasher.finish())
    }

    /// Hash consistent with [`annotations_equal`](Self::annotations_equal)
    /// under the document's policy.
    pub fn annotation_fingerprint(&self, id: AnnotationId) -> Option<u64> {
        let annotation = self.annotation(id)?;
        let mut hasher = DefaultHasher::new();
        annotation.bio_start().hash(&mut hasher);
        annotation.bio_end().hash(&mut hasher);
        annotation.strand().hash(&mut hasher);
        annotation.sub_components().len().hash(&mut hasher);
        if self.policy().compare_precedes {
            annotation.precedes().len().hash(&mut hasher);
        }
        Some(hasher.finish())
    }

    /// Hash consistent with [`collections_equal`](Self::collections_equal).
    pub fn collection_fingerprint(&self, id: CollectionId) -> Option<u64> {
        let collection = self.collection(id)?;
        let mut hasher = DefaultHasher::new();
        collection.display_id.hash(&mut hasher);
        collection.name.hash(&mut hasher);
        collection.description.hash(&mut hasher);
        collection.components().len().hash(&mut hasher);
        Some(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::models::annotation::{SequenceAnnotation, Strand};
    use crate::core::models::collection::Collection;
    use crate::core::models::component::DnaComponent;
    use crate::core::models::document::SbolDocument;
    use crate::core::models::ids::{CollectionId, ComponentId};
    use crate::core::models::sequence::DnaSequence;
    use crate::core::models::uri::Uri;
    use crate::core::policy::ModelPolicy;

    fn annotated_part(doc: &mut SbolDocument, display_id: &str, nucleotides: &str) -> ComponentId {
        let part = doc
            .insert_component(DnaComponent::new(display_id).with_name("promoter"))
            .unwrap();
        let seq = doc.insert_sequence(DnaSequence::new(nucleotides)).unwrap();
        doc.set_dna_sequence(part, Some(seq)).unwrap();
        doc.add_type(part, Uri::new("http://purl.obolibrary.org/obo/SO_0000167").unwrap())
            .unwrap();
        let ann = doc
            .insert_annotation(SequenceAnnotation::located(1, 4, Strand::Forward).unwrap())
            .unwrap();
        doc.add_annotation(part, ann).unwrap();
        part
    }

    mod components {
        use super::*;

        #[test]
        fn structurally_identical_components_are_equal() {
            let mut doc = SbolDocument::new();
            let a = annotated_part(&mut doc, "pLac", "ACGT");
            let b = annotated_part(&mut doc, "pLac", "ACGT");
            assert!(doc.components_equal(a, b));
            assert_eq!(doc.component_fingerprint(a), doc.component_fingerprint(b));
        }

        #[test]
        fn identity_is_not_compared() {
            let mut doc = SbolDocument::new();
            let a = annotated_part(&mut doc, "pLac", "ACGT");
            let b = annotated_part(&mut doc, "pLac", "ACGT");
            doc.component_mut(a).unwrap().uri = Some(Uri::new("https://example.org/a").unwrap());
            assert!(doc.components_equal(a, b));
        }

        #[test]
        fn each_field_breaks_equality() {
            let mut doc = SbolDocument::new();
            let base = annotated_part(&mut doc, "pLac", "ACGT");

            let other_seq = annotated_part(&mut doc, "pLac", "ACGA");
            assert!(!doc.components_equal(base, other_seq));

            let circular = annotated_part(&mut doc, "pLac", "ACGT");
            doc.component_mut(circular).unwrap().is_circular = true;
            assert!(!doc.components_equal(base, circular));

            let described = annotated_part(&mut doc, "pLac", "ACGT");
            doc.component_mut(described).unwrap().description = Some("lac promoter".into());
            assert!(!doc.components_equal(base, described));

            let typed = annotated_part(&mut doc, "pLac", "ACGT");
            doc.add_type(typed, Uri::new("http://purl.obolibrary.org/obo/SO_0000316").unwrap())
                .unwrap();
            assert!(!doc.components_equal(base, typed));

            let extra_annotation = annotated_part(&mut doc, "pLac", "ACGT");
            let ann = doc
                .insert_annotation(SequenceAnnotation::located(2, 3, Strand::Reverse).unwrap())
                .unwrap();
            doc.add_annotation(extra_annotation, ann).unwrap();
            assert!(!doc.components_equal(base, extra_annotation));
        }

        #[test]
        fn absent_sequences_compare_equal_and_present_vs_absent_does_not() {
            let mut doc = SbolDocument::new();
            let a = doc.insert_component(DnaComponent::new("x")).unwrap();
            let b = doc.insert_component(DnaComponent::new("x")).unwrap();
            assert!(doc.components_equal(a, b));

            let seq = doc.insert_sequence(DnaSequence::new("A")).unwrap();
            doc.set_dna_sequence(a, Some(seq)).unwrap();
            assert!(!doc.components_equal(a, b));
        }

        #[test]
        fn self_referencing_components_terminate() {
            let mut doc = SbolDocument::new();
            let build = |doc: &mut SbolDocument| {
                let part = doc.insert_component(DnaComponent::new("loop")).unwrap();
                let ann = doc.insert_annotation(SequenceAnnotation::new()).unwrap();
                doc.add_feature(ann, part).unwrap();
                doc.add_annotation(part, ann).unwrap();
                part
            };
            let a = build(&mut doc);
            let b = build(&mut doc);
            assert!(doc.components_equal(a, b));
        }

        #[test]
        fn equality_is_symmetric_and_transitive() {
            let mut doc = SbolDocument::new();
            let a = annotated_part(&mut doc, "p", "ACGT");
            let b = annotated_part(&mut doc, "p", "ACGT");
            let c = annotated_part(&mut doc, "p", "ACGT");
            assert!(doc.components_equal(a, a));
            assert_eq!(doc.components_equal(a, b), doc.components_equal(b, a));
            assert!(doc.components_equal(a, b) && doc.components_equal(b, c));
            assert!(doc.components_equal(a, c));
        }
    }

    mod annotations {
        use super::*;

        #[test]
        fn precedes_is_ignored_by_default() {
            let mut doc = SbolDocument::new();
            let a = doc
                .insert_annotation(SequenceAnnotation::located(1, 4, Strand::Forward).unwrap())
                .unwrap();
            let b = doc
                .insert_annotation(SequenceAnnotation::located(1, 4, Strand::Forward).unwrap())
                .unwrap();
            let next = doc
                .insert_annotation(SequenceAnnotation::located(5, 9, Strand::Forward).unwrap())
                .unwrap();
            doc.add_precede(a, next).unwrap();

            assert!(doc.annotations_equal(a, b));
            assert_eq!(doc.annotation_fingerprint(a), doc.annotation_fingerprint(b));
        }

        #[test]
        fn precedes_is_compared_when_the_policy_asks() {
            let mut doc =
                SbolDocument::with_policy(ModelPolicy::builder().compare_precedes(true).build());
            let a = doc
                .insert_annotation(SequenceAnnotation::located(1, 4, Strand::Forward).unwrap())
                .unwrap();
            let b = doc
                .insert_annotation(SequenceAnnotation::located(1, 4, Strand::Forward).unwrap())
                .unwrap();
            let next = doc
                .insert_annotation(SequenceAnnotation::located(5, 9, Strand::Forward).unwrap())
                .unwrap();
            doc.add_precede(a, next).unwrap();
            assert!(!doc.annotations_equal(a, b));

            let next_twin = doc
                .insert_annotation(SequenceAnnotation::located(5, 9, Strand::Forward).unwrap())
                .unwrap();
            doc.add_precede(b, next_twin).unwrap();
            assert!(doc.annotations_equal(a, b));
        }

        #[test]
        fn cyclic_precedes_comparison_terminates() {
            let mut doc =
                SbolDocument::with_policy(ModelPolicy::builder().compare_precedes(true).build());
            let ring = |doc: &mut SbolDocument| {
                let x = doc.insert_annotation(SequenceAnnotation::new()).unwrap();
                let y = doc.insert_annotation(SequenceAnnotation::new()).unwrap();
                doc.add_precede(x, y).unwrap();
                doc.add_precede(y, x).unwrap();
                x
            };
            let a = ring(&mut doc);
            let b = ring(&mut doc);
            assert!(doc.annotations_equal(a, b));
        }

        #[test]
        fn strand_and_coordinates_matter() {
            let mut doc = SbolDocument::new();
            let a = doc
                .insert_annotation(SequenceAnnotation::located(10, 20, Strand::Forward).unwrap())
                .unwrap();
            let b = doc
                .insert_annotation(SequenceAnnotation::located(10, 20, Strand::Reverse).unwrap())
                .unwrap();
            let c = doc
                .insert_annotation(SequenceAnnotation::located(10, 21, Strand::Forward).unwrap())
                .unwrap();
            assert!(!doc.annotations_equal(a, b));
            assert!(!doc.annotations_equal(a, c));
        }
    }

    mod collections {
        use super::*;

        fn collection_with(
            doc: &mut SbolDocument,
            display_id: &str,
            parts: &[&str],
        ) -> CollectionId {
            let col = doc
                .insert_collection(Collection::new(display_id).with_name("Project A"))
                .unwrap();
            for part in parts {
                let id = doc.insert_component(DnaComponent::new(part)).unwrap();
                doc.add_component(col, id).unwrap();
            }
            col
        }

        #[test]
        fn equal_iff_metadata_and_components_match() {
            let mut doc = SbolDocument::new();
            let x = collection_with(&mut doc, "col1", &["partA", "partB"]);
            let y = collection_with(&mut doc, "col1", &["partB", "partA"]);
            let z = collection_with(&mut doc, "col1", &["partA"]);
            let w = collection_with(&mut doc, "col2", &["partA", "partB"]);

            let v = collection_with(&mut doc, "col1", &["partA", "partB"]);

            assert!(doc.collections_equal(x, x));
            assert!(doc.collections_equal(x, y));
            assert!(doc.collections_equal(y, x));
            assert!(doc.collections_equal(y, v) && doc.collections_equal(x, v));
            assert!(!doc.collections_equal(x, z));
            assert!(!doc.collections_equal(x, w));
            assert_eq!(doc.collection_fingerprint(x), doc.collection_fingerprint(y));

            doc.collection_mut(y).unwrap().description = Some("changed".into());
            assert!(!doc.collections_equal(x, y));
        }
    }

    #[test]
    fn sequences_compare_by_text() {
        let mut doc = SbolDocument::new();
        let a = doc.insert_sequence(DnaSequence::new("ACGT")).unwrap();
        let b = doc.insert_sequence(DnaSequence::new("ACGT")).unwrap();
        let c = doc.insert_sequence(DnaSequence::new("acgt")).unwrap();
        assert!(doc.sequences_equal(a, b));
        assert!(!doc.sequences_equal(a, c));
    }

    #[test]
    fn fingerprints_of_unknown_ids_are_none() {
        let mut other = SbolDocument::new();
        let foreign = other.insert_component(DnaComponent::new("x")).unwrap();
        assert!(SbolDocument::new().component_fingerprint(foreign).is_none());
    }
}
