//! Document-wide consistency checks.
//!
//! The mutating operations of [`SbolDocument`] reject what is wrong locally
//! (bad ranges, bad nucleotides). Some problems only show up across
//! entities, or are allowed by a permissive [`ModelPolicy`]; [`validate`]
//! collects those into a [`ValidationReport`].
//!
//! Where a check mirrors a policy switch, the issue is an error when the
//! policy enforces that rule and a warning when it does not.
//!
//! [`ModelPolicy`]: crate::core::policy::ModelPolicy

use super::precedes;
use crate::core::models::document::SbolDocument;
use crate::core::models::ids::{AnnotationId, CollectionId, ComponentId};
use crate::core::policy::{DuplicatePolicy, is_valid_display_id};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// The entity an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Component(ComponentId),
    Annotation(AnnotationId),
    Collection(CollectionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// An annotation ends past the last base of its component's sequence.
    BeyondSequence { end: usize, length: usize },
    /// Exactly one of the two coordinates is set.
    PartialLocation,
    /// Coordinates are set but the owning component has no sequence.
    LocatedWithoutSequence,
    PrecedesAcrossComponents { successor: String },
    PrecedesCycle { length: usize },
    InvalidDisplayId { value: String },
    /// The annotation is not in any component's annotation set.
    Unowned,
    /// Two members of one set became value-equal after they were added.
    DuplicateMember { first: String, second: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::BeyondSequence { end, length } => write!(
                f,
                "ends at base {end} but the sequence has {length} bases"
            ),
            IssueKind::PartialLocation => f.write_str("only one coordinate is set"),
            IssueKind::LocatedWithoutSequence => {
                f.write_str("has coordinates but the component has no sequence")
            }
            IssueKind::PrecedesAcrossComponents { successor } => {
                write!(f, "precedes {successor}, which belongs to another component")
            }
            IssueKind::PrecedesCycle { length } => {
                write!(f, "is part of a precedes cycle of length {length}")
            }
            IssueKind::InvalidDisplayId { value } => write!(f, "has invalid display id '{value}'"),
            IssueKind::Unowned => f.write_str("is not owned by any component"),
            IssueKind::DuplicateMember { first, second } => {
                write!(f, "holds equal members {first} and {second}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub subject: Subject,
    pub label: String, // Human-readable name of the subject
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.label, self.kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, severity: Severity, subject: Subject, label: String, kind: IssueKind) {
        debug!(%severity, %label, issue = %kind, "Validation issue");
        self.issues.push(Issue {
            severity,
            subject,
            label,
            kind,
        });
    }
}

fn enforced(on: bool) -> Severity {
    if on { Severity::Error } else { Severity::Warning }
}

fn annotation_label(doc: &SbolDocument, id: AnnotationId) -> String {
    let Some(annotation) = doc.annotation(id) else {
        return String::from("<missing annotation>");
    };
    match annotation.owner().and_then(|c| doc.component(c)) {
        Some(owner) => format!("annotation {} on {}", annotation.label(), owner.label()),
        None => format!("annotation {}", annotation.label()),
    }
}

/// Runs every document-wide check and returns the issues found.
#[instrument(skip_all, name = "validate_document")]
pub fn validate(doc: &SbolDocument) -> ValidationReport {
    let policy = doc.policy();
    let mut report = ValidationReport::default();

    for (id, component) in doc.components_iter() {
        if let Some(value) = component.display_id.as_deref() {
            if !is_valid_display_id(value) {
                report.push(
                    enforced(policy.check_display_ids),
                    Subject::Component(id),
                    format!("component {}", component.label()),
                    IssueKind::InvalidDisplayId {
                        value: value.to_string(),
                    },
                );
            }
        }
    }

    for (id, collection) in doc.collections_iter() {
        if let Some(value) = collection.display_id.as_deref() {
            if !is_valid_display_id(value) {
                report.push(
                    enforced(policy.check_display_ids),
                    Subject::Collection(id),
                    format!("collection {}", collection.label()),
                    IssueKind::InvalidDisplayId {
                        value: value.to_string(),
                    },
                );
            }
        }
    }

    for (id, annotation) in doc.annotations_iter() {
        let subject = Subject::Annotation(id);
        let owner = annotation.owner().and_then(|c| doc.component(c));

        match (annotation.bio_start(), annotation.bio_end()) {
            (Some(_), None) | (None, Some(_)) => report.push(
                Severity::Warning,
                subject,
                annotation_label(doc, id),
                IssueKind::PartialLocation,
            ),
            _ => {}
        }

        let furthest = annotation.bio_end().or(annotation.bio_start());
        if let (Some(end), Some(component)) = (furthest, owner) {
            match component.dna_sequence().and_then(|s| doc.sequence(s)) {
                Some(sequence) if end > sequence.len() => report.push(
                    Severity::Error,
                    subject,
                    annotation_label(doc, id),
                    IssueKind::BeyondSequence {
                        end,
                        length: sequence.len(),
                    },
                ),
                Some(_) => {}
                None => report.push(
                    Severity::Info,
                    subject,
                    annotation_label(doc, id),
                    IssueKind::LocatedWithoutSequence,
                ),
            }
        }

        if owner.is_none() {
            report.push(Severity::Info, subject, annotation_label(doc, id), IssueKind::Unowned);
        }

        for &successor in annotation.precedes() {
            let other = doc.annotation(successor).and_then(|a| a.owner());
            if let (Some(a), Some(b)) = (annotation.owner(), other) {
                if a != b {
                    report.push(
                        enforced(policy.precedes_same_component),
                        subject,
                        annotation_label(doc, id),
                        IssueKind::PrecedesAcrossComponents {
                            successor: annotation_label(doc, successor),
                        },
                    );
                }
            }
        }
    }

    report_cycles(doc, &mut report);
    report_duplicates(doc, &mut report);

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if errors > 0 {
        warn!(errors, warnings, "Validation found errors.");
    } else {
        info!(warnings, infos = report.count(Severity::Info), "Validation finished.");
    }
    report
}

/// Reports each annotation that lies on a precedes cycle once.
fn report_cycles(doc: &SbolDocument, report: &mut ValidationReport) {
    let severity = enforced(!doc.policy().allow_precedes_cycles);
    let mut reported: HashSet<AnnotationId> = HashSet::new();

    for (id, _) in doc.annotations_iter() {
        let on_cycle = precedes::successors(doc, id)
            .iter()
            .any(|&s| doc.precedes_path_exists(s, id));
        if reported.contains(&id) || !on_cycle {
            continue;
        }
        let members: Vec<AnnotationId> = doc
            .annotations_iter()
            .map(|(other, _)| other)
            .filter(|&other| {
                other == id
                    || (doc.precedes_path_exists(id, other) && doc.precedes_path_exists(other, id))
            })
            .collect();
        for &member in &members {
            if reported.insert(member) {
                report.push(
                    severity,
                    Subject::Annotation(member),
                    annotation_label(doc, member),
                    IssueKind::PrecedesCycle {
                        length: members.len(),
                    },
                );
            }
        }
    }
}

/// Reports pairs of set members that compare equal. Adds refuse such pairs,
/// but members edited in place afterwards can still collide.
fn report_duplicates(doc: &SbolDocument, report: &mut ValidationReport) {
    let severity = enforced(doc.policy().duplicates == DuplicatePolicy::Reject);
    let component_label = |id: ComponentId| {
        doc.component(id)
            .map_or_else(|| String::from("<missing component>"), |c| c.label())
    };

    for (id, component) in doc.components_iter() {
        for (a, b) in equal_pairs(component.annotations(), |a, b| doc.annotations_equal(a, b)) {
            report.push(
                severity,
                Subject::Component(id),
                format!("component {}", component.label()),
                IssueKind::DuplicateMember {
                    first: annotation_label(doc, a),
                    second: annotation_label(doc, b),
                },
            );
        }
    }

    for (id, annotation) in doc.annotations_iter() {
        let features = annotation.sub_components();
        for (a, b) in equal_pairs(features, |a, b| doc.components_equal(a, b)) {
            report.push(
                severity,
                Subject::Annotation(id),
                annotation_label(doc, id),
                IssueKind::DuplicateMember {
                    first: format!("component {}", component_label(a)),
                    second: format!("component {}", component_label(b)),
                },
            );
        }
    }

    for (id, collection) in doc.collections_iter() {
        for (a, b) in equal_pairs(collection.components(), |a, b| doc.components_equal(a, b)) {
            report.push(
                severity,
                Subject::Collection(id),
                format!("collection {}", collection.label()),
                IssueKind::DuplicateMember {
                    first: format!("component {}", component_label(a)),
                    second: format!("component {}", component_label(b)),
                },
            );
        }
    }
}

fn equal_pairs<T: Copy>(members: &[T], equal: impl Fn(T, T) -> bool) -> Vec<(T, T)> {
    let mut pairs = Vec::new();
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            if equal(a, b) {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::annotation::{SequenceAnnotation, Strand};
    use crate::core::models::collection::Collection;
    use crate::core::models::component::DnaComponent;
    use crate::core::models::sequence::DnaSequence;
    use crate::core::policy::ModelPolicy;

    fn part_with_sequence(
        doc: &mut SbolDocument,
        display_id: &str,
        nucleotides: &str,
    ) -> ComponentId {
        let part = doc.insert_component(DnaComponent::new(display_id)).unwrap();
        let seq = doc.insert_sequence(DnaSequence::new(nucleotides)).unwrap();
        doc.set_dna_sequence(part, Some(seq)).unwrap();
        part
    }

    fn annotate(
        doc: &mut SbolDocument,
        part: ComponentId,
        start: usize,
        end: usize,
    ) -> AnnotationId {
        let ann = doc
            .insert_annotation(SequenceAnnotation::located(start, end, Strand::Forward).unwrap())
            .unwrap();
        doc.add_annotation(part, ann).unwrap();
        ann
    }

    fn kinds(report: &ValidationReport) -> Vec<&IssueKind> {
        report.issues().iter().map(|i| &i.kind).collect()
    }

    #[test]
    fn consistent_document_is_clean() {
        let mut doc = SbolDocument::new();
        let part = part_with_sequence(&mut doc, "partA", "ACGTACGTAC");
        let a = annotate(&mut doc, part, 1, 4);
        let b = annotate(&mut doc, part, 5, 10);
        doc.add_precede(a, b).unwrap();

        let report = validate(&doc);
        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues());
        assert!(!report.has_errors());
    }

    #[test]
    fn coordinates_past_the_sequence_are_errors() {
        let mut doc = SbolDocument::new();
        let part = part_with_sequence(&mut doc, "partA", "ACGT");
        let ann = annotate(&mut doc, part, 3, 9);

        let report = validate(&doc);
        assert!(report.has_errors());
        let issue = &report.issues()[0];
        assert_eq!(issue.subject, Subject::Annotation(ann));
        assert_eq!(issue.kind, IssueKind::BeyondSequence { end: 9, length: 4 });
        assert_eq!(
            issue.to_string(),
            "[error] annotation 3..9 (+) on partA ends at base 9 but the sequence has 4 bases"
        );
    }

    #[test]
    fn partial_and_unsequenced_locations_are_flagged() {
        let mut doc = SbolDocument::new();
        let part = doc.insert_component(DnaComponent::new("bare")).unwrap();
        let mut half = SequenceAnnotation::new();
        half.set_bio_start(4).unwrap();
        let ann = doc.insert_annotation(half).unwrap();
        doc.add_annotation(part, ann).unwrap();

        let report = validate(&doc);
        assert_eq!(
            kinds(&report),
            vec![&IssueKind::PartialLocation, &IssueKind::LocatedWithoutSequence]
        );
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Info), 1);
    }

    #[test]
    fn unowned_annotations_are_informational() {
        let mut doc = SbolDocument::new();
        doc.insert_annotation(SequenceAnnotation::new()).unwrap();
        let report = validate(&doc);
        assert_eq!(kinds(&report), vec![&IssueKind::Unowned]);
        assert!(!report.has_errors());
    }

    #[test]
    fn display_id_severity_follows_policy() {
        let mut doc = SbolDocument::new();
        let part = doc.insert_component(DnaComponent::new("ok")).unwrap();
        doc.component_mut(part).unwrap().display_id = Some("has space".into());
        let report = validate(&doc);
        assert_eq!(report.count(Severity::Warning), 1);

        let mut checked =
            SbolDocument::with_policy(ModelPolicy::builder().check_display_ids(true).build());
        let part = checked.insert_component(DnaComponent::new("ok")).unwrap();
        checked.component_mut(part).unwrap().display_id = Some("9lives".into());
        let report = validate(&checked);
        assert!(report.has_errors());
        assert_eq!(
            report.issues()[0].kind,
            IssueKind::InvalidDisplayId { value: "9lives".into() }
        );
    }

    #[test]
    fn cross_component_precedes_is_a_warning_by_default() {
        let mut doc = SbolDocument::new();
        let x = part_with_sequence(&mut doc, "x", "ACGTACGT");
        let y = part_with_sequence(&mut doc, "y", "ACGTACGT");
        let a = annotate(&mut doc, x, 1, 2);
        let b = annotate(&mut doc, y, 3, 4);
        doc.add_precede(a, b).unwrap();

        let report = validate(&doc);
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(matches!(
            &report.issues()[0].kind,
            IssueKind::PrecedesAcrossComponents { successor } if successor.ends_with("on y")
        ));
    }

    #[test]
    fn each_cycle_member_is_reported_once() {
        let mut doc = SbolDocument::new();
        let part = part_with_sequence(&mut doc, "p", "ACGTACGTACGT");
        let a = annotate(&mut doc, part, 1, 2);
        let b = annotate(&mut doc, part, 3, 4);
        let c = annotate(&mut doc, part, 5, 6);
        let tail = annotate(&mut doc, part, 7, 8);
        doc.add_precede(a, b).unwrap();
        doc.add_precede(b, c).unwrap();
        doc.add_precede(c, a).unwrap();
        doc.add_precede(c, tail).unwrap();

        let report = validate(&doc);
        let cycle_subjects: Vec<Subject> = report
            .issues()
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::PrecedesCycle { length: 3 }))
            .map(|i| i.subject)
            .collect();
        assert_eq!(cycle_subjects.len(), 3);
        assert!(!cycle_subjects.contains(&Subject::Annotation(tail)));
        assert_eq!(report.count(Severity::Warning), 3);
    }

    #[test]
    fn members_edited_into_equality_are_reported() {
        let mut doc = SbolDocument::new();
        let part = part_with_sequence(&mut doc, "p", "ACGTACGTAC");
        let a = annotate(&mut doc, part, 1, 5);
        let b = annotate(&mut doc, part, 6, 9);
        assert!(validate(&doc).is_clean());

        doc.annotation_mut(b).unwrap().set_location(1, 5).unwrap();
        assert!(doc.annotations_equal(a, b));

        let report = validate(&doc);
        assert_eq!(report.issues().len(), 1);
        let issue = &report.issues()[0];
        assert_eq!(issue.subject, Subject::Component(part));
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(
            issue.to_string(),
            "[warning] component p holds equal members annotation 1..5 (+) on p \
             and annotation 1..5 (+) on p"
        );
    }

    #[test]
    fn renamed_collection_members_are_errors_under_reject() {
        let mut doc = SbolDocument::with_policy(
            ModelPolicy::builder()
                .duplicates(DuplicatePolicy::Reject)
                .build(),
        );
        let col = doc.insert_collection(Collection::new("parts")).unwrap();
        let x = doc.insert_component(DnaComponent::new("x")).unwrap();
        let y = doc.insert_component(DnaComponent::new("y")).unwrap();
        doc.add_component(col, x).unwrap();
        doc.add_component(col, y).unwrap();

        doc.component_mut(y).unwrap().display_id = Some("x".into());
        let report = validate(&doc);
        assert!(report.has_errors());
        assert_eq!(
            report.issues()[0].kind,
            IssueKind::DuplicateMember {
                first: "component x".into(),
                second: "component x".into(),
            }
        );
        assert_eq!(report.issues()[0].subject, Subject::Collection(col));
    }
}
