use crate::core::error::ModelError;
use crate::core::models::document::SbolDocument;
use crate::core::models::ids::{AnnotationId, ComponentId, EntityKind};
use slotmap::SecondaryMap;
use std::collections::VecDeque;
use tracing::{instrument, trace};

/// Annotations that `id` precedes. Empty for an unknown id.
pub fn successors(doc: &SbolDocument, id: AnnotationId) -> &[AnnotationId] {
    doc.annotation(id).map(|a| a.precedes()).unwrap_or(&[])
}

/// Annotations that precede `id`. Empty for an unknown id.
pub fn predecessors(doc: &SbolDocument, id: AnnotationId) -> &[AnnotationId] {
    doc.predecessors(id).unwrap_or(&[])
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

/// Finds one cycle in the precedes graph of the whole document.
///
/// The returned path starts and ends at the same annotation, e.g.
/// `[a, b, c, a]`.
#[instrument(skip_all, name = "find_precedes_cycle")]
pub fn find_cycle(doc: &SbolDocument) -> Option<Vec<AnnotationId>> {
    let mut marks: SecondaryMap<AnnotationId, Mark> = SecondaryMap::new();

    for (root, _) in doc.annotations_iter() {
        if marks.contains_key(root) {
            continue;
        }
        // Each frame is a node and the index of the next successor to visit.
        let mut stack: Vec<(AnnotationId, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::Active);

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let succ = successors(doc, node);
            if frame.1 == succ.len() {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            }
            let child = succ[frame.1];
            frame.1 += 1;
            match marks.get(child) {
                Some(Mark::Done) => {}
                Some(Mark::Active) => {
                    let start = stack.iter().position(|&(n, _)| n == child).unwrap_or(0);
                    let mut cycle: Vec<AnnotationId> =
                        stack[start..].iter().map(|&(n, _)| n).collect();
                    cycle.push(child);
                    trace!(length = cycle.len() - 1, "Found precedes cycle");
                    return Some(cycle);
                }
                None => {
                    marks.insert(child, Mark::Active);
                    stack.push((child, 0));
                }
            }
        }
    }
    None
}

/// Orders the annotations of `component` so that every annotation comes
/// after the ones preceding it.
///
/// Only links between annotations of this component are considered.
/// Annotations without an ordering constraint keep their membership order.
#[instrument(skip_all, fields(component = ?component))]
pub fn ordered_annotations(
    doc: &SbolDocument,
    component: ComponentId,
) -> Result<Vec<AnnotationId>, ModelError> {
    let members = doc
        .component(component)
        .ok_or(ModelError::MissingEntity {
            kind: EntityKind::Component,
        })?
        .annotations();

    let mut in_degree: SecondaryMap<AnnotationId, usize> =
        members.iter().map(|&id| (id, 0)).collect();
    for &id in members {
        for &next in successors(doc, id) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree += 1;
            }
        }
    }

    let mut ready: VecDeque<AnnotationId> = members
        .iter()
        .copied()
        .filter(|&id| in_degree[id] == 0)
        .collect();
    let mut order = Vec::with_capacity(members.len());

    while let Some(id) = ready.pop_front() {
        order.push(id);
        for &next in successors(doc, id) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(next);
                }
            }
        }
    }

    if order.len() != members.len() {
        return Err(ModelError::PrecedesCycle);
    }
    Ok(order)
}
