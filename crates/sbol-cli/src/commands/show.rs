use super::load_document;
use crate::cli::ShowArgs;
use crate::error::Result;
use sbol::analysis::precedes;
use sbol::core::models::document::SbolDocument;
use sbol::core::models::ids::ComponentId;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

pub fn run(args: ShowArgs) -> Result<()> {
    let doc = load_document(&args.manifest, &args.policy)?;
    print!("{}", DesignTree(&doc));
    Ok(())
}

/// Collections, their components, and each component's annotations in
/// precedes order. Components outside every collection are listed last.
struct DesignTree<'a>(&'a SbolDocument);

impl DesignTree<'_> {
    fn component(&self, f: &mut fmt::Formatter<'_>, id: ComponentId, indent: usize) -> fmt::Result {
        let doc = self.0;
        let Some(component) = doc.component(id) else {
            return Ok(());
        };
        let pad = "  ".repeat(indent);

        write!(f, "{pad}component {}", component.display_id.as_deref().unwrap_or("?"))?;
        if let Some(name) = &component.name {
            write!(f, " \"{name}\"")?;
        }
        let topology = if component.is_circular { "circular" } else { "linear" };
        match component.dna_sequence().and_then(|s| doc.sequence(s)) {
            Some(sequence) => writeln!(f, " ({} bp, {topology})", sequence.len())?,
            None => writeln!(f, " (no sequence, {topology})")?,
        }
        for uri in component.types() {
            writeln!(f, "{pad}  type {uri}")?;
        }

        let order = precedes::ordered_annotations(doc, id).unwrap_or_else(|e| {
            warn!(component = ?component.display_id, "{e}; listing annotations in insertion order");
            component.annotations().to_vec()
        });
        for annotation_id in order {
            let Some(annotation) = doc.annotation(annotation_id) else {
                continue;
            };
            let coord = |c: Option<usize>| c.map_or_else(|| String::from("?"), |v| v.to_string());
            writeln!(
                f,
                "{pad}  annotation {}..{} ({})",
                coord(annotation.bio_start()),
                coord(annotation.bio_end()),
                annotation.strand().map_or("?", |s| s.symbol())
            )?;
            for &feature in annotation.sub_components() {
                let label = doc
                    .component(feature)
                    .and_then(|c| c.display_id.as_deref())
                    .unwrap_or("?");
                writeln!(f, "{pad}    feature {label}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DesignTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        let mut listed: HashSet<ComponentId> = HashSet::new();

        for (_, collection) in doc.collections_iter() {
            write!(f, "collection {}", collection.display_id.as_deref().unwrap_or("?"))?;
            match &collection.name {
                Some(name) => writeln!(f, " \"{name}\"")?,
                None => writeln!(f)?,
            }
            for &member in collection.components() {
                listed.insert(member);
                self.component(f, member, 1)?;
            }
        }

        let rest: Vec<ComponentId> = doc
            .components_iter()
            .map(|(id, _)| id)
            .filter(|id| !listed.contains(id))
            .collect();
        if !rest.is_empty() {
            writeln!(f, "unassigned components")?;
            for id in rest {
                self.component(f, id, 1)?;
            }
        }
        Ok(())
    }
}
