//! TOML design manifests.
//!
//! ```toml
//! [[sequence]]
//! key = "plac-seq"
//! nucleotides = "AATTGTGAGCGGATAACAATT"
//!
//! [[component]]
//! display-id = "pLac"
//! name = "lac promoter"
//! sequence = "plac-seq"
//! types = ["http://purl.obolibrary.org/obo/SO_0000167"]
//!
//! [[component.annotation]]
//! key = "operator"
//! start = 1
//! end = 21
//! strand = "+"
//! features = ["lacO"]
//! precedes = []
//!
//! [[collection]]
//! display-id = "parts"
//! components = ["pLac"]
//! ```

use crate::error::{CliError, Result};
use sbol::core::error::ModelError;
use sbol::core::models::annotation::{SequenceAnnotation, Strand};
use sbol::core::models::builder::{BuildError, DocumentBuilder};
use sbol::core::models::collection::Collection;
use sbol::core::models::component::DnaComponent;
use sbol::core::models::document::SbolDocument;
use sbol::core::models::sequence::DnaSequence;
use sbol::core::models::uri::Uri;
use sbol::core::policy::ModelPolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "sequence")]
    sequences: Vec<SequenceEntry>,
    #[serde(default, rename = "component")]
    components: Vec<ComponentEntry>,
    #[serde(default, rename = "collection")]
    collections: Vec<CollectionEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct SequenceEntry {
    key: String,
    nucleotides: String,
    uri: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ComponentEntry {
    display_id: String,
    name: Option<String>,
    description: Option<String>,
    uri: Option<String>,
    #[serde(default)]
    circular: bool,
    sequence: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default, rename = "annotation")]
    annotations: Vec<AnnotationEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct AnnotationEntry {
    key: String,
    start: Option<usize>,
    end: Option<usize>,
    strand: Option<String>,
    uri: Option<String>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    precedes: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct CollectionEntry {
    display_id: String,
    name: Option<String>,
    description: Option<String>,
    uri: Option<String>,
    #[serde(default)]
    components: Vec<String>,
}

fn parse_uri(value: Option<&str>) -> std::result::Result<Option<Uri>, BuildError> {
    value
        .map(|v| Uri::new(v).map_err(|e| BuildError::Model(e.into())))
        .transpose()
}

impl AnnotationEntry {
    fn to_annotation(&self) -> std::result::Result<SequenceAnnotation, BuildError> {
        let mut annotation = SequenceAnnotation::new();
        match (self.start, self.end) {
            (Some(start), Some(end)) => annotation.set_location(start, end)?,
            (Some(start), None) => annotation.set_bio_start(start)?,
            (None, Some(end)) => annotation.set_bio_end(end)?,
            (None, None) => {}
        }
        if let Some(symbol) = &self.strand {
            annotation.set_strand(symbol.parse::<Strand>().map_err(ModelError::from)?);
        }
        annotation.uri = parse_uri(self.uri.as_deref())?;
        Ok(annotation)
    }
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading manifest from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Builds the document in dependency order, so entries may refer to
    /// entities defined further down the file. Annotations join their
    /// components only after their features and precedes links are set.
    pub fn into_document(
        self,
        policy: ModelPolicy,
    ) -> std::result::Result<SbolDocument, BuildError> {
        let mut builder = DocumentBuilder::new(policy);

        for entry in &self.sequences {
            let mut sequence = DnaSequence::new(entry.nucleotides.as_str());
            sequence.uri = parse_uri(entry.uri.as_deref())?;
            builder.sequence(&entry.key, sequence)?;
        }

        for entry in &self.components {
            let mut component = DnaComponent::new(&entry.display_id).circular(entry.circular);
            component.name = entry.name.clone();
            component.description = entry.description.clone();
            component.uri = parse_uri(entry.uri.as_deref())?;
            builder.component(component, entry.sequence.as_deref())?;
            for uri in &entry.types {
                builder.component_type(&entry.display_id, uri)?;
            }
        }

        for annotation in self.components.iter().flat_map(|c| &c.annotations) {
            builder.register_annotation(&annotation.key, annotation.to_annotation()?)?;
        }

        for annotation in self.components.iter().flat_map(|c| &c.annotations) {
            for feature in &annotation.features {
                builder.feature(&annotation.key, feature)?;
            }
            for successor in &annotation.precedes {
                builder.precede(&annotation.key, successor)?;
            }
        }

        for entry in &self.components {
            for annotation in &entry.annotations {
                builder.attach_annotation(&entry.display_id, &annotation.key)?;
            }
        }

        for entry in &self.collections {
            let mut collection = Collection::new(&entry.display_id);
            collection.name = entry.name.clone();
            collection.description = entry.description.clone();
            collection.uri = parse_uri(entry.uri.as_deref())?;
            builder.collection(collection)?;
            for member in &entry.components {
                builder.member(&entry.display_id, member)?;
            }
        }

        let doc = builder.build();
        info!(
            sequences = doc.sequences_iter().count(),
            components = doc.components_iter().count(),
            annotations = doc.annotations_iter().count(),
            collections = doc.collections_iter().count(),
            "Design built from manifest."
        );
        Ok(doc)
    }
}
