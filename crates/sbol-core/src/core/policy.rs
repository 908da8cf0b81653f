//! Model policy: the switches that decide how strictly an [`SbolDocument`]
//! enforces its invariants.
//!
//! The defaults follow the permissive behavior of the classic SBOL
//! object model (duplicate adds are silently ignored, precedes cycles are
//! allowed) while enforcing the documented nucleotide alphabet. A policy can
//! be assembled in code with [`ModelPolicyBuilder`] or read from a TOML file
//! with [`ModelPolicy::load`].
//!
//! ```toml
//! duplicates = "reject"
//! nucleotides = "canonical"
//! check-display-ids = true
//! compare-precedes = false
//! allow-precedes-cycles = true
//! precedes-same-component = false
//! ```
//!
//! [`SbolDocument`]: crate::core::models::document::SbolDocument

use super::alphabet::{self, CanonicalDna, IupacDna};
use super::error::ModelError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// What happens when a value-equal member is added to a set-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The add is a no-op.
    #[default]
    Ignore,
    /// The add fails with [`ModelError::DuplicateMember`].
    Reject,
}

/// Which symbols are accepted in nucleotide text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NucleotidePolicy {
    /// IUPAC codes, including ambiguity symbols, in either case.
    #[default]
    Iupac,
    /// Only `A`, `C`, `G`, `T`, in either case.
    Canonical,
    /// Any text is stored as given.
    Unchecked,
}

#[derive(Debug, Error)]
#[error("Invalid policy value '{0}'")]
pub struct ParsePolicyError(String);

impl FromStr for DuplicatePolicy {
    type Err = ParsePolicyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        })
    }
}

impl FromStr for NucleotidePolicy {
    type Err = ParsePolicyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iupac" => Ok(Self::Iupac),
            "canonical" | "acgt" => Ok(Self::Canonical),
            "unchecked" | "none" => Ok(Self::Unchecked),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for NucleotidePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iupac => "iupac",
            Self::Canonical => "canonical",
            Self::Unchecked => "unchecked",
        })
    }
}

impl NucleotidePolicy {
    /// Checks `text` against the alphabet this policy selects.
    pub fn check(&self, text: &str) -> Result<(), ModelError> {
        let (found, name) = match self {
            Self::Iupac => (
                alphabet::first_invalid::<IupacDna>(text),
                <IupacDna as alphabet::Alphabet>::NAME,
            ),
            Self::Canonical => (
                alphabet::first_invalid::<CanonicalDna>(text),
                <CanonicalDna as alphabet::Alphabet>::NAME,
            ),
            Self::Unchecked => (None, ""),
        };
        match found {
            Some((offset, symbol)) => Err(ModelError::InvalidNucleotide {
                offset,
                symbol,
                alphabet: name,
            }),
            None => Ok(()),
        }
    }
}

/// Checks the display-id rule: ASCII letters, digits and underscores,
/// starting with a letter or underscore.
pub fn is_valid_display_id(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPolicy {
    pub duplicates: DuplicatePolicy,
    pub nucleotides: NucleotidePolicy,
    /// Validate display ids on insertion.
    pub check_display_ids: bool,
    /// Include the precedes relation in annotation equality.
    pub compare_precedes: bool,
    pub allow_precedes_cycles: bool,
    /// Require both ends of a precedes link to be owned by the same component.
    pub precedes_same_component: bool,
}

impl Default for ModelPolicy {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::Ignore,
            nucleotides: NucleotidePolicy::Iupac,
            check_display_ids: false,
            compare_precedes: false,
            allow_precedes_cycles: true,
            precedes_same_component: false,
        }
    }
}

impl ModelPolicy {
    /// The policy with every check turned on.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            nucleotides: NucleotidePolicy::Canonical,
            check_display_ids: true,
            compare_precedes: true,
            allow_precedes_cycles: false,
            precedes_same_component: true,
        }
    }

    pub fn builder() -> ModelPolicyBuilder {
        ModelPolicyBuilder::new()
    }

    /// Reads a policy from a TOML file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, PolicyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| PolicyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            PolicyLoadError::Toml { source, .. } => PolicyLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PolicyLoadError> {
        let partial: PartialModelPolicy =
            toml::from_str(content).map_err(|e| PolicyLoadError::Toml {
                path: String::from("<inline>"),
                source: e,
            })?;
        Ok(partial.into_builder().build())
    }
}

#[derive(Debug, Error)]
pub enum PolicyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialModelPolicy {
    duplicates: Option<DuplicatePolicy>,
    nucleotides: Option<NucleotidePolicy>,
    check_display_ids: Option<bool>,
    compare_precedes: Option<bool>,
    allow_precedes_cycles: Option<bool>,
    precedes_same_component: Option<bool>,
}

impl PartialModelPolicy {
    fn into_builder(self) -> ModelPolicyBuilder {
        ModelPolicyBuilder {
            duplicates: self.duplicates,
            nucleotides: self.nucleotides,
            check_display_ids: self.check_display_ids,
            compare_precedes: self.compare_precedes,
            allow_precedes_cycles: self.allow_precedes_cycles,
            precedes_same_component: self.precedes_same_component,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ModelPolicyBuilder {
    duplicates: Option<DuplicatePolicy>,
    nucleotides: Option<NucleotidePolicy>,
    check_display_ids: Option<bool>,
    compare_precedes: Option<bool>,
    allow_precedes_cycles: Option<bool>,
    precedes_same_component: Option<bool>,
}

impl ModelPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = Some(policy);
        self
    }
    pub fn nucleotides(mut self, policy: NucleotidePolicy) -> Self {
        self.nucleotides = Some(policy);
        self
    }
    pub fn check_display_ids(mut self, on: bool) -> Self {
        self.check_display_ids = Some(on);
        self
    }
    pub fn compare_precedes(mut self, on: bool) -> Self {
        self.compare_precedes = Some(on);
        self
    }
    pub fn allow_precedes_cycles(mut self, on: bool) -> Self {
        self.allow_precedes_cycles = Some(on);
        self
    }
    pub fn precedes_same_component(mut self, on: bool) -> Self {
        self.precedes_same_component = Some(on);
        self
    }

    /// Fills unset switches from `base` instead of the defaults.
    pub fn build_on(self, base: &ModelPolicy) -> ModelPolicy {
        ModelPolicy {
            duplicates: self.duplicates.unwrap_or(base.duplicates),
            nucleotides: self.nucleotides.unwrap_or(base.nucleotides),
            check_display_ids: self.check_display_ids.unwrap_or(base.check_display_ids),
            compare_precedes: self.compare_precedes.unwrap_or(base.compare_precedes),
            allow_precedes_cycles: self
                .allow_precedes_cycles
                .unwrap_or(base.allow_precedes_cycles),
            precedes_same_component: self
                .precedes_same_component
                .unwrap_or(base.precedes_same_component),
        }
    }

    pub fn build(self) -> ModelPolicy {
        self.build_on(&ModelPolicy::default())
    }
}
