use oxrdf::NamedNode;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An absolute IRI identifying an SBOL object or an ontology term.
///
/// Construction validates the text with [`oxrdf::NamedNode`], so every
/// `Uri` held by the model is well formed. The text is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri {
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("invalid URI: '{value}'")]
    Invalid { value: String },
}

impl Uri {
    pub fn new(value: impl Into<String>) -> Result<Self, UriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| UriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = UriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
