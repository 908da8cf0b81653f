use super::ids::{AnnotationId, ComponentId};
use super::uri::Uri;
use crate::core::error::ModelError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Orientation of a feature relative to the 5'→3' direction of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    /// `+`: same direction as the annotated component.
    Forward,
    /// `-`: opposite direction.
    Reverse,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid strand string '{0}'")]
pub struct ParseStrandError(pub String);

impl FromStr for Strand {
    type Err = ParseStrandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(ParseStrandError(s.to_string())),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Strand {
    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl From<ParseStrandError> for ModelError {
    fn from(e: ParseStrandError) -> Self {
        ModelError::InvalidStrand { value: e.0 }
    }
}

/// A positioned, directional marker on a component's sequence.
///
/// Coordinates are 1-based and inclusive. The setters reject `0` and any
/// change that would leave `start > end`; either coordinate may stay unset.
#[derive(Debug, Clone, Default)]
pub struct SequenceAnnotation {
    pub uri: Option<Uri>,
    bio_start: Option<usize>,
    bio_end: Option<usize>,
    strand: Option<Strand>,
    pub(crate) sub_components: Vec<ComponentId>, // Features located here, value-distinct
    pub(crate) precedes: Vec<AnnotationId>,      // Successor edges, unique by id
    pub(crate) owner: Option<ComponentId>,       // Component whose annotation set holds this one
}

impl SequenceAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// An annotation spanning `start..=end` on `strand`.
    pub fn located(start: usize, end: usize, strand: Strand) -> Result<Self, ModelError> {
        let mut annotation = Self::new();
        annotation.set_location(start, end)?;
        annotation.set_strand(strand);
        Ok(annotation)
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn bio_start(&self) -> Option<usize> {
        self.bio_start
    }

    pub fn bio_end(&self) -> Option<usize> {
        self.bio_end
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn set_bio_start(&mut self, start: usize) -> Result<(), ModelError> {
        check_range(Some(start), self.bio_end)?;
        self.bio_start = Some(start);
        Ok(())
    }

    pub fn set_bio_end(&mut self, end: usize) -> Result<(), ModelError> {
        check_range(self.bio_start, Some(end))?;
        self.bio_end = Some(end);
        Ok(())
    }

    /// Sets both coordinates at once, so a range can be moved past the
    /// current one without tripping the ordering check halfway.
    pub fn set_location(&mut self, start: usize, end: usize) -> Result<(), ModelError> {
        check_range(Some(start), Some(end))?;
        self.bio_start = Some(start);
        self.bio_end = Some(end);
        Ok(())
    }

    pub fn set_strand(&mut self, strand: Strand) {
        self.strand = Some(strand);
    }

    /// Sets the strand from its `+`/`-` text form.
    pub fn set_strand_symbol(&mut self, symbol: &str) -> Result<(), ModelError> {
        self.strand = Some(symbol.parse::<Strand>()?);
        Ok(())
    }

    pub fn sub_components(&self) -> &[ComponentId] {
        &self.sub_components
    }

    pub fn precedes(&self) -> &[AnnotationId] {
        &self.precedes
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    /// Number of bases covered, when both coordinates are known.
    pub fn span(&self) -> Option<usize> {
        match (self.bio_start, self.bio_end) {
            (Some(start), Some(end)) => Some(end - start + 1),
            _ => None,
        }
    }

    pub(crate) fn label(&self) -> String {
        let coord = |c: Option<usize>| c.map_or_else(|| String::from("?"), |v| v.to_string());
        format!(
            "{}..{} ({})",
            coord(self.bio_start),
            coord(self.bio_end),
            self.strand.map_or("?", |s| s.symbol())
        )
    }
}

fn check_range(start: Option<usize>, end: Option<usize>) -> Result<(), ModelError> {
    for position in [start, end].into_iter().flatten() {
        if position == 0 {
            return Err(ModelError::InvalidPosition { position });
        }
    }
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ModelError::InvalidRange { start, end });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_parses_and_displays_symbols() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Reverse);
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }

    #[test]
    fn strand_rejects_other_text() {
        assert!("".parse::<Strand>().is_err());
        assert!("forward".parse::<Strand>().is_err());
        assert!(" +".parse::<Strand>().is_err());
    }

    #[test]
    fn coordinates_and_strand_read_back() {
        let annotation = SequenceAnnotation::located(10, 20, Strand::Forward).unwrap();
        assert_eq!(annotation.bio_start(), Some(10));
        assert_eq!(annotation.bio_end(), Some(20));
        assert_eq!(annotation.strand().unwrap().to_string(), "+");
        assert_eq!(annotation.span(), Some(11));
    }

    #[test]
    fn start_after_end_is_rejected() {
        assert_eq!(
            SequenceAnnotation::located(5, 3, Strand::Forward).unwrap_err(),
            ModelError::InvalidRange { start: 5, end: 3 }
        );
    }

    #[test]
    fn single_base_annotation_is_allowed() {
        let annotation = SequenceAnnotation::located(7, 7, Strand::Reverse).unwrap();
        assert_eq!(annotation.span(), Some(1));
    }

    #[test]
    fn individual_setters_check_against_the_other_coordinate() {
        let mut annotation = SequenceAnnotation::new();
        annotation.set_bio_end(3).unwrap();
        assert_eq!(
            annotation.set_bio_start(5),
            Err(ModelError::InvalidRange { start: 5, end: 3 })
        );
        assert_eq!(annotation.bio_start(), None);

        annotation.set_bio_start(2).unwrap();
        assert_eq!(
            annotation.set_bio_end(1),
            Err(ModelError::InvalidRange { start: 2, end: 1 })
        );
        assert_eq!(annotation.bio_end(), Some(3));
    }

    #[test]
    fn set_location_moves_a_range_in_one_step() {
        let mut annotation = SequenceAnnotation::located(1, 5, Strand::Forward).unwrap();
        annotation.set_location(100, 200).unwrap();
        assert_eq!(annotation.bio_start(), Some(100));
        assert_eq!(annotation.bio_end(), Some(200));
    }

    #[test]
    fn zero_is_not_a_coordinate() {
        let mut annotation = SequenceAnnotation::new();
        assert_eq!(
            annotation.set_bio_start(0),
            Err(ModelError::InvalidPosition { position: 0 })
        );
        assert_eq!(
            annotation.set_location(0, 4),
            Err(ModelError::InvalidPosition { position: 0 })
        );
    }

    #[test]
    fn strand_symbol_setter_maps_parse_errors() {
        let mut annotation = SequenceAnnotation::new();
        annotation.set_strand_symbol("-").unwrap();
        assert_eq!(annotation.strand(), Some(Strand::Reverse));
        assert_eq!(
            annotation.set_strand_symbol("x"),
            Err(ModelError::InvalidStrand { value: "x".into() })
        );
        assert_eq!(annotation.strand(), Some(Strand::Reverse));
    }

    #[test]
    fn new_annotation_has_no_links() {
        let annotation = SequenceAnnotation::new();
        assert!(annotation.sub_components().is_empty());
        assert!(annotation.precedes().is_empty());
        assert!(annotation.owner().is_none());
        assert_eq!(annotation.span(), None);
        assert_eq!(annotation.label(), "?..? (?)");
    }
}
