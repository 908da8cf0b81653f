//! Nucleotide alphabets accepted in `DnaSequence` text.
//!
//! Sequences are stored verbatim, so membership is tested case-insensitively
//! without rewriting the input.

/// A fixed set of accepted nucleotide symbols (uppercase).
pub trait Alphabet {
    /// Human-readable name used in diagnostics.
    const NAME: &'static str;

    /// The accepted uppercase symbols.
    const SYMBOLS: &'static [u8];

    fn accepts(symbol: char) -> bool {
        symbol.is_ascii() && Self::SYMBOLS.contains(&(symbol as u8).to_ascii_uppercase())
    }
}

/// IUPAC nucleotide codes including ambiguity symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IupacDna;

impl Alphabet for IupacDna {
    const NAME: &'static str = "IUPAC DNA";
    const SYMBOLS: &'static [u8] = b"ACGTRYSWKMBDHVN";
}

/// The four unambiguous DNA bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalDna;

impl Alphabet for CanonicalDna {
    const NAME: &'static str = "canonical DNA";
    const SYMBOLS: &'static [u8] = b"ACGT";
}

/// Returns the 0-based character offset and symbol of the first character
/// of `text` rejected by `A`.
pub fn first_invalid<A: Alphabet>(text: &str) -> Option<(usize, char)> {
    text.chars().enumerate().find(|&(_, c)| !A::accepts(c))
}
