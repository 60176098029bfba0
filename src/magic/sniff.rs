use std::collections::HashMap;

use lazy_static::lazy_static;
use tracing::debug;

use super::{DetectionResult, Signature, SIGNATURES};

lazy_static! {
    static ref DEFAULT_SNIFFER: Sniffer<'static> = Sniffer::new(SIGNATURES);
}

/// Classifies `bytes` against the built-in signature table.
pub fn sniff(bytes: &[u8]) -> DetectionResult<'static> {
    DEFAULT_SNIFFER.sniff(bytes)
}

/// Signature matcher over an ordered table.
///
/// Besides the table itself, keeps every label's variants in table order so
/// the footer tie-break does not depend on where those variants sit.
pub struct Sniffer<'a> {
    table: &'a [Signature],
    variants: HashMap<&'static str, Vec<usize>>,
}

impl<'a> Sniffer<'a> {
    pub fn new(table: &'a [Signature]) -> Sniffer<'a> {
        let mut variants: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for (i, signature) in table.iter().enumerate() {
            variants.entry(signature.label).or_default().push(i);
        }
        Sniffer { table, variants }
    }

    pub fn table(&self) -> &'a [Signature] {
        self.table
    }

    /// Indices of every entry carrying `label`, in table order.
    pub fn variants_of(&self, label: &str) -> &[usize] {
        self.variants.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sniff(&self, bytes: &[u8]) -> DetectionResult<'a> {
        let candidate = match self.table.iter().find(|s| s.header_matches(bytes)) {
            Some(candidate) => candidate,
            None => {
                debug!(size = bytes.len(), "no signature matched");
                return DetectionResult::unrecognized();
            }
        };

        let chosen = self.refine(candidate, bytes).unwrap_or(candidate);
        let has_footer = chosen.footer_matches(bytes);
        debug!(
            label = chosen.label,
            header_offset = chosen.header_offset,
            has_footer,
            "signature matched"
        );
        DetectionResult {
            signature: Some(chosen),
            has_footer,
        }
    }

    /// First same-label variant with a footer whose header and footer both match.
    fn refine(&self, candidate: &Signature, bytes: &[u8]) -> Option<&'a Signature> {
        let variants = self.variants_of(candidate.label);
        if variants.len() < 2 {
            return None;
        }
        variants
            .iter()
            .map(|&i| &self.table[i])
            .filter(|s| s.footer.is_some())
            .find(|s| s.header_matches(bytes) && s.footer_matches(bytes))
    }
}
