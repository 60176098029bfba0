//! File format detection by header and footer signatures.

pub mod sniff;
pub mod table;

pub use sniff::{sniff, Sniffer};
pub use table::SIGNATURES;

/// A byte pattern identifying a file format.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Signature {
    pub label: &'static str,
    pub header: &'static [u8],
    pub header_offset: usize,
    pub footer: Option<&'static [u8]>,
}

impl Signature {
    /// True if `bytes` is strictly longer than the header's end and carries the header there.
    pub fn header_matches(&self, bytes: &[u8]) -> bool {
        let end = self.header_offset + self.header.len();
        bytes.len() > end && &bytes[self.header_offset..end] == self.header
    }

    /// True if the signature declares a footer and `bytes` ends with it.
    ///
    /// A footer longer than the buffer never matches.
    pub fn footer_matches(&self, bytes: &[u8]) -> bool {
        match self.footer {
            Some(footer) if !footer.is_empty() && footer.len() <= bytes.len() => {
                &bytes[bytes.len() - footer.len()..] == footer
            }
            _ => false,
        }
    }

    pub fn header_range(&self) -> std::ops::Range<usize> {
        self.header_offset..self.header_offset + self.header.len()
    }
}

/// Outcome of sniffing a buffer. `signature == None` means unrecognized.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct DetectionResult<'a> {
    pub signature: Option<&'a Signature>,
    pub has_footer: bool,
}

impl<'a> DetectionResult<'a> {
    pub fn unrecognized() -> Self {
        DetectionResult {
            signature: None,
            has_footer: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.signature.map(|s| s.label).unwrap_or("*")
    }

    /// Whether the byte at `offset` belongs to the detected header, or to the
    /// footer when one was found at the end of a buffer of `size` bytes.
    pub fn is_marked(&self, offset: usize, size: usize) -> bool {
        let signature = match self.signature {
            Some(signature) => signature,
            None => return false,
        };
        if signature.header_range().contains(&offset) {
            return true;
        }
        match signature.footer {
            Some(footer) if self.has_footer && footer.len() <= size => {
                offset >= size - footer.len() && offset < size
            }
            _ => false,
        }
    }
}
