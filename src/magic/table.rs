use super::Signature;

const fn sig(label: &'static str, header: &'static [u8], footer: Option<&'static [u8]>) -> Signature {
    Signature {
        label,
        header,
        header_offset: 0,
        footer,
    }
}

const fn sig_at(
    label: &'static str,
    header: &'static [u8],
    header_offset: usize,
    footer: Option<&'static [u8]>,
) -> Signature {
    Signature {
        label,
        header,
        header_offset,
        footer,
    }
}

const OLE: &[u8] = b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1\x00\x00\x00\x00\x00\x00\x00\x00";
const PK_LOCAL: &[u8] = b"\x50\x4b\x03\x04";
const PK_OFFICE_END: &[u8] = b"\x4b\x05\x06\x00";
const RAR_END: &[u8] = b"\x00\x00\x00\x00\x00\x00\x00\x00";

/// Known format signatures, checked in order.
///
/// Entries sharing a label stay next to each other; the first entry whose
/// header matches wins unless a same-label sibling also matches the footer.
/// Sources: foremost's `state.c` and Gary Kessler's file signature table.
pub static SIGNATURES: &[Signature] = &[
    sig("jpg", b"\xff\xd8\xff\xe0\x00\x10JFIF\x00", Some(b"\xff\xd9")),
    // EXIF
    sig("jpg", b"\xff\xd8\xff\xe1", Some(b"\xff\xd9")),
    sig("gif", b"GIF87a", Some(b"\x00\x3b")),
    sig("gif", b"GIF89a", Some(b"\x00\x3b")),
    sig("tif", b"\x49\x20\x49", None),
    sig("tif", b"\x49\x49\x2a\x00", None),
    sig("bmp", b"BM", None),
    sig("mp3", b"ID3", None),
    sig_at("mp4", b"ftypisom", 4, None),
    sig("exe", b"MZ", None),
    sig("elf", b"\x7fELF", None),
    sig("reg", b"regf", None),
    sig("mpg", b"\x00\x00\x01\xba", Some(b"\x00\x00\x01\xb9")),
    sig(
        "wmv",
        b"\x30\x26\xb2\x75\x8e\x66\xcf\x11",
        Some(b"\xa1\xdc\xab\x8c\x47\xa9"),
    ),
    sig("avi", b"RIFF", Some(b"INFO")),
    sig("rif", b"RIFF", Some(b"INFO")),
    sig("wav", b"RIFF", Some(b"INFO")),
    sig("htm", b"<?htm", Some(b"</html>")),
    sig("xml", b"<?xml", None),
    sig("ole", OLE, None),
    sig("doc", OLE, None),
    sig("xls", OLE, None),
    sig("ppt", OLE, None),
    sig("7z", b"\x37\x7a\xbc\xaf\x27\x1c", None),
    sig("zip", PK_LOCAL, Some(b"\x50\x4b\x05\x06")),
    sig("zip", b"\x50\x4b\x05\x04", Some(b"\x50\x4b\x05\x06")),
    sig("zip", b"\x50\x4b\x07\x04", Some(b"\x50\x4b\x05\x06")),
    sig("rar", b"Rar!\x1a\x07\x00", Some(RAR_END)),
    sig("rar", b"Rar!\x1a\x07\x01\x00", Some(RAR_END)),
    sig("sxw", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("sxc", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("sxi", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("docx", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("pptx", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("xlsx", PK_LOCAL, Some(PK_OFFICE_END)),
    sig("gz", b"\x1f\x8b\x08", Some(b"\x00\x00\x00\x00")),
    sig("pdf", b"%PDF", Some(b"\x0a%%EOF")),
    sig("pdf", b"%PDF", Some(b"\x0a%%EOF\x0a")),
    sig("pdf", b"%PDF", Some(b"\x0d\x0a%%EOF\x0d\x0a")),
    sig("pdf", b"%PDF", Some(b"\x0d%%EOF\x0d")),
    sig("mov", b"pnot", None),
    sig("mov", b"moov", None),
    sig("wpd", b"\xffWPC", None),
    sig("c", b"#include", None),
    // IEND chunk type followed by its CRC, which is constant since IEND is empty.
    sig(
        "png",
        b"\x89PNG\x0d\x0a\x1a\x0a",
        Some(b"IEND\xae\x42\x60\x82"),
    ),
    sig("mach-o", b"\xca\xfe\xba\xbe", None),
    sig("mach-o", b"\xcf\xfa\xed\xfe", None),
    sig("mach-o", b"\xcf\xfa\xed\xff", None),
    sig("mach-o", b"\xfe\xed\xfa\xce", None),
    sig_at("mach-o", b"\xfe\xed\xfa\xce", 0x1000, None),
    sig("mach-o", b"\xfe\xed\xfa\xcf", None),
    sig_at("mach-o", b"\xfe\xed\xfa\xcf", 0x1000, None),
    sig("flac", b"fLaC", None),
    sig("dmg", b"koly", None),
    sig("pa30", b"PA30", None),
    sig("pcap", b"\xa1\xb2\xc3\xd4", None),
    sig("pcap", b"\xd4\xc3\xb2\xa1", None),
    sig("pcap", b"\xa1\xb2\x3c\x4d", None),
    sig("pcap", b"\x4d\x3c\xb2\xa1", None),
    sig("pcapng", b"\x0a\x0d\x0d\x0a", None),
    sig("vbe", b"#@~^", None),
    sig("psd", b"8BPS", None),
    sig("ttf", b"\x00\x01\x00\x00\x00", None),
    sig("swf", b"FWS", None),
    sig("py", b"#!/usr/bin/python", None),
    sig("pl", b"#!/usr/bin/perl", None),
    sig("sh", b"#!/bin/sh", None),
    sig("sh", b"#!/bin/bash", None),
    sig("wasm", b"\x00asm\x01\x00\x00\x00", None),
    sig_at("tar", b"ustar\x0000", 257, None),
    sig_at("tar", b"ustar  \x00", 257, None),
    sig_at("iso", b"CD001", 0x8001, None),
    sig_at("iso", b"CD001", 0x8801, None),
    sig_at("iso", b"CD001", 0x9001, None),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn headers_are_never_empty() {
        for signature in SIGNATURES {
            assert!(!signature.header.is_empty(), "{}", signature.label);
            if let Some(footer) = signature.footer {
                assert!(!footer.is_empty(), "{}", signature.label);
            }
        }
    }

    #[test]
    fn same_labels_are_contiguous() {
        let mut seen = HashSet::new();
        let mut previous = "";
        for signature in SIGNATURES {
            if signature.label != previous {
                assert!(
                    seen.insert(signature.label),
                    "label {} appears in two separate runs",
                    signature.label
                );
                previous = signature.label;
            }
        }
    }
}
