use hexing::magic::{sniff, Signature, SIGNATURES};

fn planted(signature: &Signature) -> Vec<u8> {
    let mut bytes = vec![0u8; signature.header_offset + signature.header.len() + 1];
    bytes[signature.header_range()].copy_from_slice(signature.header);
    bytes
}

// An earlier entry with identical header bytes at the same offset wins the
// match, which is expected: the two cannot be told apart by header alone.
fn shadowed_by(signature: &Signature) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|other| {
        other.header == signature.header && other.header_offset == signature.header_offset
    })
}

#[test]
fn every_signature_is_detected_from_its_header() {
    for signature in SIGNATURES {
        let result = sniff(&planted(signature));
        let found = result
            .signature
            .unwrap_or_else(|| panic!("{} not detected", signature.label));
        let expected = shadowed_by(signature).unwrap_or(signature);
        assert_eq!(
            found.label, expected.label,
            "planted {} at {:#x}",
            signature.label, signature.header_offset
        );
    }
}

#[test]
fn bytes_without_known_header_are_unrecognized() {
    let bytes: Vec<u8> = (0..0x9100u32).map(|i| 0x55 ^ (i % 7) as u8).collect();
    let result = sniff(&bytes);
    assert!(result.signature.is_none());
    assert!(!result.has_footer);
    assert_eq!(result.label(), "*");
}

#[test]
fn minimal_png_has_its_footer() {
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    // IHDR: 1x1, 8-bit grayscale
    png.extend_from_slice(b"\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x00\x00\x00\x00\x3a\x7e\x9b\x55");
    png.extend_from_slice(b"\x00\x00\x00\x00IEND\xae\x42\x60\x82");
    let result = sniff(&png);
    assert_eq!(result.label(), "png");
    assert!(result.has_footer);
    assert!(result.is_marked(0, png.len()));
    assert!(result.is_marked(png.len() - 1, png.len()));
    assert!(!result.is_marked(10, png.len()));
}

#[test]
fn zip_with_end_of_central_directory() {
    let mut zip = b"PK\x03\x04".to_vec();
    zip.extend_from_slice(&[0u8; 26]);
    zip.extend_from_slice(b"PK\x05\x06");
    let result = sniff(&zip);
    assert_eq!(result.label(), "zip");
    assert!(result.has_footer);
}

#[test]
fn footer_longer_than_buffer_is_a_miss() {
    // shorter than every pdf footer
    let result = sniff(b"%PDFx");
    assert_eq!(result.label(), "pdf");
    assert!(!result.has_footer);

    // two-byte footer fits but is not there
    let result = sniff(b"\xff\xd8\xff\xe1\x00");
    assert_eq!(result.label(), "jpg");
    assert!(!result.has_footer);
}

#[test]
fn exif_jpeg_with_end_marker() {
    let result = sniff(b"\xff\xd8\xff\xe1\x00\x10Exif\x00\x00\xff\xd9");
    let signature = result.signature.expect("jpg");
    assert_eq!(signature.header, b"\xff\xd8\xff\xe1");
    assert!(result.has_footer);
}
