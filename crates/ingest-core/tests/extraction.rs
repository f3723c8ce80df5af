//! End-to-end extraction behavior over synthetic multipart bodies.

use ingest_core::{ErrorKind, IngestError, Preset, UploadConfig, parse};
use proptest::prelude::*;

fn file_part(boundary: &str, field: &str, filename: &str, mime: &str, payload: &[u8]) -> Vec<u8> {
    let mut part = Vec::new();
    part.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    part.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    part.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
    part.extend_from_slice(payload);
    part.extend_from_slice(b"\r\n");
    part
}

fn field_part(boundary: &str, field: &str, value: &str) -> Vec<u8> {
    format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
        .into_bytes()
}

fn closing(boundary: &str) -> Vec<u8> {
    format!("--{boundary}--\r\n").into_bytes()
}

fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

#[test]
fn single_byte_boundary_scenario() {
    let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe, 0x0d, 0x0a, 0x1a];
    let mut body = file_part("X", "file", "a.png", "image/png", &payload);
    body.extend_from_slice(&closing("X"));

    let file = parse(&body, &content_type("X"), &UploadConfig::default())
        .expect("parse")
        .expect("file");
    assert_eq!(file.field_name(), "file");
    assert_eq!(file.original_name(), "a.png");
    assert_eq!(file.mime_type(), "image/png");
    assert_eq!(file.content(), payload.as_slice());
    assert_eq!(file.size(), payload.len());
}

#[test]
fn non_matching_part_is_skipped() {
    let mut body = file_part("b0und", "avatar", "face.jpg", "image/jpeg", b"face");
    body.extend_from_slice(&field_part("b0und", "title", "hello"));
    body.extend_from_slice(&file_part("b0und", "file", "doc.txt", "text/plain", b"doc body"));
    body.extend_from_slice(&closing("b0und"));

    let file = parse(&body, &content_type("b0und"), &UploadConfig::default())
        .expect("parse")
        .expect("file");
    assert_eq!(file.original_name(), "doc.txt");
    assert_eq!(file.content(), b"doc body");
}

#[test]
fn no_matching_field_is_not_an_error() {
    let mut body = field_part("b", "title", "hello");
    body.extend_from_slice(&file_part("b", "other", "x.bin", "application/octet-stream", b"x"));
    body.extend_from_slice(&closing("b"));

    let result = parse(&body, &content_type("b"), &UploadConfig::default()).expect("parse");
    assert!(result.is_none());
}

#[test]
fn image_preset_rejects_pdf() {
    let mut body = file_part("b", "file", "doc.pdf", "application/pdf", b"%PDF-1.7");
    body.extend_from_slice(&closing("b"));

    let err = parse(&body, &content_type("b"), &Preset::Image.config()).unwrap_err();
    assert!(matches!(
        err,
        IngestError::UnsupportedMediaType { ref mime_type } if mime_type == "application/pdf"
    ));
}

#[test]
fn media_preset_accepts_images_and_documents() {
    let config = Preset::Media.config();
    for mime in ["image/png", "application/pdf", "text/plain"] {
        let mut body = file_part("b", "file", "f", mime, b"data");
        body.extend_from_slice(&closing("b"));
        let file = parse(&body, &content_type("b"), &config)
            .expect("parse")
            .expect("file");
        assert_eq!(file.mime_type(), mime);
    }
}

#[test]
fn allowlist_png_only_rejects_pdf() {
    let mut body = file_part("b", "file", "doc.pdf", "application/pdf", b"%PDF");
    body.extend_from_slice(&closing("b"));

    let config = UploadConfig::new().allowed_mime_types(["image/png"]);
    let err = parse(&body, &content_type("b"), &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
}

#[test]
fn quoted_boundary_in_header() {
    let mut body = file_part("with space", "file", "a.txt", "text/plain", b"quoted");
    body.extend_from_slice(&closing("with space"));

    let file = parse(
        &body,
        "multipart/form-data; boundary=\"with space\"",
        &UploadConfig::default(),
    )
    .expect("parse")
    .expect("file");
    assert_eq!(file.content(), b"quoted");
}

fn payload_without(delimiter: &'static [u8]) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..2048).prop_filter(
        "payload must not contain the delimiter",
        move |bytes| !bytes.windows(delimiter.len()).any(|w| w == delimiter),
    )
}

proptest! {
    #[test]
    fn binary_payload_round_trips(
        payload in payload_without(b"--Zq7boundary"),
        filename in "[a-zA-Z0-9_.-]{1,24}",
        field in "[a-z]{1,12}",
        mime in prop::sample::select(vec!["image/png", "application/pdf", "application/octet-stream"]),
    ) {
        let mut body = field_part("Zq7boundary", "note", "before");
        body.extend_from_slice(&file_part("Zq7boundary", &field, &filename, mime, &payload));
        body.extend_from_slice(&closing("Zq7boundary"));

        let config = UploadConfig::new().field_name(field.clone()).max_file_size(body.len());
        let file = parse(&body, &content_type("Zq7boundary"), &config)
            .expect("parse")
            .expect("file");

        prop_assert_eq!(file.field_name(), field.as_str());
        prop_assert_eq!(file.original_name(), filename.as_str());
        prop_assert_eq!(file.mime_type(), mime);
        prop_assert_eq!(file.size(), payload.len());
        prop_assert_eq!(file.content(), payload.as_slice());
    }

    #[test]
    fn bodies_over_limit_are_rejected(
        payload in proptest::collection::vec(any::<u8>(), 1..512),
        slack in 1usize..64,
    ) {
        let mut body = file_part("lim", "file", "a", "text/plain", &payload);
        body.extend_from_slice(&closing("lim"));
        let max = body.len().saturating_sub(slack);

        let config = UploadConfig::new().max_file_size(max);
        let err = parse(&body, &content_type("lim"), &config).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);
        prop_assert_eq!(err.status_code(), 413);
    }
}
