//! Integration tests for frame assembly and parsing.

use sealtext::crypto::TAG_LEN;
use sealtext::errors::SealError;
use sealtext::frame::{self, assemble, FrameHeader, CURRENT_VERSION};

fn frame_with(ciphertext: &[u8]) -> Vec<u8> {
    let header = FrameHeader::new(120_000, vec![0xA1; 12], vec![0xB2; 12]);
    assemble(&header.to_bytes(), ciphertext, &[0xCC; TAG_LEN])
}

#[test]
fn default_frame_size_is_header_plus_ciphertext_plus_tag() {
    let frame = frame_with(&[0u8; 21]);
    // 1 + 4 + 1 + 12 + 1 + 12 = 31 header bytes.
    assert_eq!(frame.len(), 31 + 21 + TAG_LEN);
}

#[test]
fn iterations_are_big_endian_after_version() {
    let frame = frame_with(b"x");
    assert_eq!(frame[0], CURRENT_VERSION);
    assert_eq!(&frame[1..5], &120_000u32.to_be_bytes());
    assert_eq!(frame[5], 12);
    assert_eq!(frame[18], 12);
}

#[test]
fn parse_recovers_the_header() {
    let header = FrameHeader::new(77, b"salty".to_vec(), b"nonce!".to_vec());
    let bytes = assemble(&header.to_bytes(), b"payload", &[1; TAG_LEN]);
    let parsed = frame::parse(&bytes).expect("parse");
    assert_eq!(parsed.to_header(), header);
    assert_eq!(parsed.ciphertext, b"payload");
}

#[test]
fn every_truncation_is_a_format_error() {
    let bytes = frame_with(b"");
    for len in 0..bytes.len() {
        let err = frame::parse(&bytes[..len]).expect_err("truncated frame must fail");
        assert!(matches!(err, SealError::Format(_)), "len {len}: {err}");
    }
}

#[test]
fn nonce_length_past_end_is_a_format_error() {
    let mut bytes = frame_with(b"");
    // Claim a 255-byte nonce.
    bytes[18] = 0xFF;
    assert!(matches!(frame::parse(&bytes), Err(SealError::Format(_))));
}

#[test]
fn version_zero_is_rejected() {
    let mut bytes = frame_with(b"abc");
    bytes[0] = 0;
    assert!(matches!(frame::parse(&bytes), Err(SealError::Format(_))));
}
