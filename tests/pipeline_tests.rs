//! End-to-end tests for the encrypt and decrypt pipelines.

use proptest::prelude::*;
use sealtext::crypto::{codec, TAG_LEN};
use sealtext::errors::SealError;
use sealtext::frame::{self, FrameHeader};
use sealtext::pipeline::{
    decrypt, encrypt, open_frame, seal_frame, CancellationToken, DecryptOptions, EncryptOptions,
    NoProgress, ProgressLog, Sealer, Stage,
};

const PASSPHRASE: &str = "correct-horse-battery";

fn fast() -> EncryptOptions {
    EncryptOptions {
        iterations: 1_000,
        ..EncryptOptions::default()
    }
}

fn seal(plaintext: &str, options: &EncryptOptions) -> String {
    encrypt(plaintext, PASSPHRASE, options, &mut NoProgress).expect("encrypt should succeed")
}

fn open(ciphertext: &str, passphrase: &str) -> Result<String, SealError> {
    decrypt(ciphertext, passphrase, &DecryptOptions::default(), &mut NoProgress)
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let ct = seal("DATABASE_URL=postgres://localhost/mydb", &fast());
    assert_eq!(open(&ct, PASSPHRASE).expect("decrypt"), "DATABASE_URL=postgres://localhost/mydb");
}

#[test]
fn unicode_text_roundtrip_with_default_iterations() {
    let plaintext = "Привет, мир!";
    assert_eq!(plaintext.len(), 21);

    let options = EncryptOptions {
        salt: Some(codec::encode(b"fixed-salt-1")),
        ..EncryptOptions::default()
    };
    let a = seal(plaintext, &options);
    let b = seal(plaintext, &options);

    // Independent nonces give different outputs of the same size.
    assert_ne!(a, b);
    let (da, db) = (codec::decode(&a).unwrap(), codec::decode(&b).unwrap());
    assert_eq!(da.len(), db.len());
    assert_eq!(da.len(), 31 + 21 + TAG_LEN);

    let parsed = frame::parse(&da).unwrap();
    assert_eq!(parsed.iterations, 120_000);
    assert_eq!(parsed.salt, b"fixed-salt-1");

    assert_eq!(open(&a, PASSPHRASE).unwrap(), plaintext);
    assert_eq!(open(&b, PASSPHRASE).unwrap(), plaintext);
}

#[test]
fn output_is_unpadded_base64url() {
    let ct = seal("some text that needs encoding", &fast());
    assert!(ct
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn decrypt_tolerates_surrounding_whitespace() {
    let ct = seal("hello", &fast());
    assert_eq!(open(&format!("  {ct}\n"), PASSPHRASE).unwrap(), "hello");
}

// ---------------------------------------------------------------------------
// Integrity
// ---------------------------------------------------------------------------

#[test]
fn wrong_passphrase_is_an_integrity_error() {
    let ct = seal("secret", &fast());
    let err = open(&ct, "not-the-passphrase").expect_err("wrong passphrase must fail");
    assert!(matches!(err, SealError::Integrity));
}

#[test]
fn every_single_bit_flip_is_detected() {
    let options = EncryptOptions {
        iterations: 100,
        ..EncryptOptions::default()
    };
    let ct = seal("tamper with me", &options);
    let bytes = codec::decode(&ct).unwrap();
    // 1 + 4 + 1 + 12 + 1 + 12 header bytes with the default lengths.
    let (salt_len_at, nonce_len_at) = (5, 18);

    // Bytes 0..3 are the version and the high iteration bytes.  Flipping
    // a bit in bytes 3 and 4 keeps the count below 2^16.
    for i in 3..bytes.len() {
        for bit in 0..8 {
            let mut tampered = bytes.clone();
            tampered[i] ^= 1 << bit;
            let err = open(&codec::encode(&tampered), PASSPHRASE).expect_err("tamper must fail");

            if i == salt_len_at || i == nonce_len_at {
                // A changed length may no longer fit the buffer.
                assert!(
                    matches!(err, SealError::Integrity | SealError::Format(_)),
                    "byte {i} bit {bit}: {err}"
                );
            } else {
                assert!(matches!(err, SealError::Integrity), "byte {i} bit {bit}: {err}");
            }
        }
    }
}

#[test]
fn version_byte_flip_is_a_format_error() {
    let mut bytes = codec::decode(&seal("hello", &fast())).unwrap();
    for bit in 0..8 {
        bytes[0] ^= 1 << bit;
        let err = open(&codec::encode(&bytes), PASSPHRASE).expect_err("bad version must fail");
        assert!(matches!(err, SealError::Format(_)), "bit {bit}: {err}");
        bytes[0] ^= 1 << bit;
    }
}

#[test]
fn zero_iteration_frame_is_a_format_error() {
    let mut bytes = codec::decode(&seal("hello", &fast())).unwrap();
    bytes[1..5].copy_from_slice(&0u32.to_be_bytes());
    let mut log = ProgressLog::new();
    let err = decrypt(
        &codec::encode(&bytes),
        PASSPHRASE,
        &DecryptOptions::default(),
        &mut log,
    )
    .unwrap_err();
    assert!(matches!(err, SealError::Format(_)));
    assert!(!log.stages().contains(&Stage::DeriveKey));
}

#[test]
fn tag_failure_stops_before_keystream() {
    let ct = seal("hello", &fast());
    let mut log = ProgressLog::new();
    let err = decrypt(&ct, "wrong-passphrase", &DecryptOptions::default(), &mut log).unwrap_err();
    assert!(matches!(err, SealError::Integrity));

    let stages = log.stages();
    assert!(stages.contains(&Stage::DeriveKey));
    assert!(!stages.contains(&Stage::VerifyTag));
    assert!(!stages.contains(&Stage::Keystream));
    let last = log.last().unwrap();
    assert_eq!(last.stage, Stage::Error);
    assert_eq!(last.label, "Decryption failed");
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn short_frame_fails_before_key_derivation() {
    let mut log = ProgressLog::new();
    let err = decrypt(
        &codec::encode(&[1u8; 38]),
        PASSPHRASE,
        &DecryptOptions::default(),
        &mut log,
    )
    .unwrap_err();

    assert!(matches!(err, SealError::Format(_)));
    assert!(!log.stages().contains(&Stage::DeriveKey));
    assert_eq!(log.stages(), vec![Stage::Validate, Stage::Error]);
}

#[test]
fn non_base64_input_is_a_format_error() {
    assert!(matches!(open("this is not *base64*", PASSPHRASE), Err(SealError::Format(_))));
}

#[test]
fn empty_inputs_are_validation_errors() {
    let err = encrypt("", PASSPHRASE, &fast(), &mut NoProgress).unwrap_err();
    assert!(matches!(err, SealError::Validation(_)));
    assert!(matches!(open("   ", PASSPHRASE), Err(SealError::Validation(_))));
}

#[test]
fn zero_iterations_are_rejected_on_encrypt() {
    let options = EncryptOptions {
        iterations: 0,
        ..EncryptOptions::default()
    };
    let err = encrypt("hello", PASSPHRASE, &options, &mut NoProgress).unwrap_err();
    assert!(matches!(err, SealError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Raw frames
// ---------------------------------------------------------------------------

#[test]
fn empty_plaintext_frame_roundtrips() {
    let header = FrameHeader::new(10, b"salt".to_vec(), b"nonce".to_vec());
    let cancel = CancellationToken::new();
    let frame = seal_frame(b"", b"pw", &header, &mut NoProgress, &cancel).unwrap();
    assert_eq!(frame.len(), header.encoded_len() + TAG_LEN);

    let plaintext = open_frame(&frame, b"pw", &mut NoProgress, &cancel).unwrap();
    assert!(plaintext.is_empty());
}

#[test]
fn raw_frames_carry_binary_data() {
    let header = FrameHeader::new(5, vec![0; 16], vec![0xff; 24]);
    let data: Vec<u8> = (0..=255).collect();
    let cancel = CancellationToken::new();

    let frame = seal_frame(&data, b"pw", &header, &mut NoProgress, &cancel).unwrap();
    let parsed = frame::parse(&frame).unwrap();
    assert_eq!(parsed.to_header(), header);
    assert_ne!(parsed.ciphertext, data.as_slice());

    assert_eq!(open_frame(&frame, b"pw", &mut NoProgress, &cancel).unwrap(), data);
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[test]
fn keystream_progress_counts_blocks() {
    let mut log = ProgressLog::new();
    Sealer::new()
        .encrypt(&"x".repeat(100), PASSPHRASE, &fast(), &mut log)
        .unwrap();

    let labels: Vec<&str> = log
        .events()
        .iter()
        .filter(|e| e.stage == Stage::Keystream)
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "HMAC stream: 0/4 blocks",
            "HMAC stream: 1/4 blocks",
            "HMAC stream: 2/4 blocks",
            "HMAC stream: 3/4 blocks",
            "HMAC stream: 4/4 blocks",
        ]
    );
    let last = log.last().unwrap();
    assert_eq!(last.stage, Stage::Done);
    assert_eq!(last.percent, Some(100));
}

#[test]
fn closure_observer_sees_every_event() {
    let mut seen = Vec::new();
    let ct = seal("hello", &fast());
    decrypt(&ct, PASSPHRASE, &DecryptOptions::default(), &mut |e: &sealtext::ProgressEvent| {
        seen.push(e.stage)
    })
    .unwrap();

    assert_eq!(seen.first(), Some(&Stage::Validate));
    assert_eq!(seen.last(), Some(&Stage::Done));
    assert_eq!(seen.iter().filter(|s| s.is_terminal()).count(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_text_roundtrips(text in "\\PC{1,64}", passphrase in "[a-zA-Z0-9]{4,16}") {
        let options = EncryptOptions { iterations: 1, ..EncryptOptions::default() };
        let ct = encrypt(&text, &passphrase, &options, &mut NoProgress).unwrap();
        let pt = decrypt(&ct, &passphrase, &DecryptOptions::default(), &mut NoProgress).unwrap();
        prop_assert_eq!(pt, text);
    }
}
