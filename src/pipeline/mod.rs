//! Encrypt and decrypt pipelines.
//!
//! Encrypt runs `validate → deriveKey → keystream → xor → hmacTag →
//! assemble → done`.  Decrypt runs `validate → parse → deriveKey →
//! verifyTag → keystream → xor → done`.  Any stage can end in `error`.
//!
//! The tag is verified before the keystream is generated, so a wrong
//! passphrase or a tampered frame never pays for keystream generation.
//!
//! `Sealer::encrypt` and `Sealer::decrypt` are the full operations on
//! text.  `seal_frame` and `open_frame` are the raw-byte stages underneath
//! them, without input validation or text encoding.

pub mod cancel;
pub mod progress;
pub mod validation;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::crypto::keystream::block_count;
use crate::crypto::random::{random_bytes, DEFAULT_NONCE_LEN, DEFAULT_SALT_LEN};
use crate::crypto::{codec, kdf, tag, xor, KeystreamGenerator, OsRandom, RandomSource};
use crate::errors::{Result, SealError};
use crate::frame::format::MAX_FIELD_LEN;
use crate::frame::{self, assemble, FrameHeader};

pub use cancel::CancellationToken;
pub use progress::{NoProgress, ProgressEvent, ProgressLog, ProgressObserver, Stage};
use validation::MIN_PASSPHRASE_LEN;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for an encrypt call.
#[derive(Debug, Clone)]
pub struct EncryptOptions {
    /// Base64url salt.  A random salt is generated when `None`.
    pub salt: Option<String>,
    /// PBKDF2 iteration count stored in the frame.
    pub iterations: u32,
    pub cancel: CancellationToken,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            salt: None,
            iterations: kdf::DEFAULT_ITERATIONS,
            cancel: CancellationToken::default(),
        }
    }
}

/// Options for a decrypt call.
#[derive(Debug, Clone, Default)]
pub struct DecryptOptions {
    pub cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// Progress plumbing
// ---------------------------------------------------------------------------

/// Observer plus cancellation token for one run.
struct Progress<'a> {
    observer: &'a mut dyn ProgressObserver,
    cancel: CancellationToken,
}

impl<'a> Progress<'a> {
    fn new(observer: &'a mut dyn ProgressObserver, cancel: CancellationToken) -> Self {
        Self { observer, cancel }
    }

    fn emit(&mut self, stage: Stage, label: impl Into<String>, percent: u8) {
        let event = ProgressEvent::new(stage, label).with_percent(percent);
        self.observer.on_progress(&event);
    }

    fn checkpoint(&self) -> Result<()> {
        self.cancel.check()
    }

    /// Emit the terminal event for `result` and hand it back.
    fn finish<T>(&mut self, result: Result<T>, failure_label: &str) -> Result<T> {
        match &result {
            Ok(_) => self.emit(Stage::Done, "Done", 100),
            Err(e) => {
                let event = ProgressEvent::new(Stage::Error, failure_label).with_info(e.to_string());
                self.observer.on_progress(&event);
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Sealer
// ---------------------------------------------------------------------------

/// Runs encrypt/decrypt pipelines with a given randomness source.
///
/// Each call derives its own key and builds its own buffers; a `Sealer`
/// holds no state between calls other than its RNG.
#[derive(Debug, Clone)]
pub struct Sealer<R = OsRandom> {
    rng: R,
    salt_len: usize,
    nonce_len: usize,
    min_passphrase_len: usize,
}

impl Sealer<OsRandom> {
    /// A sealer backed by the OS random source with default lengths.
    pub fn new() -> Self {
        Self::with_random(OsRandom)
    }
}

impl Default for Sealer<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Sealer<R> {
    /// A sealer drawing salts and nonces from `rng`.
    pub fn with_random(rng: R) -> Self {
        Self {
            rng,
            salt_len: DEFAULT_SALT_LEN,
            nonce_len: DEFAULT_NONCE_LEN,
            min_passphrase_len: MIN_PASSPHRASE_LEN,
        }
    }

    /// A sealer using the lengths from `settings`.
    ///
    /// `min_passphrase_len` can raise the passphrase minimum but never
    /// drop it below 4 characters.
    pub fn from_settings(settings: &Settings, rng: R) -> Self {
        Self {
            rng,
            salt_len: settings.salt_len.min(MAX_FIELD_LEN),
            nonce_len: settings.nonce_len.min(MAX_FIELD_LEN),
            min_passphrase_len: settings.min_passphrase_len.max(MIN_PASSPHRASE_LEN),
        }
    }

    /// Encrypt `plaintext` under `passphrase`, returning base64url text.
    pub fn encrypt(
        &mut self,
        plaintext: &str,
        passphrase: &str,
        options: &EncryptOptions,
        observer: &mut dyn ProgressObserver,
    ) -> Result<String> {
        let mut progress = Progress::new(observer, options.cancel.clone());
        let result = self.encrypt_stages(plaintext, passphrase, options, &mut progress);
        progress.finish(result, "Encryption failed")
    }

    /// Decrypt base64url `ciphertext` under `passphrase`.
    ///
    /// Recovered bytes that are not valid UTF-8 fail with
    /// `SealError::Format` rather than being decoded lossily with U+FFFD
    /// replacements.  Frames from this crate always hold UTF-8, so this
    /// only happens for a frame sealed by another encoder under the
    /// right passphrase.  Use `open_frame` to get the raw bytes.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        passphrase: &str,
        options: &DecryptOptions,
        observer: &mut dyn ProgressObserver,
    ) -> Result<String> {
        let mut progress = Progress::new(observer, options.cancel.clone());
        let result = self.decrypt_stages(ciphertext, passphrase, &mut progress);
        progress.finish(result, "Decryption failed")
    }

    fn encrypt_stages(
        &mut self,
        plaintext: &str,
        passphrase: &str,
        options: &EncryptOptions,
        progress: &mut Progress<'_>,
    ) -> Result<String> {
        progress.emit(Stage::Validate, "Validating input", 10);
        validation::validate_encrypt(
            plaintext,
            passphrase,
            options.iterations,
            self.min_passphrase_len,
        )?;

        let salt = match &options.salt {
            Some(text) => codec::decode(text)?,
            None => random_bytes(&mut self.rng, self.salt_len),
        };
        let nonce = random_bytes(&mut self.rng, self.nonce_len);
        let header = FrameHeader::new(options.iterations, salt, nonce);

        let frame = seal_stages(plaintext.as_bytes(), passphrase.as_bytes(), &header, progress)?;
        Ok(codec::encode(&frame))
    }

    fn decrypt_stages(
        &self,
        ciphertext: &str,
        passphrase: &str,
        progress: &mut Progress<'_>,
    ) -> Result<String> {
        progress.emit(Stage::Validate, "Validating input", 10);
        validation::validate_decrypt(ciphertext, passphrase, self.min_passphrase_len)?;

        let data = codec::decode(ciphertext)?;
        let plaintext = open_stages(&data, passphrase.as_bytes(), progress)?;

        String::from_utf8(plaintext)
            .map_err(|_| SealError::Format("decrypted data is not valid UTF-8".into()))
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Encrypt with the OS random source and default lengths.
pub fn encrypt(
    plaintext: &str,
    passphrase: &str,
    options: &EncryptOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<String> {
    Sealer::new().encrypt(plaintext, passphrase, options, observer)
}

/// Decrypt with default settings.
pub fn decrypt(
    ciphertext: &str,
    passphrase: &str,
    options: &DecryptOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<String> {
    Sealer::new().decrypt(ciphertext, passphrase, options, observer)
}

/// Build a raw frame from `plaintext` and a prepared header.
///
/// Runs the stages from key derivation through frame assembly.  No input
/// validation and no terminal `done`/`error` event; empty plaintext is
/// allowed and yields a frame with a zero-length ciphertext.
pub fn seal_frame(
    plaintext: &[u8],
    passphrase: &[u8],
    header: &FrameHeader,
    observer: &mut dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let mut progress = Progress::new(observer, cancel.clone());
    seal_stages(plaintext, passphrase, header, &mut progress)
}

/// Recover the raw plaintext bytes from a decoded frame.
///
/// Runs the stages from parsing through XOR.  Fails with
/// `SealError::Format` before any key derivation when the frame is
/// malformed or stores an iteration count of 0, and with `SealError::Integrity` before any keystream is
/// generated when the tag does not match.
pub fn open_frame(
    frame: &[u8],
    passphrase: &[u8],
    observer: &mut dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let mut progress = Progress::new(observer, cancel.clone());
    open_stages(frame, passphrase, &mut progress)
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn seal_stages(
    plaintext: &[u8],
    passphrase: &[u8],
    header: &FrameHeader,
    progress: &mut Progress<'_>,
) -> Result<Vec<u8>> {
    if header.salt.len() > MAX_FIELD_LEN || header.nonce.len() > MAX_FIELD_LEN {
        return Err(SealError::Validation(format!(
            "salt and nonce must be at most {MAX_FIELD_LEN} bytes"
        )));
    }

    progress.checkpoint()?;
    progress.emit(Stage::DeriveKey, "PBKDF2: deriving key", 0);
    debug!(iterations = header.iterations, salt_len = header.salt.len(), "deriving key");
    let key = kdf::derive_key(passphrase, &header.salt, header.iterations);
    progress.checkpoint()?;
    progress.emit(Stage::DeriveKey, "PBKDF2: key ready", 100);

    let ciphertext = apply_keystream(&key, &header.salt, &header.nonce, plaintext, progress)?;

    let header_bytes = header.to_bytes();
    let tag = tag::compute(key.as_bytes(), &header_bytes, &ciphertext)?;
    progress.emit(Stage::HmacTag, "HMAC tag computed", 100);

    let frame = assemble(&header_bytes, &ciphertext, &tag);
    progress.emit(Stage::Assemble, "Output buffer assembled", 100);
    debug!(frame_len = frame.len(), "frame assembled");

    Ok(frame)
}

fn open_stages(frame: &[u8], passphrase: &[u8], progress: &mut Progress<'_>) -> Result<Vec<u8>> {
    let parsed = frame::parse(frame)?;
    if parsed.iterations == 0 {
        return Err(SealError::Format("frame stores an iteration count of 0".into()));
    }
    progress.emit(Stage::Parse, "Header parsed", 100);
    debug!(
        iterations = parsed.iterations,
        salt_len = parsed.salt.len(),
        nonce_len = parsed.nonce.len(),
        ciphertext_len = parsed.ciphertext.len(),
        "frame parsed"
    );

    progress.checkpoint()?;
    progress.emit(Stage::DeriveKey, "PBKDF2: deriving key", 0);
    let key = kdf::derive_key(passphrase, parsed.salt, parsed.iterations);
    progress.checkpoint()?;
    progress.emit(Stage::DeriveKey, "PBKDF2: key ready", 100);

    tag::ensure_valid(key.as_bytes(), parsed.header, parsed.ciphertext, parsed.tag)
        .inspect_err(|_| warn!("tag verification failed"))?;
    progress.emit(Stage::VerifyTag, "HMAC tag verified", 100);

    apply_keystream(&key, parsed.salt, parsed.nonce, parsed.ciphertext, progress)
}

/// Generate the keystream for `data` and XOR it in, reporting per block.
fn apply_keystream(
    key: &kdf::KeyMaterial,
    salt: &[u8],
    nonce: &[u8],
    data: &[u8],
    progress: &mut Progress<'_>,
) -> Result<Vec<u8>> {
    let blocks = block_count(data.len());
    progress.checkpoint()?;
    progress.emit(
        Stage::Keystream,
        format!("HMAC stream: 0/{blocks} blocks"),
        0,
    );
    debug!(len = data.len(), blocks, "generating keystream");

    let generator = KeystreamGenerator::new(key.as_bytes(), salt, nonce)?;
    let keystream = generator.generate_with(data.len(), |p| {
        progress.emit(
            Stage::Keystream,
            format!("HMAC stream: {}/{} blocks", p.done, p.blocks),
            p.percent,
        );
        progress.checkpoint()
    })?;

    let out = xor(data, &keystream);
    progress.emit(Stage::Xor, "XOR with keystream done", 100);
    Ok(out)
}
