pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod frame;
pub mod pipeline;

pub use errors::{Result, SealError};
pub use pipeline::{
    decrypt, encrypt, CancellationToken, DecryptOptions, EncryptOptions, ProgressEvent,
    ProgressObserver, Sealer, Stage,
};
