//! Core components shared by awswire crates.
//!
//! This crate provides the foundational types and traits for signing AWS
//! requests and moving them over the wire.
//!
//! ## Overview
//!
//! - **Context**: holds implementations for file reading, HTTP sending and environment access
//! - **Request**: the in-flight request that protocol builders fill and signers sign
//! - **Traits**: credential loading ([`ProvideCredential`]) and request signing ([`SignRequest`])
//! - **Signer**: coordinates credential loading and request signing
//!
//! ## Utilities
//!
//! - [`hash`]: hashing utilities, including hashing of seekable bodies
//! - [`time`]: time formatting and parsing for AWS wire formats
//! - [`utils`]: data redaction and AWS flavored percent escaping

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};
mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::{Body, ReadSeek, Request};
mod signer;
pub use signer::Signer;
