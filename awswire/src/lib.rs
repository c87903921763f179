#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use awswire_core::*;

mod config;
pub use config::Config;

mod client;
pub use client::Client;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

/// AWS SigV4 signing and credential providers.
pub mod aws {
    pub use awswire_aws_v4::*;
}

/// Shapes, values and wire protocol codecs.
pub mod protocol {
    pub use awswire_protocol::*;
}
