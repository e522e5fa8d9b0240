// SPDX-License-Identifier: MPL-2.0
//! Crate error type.
//!
//! Only configuration I/O can fail. The notification lifecycle itself is
//! infallible: unknown ids, repeated teardown and late timer callbacks are
//! treated as no-ops rather than errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a configuration file failed.
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or has the wrong structure.
    #[error("invalid toaster configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be serialized back to TOML.
    #[error("failed to serialize toaster configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
