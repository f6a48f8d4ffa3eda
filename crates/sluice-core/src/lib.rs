//! # Sluice Core
//!
//! Core types shared across the sluice workspace.
//!
//! This crate provides the foundational pieces used by every other sluice
//! crate:
//!
//! - [`SluiceError`] - Standard error type for pipeline invocations
//! - [`SluiceResult`] - Result alias over [`SluiceError`]
//! - [`BoxError`] - Type-erased error carried for wrapped operations

#![doc(html_root_url = "https://docs.rs/sluice-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;

pub use error::{BoxError, SluiceError, SluiceResult};
