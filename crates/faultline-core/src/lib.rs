//! Error values and the client error envelope shared by every Faultline crate

#![allow(clippy::must_use_candidate)]

mod envelope;
mod error;

pub use envelope::ErrorEnvelope;
pub use error::{ErrorCategory, ErrorValue, HttpError, Responded, Signaled};
