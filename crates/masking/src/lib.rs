//! Personal Identifiable Information protection.
//!
//! Wrapper types and traits for secret management which help ensure they
//! aren't accidentally copied, logged, or otherwise exposed.

#![warn(missing_docs)]

mod abs;
mod secret;
mod strategy;

pub use crate::{
    abs::{ExposeInterface, ExposeOptionInterface, PeekInterface},
    secret::Secret,
    strategy::{Strategy, WithType, WithoutType},
};

#[cfg(feature = "serde")]
mod serde_impls;

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}
