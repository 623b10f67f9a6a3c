//! Request/response models shared between the checkout core and its backend.
//!
//! The backend has drifted between snake_case and camelCase field names over
//! time; every inbound model declares explicit `serde` aliases so that
//! normalization happens once, at the deserialization boundary, instead of
//! being re-derived at call sites.

pub mod downloads;
pub mod enums;
pub mod purchases;
