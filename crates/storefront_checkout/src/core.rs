//! Core checkout flows.
//!
//! Each submodule owns one step of the reconciliation flow: [`initiation`]
//! creates preferences and direct charges, [`status`] confirms the canonical
//! purchase state with the backend, [`rejection`] turns provider decline
//! codes into display copy, [`download`] resolves the grant once approved,
//! and [`session`] ties them together behind the purchase state machine.

pub mod download;
pub mod initiation;
pub mod rejection;
pub mod session;
pub mod status;
pub mod validator;
