use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical state of a purchase as tracked by the checkout session.
///
/// `Validating` is the only transient state; everything else is renderable as
/// an end state. `Pending` and `InProcess` may still move to `Approved` or
/// `Rejected`, but only through an explicit re-check.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    ToSchema,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PurchaseStatus {
    /// A status lookup is in flight; nothing has been confirmed yet
    #[default]
    Validating,
    /// The payment was approved by the provider
    Approved,
    /// The payment is awaiting completion (e.g. offline payment methods)
    Pending,
    /// The payment is under review by the provider
    InProcess,
    /// The payment was rejected
    Rejected,
    /// The payment was cancelled before completion
    Cancelled,
    /// The status could not be determined
    Error,
}

impl PurchaseStatus {
    /// States from which no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Rejected | Self::Cancelled | Self::Error
        )
    }

    /// States that allow an explicit "refresh status" re-check.
    pub fn is_refreshable(self) -> bool {
        matches!(self, Self::Validating | Self::Pending | Self::InProcess)
    }

    /// Whether the state machine admits a transition to `next`.
    ///
    /// Terminal states never transition; `Pending`/`InProcess` may only move
    /// to `Approved` or `Rejected` (or between each other while the provider
    /// is still deciding).
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match self {
            Self::Validating => true,
            Self::Pending | Self::InProcess => matches!(
                next,
                Self::Approved | Self::Rejected | Self::Pending | Self::InProcess
            ),
            Self::Approved | Self::Rejected | Self::Cancelled | Self::Error => false,
        }
    }
}

/// Identification document types accepted by the payment provider.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    ToSchema,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DocumentType {
    Dni,
    Cpf,
    Cnpj,
    Cuit,
    Cuil,
    Cc,
    Ce,
    Rut,
    Curp,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_do_not_transition() {
        for terminal in [
            PurchaseStatus::Approved,
            PurchaseStatus::Rejected,
            PurchaseStatus::Cancelled,
            PurchaseStatus::Error,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(PurchaseStatus::Pending));
            assert!(!terminal.can_transition_to(PurchaseStatus::Validating));
        }
    }

    #[test]
    fn pending_moves_only_to_decided_states() {
        assert!(PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Approved));
        assert!(PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Rejected));
        assert!(PurchaseStatus::InProcess.can_transition_to(PurchaseStatus::Approved));
        assert!(!PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Cancelled));
        assert!(!PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Validating));
    }

    #[test]
    fn validating_reaches_every_renderable_state() {
        for next in [
            PurchaseStatus::Approved,
            PurchaseStatus::Pending,
            PurchaseStatus::InProcess,
            PurchaseStatus::Rejected,
            PurchaseStatus::Error,
        ] {
            assert!(PurchaseStatus::Validating.can_transition_to(next));
        }
    }
}
