//! Match phases and their transient state.
//!
//! Exactly one phase is active at a time. Each interactive phase carries
//! only the state its handler needs; the orchestrator-owned phases carry
//! none.

use super::hex::HexCoord;
use super::relocation::Completion;
use super::types::TokenId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Phase discriminant, for notifications and logging.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum PhaseKind {
    /// Players are arranging tokens before kickoff.
    PreKickoff,
    /// The goalkeeper's free move is animating.
    AwaitingConfirmation,
    /// The defending goalkeeper may take a free step.
    AwaitingGkDecision,
    /// Play is running under the match orchestrator.
    InPlay,
    /// The match is over.
    Resolved,
}

impl PhaseKind {
    /// Returns true if the phase has an interaction handler.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            PhaseKind::PreKickoff | PhaseKind::AwaitingConfirmation | PhaseKind::AwaitingGkDecision
        )
    }
}

/// Pre-kickoff state: current selection and confirmation presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KickoffSetup {
    pub(super) selected: Option<TokenId>,
    pub(super) confirmations: u8,
}

impl KickoffSetup {
    /// The selected token, if any.
    pub fn selected(&self) -> Option<TokenId> {
        self.selected
    }

    /// Confirmation presses counted so far.
    pub fn confirmations(&self) -> u8 {
        self.confirmations
    }
}

/// Goalkeeper decision state: who may move and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GkDecision {
    pub(super) keeper: TokenId,
    pub(super) options: BTreeSet<HexCoord>,
}

impl GkDecision {
    /// The goalkeeper allowed to move.
    pub fn keeper(&self) -> TokenId {
        self.keeper
    }

    /// Legal one-step destinations.
    pub fn options(&self) -> &BTreeSet<HexCoord> {
        &self.options
    }
}

/// Goalkeeper relocation in flight.
#[derive(Debug)]
pub struct GkRelocation {
    pub(super) keeper: TokenId,
    pub(super) target: HexCoord,
    pub(super) completion: Completion,
}

impl GkRelocation {
    /// The goalkeeper being moved.
    pub fn keeper(&self) -> TokenId {
        self.keeper
    }

    /// Destination cell.
    pub fn target(&self) -> HexCoord {
        self.target
    }
}

/// The active phase.
#[derive(Debug)]
pub enum Phase {
    /// Token placement and kickoff confirmation.
    PreKickoff(KickoffSetup),
    /// Goalkeeper free-move decision.
    AwaitingGkDecision(GkDecision),
    /// Goalkeeper relocation awaiting its completion signal.
    AwaitingConfirmation(GkRelocation),
    /// Orchestrator-owned play.
    InPlay,
    /// Orchestrator-owned end state.
    Resolved,
}

impl Phase {
    /// The phase discriminant.
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::PreKickoff(_) => PhaseKind::PreKickoff,
            Phase::AwaitingGkDecision(_) => PhaseKind::AwaitingGkDecision,
            Phase::AwaitingConfirmation(_) => PhaseKind::AwaitingConfirmation,
            Phase::InPlay => PhaseKind::InPlay,
            Phase::Resolved => PhaseKind::Resolved,
        }
    }

    /// Kickoff state when in `PreKickoff`.
    pub fn kickoff(&self) -> Option<&KickoffSetup> {
        match self {
            Phase::PreKickoff(setup) => Some(setup),
            _ => None,
        }
    }

    /// Goalkeeper decision state when in `AwaitingGkDecision`.
    pub fn gk_decision(&self) -> Option<&GkDecision> {
        match self {
            Phase::AwaitingGkDecision(decision) => Some(decision),
            _ => None,
        }
    }

    /// Relocation state when in `AwaitingConfirmation`.
    pub fn gk_relocation(&self) -> Option<&GkRelocation> {
        match self {
            Phase::AwaitingConfirmation(relocation) => Some(relocation),
            _ => None,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::PreKickoff(KickoffSetup::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_orchestrator_phases_are_passive() {
        assert!(PhaseKind::PreKickoff.is_interactive());
        assert!(PhaseKind::AwaitingGkDecision.is_interactive());
        assert!(PhaseKind::AwaitingConfirmation.is_interactive());
        assert!(!PhaseKind::InPlay.is_interactive());
        assert!(!PhaseKind::Resolved.is_interactive());
    }

    #[test]
    fn test_default_phase_is_fresh_kickoff() {
        let phase = Phase::default();
        assert_eq!(phase.kind(), PhaseKind::PreKickoff);
        assert_eq!(phase.kickoff(), Some(&KickoffSetup::default()));
    }
}
