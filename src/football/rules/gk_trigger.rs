//! Goalkeeper free-move trigger.

use super::super::types::{Direction, PenaltyBox, Role};
use tracing::{debug, instrument};

/// Decides whether a completed pass grants the defending goalkeeper a free
/// one-step move.
///
/// Evaluated after pass-type moves only, never after placements. The
/// keeper moves exactly when the last purposeful toucher is an attacker and
/// the pass ended in the box that attacker's team is shooting at. Cells
/// tagged [`PenaltyBox::None`] never trigger.
pub struct GkTriggerRule;

impl GkTriggerRule {
    /// Returns true if the goalkeeper gets a free move.
    #[instrument]
    pub fn grants_free_move(mover: Role, attacking: Direction, target_box: PenaltyBox) -> bool {
        if target_box == PenaltyBox::None || mover != Role::Attacker {
            return false;
        }
        let triggered = attacking.target_box() == target_box;
        debug!(triggered, "Goalkeeper trigger evaluated");
        triggered
    }
}
