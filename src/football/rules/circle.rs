//! Kickoff-circle rule.

use super::super::action::{MoveError, MoveRequest, RejectReason, Zone};
use tracing::instrument;

/// Rejects a non-attacker moving into the kickoff circle.
///
/// Only applies when the request forbids [`Zone::KickoffCircle`].
pub struct CircleRule;

impl CircleRule {
    /// Checks the rule.
    #[instrument(skip(request), fields(token = %request.token.id()))]
    pub fn check(request: &MoveRequest<'_>) -> Result<(), MoveError> {
        if request.forbidden_zone != Some(Zone::KickoffCircle) {
            return Ok(());
        }
        let target = request.target_cell()?;
        if *target.in_circle() && !request.token.is_attacker() {
            Err(RejectReason::KickoffCircle.into())
        } else {
            Ok(())
        }
    }
}
