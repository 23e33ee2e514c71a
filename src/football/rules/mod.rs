//! Move rules for hex football.
//!
//! Each rule is an independent pure check over a [`MoveRequest`]. Rules
//! that do not apply to a request (per its flags) pass it through, so any
//! subset can be composed for a given context.

pub mod circle;
pub mod gk_trigger;
pub mod same_half;
pub mod zone;

pub use circle::CircleRule;
pub use gk_trigger::GkTriggerRule;
pub use same_half::SameHalfRule;
pub use zone::{PenaltyBoxRule, VacancyRule};

use super::action::{MoveError, MoveRequest};
use tracing::{instrument, warn};

/// Runs every applicable placement rule against a request.
///
/// The target must resolve to a cell; a missing target is an invariant
/// violation regardless of which rules would apply.
#[instrument(skip(request), fields(token = %request.token.id()))]
pub fn validate(request: &MoveRequest<'_>) -> Result<(), MoveError> {
    request.target_cell()?;
    let result = SameHalfRule::check(request)
        .and_then(|_| CircleRule::check(request))
        .and_then(|_| PenaltyBoxRule::check(request))
        .and_then(|_| VacancyRule::check(request));
    if let Err(MoveError::Rejected(reason)) = &result {
        warn!(%reason, "Move rejected");
    }
    result
}
