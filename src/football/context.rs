//! Match orchestrator boundary.
//!
//! The controller is handed its match context explicitly; it never reaches
//! for ambient match state.

use super::types::{Direction, Team, TokenId};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{info, instrument};

/// What the phase controller needs from, and reports to, the orchestrator.
pub trait MatchContext {
    /// The last token to deliberately play the ball.
    fn last_purposeful_touch(&self) -> Option<TokenId>;

    /// Which way `team` is attacking.
    fn attacking_direction(&self, team: Team) -> Direction;

    /// Kickoff confirmed; `kicker` takes the opening standard pass.
    fn on_kickoff_confirmed(&mut self, kicker: TokenId);

    /// The goalkeeper decision finished (moved or skipped).
    fn on_gk_decision_resolved(&mut self);
}

impl<M: MatchContext + ?Sized> MatchContext for &mut M {
    fn last_purposeful_touch(&self) -> Option<TokenId> {
        (**self).last_purposeful_touch()
    }

    fn attacking_direction(&self, team: Team) -> Direction {
        (**self).attacking_direction(team)
    }

    fn on_kickoff_confirmed(&mut self, kicker: TokenId) {
        (**self).on_kickoff_confirmed(kicker)
    }

    fn on_gk_decision_resolved(&mut self) {
        (**self).on_gk_decision_resolved()
    }
}

/// Plain match bookkeeping implementing [`MatchContext`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct MatchState {
    /// Direction the home team attacks; away attacks the other way.
    home_direction: Direction,
    /// Last purposeful touch.
    last_touch: Option<TokenId>,
    /// Kickoffs confirmed so far.
    kickoffs: u32,
    /// Goalkeeper decisions resolved so far.
    gk_decisions: u32,
}

impl MatchState {
    /// Creates match state with home attacking in `home_direction`.
    #[instrument]
    pub fn new(home_direction: Direction) -> Self {
        Self {
            home_direction,
            last_touch: None,
            kickoffs: 0,
            gk_decisions: 0,
        }
    }

    /// Records the last purposeful touch.
    #[instrument(skip(self))]
    pub fn record_touch(&mut self, token: TokenId) {
        self.last_touch = Some(token);
    }

    /// Swaps ends (e.g. at half time).
    #[instrument(skip(self))]
    pub fn switch_ends(&mut self) {
        self.home_direction = self.home_direction.reversed();
    }
}

impl MatchContext for MatchState {
    fn last_purposeful_touch(&self) -> Option<TokenId> {
        self.last_touch
    }

    fn attacking_direction(&self, team: Team) -> Direction {
        match team {
            Team::Home => self.home_direction,
            Team::Away => self.home_direction.reversed(),
        }
    }

    fn on_kickoff_confirmed(&mut self, kicker: TokenId) {
        self.kickoffs += 1;
        self.last_touch = Some(kicker);
        info!(%kicker, kickoffs = self.kickoffs, "Kickoff: standard pass");
    }

    fn on_gk_decision_resolved(&mut self) {
        self.gk_decisions += 1;
        info!(gk_decisions = self.gk_decisions, "Goalkeeper decision resolved");
    }
}
