//! Phase controller: the match-phase state machine.
//!
//! The controller owns the board, the active phase and the observer
//! registry. Routed input reaches only the active phase's handler. Every
//! handler validates before it commits, and a failed request leaves the
//! board and phase exactly as they were.

use super::action::{MoveError, MoveRequest, Placement, RejectReason};
use super::board::{Board, BoardError};
use super::context::MatchContext;
use super::contracts::{Contract, PlacementContract};
use super::events::{Observers, PhaseEvent, Subscription, SubscriptionId};
use super::hex::HexCoord;
use super::phases::{GkDecision, GkRelocation, KickoffSetup, Phase, PhaseKind};
use super::relocation::{InFlight, RelocationError, Relocator};
use super::rules::{self, GkTriggerRule};
use super::types::TokenId;
use crate::input::InputEvent;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Error from a handled request. Never fatal; scoped to the one request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PhaseError {
    /// A rule refused the request; the user can correct it.
    #[display("Validation rejected: {}", _0)]
    ValidationRejected(RejectReason),

    /// Something the request depends on is absent (no selection, no keeper).
    #[display("Precondition missing: {}", _0)]
    PreconditionMissing(String),

    /// The caller broke an invariant (e.g. an unresolvable target cell).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for PhaseError {}

impl From<MoveError> for PhaseError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::Rejected(reason) => PhaseError::ValidationRejected(reason),
            MoveError::InvariantViolation(message) => PhaseError::InvariantViolation(message),
        }
    }
}

impl From<BoardError> for PhaseError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::UnknownToken(_) => PhaseError::PreconditionMissing(err.to_string()),
            BoardError::Occupied { occupant, .. } => {
                PhaseError::ValidationRejected(RejectReason::Occupied(occupant))
            }
            BoardError::DuplicateToken(_) | BoardError::OffGrid(_) => {
                PhaseError::InvariantViolation(err.to_string())
            }
        }
    }
}

impl From<RelocationError> for PhaseError {
    fn from(err: RelocationError) -> Self {
        match err {
            RelocationError::InFlight(token) => {
                PhaseError::ValidationRejected(RejectReason::RelocationInFlight(token))
            }
            RelocationError::Abandoned(_) => PhaseError::PreconditionMissing(err.to_string()),
        }
    }
}

/// Tunable rules for the phase machine.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct PhaseRules {
    /// Cell an attacker must stand on for kickoff.
    kickoff_cell: HexCoord,
    /// Confirmation presses needed to start the game.
    confirmations_required: u8,
    /// How far the goalkeeper may step on a free move.
    gk_step_radius: u32,
}

impl Default for PhaseRules {
    fn default() -> Self {
        Self {
            kickoff_cell: HexCoord::ORIGIN,
            confirmations_required: 2,
            gk_step_radius: 1,
        }
    }
}

/// The match-phase state machine.
pub struct PhaseController<R, M> {
    board: Board,
    rules: PhaseRules,
    phase: Phase,
    relocator: R,
    context: M,
    in_flight: InFlight,
    observers: Observers,
}

impl<R: Relocator, M: MatchContext> PhaseController<R, M> {
    /// Creates a controller in `PreKickoff`.
    #[instrument(skip(board, relocator, context))]
    pub fn new(board: Board, rules: PhaseRules, relocator: R, context: M) -> Self {
        info!(tokens = board.tokens().count(), "Phase controller ready");
        Self {
            board,
            rules,
            phase: Phase::default(),
            relocator,
            context,
            in_flight: InFlight::default(),
            observers: Observers::default(),
        }
    }

    /// The active phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The phase rules.
    pub fn rules(&self) -> &PhaseRules {
        &self.rules
    }

    /// The match context.
    pub fn context(&self) -> &M {
        &self.context
    }

    /// The match context, mutably (the orchestrator records touches here).
    pub fn context_mut(&mut self) -> &mut M {
        &mut self.context
    }

    /// The relocation service.
    pub fn relocator(&self) -> &R {
        &self.relocator
    }

    /// The relocation service, mutably.
    pub fn relocator_mut(&mut self) -> &mut R {
        &mut self.relocator
    }

    /// Tokens with an outstanding relocation.
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Returns true if the active phase has an interaction handler.
    pub fn accepts_input(&self) -> bool {
        self.phase.kind().is_interactive()
    }

    /// Registers an observer for presentation events.
    pub fn subscribe(&mut self) -> Subscription {
        self.observers.subscribe()
    }

    /// Unregisters an observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Delivers an input event to the active phase's handler.
    ///
    /// Errors are reported to observers and logs before being returned;
    /// the phase and board are unchanged when an error is returned.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn handle(&mut self, event: InputEvent) -> Result<(), PhaseError> {
        let result = match self.phase.kind() {
            PhaseKind::PreKickoff => self.handle_kickoff(event),
            PhaseKind::AwaitingGkDecision => self.handle_gk_decision(event),
            PhaseKind::AwaitingConfirmation => self.handle_relocating(event),
            PhaseKind::InPlay | PhaseKind::Resolved => {
                debug!("No interaction handler in this phase");
                Ok(())
            }
        };
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    /// Evaluates a completed pass for a goalkeeper free move.
    ///
    /// Returns true if the defending goalkeeper was granted a move (even if
    /// it had no legal step and was skipped at once).
    #[instrument(skip(self))]
    pub fn on_pass_completed(&mut self, target: HexCoord) -> Result<bool, PhaseError> {
        let result = self.evaluate_pass(target);
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    /// Suspends until an in-flight goalkeeper relocation completes, then
    /// enters `InPlay`. Returns false if nothing was in flight.
    #[instrument(skip(self))]
    pub async fn settle(&mut self) -> bool {
        let Phase::AwaitingConfirmation(relocation) = &mut self.phase else {
            return false;
        };
        let outcome = relocation.completion.wait().await;
        self.finish_relocation(outcome);
        true
    }

    /// Frame-driven alternative to [`settle`](Self::settle): checks the
    /// completion without waiting. Returns true once the relocation is done.
    pub fn poll_relocation(&mut self) -> bool {
        let Phase::AwaitingConfirmation(relocation) = &mut self.phase else {
            return false;
        };
        match relocation.completion.try_complete() {
            Ok(false) => false,
            Ok(true) => {
                self.finish_relocation(Ok(()));
                true
            }
            Err(err) => {
                self.finish_relocation(Err(err));
                true
            }
        }
    }

    /// Returns to `PreKickoff` from an orchestrator-owned phase (e.g. after a goal).
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn begin_kickoff(&mut self) -> Result<(), PhaseError> {
        if self.phase.kind().is_interactive() {
            let err = PhaseError::PreconditionMissing(format!(
                "cannot restart kickoff during {}",
                self.phase.kind()
            ));
            self.report(&err);
            return Err(err);
        }
        self.board.grid_mut().clear_highlights();
        self.enter(Phase::PreKickoff(KickoffSetup::default()));
        Ok(())
    }

    /// Ends the match from `InPlay`.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn resolve(&mut self) -> Result<(), PhaseError> {
        if self.phase.kind() != PhaseKind::InPlay {
            let err = PhaseError::PreconditionMissing(format!(
                "cannot resolve the match during {}",
                self.phase.kind()
            ));
            self.report(&err);
            return Err(err);
        }
        self.enter(Phase::Resolved);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  PreKickoff
    // ─────────────────────────────────────────────────────────────

    fn handle_kickoff(&mut self, event: InputEvent) -> Result<(), PhaseError> {
        match event {
            InputEvent::TokenOrHexClicked {
                token: Some(token), ..
            } => self.select(token),
            InputEvent::TokenOrHexClicked {
                token: None,
                cell: Some(cell),
            } => self.place_selected(cell),
            InputEvent::TokenOrHexClicked {
                token: None,
                cell: None,
            } => {
                debug!("Empty pick ignored");
                Ok(())
            }
            InputEvent::KeyPressed { .. } if event.is_space() => self.confirm_kickoff(),
            InputEvent::KeyPressed { code, .. } => {
                debug!(?code, "Key ignored before kickoff");
                Ok(())
            }
        }
    }

    fn select(&mut self, token: TokenId) -> Result<(), PhaseError> {
        if self.board.token(token).is_none() {
            return Err(PhaseError::PreconditionMissing(format!(
                "token {} is not on the board",
                token
            )));
        }
        let Phase::PreKickoff(setup) = &mut self.phase else {
            return Err(Self::wrong_phase("select", PhaseKind::PreKickoff));
        };
        if let Some(previous) = setup.selected.replace(token) {
            debug!(%previous, "Token deselected");
        }
        info!(%token, "Token selected");
        self.observers.emit(PhaseEvent::SelectionChanged(Some(token)));
        Ok(())
    }

    fn place_selected(&mut self, cell: HexCoord) -> Result<(), PhaseError> {
        let selected = self
            .phase
            .kickoff()
            .and_then(KickoffSetup::selected)
            .ok_or_else(|| PhaseError::PreconditionMissing("no token selected".to_string()))?;
        let placement = Placement::new(selected, cell);

        PlacementContract::pre(&self.board, &placement)?;

        #[cfg(debug_assertions)]
        let before = self.board.clone();

        self.board.relocate(selected, cell)?;

        #[cfg(debug_assertions)]
        if let Err(err) = PlacementContract::post(&before, &self.board) {
            self.board = before;
            return Err(err.into());
        }

        if let Phase::PreKickoff(setup) = &mut self.phase {
            setup.selected = None;
        }
        info!(%placement, "Placement committed");
        self.observers.emit(PhaseEvent::SelectionChanged(None));
        Ok(())
    }

    fn confirm_kickoff(&mut self) -> Result<(), PhaseError> {
        let required = self.rules.confirmations_required.max(1);
        let Phase::PreKickoff(setup) = &mut self.phase else {
            return Err(Self::wrong_phase("confirm kickoff", PhaseKind::PreKickoff));
        };
        setup.confirmations += 1;
        let presses = setup.confirmations;
        if presses < required {
            info!(presses, required, "Kickoff confirmation pressed");
            return Ok(());
        }

        match self.kickoff_taker() {
            Some(kicker) => {
                info!(%kicker, "Kickoff validated");
                self.enter(Phase::InPlay);
                self.context.on_kickoff_confirmed(kicker);
                Ok(())
            }
            None => {
                // One more press is needed once the kickoff cell is manned.
                if let Phase::PreKickoff(setup) = &mut self.phase {
                    setup.confirmations = required - 1;
                }
                Err(PhaseError::ValidationRejected(RejectReason::NoKickoffTaker(
                    self.rules.kickoff_cell,
                )))
            }
        }
    }

    fn kickoff_taker(&self) -> Option<TokenId> {
        self.board
            .occupant(self.rules.kickoff_cell)
            .filter(|token| token.is_attacker())
            .map(|token| *token.id())
    }

    // ─────────────────────────────────────────────────────────────
    //  Goalkeeper decision
    // ─────────────────────────────────────────────────────────────

    fn evaluate_pass(&mut self, target: HexCoord) -> Result<bool, PhaseError> {
        if self.phase.kind() != PhaseKind::InPlay {
            return Err(PhaseError::PreconditionMissing(format!(
                "passes are only evaluated in play, not during {}",
                self.phase.kind()
            )));
        }
        let mover_id = self.context.last_purposeful_touch().ok_or_else(|| {
            PhaseError::PreconditionMissing("no purposeful touch recorded".to_string())
        })?;
        let mover = self.board.token(mover_id).ok_or_else(|| {
            PhaseError::PreconditionMissing(format!("token {} is not on the board", mover_id))
        })?;
        let cell = self.board.grid().cell_at(target).ok_or_else(|| {
            PhaseError::InvariantViolation(format!("pass target {} is off the grid", target))
        })?;

        let direction = self.context.attacking_direction(*mover.team());
        if !GkTriggerRule::grants_free_move(*mover.role(), direction, *cell.penalty_box()) {
            return Ok(false);
        }

        let defending = mover.team().opponent();
        let keeper = self.board.goalkeeper_of(defending).ok_or_else(|| {
            PhaseError::PreconditionMissing(format!("{} has no goalkeeper", defending))
        })?;
        let keeper_id = *keeper.id();
        let options = self
            .board
            .grid()
            .legal_steps_from(*keeper.cell(), self.rules.gk_step_radius);

        info!(keeper = %keeper_id, options = options.len(), "Goalkeeper granted a free move");
        self.board.grid_mut().highlight(options.iter().copied());
        let no_options = options.is_empty();
        self.enter(Phase::AwaitingGkDecision(GkDecision {
            keeper: keeper_id,
            options,
        }));
        if no_options {
            info!("Goalkeeper has no legal step");
            self.skip_gk_move();
        }
        Ok(true)
    }

    fn handle_gk_decision(&mut self, event: InputEvent) -> Result<(), PhaseError> {
        match event {
            InputEvent::TokenOrHexClicked {
                cell: Some(cell), ..
            } => self.move_keeper(cell),
            InputEvent::TokenOrHexClicked { cell: None, .. } => {
                debug!("Pick without a cell ignored");
                Ok(())
            }
            InputEvent::KeyPressed { .. } if event.is_char('x') => {
                self.skip_gk_move();
                Ok(())
            }
            InputEvent::KeyPressed { code, .. } => {
                debug!(?code, "Key ignored during goalkeeper decision");
                Ok(())
            }
        }
    }

    fn move_keeper(&mut self, cell: HexCoord) -> Result<(), PhaseError> {
        let Phase::AwaitingGkDecision(decision) = &self.phase else {
            return Err(Self::wrong_phase("move keeper", PhaseKind::AwaitingGkDecision));
        };
        let keeper = decision.keeper;
        if !decision.options.contains(&cell) {
            return Err(PhaseError::ValidationRejected(RejectReason::NotHighlighted(
                cell,
            )));
        }

        let token = self.board.token(keeper).ok_or_else(|| {
            PhaseError::PreconditionMissing(format!("goalkeeper {} is not on the board", keeper))
        })?;
        let origin = self.board.grid().cell_at(*token.cell()).ok_or_else(|| {
            PhaseError::InvariantViolation(format!("{} stands off the grid", keeper))
        })?;
        rules::validate(&MoveRequest::step(
            token,
            origin,
            self.board.grid().cell_at(cell),
        ))?;

        #[cfg(debug_assertions)]
        let before = self.board.clone();

        self.in_flight.begin(keeper)?;
        if let Err(err) = self.board.relocate(keeper, cell) {
            self.in_flight.finish(keeper);
            return Err(err.into());
        }
        self.board.grid_mut().clear_highlights();

        #[cfg(debug_assertions)]
        if let Err(err) = PlacementContract::post(&before, &self.board) {
            self.board = before;
            self.in_flight.finish(keeper);
            return Err(err.into());
        }
        let completion = self.relocator.relocate(keeper, cell);
        self.enter(Phase::AwaitingConfirmation(GkRelocation {
            keeper,
            target: cell,
            completion,
        }));
        Ok(())
    }

    fn handle_relocating(&mut self, event: InputEvent) -> Result<(), PhaseError> {
        let Phase::AwaitingConfirmation(relocation) = &self.phase else {
            return Err(Self::wrong_phase("relocate", PhaseKind::AwaitingConfirmation));
        };
        let keeper = relocation.keeper;
        match event {
            InputEvent::TokenOrHexClicked { cell: Some(_), .. } => {
                if self.in_flight.contains(keeper) {
                    Err(RelocationError::InFlight(keeper).into())
                } else {
                    Err(PhaseError::InvariantViolation(format!(
                        "relocation of {} is pending but not tracked",
                        keeper
                    )))
                }
            }
            _ => {
                debug!(%keeper, "Input ignored while goalkeeper is moving");
                Ok(())
            }
        }
    }

    fn skip_gk_move(&mut self) {
        self.board.grid_mut().clear_highlights();
        info!("Goalkeeper move skipped");
        self.enter(Phase::InPlay);
        self.context.on_gk_decision_resolved();
    }

    fn finish_relocation(&mut self, outcome: Result<(), RelocationError>) {
        let Phase::AwaitingConfirmation(relocation) = &self.phase else {
            return;
        };
        let keeper = relocation.keeper;
        let target = relocation.target;
        if let Err(err) = outcome {
            warn!(%err, "Completion signal lost; relocation treated as finished");
        }
        self.in_flight.finish(keeper);
        info!(%keeper, %target, "Goalkeeper relocation complete");
        self.enter(Phase::InPlay);
        self.context.on_gk_decision_resolved();
    }

    // ─────────────────────────────────────────────────────────────
    //  Helpers
    // ─────────────────────────────────────────────────────────────

    fn enter(&mut self, next: Phase) {
        let previous = std::mem::replace(&mut self.phase, next);
        if let Phase::PreKickoff(KickoffSetup {
            selected: Some(token),
            ..
        }) = &previous
        {
            debug!(%token, "Selection dropped with phase");
            self.observers.emit(PhaseEvent::SelectionChanged(None));
        }
        let kind = self.phase.kind();
        info!(from = %previous.kind(), to = %kind, "Phase changed");
        self.observers.emit(PhaseEvent::PhaseChanged(kind));
    }

    fn report(&mut self, err: &PhaseError) {
        match err {
            PhaseError::ValidationRejected(reason) => {
                warn!(%reason, "Request rejected");
                self.observers.emit(PhaseEvent::ValidationRejected(*reason));
            }
            PhaseError::PreconditionMissing(message) => {
                error!(%message, "Request aborted: precondition missing");
            }
            PhaseError::InvariantViolation(message) => {
                error!(%message, "Request aborted: invariant violation");
            }
        }
    }

    fn wrong_phase(operation: &str, expected: PhaseKind) -> PhaseError {
        PhaseError::InvariantViolation(format!(
            "{} handler invoked outside {}",
            operation, expected
        ))
    }
}

impl<R, M> std::fmt::Debug for PhaseController<R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("phase", &self.phase)
            .field("rules", &self.rules)
            .field("in_flight", &self.in_flight)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
