//! Input normalization and routing.
//!
//! Raw pointer picks and terminal key events are reduced to two semantic
//! events and handed, unchanged, to the phase controller's active handler.

use crate::football::{HexCoord, MatchContext, PhaseController, PhaseError, Relocator, TokenId};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, instrument};

/// A semantic input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A pointer pick on a token and/or a hex.
    TokenOrHexClicked {
        /// Token under the pointer.
        token: Option<TokenId>,
        /// Hex under the pointer.
        cell: Option<HexCoord>,
    },
    /// A key press.
    KeyPressed {
        /// The key.
        code: KeyCode,
        /// Held modifiers.
        modifiers: KeyModifiers,
    },
}

impl InputEvent {
    /// A pointer pick.
    pub fn pointer(token: Option<TokenId>, cell: Option<HexCoord>) -> Self {
        InputEvent::TokenOrHexClicked { token, cell }
    }

    /// A key press without modifiers.
    pub fn key(code: KeyCode) -> Self {
        InputEvent::KeyPressed {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Normalizes a terminal event. Key releases and non-key events yield `None`.
    pub fn from_terminal(event: &Event) -> Option<Self> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) if *kind != KeyEventKind::Release => Some(InputEvent::KeyPressed {
                code: *code,
                modifiers: *modifiers,
            }),
            _ => None,
        }
    }

    /// Parses a key name: `space`, `enter`, `esc`, or a single character.
    pub fn parse_key(name: &str) -> Option<KeyCode> {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "space" => Some(KeyCode::Char(' ')),
            "enter" | "return" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(KeyCode::Char(c)),
                    _ => None,
                }
            }
        }
    }

    /// Returns true for the space bar.
    pub fn is_space(&self) -> bool {
        matches!(
            self,
            InputEvent::KeyPressed {
                code: KeyCode::Char(' '),
                ..
            }
        )
    }

    /// Returns true for the given letter key, ignoring case.
    pub fn is_char(&self, expected: char) -> bool {
        match self {
            InputEvent::KeyPressed {
                code: KeyCode::Char(c),
                ..
            } => c.eq_ignore_ascii_case(&expected),
            _ => false,
        }
    }
}

/// What happened to a routed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Routing is off or no phase is accepting input.
    Dropped,
    /// The active handler accepted the event.
    Handled,
    /// The active handler refused the event; state is unchanged.
    Failed(PhaseError),
}

/// Routes semantic events to the active phase handler.
#[derive(Debug, Clone)]
pub struct InputRouter {
    activated: bool,
}

impl InputRouter {
    /// Creates an activated router.
    pub fn new() -> Self {
        Self { activated: true }
    }

    /// Starts delivering events.
    pub fn activate(&mut self) {
        self.activated = true;
    }

    /// Stops delivering events.
    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    /// Returns true if events are being delivered.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Delivers `event` to the controller's active handler, if any.
    #[instrument(skip(self, controller))]
    pub fn route<R: Relocator, M: MatchContext>(
        &self,
        event: InputEvent,
        controller: &mut PhaseController<R, M>,
    ) -> Delivery {
        if !self.activated || !controller.accepts_input() {
            debug!(
                activated = self.activated,
                phase = %controller.phase().kind(),
                "Event dropped"
            );
            return Delivery::Dropped;
        }
        match controller.handle(event) {
            Ok(()) => Delivery::Handled,
            Err(err) => Delivery::Failed(err),
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::football::{Board, Direction, Grid, InstantRelocator, MatchState, PhaseRules};
    use crossterm::event::KeyEventState;

    fn controller() -> PhaseController<InstantRelocator, MatchState> {
        PhaseController::new(
            Board::new(Grid::new(2, 2)),
            PhaseRules::default(),
            InstantRelocator::default(),
            MatchState::new(Direction::LeftToRight),
        )
    }

    #[test]
    fn test_terminal_releases_are_ignored() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::SHIFT));
        assert_eq!(
            InputEvent::from_terminal(&press),
            Some(InputEvent::KeyPressed {
                code: KeyCode::Char('x'),
                modifiers: KeyModifiers::SHIFT,
            })
        );
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(InputEvent::from_terminal(&release), None);
        assert_eq!(InputEvent::from_terminal(&Event::FocusGained), None);
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(InputEvent::parse_key("Space"), Some(KeyCode::Char(' ')));
        assert_eq!(InputEvent::parse_key("x"), Some(KeyCode::Char('x')));
        assert_eq!(InputEvent::parse_key("esc"), Some(KeyCode::Esc));
        assert_eq!(InputEvent::parse_key("xy"), None);
        assert!(InputEvent::key(KeyCode::Char('X')).is_char('x'));
        assert!(InputEvent::key(KeyCode::Char(' ')).is_space());
    }

    #[test]
    fn test_deactivated_router_drops_everything() {
        let mut controller = controller();
        let mut router = InputRouter::new();
        router.deactivate();
        let delivery = router.route(InputEvent::key(KeyCode::Char(' ')), &mut controller);
        assert_eq!(delivery, Delivery::Dropped);
        assert_eq!(
            controller.phase().kickoff().map(|k| k.confirmations()),
            Some(0)
        );

        router.activate();
        let delivery = router.route(InputEvent::key(KeyCode::Char(' ')), &mut controller);
        assert_eq!(delivery, Delivery::Handled);
        assert_eq!(
            controller.phase().kickoff().map(|k| k.confirmations()),
            Some(1)
        );
    }

    #[test]
    fn test_failures_are_reported_not_raised() {
        let mut controller = controller();
        let router = InputRouter::new();
        let click = InputEvent::pointer(None, Some(HexCoord::ORIGIN));
        let delivery = router.route(click, &mut controller);
        assert!(matches!(
            delivery,
            Delivery::Failed(PhaseError::PreconditionMissing(_))
        ));
    }
}
