//! Tests for suspending goalkeeper relocations.

use std::time::Duration;
use strictly_football::football::{
    Board, Completion, DeferredRelocator, Direction, Grid, HexCoord, InFlight, MatchState,
    PenaltyBox, PhaseController, PhaseError, PhaseKind, PhaseRules, RejectReason,
    RelocationError, Role, Team, Token, TokenId,
};
use strictly_football::InputEvent;

fn controller_awaiting_keeper() -> PhaseController<DeferredRelocator, MatchState> {
    let grid = Grid::new(4, 3)
        .with_circle(HexCoord::ORIGIN)
        .with_penalty_box(HexCoord::new(4, 0), PenaltyBox::Right);
    let mut board = Board::new(grid);
    for token in [
        Token::new(TokenId(1), Team::Home, Role::Attacker, HexCoord::ORIGIN),
        Token::new(TokenId(2), Team::Away, Role::Goalkeeper, HexCoord::new(4, 1)),
    ] {
        board.place(token).expect("place");
    }
    let mut controller = PhaseController::new(
        board,
        PhaseRules::default(),
        DeferredRelocator::default(),
        MatchState::new(Direction::LeftToRight),
    );
    let space = InputEvent::key(crossterm::event::KeyCode::Char(' '));
    controller.handle(space).expect("press 1");
    controller.handle(space).expect("press 2");
    assert!(controller.on_pass_completed(HexCoord::new(4, 0)).expect("pass"));
    controller
}

fn first_option(controller: &PhaseController<DeferredRelocator, MatchState>) -> HexCoord {
    controller
        .phase()
        .gk_decision()
        .and_then(|d| d.options().iter().next().copied())
        .expect("at least one option")
}

#[tokio::test]
async fn test_settle_suspends_until_signal_fires() {
    let mut controller = controller_awaiting_keeper();
    let target = first_option(&controller);
    controller
        .handle(InputEvent::pointer(None, Some(target)))
        .expect("keeper move");
    assert_eq!(controller.phase().kind(), PhaseKind::AwaitingConfirmation);

    let signal = controller.relocator_mut().take_signal().expect("signal");
    let animation = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.fire();
    });

    assert!(controller.settle().await);
    animation.await.expect("animation task");
    assert_eq!(controller.phase().kind(), PhaseKind::InPlay);
    assert!(controller.in_flight().is_empty());
    assert_eq!(*controller.context().gk_decisions(), 1);
}

#[tokio::test]
async fn test_abandoned_signal_still_resolves_phase() {
    let mut controller = controller_awaiting_keeper();
    let target = first_option(&controller);
    controller
        .handle(InputEvent::pointer(None, Some(target)))
        .expect("keeper move");
    drop(controller.relocator_mut().take_signal());

    assert!(controller.settle().await);
    assert_eq!(controller.phase().kind(), PhaseKind::InPlay);
    assert_eq!(
        controller.board().token(TokenId(2)).map(|t| *t.cell()),
        Some(target)
    );
}

#[test]
fn test_click_during_relocation_is_rejected_once_per_token() {
    let mut controller = controller_awaiting_keeper();
    let target = first_option(&controller);
    controller
        .handle(InputEvent::pointer(None, Some(target)))
        .expect("keeper move");

    let again = controller.handle(InputEvent::pointer(None, Some(HexCoord::new(3, 0))));
    assert_eq!(
        again,
        Err(PhaseError::ValidationRejected(RejectReason::RelocationInFlight(
            TokenId(2)
        )))
    );
    assert_eq!(controller.relocator().moves().len(), 1);
    assert_eq!(controller.relocator().pending(), 1);
}

#[tokio::test]
async fn test_settle_without_relocation_returns_false() {
    let mut controller = controller_awaiting_keeper();
    assert!(!controller.settle().await);
    assert_eq!(controller.phase().kind(), PhaseKind::AwaitingGkDecision);
}

#[tokio::test]
async fn test_completion_pair_wait_and_abandon() {
    let (signal, mut completion) = Completion::pair(TokenId(5));
    signal.fire();
    assert_eq!(completion.wait().await, Ok(()));

    let (signal, mut completion) = Completion::pair(TokenId(6));
    drop(signal);
    assert_eq!(
        completion.wait().await,
        Err(RelocationError::Abandoned(TokenId(6)))
    );
}

#[test]
fn test_in_flight_guard_per_token() {
    let mut in_flight = InFlight::default();
    in_flight.begin(TokenId(1)).expect("first");
    in_flight.begin(TokenId(2)).expect("other token");
    assert_eq!(
        in_flight.begin(TokenId(1)),
        Err(RelocationError::InFlight(TokenId(1)))
    );
    in_flight.finish(TokenId(1));
    assert!(in_flight.begin(TokenId(1)).is_ok());
}
