//! Tests for move validation over the full default pitch.

use strictly_football::MatchConfig;
use strictly_football::football::rules::{self, GkTriggerRule};
use strictly_football::football::{
    Board, Direction, MoveError, MoveRequest, PenaltyBox, RejectReason, Role, TokenId, Zone,
};

fn board() -> Board {
    MatchConfig::default().build_board().expect("default board")
}

/// Expected placement outcome, derived directly from the cell's tags.
fn expected(board: &Board, mover: TokenId, x: i32, y: i32) -> Result<(), RejectReason> {
    let token = board.token(mover).expect("mover");
    let cell = board
        .grid()
        .cell_at(strictly_football::football::HexCoord::new(x, y))
        .expect("cell");
    if (token.cell().x as i64) * (x as i64) < 0 {
        return Err(RejectReason::OppositeHalf);
    }
    if *cell.in_circle() && !token.is_attacker() {
        return Err(RejectReason::KickoffCircle);
    }
    match cell.occupant() {
        Some(other) if other != token.id() => Err(RejectReason::Occupied(*other)),
        _ => Ok(()),
    }
}

#[test]
fn test_placement_rules_agree_with_cell_tags_everywhere() {
    let board = board();
    for mover in [TokenId(2), TokenId(4), TokenId(9)] {
        let token = board.token(mover).expect("mover");
        let origin = board.grid().cell_at(*token.cell()).expect("origin");
        for cell in board.grid().cells() {
            let request = MoveRequest::placement(token, origin, Some(cell));
            let actual = rules::validate(&request).map_err(|err| match err {
                MoveError::Rejected(reason) => reason,
                MoveError::InvariantViolation(message) => panic!("{}", message),
            });
            let coord = cell.coord();
            assert_eq!(
                actual,
                expected(&board, mover, coord.x, coord.y),
                "{} -> {}",
                mover,
                coord
            );
        }
    }
}

#[test]
fn test_unresolved_target_is_invariant_violation() {
    let board = board();
    let token = board.token(TokenId(4)).expect("attacker");
    let origin = board.grid().cell_at(*token.cell()).expect("origin");
    for request in [
        MoveRequest::placement(token, origin, None),
        MoveRequest::step(token, origin, None),
    ] {
        assert!(matches!(
            rules::validate(&request),
            Err(MoveError::InvariantViolation(_))
        ));
    }
}

#[test]
fn test_forbidden_penalty_box_zone() {
    let board = board();
    let keeper = board.token(TokenId(1)).expect("home keeper");
    let origin = board.grid().cell_at(*keeper.cell()).expect("origin");
    let boxed = board
        .grid()
        .cells()
        .find(|cell| *cell.penalty_box() == PenaltyBox::Left && cell.is_vacant())
        .expect("vacant box cell");
    let open = board
        .grid()
        .cells()
        .find(|cell| *cell.penalty_box() == PenaltyBox::None && cell.is_vacant())
        .expect("vacant open cell");

    let mut request = MoveRequest::step(keeper, origin, Some(boxed));
    request.forbidden_zone = Some(Zone::PenaltyBox(PenaltyBox::Left));
    assert_eq!(
        rules::validate(&request),
        Err(MoveError::Rejected(RejectReason::ForbiddenPenaltyBox(
            PenaltyBox::Left
        )))
    );

    request.target = Some(open);
    assert_eq!(rules::validate(&request), Ok(()));
}

#[test]
fn test_gk_trigger_truth_table() {
    for role in [Role::Attacker, Role::Defender, Role::Goalkeeper] {
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            for tag in [-1i8, 0, 1] {
                let target_box = PenaltyBox::from_tag(tag);
                let defended = match direction {
                    Direction::LeftToRight => 1,
                    Direction::RightToLeft => -1,
                };
                let expected = role == Role::Attacker && tag == defended;
                assert_eq!(
                    GkTriggerRule::grants_free_move(role, direction, target_box),
                    expected,
                    "{} {} {}",
                    role,
                    direction,
                    tag
                );
            }
        }
    }
}
