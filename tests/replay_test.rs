//! Tests for scripted replay against configured matches.

use std::io::Write;
use std::time::Duration;
use strictly_football::football::{
    DeferredRelocator, HexCoord, InstantRelocator, MatchState, PhaseController, PhaseKind,
    TokenId,
};
use strictly_football::{MatchConfig, Script, replay};

fn controller(config: &MatchConfig) -> PhaseController<InstantRelocator, MatchState> {
    PhaseController::new(
        config.build_board().expect("board"),
        config.rules().clone(),
        InstantRelocator::default(),
        MatchState::new(*config.home_direction()),
    )
}

#[tokio::test]
async fn test_replay_full_match_from_files() {
    let mut config_file = tempfile::NamedTempFile::new().expect("config file");
    write!(
        config_file,
        r#"
        [rules]
        confirmations_required = 1
        "#
    )
    .expect("write config");

    let mut script_file = tempfile::NamedTempFile::new().expect("script file");
    write!(
        script_file,
        r#"
        [[steps]]
        click = {{ token = 5 }}

        [[steps]]
        click = {{ cell = [0, 0] }}

        [[steps]]
        key = "space"

        [[steps]]
        pass = {{ by = 5, to = [7, 0] }}

        [[steps]]
        key = "x"

        [[steps]]
        resolve = {{}}
        "#
    )
    .expect("write script");

    let config = MatchConfig::from_file(config_file.path()).expect("config");
    let script = Script::from_file(script_file.path()).expect("script");
    let mut controller = controller(&config);

    let report = replay(&script, &mut controller).await.expect("replay");
    let phases: Vec<PhaseKind> = report.steps.iter().map(|s| s.phase).collect();
    assert_eq!(
        phases,
        vec![
            PhaseKind::PreKickoff,
            PhaseKind::PreKickoff,
            PhaseKind::InPlay,
            PhaseKind::AwaitingGkDecision,
            PhaseKind::InPlay,
            PhaseKind::Resolved,
        ]
    );
    assert!(report.steps.iter().all(|s| s.error.is_none() && !s.relocating));
    assert_eq!(report.phase, PhaseKind::Resolved);
    assert_eq!(report.rejections, 0);
    assert_eq!(*controller.context().last_touch(), Some(TokenId(5)));
    assert_eq!(*controller.context().gk_decisions(), 1);
}

#[tokio::test]
async fn test_replay_records_refused_steps_and_continues() {
    let script = Script::from_toml(
        r#"
        [[steps]]
        click = { token = 2 }

        [[steps]]
        click = { cell = [3, 0] }

        [[steps]]
        key = "space"

        [[steps]]
        key = "space"

        [[steps]]
        restart = {}
        "#,
    )
    .expect("script");
    let mut controller = controller(&MatchConfig::default());

    let report = replay(&script, &mut controller).await.expect("replay");
    let refused: Vec<usize> = report
        .steps
        .iter()
        .filter(|s| s.error.is_some())
        .map(|s| s.index)
        .collect();
    assert_eq!(refused, vec![1, 3, 4]);
    assert_eq!(report.rejections, 2);
    assert_eq!(report.phase, PhaseKind::PreKickoff);
    assert_eq!(
        controller.phase().kickoff().map(|k| k.confirmations()),
        Some(1)
    );
}

#[tokio::test]
async fn test_replay_unknown_key_is_error() {
    let script = Script::from_toml("[[steps]]\nkey = \"meta-hyper\"").expect("script");
    let mut controller = controller(&MatchConfig::default());
    assert!(replay(&script, &mut controller).await.is_err());
}

#[tokio::test]
async fn test_replay_reports_unfired_relocation_instead_of_waiting() {
    let script = Script::from_toml(
        r#"
        [[steps]]
        click = { token = 5 }

        [[steps]]
        click = { cell = [0, 0] }

        [[steps]]
        key = "space"

        [[steps]]
        key = "space"

        [[steps]]
        pass = { by = 5, to = [7, 0] }

        [[steps]]
        click = { cell = [7, 0] }
        "#,
    )
    .expect("script");
    let config = MatchConfig::default();
    let mut controller = PhaseController::new(
        config.build_board().expect("board"),
        config.rules().clone(),
        DeferredRelocator::default(),
        MatchState::new(*config.home_direction()),
    );

    let report = tokio::time::timeout(Duration::from_secs(2), replay(&script, &mut controller))
        .await
        .expect("replay finished without the signal firing")
        .expect("replay");
    let last = report.steps.last().expect("steps");
    assert_eq!(last.error, None);
    assert!(last.relocating);
    assert_eq!(report.phase, PhaseKind::AwaitingConfirmation);
    assert_eq!(
        controller.board().token(TokenId(6)).map(|t| *t.cell()),
        Some(HexCoord::new(7, 0))
    );

    controller
        .relocator_mut()
        .take_signal()
        .expect("pending signal")
        .fire();
    assert!(controller.poll_relocation());
    assert_eq!(controller.phase().kind(), PhaseKind::InPlay);
}
