//! Scripted matches: a TOML list of inputs replayed against a controller.
//!
//! ```toml
//! [[steps]]
//! click = { token = 4 }
//!
//! [[steps]]
//! click = { cell = [0, 0] }
//!
//! [[steps]]
//! key = "space"
//!
//! [[steps]]
//! pass = { by = 4, to = [6, 0] }
//! ```

use crate::football::{
    HexCoord, MatchState, PhaseController, PhaseEvent, PhaseKind, Relocator, TokenId,
};
use crate::input::{Delivery, InputEvent, InputRouter};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Pointer pick on a token and/or cell.
    Click {
        /// Token under the pointer.
        #[serde(default)]
        token: Option<u32>,
        /// Cell under the pointer.
        #[serde(default)]
        cell: Option<HexCoord>,
    },
    /// Key press by name (`space`, `x`, ...).
    Key(String),
    /// A completed pass, as reported by the orchestrator.
    Pass {
        /// The token that played the ball.
        by: u32,
        /// Where the ball ended up.
        to: HexCoord,
    },
    /// Back to kickoff (e.g. after a goal).
    Restart {},
    /// End of match.
    Resolve {},
}

/// A scripted match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScenarioError::new(format!("Failed to read script: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses a script from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        let script: Self = toml::from_str(content)
            .map_err(|e| ScenarioError::new(format!("Failed to parse script: {}", e)))?;
        debug!(steps = script.steps.len(), "Script parsed");
        Ok(script)
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step index (0-based).
    pub index: usize,
    /// Phase after the step.
    pub phase: PhaseKind,
    /// Error text if the step was refused.
    pub error: Option<String>,
    /// A goalkeeper relocation was still in flight after the step.
    pub relocating: bool,
}

/// Summary of a replayed script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Per-step outcomes.
    pub steps: Vec<StepReport>,
    /// Final phase.
    pub phase: PhaseKind,
    /// Number of rejection notifications observed.
    pub rejections: usize,
}

/// Runs a script against a controller.
///
/// After each step the runtime gets one turn to deliver completion signals,
/// then any finished relocation is applied. A relocation whose signal has
/// not fired is reported as still in flight rather than awaited, since the
/// signal may be held by a relocator only reachable through `controller`.
#[instrument(skip(script, controller), fields(steps = script.steps.len()))]
pub async fn replay<R: Relocator>(
    script: &Script,
    controller: &mut PhaseController<R, MatchState>,
) -> Result<ReplayReport, ScenarioError> {
    let router = InputRouter::new();
    let mut subscription = controller.subscribe();
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let error = match step {
            Step::Click { token, cell } => {
                let event = InputEvent::pointer(token.map(TokenId), *cell);
                delivery_error(router.route(event, controller))
            }
            Step::Key(name) => {
                let code = InputEvent::parse_key(name).ok_or_else(|| {
                    ScenarioError::new(format!("Step {}: unknown key {:?}", index, name))
                })?;
                delivery_error(router.route(InputEvent::key(code), controller))
            }
            Step::Pass { by, to } => {
                controller.context_mut().record_touch(TokenId(*by));
                controller
                    .on_pass_completed(*to)
                    .err()
                    .map(|e| e.to_string())
            }
            Step::Restart {} => controller.begin_kickoff().err().map(|e| e.to_string()),
            Step::Resolve {} => controller.resolve().err().map(|e| e.to_string()),
        };

        tokio::task::yield_now().await;
        if controller.poll_relocation() {
            debug!(index, "Relocation settled");
        }

        let phase = controller.phase().kind();
        let relocating = phase == PhaseKind::AwaitingConfirmation;
        match &error {
            Some(message) => warn!(index, %phase, %message, "Step refused"),
            None => info!(index, %phase, "Step applied"),
        }
        steps.push(StepReport {
            index,
            phase,
            error,
            relocating,
        });
    }

    let rejections = subscription
        .drain()
        .iter()
        .filter(|event| matches!(event, PhaseEvent::ValidationRejected(_)))
        .count();
    controller.unsubscribe(subscription.id);

    Ok(ReplayReport {
        steps,
        phase: controller.phase().kind(),
        rejections,
    })
}

fn delivery_error(delivery: Delivery) -> Option<String> {
    match delivery {
        Delivery::Handled => None,
        Delivery::Dropped => Some("no phase is accepting input".to_string()),
        Delivery::Failed(err) => Some(err.to_string()),
    }
}

/// Script error.
#[derive(Debug, Clone, Display, Error)]
#[display("Scenario error: {} at {}:{}", message, file, line)]
pub struct ScenarioError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScenarioError {
    /// Creates a new scenario error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_step_kinds() {
        let script = Script::from_toml(
            r#"
            [[steps]]
            click = { token = 4 }

            [[steps]]
            click = { cell = [0, 0] }

            [[steps]]
            key = "space"

            [[steps]]
            pass = { by = 4, to = [6, 0] }

            [[steps]]
            restart = {}

            [[steps]]
            resolve = {}
            "#,
        )
        .expect("parse");

        assert_eq!(
            script.steps,
            vec![
                Step::Click {
                    token: Some(4),
                    cell: None
                },
                Step::Click {
                    token: None,
                    cell: Some(HexCoord::ORIGIN)
                },
                Step::Key("space".to_string()),
                Step::Pass {
                    by: 4,
                    to: HexCoord::new(6, 0)
                },
                Step::Restart {},
                Step::Resolve {},
            ]
        );
    }

    #[test]
    fn test_unknown_step_is_error() {
        assert!(Script::from_toml("[[steps]]\nteleport = { to = [1, 1] }").is_err());
    }
}
