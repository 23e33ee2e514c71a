//! Match configuration loaded from TOML.

use crate::football::{
    Board, Direction, Grid, HexCoord, PhaseRules, PitchLayout, Role, Team, Token, TokenId,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// One token in the starting lineup.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Token id.
    id: u32,
    /// Team.
    team: Team,
    /// Role.
    role: Role,
    /// Starting cell as `[x, y]`.
    cell: HexCoord,
}

impl TokenSpec {
    /// Creates a lineup entry.
    pub fn new(id: u32, team: Team, role: Role, cell: HexCoord) -> Self {
        Self {
            id,
            team,
            role,
            cell,
        }
    }
}

/// Configuration for one match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct MatchConfig {
    /// Pitch geometry.
    #[serde(default)]
    pitch: PitchLayout,

    /// Phase-machine rules.
    #[serde(default)]
    rules: PhaseRules,

    /// Direction the home team attacks.
    #[serde(default = "default_home_direction")]
    home_direction: Direction,

    /// Starting lineup.
    #[serde(default = "default_lineup")]
    tokens: Vec<TokenSpec>,
}

#[instrument]
fn default_home_direction() -> Direction {
    Direction::LeftToRight
}

/// Five a side: keeper, two defenders, two attackers, home on the left.
#[instrument]
fn default_lineup() -> Vec<TokenSpec> {
    let home = [
        (Role::Goalkeeper, -8, 0),
        (Role::Defender, -5, -2),
        (Role::Defender, -5, 2),
        (Role::Attacker, -2, -1),
        (Role::Attacker, -2, 1),
    ];
    let away = home.map(|(role, x, y)| (role, -x, y));
    home.iter()
        .map(|spec| (Team::Home, spec))
        .chain(away.iter().map(|spec| (Team::Away, spec)))
        .enumerate()
        .map(|(index, (team, &(role, x, y)))| {
            TokenSpec::new(index as u32 + 1, team, role, HexCoord::new(x, y))
        })
        .collect()
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pitch: PitchLayout::default(),
            rules: PhaseRules::default(),
            home_direction: default_home_direction(),
            tokens: default_lineup(),
        }
    }
}

impl MatchConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(tokens = config.tokens.len(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Builds the starting board, validating the lineup against the pitch.
    #[instrument(skip(self))]
    pub fn build_board(&self) -> Result<Board, ConfigError> {
        if self.rules.confirmations_required() == &0 {
            return Err(ConfigError::new(
                "confirmations_required must be at least 1".to_string(),
            ));
        }
        let grid = Grid::from_layout(&self.pitch, *self.rules.kickoff_cell());
        if grid.cell_at(*self.rules.kickoff_cell()).is_none() {
            return Err(ConfigError::new(format!(
                "Kickoff cell {} is off the pitch",
                self.rules.kickoff_cell()
            )));
        }

        let mut board = Board::new(grid);
        let mut seen = HashSet::new();
        for spec in &self.tokens {
            if !seen.insert(spec.id) {
                return Err(ConfigError::new(format!("Duplicate token id {}", spec.id)));
            }
            let token = Token::new(TokenId(spec.id), spec.team, spec.role, spec.cell);
            board
                .place(token)
                .map_err(|e| ConfigError::new(format!("Invalid lineup: {}", e)))?;
        }
        for team in Team::iter() {
            let keepers = board
                .tokens()
                .filter(|t| *t.team() == team && t.is_goalkeeper())
                .count();
            if keepers > 1 {
                return Err(ConfigError::new(format!(
                    "{} fields {} goalkeepers, at most one allowed",
                    team, keepers
                )));
            }
        }
        debug!(tokens = seen.len(), "Board built from config");
        Ok(board)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
    use std::io::Write;

    #[test]
    fn test_default_lineup_builds() {
        let board = MatchConfig::default().build_board().expect("default board");
        assert_eq!(board.tokens().count(), 10);
        assert!(board.goalkeeper_of(Team::Home).is_some());
        assert!(board.goalkeeper_of(Team::Away).is_some());
        assert!(board.tokens().all(|t| match t.team() {
            Team::Home => t.cell().x < 0,
            Team::Away => t.cell().x > 0,
        }));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = MatchConfig::from_toml(
            r#"
            home_direction = "right_to_left"

            [pitch]
            half_width = 6

            [rules]
            confirmations_required = 3
            "#,
        )
        .expect("parse");
        assert_eq!(config.home_direction(), &Direction::RightToLeft);
        assert_eq!(config.pitch().half_width(), &6);
        assert_eq!(config.pitch().half_height(), &5);
        assert_eq!(config.rules().confirmations_required(), &3);
        assert_eq!(config.rules().kickoff_cell(), &HexCoord::ORIGIN);
        assert_eq!(config.tokens().len(), 10);
    }

    #[test]
    fn test_kickoff_circle_surrounds_configured_spot() {
        let config = MatchConfig::from_toml(
            r#"
            [rules]
            kickoff_cell = [-2, 0]
            "#,
        )
        .expect("parse");
        let board = config.build_board().expect("board");
        let in_circle = |x, y| {
            board
                .grid()
                .cell_at(HexCoord::new(x, y))
                .map(|c| *c.in_circle())
        };
        assert_eq!(in_circle(-2, 0), Some(true));
        assert_eq!(in_circle(-3, 0), Some(true));
        assert_eq!(in_circle(0, 0), Some(false));
    }

    #[test]
    fn test_lineup_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
            [[tokens]]
            id = 7
            team = "home"
            role = "attacker"
            cell = [0, 0]

            [[tokens]]
            id = 8
            team = "away"
            role = "goalkeeper"
            cell = [8, 0]
            "#
        )
        .expect("write");

        let config = MatchConfig::from_file(file.path()).expect("load");
        let board = config.build_board().expect("board");
        assert_eq!(board.occupant(HexCoord::ORIGIN).map(|t| *t.id()), Some(TokenId(7)));
    }

    #[test]
    fn test_overlapping_lineup_rejected() {
        let config = MatchConfig::default().with_tokens(vec![
            TokenSpec::new(1, Team::Home, Role::Attacker, HexCoord::new(-1, 0)),
            TokenSpec::new(2, Team::Home, Role::Defender, HexCoord::new(-1, 0)),
        ]);
        let err = config.build_board().expect_err("overlap");
        assert!(err.message.contains("occupied"), "{}", err);
    }

    #[test]
    fn test_off_pitch_token_and_duplicate_ids_rejected() {
        let off = MatchConfig::default().with_tokens(vec![TokenSpec::new(
            1,
            Team::Home,
            Role::Attacker,
            HexCoord::new(-20, 0),
        )]);
        assert!(off.build_board().is_err());

        let dup = MatchConfig::default().with_tokens(vec![
            TokenSpec::new(1, Team::Home, Role::Attacker, HexCoord::new(-1, 0)),
            TokenSpec::new(1, Team::Away, Role::Attacker, HexCoord::new(1, 0)),
        ]);
        let err = dup.build_board().expect_err("duplicate");
        assert!(err.message.contains("Duplicate"));
    }

    #[test]
    fn test_second_goalkeeper_rejected() {
        let config = MatchConfig::default().with_tokens(vec![
            TokenSpec::new(1, Team::Away, Role::Goalkeeper, HexCoord::new(8, 0)),
            TokenSpec::new(2, Team::Away, Role::Goalkeeper, HexCoord::new(7, 1)),
        ]);
        let err = config.build_board().expect_err("two keepers");
        assert!(err.message.contains("goalkeepers"), "{}", err);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = MatchConfig::from_file("/definitely/not/here.toml").expect_err("missing");
        assert!(err.message.contains("Failed to read"));
    }
}
