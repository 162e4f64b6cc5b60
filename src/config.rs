use crate::chess_errors::*;
use std::str::FromStr;

/// Who plays a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Human,
    Random,
    Scorer,
}

impl FromStr for AgentKind {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(AgentKind::Human),
            "random" => Ok(AgentKind::Random),
            "scorer" => Ok(AgentKind::Scorer),
            _ => Err(ChessError::Config(format!(
                "Unknown agent {:?}, expected human, random or scorer",
                s
            ))),
        }
    }
}

/// Game configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Starting position, standard start if None.
    pub fen: Option<String>,
    /// Long algebraic moves played from the start before the agents take over.
    pub moves: Vec<String>,
    pub white: AgentKind,
    pub black: AgentKind,
    /// Stop after this many moves of both sides together.
    pub max_plies: usize,
    /// RNG seed for random and placeholder agents.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> ChessResult<Self> {
        GameConfig::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> ChessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GameConfig::default();
        let parse_number = |key: &str| -> ChessResult<Option<u64>> {
            match lookup(key) {
                None => Ok(None),
                Some(v) => v
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ChessError::Config(format!("{} must be a number, got {:?}", key, v))),
            }
        };

        Ok(GameConfig {
            fen: lookup("CHESS_FEN").filter(|f| !f.trim().is_empty()),
            moves: lookup("CHESS_MOVES")
                .map(|v| v.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
            white: match lookup("CHESS_WHITE") {
                Some(v) => v.parse()?,
                None => defaults.white,
            },
            black: match lookup("CHESS_BLACK") {
                Some(v) => v.parse()?,
                None => defaults.black,
            },
            max_plies: parse_number("CHESS_MAX_PLIES")?
                .map_or(defaults.max_plies, |n| n as usize),
            seed: parse_number("CHESS_SEED")?,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fen: None,
            moves: Vec::new(),
            white: AgentKind::Human,
            black: AgentKind::Scorer,
            max_plies: 200,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.white, AgentKind::Human);
        assert_eq!(config.black, AgentKind::Scorer);
        assert_eq!(config.max_plies, 200);
        assert_eq!(config.fen, None);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GameConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn values_are_read() {
        let config = GameConfig::from_lookup(lookup_from(&[
            ("CHESS_FEN", "8/8/8/8/8/8/8/K6k w - - 0 1"),
            ("CHESS_MOVES", " a1a2  h1h2 "),
            ("CHESS_WHITE", "Random"),
            ("CHESS_BLACK", "scorer"),
            ("CHESS_MAX_PLIES", "12"),
            ("CHESS_SEED", "99"),
        ]))
        .unwrap();
        assert_eq!(config.fen.as_deref(), Some("8/8/8/8/8/8/8/K6k w - - 0 1"));
        assert_eq!(config.moves, ["a1a2", "h1h2"]);
        assert_eq!(config.white, AgentKind::Random);
        assert_eq!(config.max_plies, 12);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            GameConfig::from_lookup(lookup_from(&[("CHESS_WHITE", "robot")])),
            Err(ChessError::Config(_))
        ));
        assert!(matches!(
            GameConfig::from_lookup(lookup_from(&[("CHESS_MAX_PLIES", "lots")])),
            Err(ChessError::Config(_))
        ));
    }
}
