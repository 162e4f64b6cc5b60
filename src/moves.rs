/// Describing the moves that can be done on a chessboard.
use crate::chess_errors::*;
use crate::coordinates::*;
use std::fmt;
use std::str::FromStr;

/// Number of (from, to) pairs. Also the length of a move score vector.
pub const MOVE_KEY_SPACE: usize = NUM_SQUARES * NUM_SQUARES;

/// A move from one square to another, with the piece a pawn promotes to.
///
/// The promotion piece is not part of the packed key, scores are indexed by the
/// two squares only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coordinate,
    pub to: Coordinate,
    pub promotion: Option<char>,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    /// Long algebraic notation, "e2e4" or "e7e8q".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('O') || s.starts_with('o') || s.starts_with('0') {
            return Err(format!(
                "Castling notation {:?} is not supported, send the king move instead",
                s
            )
            .into());
        }
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return Err(format!("The move string was invalid: {:?}", s).into());
        }

        let wrap = |e: ChessError| -> ChessError {
            format!("The move string was invalid: {:?} ({})", s, e).into()
        };
        let from: Coordinate = s[0..2].parse().map_err(wrap)?;
        let to: Coordinate = s[2..4].parse().map_err(wrap)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(p) if "nbrqNBRQ".contains(p) => Some(p),
            Some(p) => {
                return Err(format!("Invalid promotion piece {:?} in move {:?}", p, s).into())
            }
        };
        Ok(Move::with_promotion(from, to, promotion))
    }
}

impl Move {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Coordinate, to: Coordinate, promotion: Option<char>) -> Self {
        Move {
            from,
            to,
            promotion,
        }
    }

    /// From and to squares packed into 12 bits, from in the high half.
    pub fn binary(&self) -> usize {
        (self.from.index() << 6) | self.to.index()
    }

    /// Inverse of `binary`. None if the key does not fit into 12 bits.
    pub fn from_binary(key: usize) -> Option<Move> {
        if key >= MOVE_KEY_SPACE {
            return None;
        }
        Some(Move::new(
            Coordinate::from_binary((key >> 6) as u8),
            Coordinate::from_binary((key & 0x3F) as u8),
        ))
    }

    pub fn is_on_board(&self) -> bool {
        self.binary() < MOVE_KEY_SPACE
    }

    pub fn rank_delta(&self) -> i16 {
        self.to.rank() as i16 - self.from.rank() as i16
    }

    pub fn file_delta(&self) -> i16 {
        self.to.file() as i16 - self.from.file() as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let m: Move = "e2e4".parse().unwrap();
        assert_eq!(m.from, "e2".parse().unwrap());
        assert_eq!(m.to, "e4".parse().unwrap());
        assert_eq!(m.promotion, None);
        assert_eq!(m.rank_delta(), 2);
        assert_eq!(m.file_delta(), 0);

        let m: Move = "e7e8q".parse().unwrap();
        assert_eq!(m.promotion, Some('q'));
        assert_eq!(m.to_string(), "e7e8q");
    }

    #[test]
    fn test_parse_rejects_castling_notation() {
        for s in &["O-O", "O-O-O", "o-o", "0-0"] {
            assert!(matches!(
                s.parse::<Move>(),
                Err(ChessError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in &["", "e2", "e2e", "e2e4e5", "e2e9", "z2e4", "e7e8k", "e7e8x", "é2e4"] {
            assert!(s.parse::<Move>().is_err(), "accepted {:?}", s);
        }
        match "e2x4".parse::<Move>() {
            Err(ChessError::InvalidFormat(msg)) => assert!(msg.contains("x4")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_binary_key() {
        let m: Move = "a1h8".parse().unwrap();
        assert_eq!(m.binary(), 63);
        let m: Move = "h8a1".parse().unwrap();
        assert_eq!(m.binary(), 63 << 6);
        assert!(m.is_on_board());
        assert_eq!(Move::from_binary(m.binary()), Some(m));
        assert_eq!(Move::from_binary(MOVE_KEY_SPACE), None);
    }

    #[test]
    fn test_round_trip_all_keys() {
        for key in 0..MOVE_KEY_SPACE {
            let m = Move::from_binary(key).unwrap();
            assert_eq!(m.binary(), key);
            assert_eq!(m.to_string().parse::<Move>().unwrap(), m);
        }
        let m: Move = "b7a8N".parse().unwrap();
        assert_eq!(m.to_string().parse::<Move>().unwrap(), m);
    }
}
