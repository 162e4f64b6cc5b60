use std::fmt::{self, Display};

// ---------------------------------------------
// Pieces
// ---------------------------------------------
//
// Pieces live on the board as single characters: uppercase for White, lowercase for
// Black and '.' for an empty square. Any other letter is a piece without known
// movement rules and is tolerated.

pub const EMPTY: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank index of this side's back rank.
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank index the pawns of this side start from.
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank index a pawn of this side promotes on.
    pub fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    /// +1 for White, -1 for Black
    pub fn forward(self) -> i16 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// Color of a piece character. None for empty squares and non-letters.
pub fn color_of(piece: char) -> Option<Color> {
    if piece.is_ascii_uppercase() {
        Some(Color::White)
    } else if piece.is_ascii_lowercase() {
        Some(Color::Black)
    } else {
        None
    }
}

/// Writes a piece letter in the case of the given side.
pub fn colored(piece: char, color: Color) -> char {
    match color {
        Color::White => piece.to_ascii_uppercase(),
        Color::Black => piece.to_ascii_lowercase(),
    }
}

impl PieceType {
    /// Promotion choices, most valuable first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn from_char(piece: char) -> Option<PieceType> {
        use PieceType::*;

        match piece.to_ascii_lowercase() {
            'p' => Some(Pawn),
            'n' => Some(Knight),
            'b' => Some(Bishop),
            'r' => Some(Rook),
            'q' => Some(Queen),
            'k' => Some(King),
            _ => None,
        }
    }

    pub fn to_char(self, color: Color) -> char {
        use PieceType::*;

        let c = match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        };
        colored(c, color)
    }
}

/// Unicode chess symbol for a piece character, used for the human facing board.
/// Unknown pieces are shown as their letter.
pub fn symbol(piece: char) -> char {
    match piece {
        'K' => '\u{2654}',
        'Q' => '\u{2655}',
        'R' => '\u{2656}',
        'B' => '\u{2657}',
        'N' => '\u{2658}',
        'P' => '\u{2659}',
        'k' => '\u{265a}',
        'q' => '\u{265b}',
        'r' => '\u{265c}',
        'b' => '\u{265d}',
        'n' => '\u{265e}',
        'p' => '\u{265f}',
        EMPTY => ' ',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors() {
        assert_eq!(color_of('K'), Some(Color::White));
        assert_eq!(color_of('p'), Some(Color::Black));
        assert_eq!(color_of(EMPTY), None);
        assert_eq!(color_of('3'), None);
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.promotion_rank(), 0);
    }

    #[test]
    fn test_piece_chars() {
        for c in "pnbrqkPNBRQK".chars() {
            let t = PieceType::from_char(c).unwrap();
            assert_eq!(t.to_char(color_of(c).unwrap()), c);
        }
        // fairy pieces are not known
        assert_eq!(PieceType::from_char('a'), None);
        assert_eq!(colored('q', Color::White), 'Q');
        assert_eq!(symbol('z'), 'z');
    }
}
