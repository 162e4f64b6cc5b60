use crate::boards::*;
use crate::chess_errors::*;
use crate::coordinates::*;
use crate::moves::*;
use crate::pieces::*;
use lazy_static::lazy_static;
use std::fmt::{self, Display};

// -------------------------------------
// Position
// ------------------------------------

const STANDARD_START_ROWS: [&str; 8] = [
    "rnbqkbnr", "pppppppp", "........", "........", "........", "........", "PPPPPPPP",
    "RNBQKBNR",
];

// Promotion letters chosen by the destination rank of a pawn "move" from the 7th
// (2nd for Black) rank. Lets a from/to score key express the promotion piece.
const WHITE_PROMOTION_TABLE: [char; 4] = ['N', 'B', 'R', 'Q'];
const BLACK_PROMOTION_TABLE: [char; 4] = ['q', 'r', 'b', 'n'];

lazy_static! {
    static ref STANDARD_START: Position = Position::new(
        Board::from_rows(&STANDARD_START_ROWS).expect("Standard setup failed; rows are invalid."),
        Color::White,
        CastlingRights::standard(),
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// File the king ends up on after castling.
    pub fn king_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }

    /// File the rook ends up on after castling.
    pub fn rook_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }
}

/// For every side and wing, the file of the rook that may still castle.
/// Supports rooks starting on other files than a and h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_kingside: Option<u8>,
    pub white_queenside: Option<u8>,
    pub black_kingside: Option<u8>,
    pub black_queenside: Option<u8>,
}

impl CastlingRights {
    pub fn standard() -> CastlingRights {
        CastlingRights {
            white_kingside: Some(7),
            white_queenside: Some(0),
            black_kingside: Some(7),
            black_queenside: Some(0),
        }
    }

    fn slot(&mut self, color: Color, side: CastlingSide) -> &mut Option<u8> {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => &mut self.white_kingside,
            (Color::White, CastlingSide::Queenside) => &mut self.white_queenside,
            (Color::Black, CastlingSide::Kingside) => &mut self.black_kingside,
            (Color::Black, CastlingSide::Queenside) => &mut self.black_queenside,
        }
    }

    pub fn get(&self, color: Color, side: CastlingSide) -> Option<u8> {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => self.white_kingside,
            (Color::White, CastlingSide::Queenside) => self.white_queenside,
            (Color::Black, CastlingSide::Kingside) => self.black_kingside,
            (Color::Black, CastlingSide::Queenside) => self.black_queenside,
        }
    }

    pub fn set(&mut self, color: Color, side: CastlingSide, rook_file: Option<u8>) {
        *self.slot(color, side) = rook_file;
    }

    pub fn clear(&mut self, color: Color) {
        self.set(color, CastlingSide::Kingside, None);
        self.set(color, CastlingSide::Queenside, None);
    }

    /// Decodes a FEN castling field. Accepts classical `KQkq` letters (the outermost
    /// rook on that wing, falling back to the h- and a-file) as well as file letters
    /// naming the rook directly (`HAha`).
    pub fn from_fen_field(field: &str, board: &Board) -> ChessResult<CastlingRights> {
        let mut rights = CastlingRights::default();
        if field == "-" {
            return Ok(rights);
        }

        for c in field.chars() {
            let color = color_of(c)
                .ok_or_else(|| ChessError::from(format!("Invalid castling field {:?}", field)))?;
            let back = color.back_rank();
            let king_file = board
                .iter()
                .find(|&(sq, p)| sq.rank() == back && p == PieceType::King.to_char(color))
                .map(|(sq, _)| sq.file());
            let rook = PieceType::Rook.to_char(color);
            let rook_files = (0..BOARD_SIZE).filter(|&f| board.get(Coordinate::new(back, f)) == rook);

            match c.to_ascii_lowercase() {
                'k' => {
                    let outermost = rook_files
                        .filter(|&f| king_file.map_or(true, |k| f > k))
                        .max()
                        .unwrap_or(7);
                    rights.set(color, CastlingSide::Kingside, Some(outermost));
                }
                'q' => {
                    let outermost = rook_files
                        .filter(|&f| king_file.map_or(true, |k| f < k))
                        .min()
                        .unwrap_or(0);
                    rights.set(color, CastlingSide::Queenside, Some(outermost));
                }
                f @ 'a'..='h' => {
                    let file = f as u8 - b'a';
                    let side = if file > king_file.unwrap_or(4) {
                        CastlingSide::Kingside
                    } else {
                        CastlingSide::Queenside
                    };
                    rights.set(color, side, Some(file));
                }
                _ => return Err(format!("Invalid castling field {:?}", field).into()),
            }
        }
        Ok(rights)
    }

    pub fn to_fen_field(&self) -> String {
        let mut res = String::new();
        for &color in &[Color::White, Color::Black] {
            for &side in CastlingSide::BOTH.iter() {
                let file = match self.get(color, side) {
                    Some(f) => f,
                    None => continue,
                };
                let letter = match (side, file) {
                    (CastlingSide::Kingside, 7) => 'k',
                    (CastlingSide::Queenside, 0) => 'q',
                    (_, f) => (b'a' + f) as char,
                };
                res.push(colored(letter, color));
            }
        }
        if res.is_empty() {
            res.push('-');
        }
        res
    }
}

/// A board with everything needed to know which moves are playable.
///
/// Positions are values: every change goes through `apply_move`, which returns a new
/// position and leaves the old one as it was.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Coordinate>,
}

// Construction
impl Position {
    pub fn standard_start() -> Position {
        STANDARD_START.clone()
    }

    pub fn new(board: Board, side_to_move: Color, castling: CastlingRights) -> Position {
        Position {
            board,
            side_to_move,
            castling,
            en_passant: None,
        }
    }

    /// Builds a position from the first three FEN fields. Any side other than "w"
    /// means Black is to move.
    pub fn from_fen_fields(board: &str, side: &str, castling: &str) -> ChessResult<Position> {
        let board = Board::from_fen_field(board)?;
        let side_to_move = if side == "w" { Color::White } else { Color::Black };
        let castling = CastlingRights::from_fen_field(castling, &board)?;
        Ok(Position::new(board, side_to_move, castling))
    }

    /// Parses a full FEN record. The en-passant field is read if present, move
    /// counters are ignored.
    pub fn from_fen(fen: &str) -> ChessResult<Position> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(format!("FEN needs at least 3 fields: {:?}", fen).into());
        }
        let mut position = Position::from_fen_fields(fields[0], fields[1], fields[2])?;
        position.en_passant = match fields.get(3) {
            None | Some(&"-") => None,
            Some(square) => Some(square.parse()?),
        };
        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        format!(
            "{} {} {} {} 0 1",
            self.board.to_fen_field(),
            side,
            self.castling.to_fen_field(),
            en_passant
        )
    }
}

// Accessors
impl Position {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant(&self) -> Option<Coordinate> {
        self.en_passant
    }

    pub fn piece_at(&self, c: Coordinate) -> char {
        self.board.get(c)
    }
}

// Applying moves
impl Position {
    /// Plays a move without checking it. The piece on the destination square, if
    /// any, is captured.
    pub fn apply_move(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        let piece = self.board.get(mv.from);
        let mover = color_of(piece).unwrap_or(self.side_to_move);
        let is_pawn = PieceType::from_char(piece) == Some(PieceType::Pawn);

        if let Some((side, rook_file)) = self.castling_side(mv) {
            next.castle(mover, side, mv.from, rook_file);
        } else {
            if is_pawn
                && mv.file_delta() != 0
                && Some(mv.to) == self.en_passant
                && self.board.is_empty(mv.to)
            {
                // the passed pawn stands next to the mover's origin
                next.board.set(mv.to.with_rank(mv.from.rank()), EMPTY);
            }
            let placed = match mv.promotion {
                Some(p) => colored(p, mover),
                None => piece,
            };
            next.board.set(mv.from, EMPTY);
            next.board.set(mv.to, placed);
        }

        next.en_passant = if is_pawn && mv.rank_delta().abs() == 2 {
            Some(Coordinate::new(
                (mv.from.rank() + mv.to.rank()) / 2,
                mv.from.file(),
            ))
        } else {
            None
        };
        next.update_castling_rights(mv, piece);
        next.side_to_move = self.side_to_move.opposite();
        next
    }

    fn castle(&mut self, color: Color, side: CastlingSide, king_from: Coordinate, rook_file: u8) {
        let back = color.back_rank();
        let rook_from = Coordinate::new(back, rook_file);
        let king = self.board.get(king_from);
        let rook = self.board.get(rook_from);
        self.board.set(king_from, EMPTY);
        self.board.set(rook_from, EMPTY);
        self.board.set(Coordinate::new(back, side.king_file()), king);
        self.board.set(Coordinate::new(back, side.rook_file()), rook);
    }

    fn update_castling_rights(&mut self, mv: &Move, piece: char) {
        if PieceType::from_char(piece) == Some(PieceType::King) {
            if let Some(color) = color_of(piece) {
                self.castling.clear(color);
            }
        }
        for &color in &[Color::White, Color::Black] {
            for &side in CastlingSide::BOTH.iter() {
                if let Some(file) = self.castling.get(color, side) {
                    let rook_square = Coordinate::new(color.back_rank(), file);
                    if mv.from == rook_square || mv.to == rook_square {
                        self.castling.set(color, side, None);
                    }
                }
            }
        }
    }

    /// Recognises a castling move. Two encodings are understood: the king moving two
    /// files towards its castling square, or the king "capturing" its own rook.
    /// Returns the wing and the rook's file.
    pub fn castling_side(&self, mv: &Move) -> Option<(CastlingSide, u8)> {
        let piece = self.board.get(mv.from);
        if PieceType::from_char(piece) != Some(PieceType::King) {
            return None;
        }
        let color = color_of(piece)?;
        let back = color.back_rank();
        if mv.from.rank() != back || mv.to.rank() != back {
            return None;
        }

        for &side in CastlingSide::BOTH.iter() {
            let rook_file = match self.castling.get(color, side) {
                Some(f) => f,
                None => continue,
            };
            let takes_own_rook = mv.to.file() == rook_file
                && self.board.get(mv.to) == PieceType::Rook.to_char(color);
            let two_files = (rook_file == 0 || rook_file == BOARD_SIZE - 1)
                && mv.file_delta().abs() == 2
                && mv.to.file() == side.king_file()
                && (mv.file_delta() > 0) == (side == CastlingSide::Kingside);
            if takes_own_rook || two_files {
                return Some((side, rook_file));
            }
        }
        None
    }

    /// Checks everything needed to castle: the right, the rook, empty squares between
    /// the pieces and their targets, and a king that does not stand on or cross an
    /// attacked square.
    pub fn is_castling_legal(&self, color: Color, side: CastlingSide, king_from: Coordinate) -> bool {
        let rook_file = match self.castling.get(color, side) {
            Some(f) => f,
            None => return false,
        };
        let back = color.back_rank();
        let king = PieceType::King.to_char(color);
        let rook_from = Coordinate::new(back, rook_file);
        if king_from.rank() != back
            || self.board.get(king_from) != king
            || self.board.get(rook_from) != PieceType::Rook.to_char(color)
        {
            return false;
        }

        let files = [king_from.file(), side.king_file(), rook_file, side.rook_file()];
        let (low, high) = (files.iter().min(), files.iter().max());
        if let (Some(&low), Some(&high)) = (low, high) {
            let blocked = (low..=high)
                .map(|f| Coordinate::new(back, f))
                .any(|c| c != king_from && c != rook_from && !self.board.is_empty(c));
            if blocked {
                return false;
            }
        }

        let (from, to) = (king_from.file(), side.king_file());
        (from.min(to)..=from.max(to)).all(|file| {
            let mut probe = self.clone();
            probe.board.set(king_from, EMPTY);
            probe.board.set(rook_from, EMPTY);
            probe.board.set(Coordinate::new(back, file), king);
            !probe.in_check(color)
        })
    }
}

// Legality
impl Position {
    /// Checks a single move against the movement rules of the piece on its origin.
    ///
    /// Only king moves are tested for leaving the own king in check; `legal_moves`
    /// applies that test to every piece.
    pub fn is_legal(&self, mv: &Move) -> bool {
        if !mv.is_on_board() {
            return false;
        }
        let piece = self.board.get(mv.from);
        if color_of(piece) != Some(self.side_to_move) {
            return false;
        }
        if let Some((side, _)) = self.castling_side(mv) {
            return self.is_castling_legal(self.side_to_move, side, mv.from);
        }
        if color_of(self.board.get(mv.to)) == Some(self.side_to_move) {
            return false;
        }
        self.check_piece_rules(mv, piece)
    }

    fn check_piece_rules(&self, mv: &Move, piece: char) -> bool {
        use PieceType::*;

        let kind = match PieceType::from_char(piece) {
            Some(kind) => kind,
            // pieces without known rules may go anywhere
            None => return true,
        };
        let color = self.side_to_move;
        if mv.promotion.is_some() && (kind != Pawn || mv.to.rank() != color.promotion_rank()) {
            return false;
        }

        let rank_delta = mv.rank_delta();
        let file_delta = mv.file_delta().abs();

        match kind {
            Pawn => {
                let forward = rank_delta * color.forward();
                if forward <= 0 {
                    return false;
                }
                // reaching the last rank needs a piece to promote to
                if mv.to.rank() == color.promotion_rank() && mv.promotion.is_none() {
                    return false;
                }
                let capturing = !self.board.is_empty(mv.to) || Some(mv.to) == self.en_passant;
                if capturing {
                    forward == 1 && file_delta == 1
                } else if file_delta != 0 {
                    false
                } else if forward == 1 {
                    true
                } else {
                    forward == 2 && mv.from.rank() == color.pawn_rank() && self.is_path_clear(mv)
                }
            }
            Knight => {
                let r = rank_delta.abs();
                (r == 1 && file_delta == 2) || (r == 2 && file_delta == 1)
            }
            Rook => (rank_delta == 0 || file_delta == 0) && self.is_path_clear(mv),
            Bishop => rank_delta.abs() == file_delta && self.is_path_clear(mv),
            Queen => {
                (rank_delta == 0 || file_delta == 0 || rank_delta.abs() == file_delta)
                    && self.is_path_clear(mv)
            }
            King => {
                rank_delta.abs() <= 1
                    && file_delta <= 1
                    && !self.apply_move(mv).in_check(color)
            }
        }
    }

    /// True if every square strictly between origin and destination is empty.
    /// Moves that are not on a line or diagonal have no path and are never clear.
    fn is_path_clear(&self, mv: &Move) -> bool {
        let (rank_delta, file_delta) = (mv.rank_delta(), mv.file_delta());
        let aligned =
            rank_delta == 0 || file_delta == 0 || rank_delta.abs() == file_delta.abs();
        if !aligned {
            return false;
        }

        let step = Coordinate::direction(rank_delta.signum() as i8, file_delta.signum() as i8);
        let mut current = mv.from + step;
        while current != mv.to {
            if !self.board.is_empty(current) {
                return false;
            }
            current = current + step;
        }
        true
    }
}

// Notation
impl Position {
    /// Long algebraic text for a move in this position. A pawn leaving its 7th
    /// (Black: 2nd) rank without a promotion piece is read through the promotion
    /// tables: its destination rank picks the piece and the move lands on the last
    /// rank.
    pub fn render_move(&self, mv: &Move) -> String {
        if mv.promotion.is_some() {
            return mv.to_string();
        }
        let piece = self.board.get(mv.from);
        let (from_rank, to_rank) = (mv.from.rank(), mv.to.rank());

        let promotion = match piece {
            'P' if from_rank == 6 && (4..=7).contains(&to_rank) => {
                Some((WHITE_PROMOTION_TABLE[(to_rank - 4) as usize], 7))
            }
            'p' if from_rank == 1 && to_rank <= 3 => {
                Some((BLACK_PROMOTION_TABLE[to_rank as usize], 0))
            }
            _ => None,
        };

        match promotion {
            Some((letter, last_rank)) => {
                Move::with_promotion(mv.from, mv.to.with_rank(last_rank), Some(letter)).to_string()
            }
            None => mv.to_string(),
        }
    }

    /// Index of a move in a score vector. Inverse of `render_move` for promotions.
    pub fn scoring_key(&self, mv: &Move) -> usize {
        let piece = self.board.get(mv.from);
        let promotion = match (mv.promotion, PieceType::from_char(piece)) {
            (Some(p), Some(PieceType::Pawn)) => p,
            _ => return mv.binary(),
        };

        let rank = match color_of(piece) {
            Some(Color::White) => WHITE_PROMOTION_TABLE
                .iter()
                .position(|&c| c == promotion.to_ascii_uppercase())
                .map(|i| i as u8 + 4),
            Some(Color::Black) => BLACK_PROMOTION_TABLE
                .iter()
                .position(|&c| c == promotion.to_ascii_lowercase())
                .map(|i| i as u8),
            None => None,
        };
        match rank {
            Some(rank) => Move::new(mv.from, mv.to.with_rank(rank)).binary(),
            None => mv.binary(),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = |color: Color| {
            let marker = if self.side_to_move == color { "*" } else { "" };
            let long = if self.castling.get(color, CastlingSide::Queenside).is_some() {
                "OOO"
            } else {
                ""
            };
            let short = if self.castling.get(color, CastlingSide::Kingside).is_some() {
                "OO"
            } else {
                ""
            };
            format!("{:1} {:3} {:2}", marker, long, short)
        };
        writeln!(f, "{}", info(Color::Black))?;
        writeln!(f, "{}", self.board)?;
        write!(f, "{}", info(Color::White))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random_walk;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_start() {
        let p = Position::standard_start();
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(*p.castling(), CastlingRights::standard());
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.piece_at(sq("e1")), 'K');
        assert_eq!(p.piece_at(sq("e8")), 'k');
        assert_eq!(
            p.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap(),
            p
        );
    }

    #[test]
    fn test_from_fen_fields() {
        let p = Position::from_fen_fields("8/8/8/8/8/8/8/K6k", "b", "-").unwrap();
        assert_eq!(p.side_to_move(), Color::Black);
        assert_eq!(*p.castling(), CastlingRights::default());
        assert_eq!(p.piece_at(sq("a1")), 'K');
        assert_eq!(p.piece_at(sq("h1")), 'k');
        assert!(Position::from_fen("8/8/8 w").is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8/K6k w KX").is_err());
    }

    #[test]
    fn test_fen_en_passant_field() {
        let p = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3").unwrap();
        assert_eq!(p.en_passant(), Some(sq("d6")));
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - z9").is_err());
        assert_eq!(p.to_fen(), "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    }

    #[test]
    fn test_castling_field_variants() {
        // rooks on b- and g-file, king on d-file
        let p = Position::from_fen("1r1k2r1/8/8/8/8/8/8/1R1K2R1 w KQkq - 0 1").unwrap();
        assert_eq!(p.castling().white_kingside, Some(6));
        assert_eq!(p.castling().white_queenside, Some(1));
        assert_eq!(p.castling().black_kingside, Some(6));
        assert_eq!(p.castling().to_fen_field(), "GBgb");

        let p = Position::from_fen("1r1k2r1/8/8/8/8/8/8/1R1K2R1 w Gb - 0 1").unwrap();
        assert_eq!(p.castling().white_kingside, Some(6));
        assert_eq!(p.castling().white_queenside, None);
        assert_eq!(p.castling().black_queenside, Some(1));
    }

    #[test]
    fn test_apply_move_from_start() {
        let start = Position::standard_start();
        let p = start.apply_move(&mv("e2e4"));
        assert!(p.board().is_empty(sq("e2")));
        assert_eq!(p.piece_at(sq("e4")), 'P');
        assert_eq!(p.side_to_move(), Color::Black);
        assert_eq!(p.en_passant(), Some(sq("e3")));
        // the source position is untouched
        assert_eq!(start, Position::standard_start());

        let p = p.apply_move(&mv("g8f6"));
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.side_to_move(), Color::White);
    }

    #[test]
    fn test_apply_move_captures_by_overwriting() {
        let p = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let p = p.apply_move(&mv("e4d5"));
        assert_eq!(p.piece_at(sq("d5")), 'P');
        assert_eq!(p.board().iter().filter(|&(_, c)| c == 'p').count(), 0);
    }

    #[test]
    fn test_promotion_takes_movers_case() {
        let p = Position::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promoted = p.apply_move(&mv("a7a8q"));
        assert_eq!(promoted.piece_at(sq("a8")), 'Q');
        let p = Position::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        let promoted = p.apply_move(&mv("a2a1N"));
        assert_eq!(promoted.piece_at(sq("a1")), 'n');
    }

    #[test]
    fn test_en_passant_capture() {
        let p = Position::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        let p = p.apply_move(&mv("d7d5"));
        assert_eq!(p.en_passant(), Some(sq("d6")));
        assert!(p.is_legal(&mv("e5d6")));
        let p = p.apply_move(&mv("e5d6"));
        assert_eq!(p.piece_at(sq("d6")), 'P');
        assert!(p.board().is_empty(sq("d5")));
        assert!(p.board().is_empty(sq("e5")));
    }

    #[test]
    fn test_castling_moves_rook_and_clears_rights() {
        let p = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(p.is_legal(&mv("e1g1")));
        let castled = p.apply_move(&mv("e1g1"));
        assert_eq!(castled.piece_at(sq("g1")), 'K');
        assert_eq!(castled.piece_at(sq("f1")), 'R');
        assert!(castled.board().is_empty(sq("h1")));
        assert!(castled.board().is_empty(sq("e1")));
        assert_eq!(castled.castling().white_kingside, None);
        assert_eq!(castled.castling().white_queenside, None);
        assert_eq!(castled.castling().black_kingside, Some(7));

        let castled = castled.apply_move(&mv("e8a8"));
        assert_eq!(castled.piece_at(sq("c8")), 'k');
        assert_eq!(castled.piece_at(sq("d8")), 'r');
        assert_eq!(castled.castling().to_fen_field(), "-");
    }

    #[test]
    fn test_castling_blocked_or_attacked() {
        // bishop on f1 blocks
        let p = Position::from_fen("4k3/8/8/8/8/8/8/4KB1R w K - 0 1").unwrap();
        assert!(!p.is_legal(&mv("e1g1")));
        // rook on f8 attacks the crossing square
        let p = Position::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(!p.is_legal(&mv("e1g1")));
        // king in check may not castle
        let p = Position::from_fen("4r1k1/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(!p.is_legal(&mv("e1g1")));
        // without the right the two-file king move is just illegal
        let p = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        assert!(!p.is_legal(&mv("e1g1")));
    }

    #[test]
    fn test_rook_moves_drop_rights() {
        let p = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let p = p.apply_move(&mv("h1h8"));
        assert_eq!(p.castling().white_kingside, None);
        assert_eq!(p.castling().black_kingside, None);
        assert_eq!(p.castling().white_queenside, Some(0));
        assert_eq!(p.castling().black_queenside, Some(0));
    }

    #[test]
    fn test_is_legal_rejects_wrong_owner_everywhere() {
        let positions = [
            Position::standard_start(),
            Position::standard_start().apply_move(&mv("e2e4")),
        ];
        for p in positions.iter() {
            for from in Coordinate::all() {
                let owner = color_of(p.piece_at(from));
                if owner == Some(p.side_to_move()) {
                    continue;
                }
                for to in Coordinate::all() {
                    assert!(!p.is_legal(&Move::new(from, to)), "{} {}{}", p, from, to);
                }
            }
        }
    }

    #[test]
    fn test_piece_rules() {
        let p = Position::standard_start();
        assert!(p.is_legal(&mv("e2e4")));
        assert!(p.is_legal(&mv("e2e3")));
        assert!(!p.is_legal(&mv("e2e5")));
        assert!(!p.is_legal(&mv("e2d3")));
        assert!(p.is_legal(&mv("g1f3")));
        assert!(!p.is_legal(&mv("g1g3")));
        assert!(!p.is_legal(&mv("f1c4")));
        assert!(!p.is_legal(&mv("a1a3")));
        assert!(!p.is_legal(&mv("d1d2")));

        let p = Position::from_fen("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").unwrap();
        assert!(p.is_legal(&mv("d4d8")));
        assert!(p.is_legal(&mv("d4a7")));
        assert!(p.is_legal(&mv("d4h4")));
        assert!(!p.is_legal(&mv("d4e6")));
        assert!(!p.is_legal(&mv("d4d4")));
        // promotion only for pawns on the last rank
        assert!(!p.is_legal(&mv("d4d8q")));
    }

    #[test]
    fn test_pawn_rules() {
        let p = Position::from_fen("4k3/8/8/8/8/2p5/1P6/4K3 w - - 0 1").unwrap();
        assert!(p.is_legal(&mv("b2c3")));
        assert!(p.is_legal(&mv("b2b4")));
        assert!(!p.is_legal(&mv("b2a3")));
        assert!(!p.is_legal(&mv("b2b1")));
        let blocked = Position::from_fen("4k3/8/8/8/8/1p6/1P6/4K3 w - - 0 1").unwrap();
        assert!(!blocked.is_legal(&mv("b2b3")));
        assert!(!blocked.is_legal(&mv("b2b4")));
    }

    #[test]
    fn test_last_rank_needs_a_promotion_piece() {
        let p = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!p.is_legal(&mv("a7a8")));
        assert!(p.is_legal(&mv("a7a8q")));
        assert!(p.is_legal(&mv("a7b8N")));
        assert!(!p.is_legal(&mv("a7b8")));

        let p = Position::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        assert!(!p.is_legal(&mv("a2a1")));
        assert!(p.is_legal(&mv("a2a1r")));
    }

    #[test]
    fn test_two_file_castling_needs_a_corner_rook() {
        let p = Position::from_fen("4k3/8/8/8/8/8/8/1R2K3 w B - 0 1").unwrap();
        assert_eq!(p.castling().white_queenside, Some(1));
        assert_eq!(p.castling_side(&mv("e1c1")), None);
        assert!(!p.is_legal(&mv("e1c1")));
        assert!(p.is_legal(&mv("e1b1")));
        let castled = p.apply_move(&mv("e1b1"));
        assert_eq!(castled.piece_at(sq("c1")), 'K');
        assert_eq!(castled.piece_at(sq("d1")), 'R');
    }

    #[test]
    fn test_fairy_pieces_move_freely() {
        let p = Position::from_fen("4k3/8/8/8/8/8/8/Z3K3 w - - 0 1").unwrap();
        assert!(p.is_legal(&mv("a1h7")));
        assert!(!p.is_legal(&mv("a1e1")));
    }

    #[test]
    fn test_king_may_not_walk_into_check() {
        let p = Position::from_fen("8/8/8/8/4k3/8/4K3/8 w - - 0 1").unwrap();
        assert!(!p.is_legal(&mv("e2e3")));
        assert!(!p.is_legal(&mv("e2d3")));
        assert!(p.is_legal(&mv("e2e1")));
    }

    #[test]
    fn test_render_promotion_tables() {
        let p = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(p.render_move(&mv("a7a8")), "a7a8Q");
        assert_eq!(p.render_move(&mv("a7a7")), "a7a8R");
        assert_eq!(p.render_move(&mv("a7a6")), "a7a8B");
        assert_eq!(p.render_move(&mv("a7a5")), "a7a8N");
        assert_eq!(p.render_move(&mv("e1e2")), "e1e2");

        let p = Position::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        assert_eq!(p.render_move(&mv("a2a1")), "a2a1q");
        assert_eq!(p.render_move(&mv("a2a2")), "a2a1r");
        assert_eq!(p.render_move(&mv("a2a3")), "a2a1b");
        assert_eq!(p.render_move(&mv("a2a4")), "a2a1n");
        assert_eq!(p.render_move(&mv("a2a1r")), "a2a1r");
    }

    #[test]
    fn test_scoring_key_inverts_render() {
        let white = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/p7/1N2K3 b - - 0 1").unwrap();
        let cases = [
            (&white, "a7a8Q"),
            (&white, "a7a8R"),
            (&white, "a7b8B"),
            (&white, "a7b8N"),
            (&black, "a2a1q"),
            (&black, "a2b1r"),
            (&black, "a2a1b"),
            (&black, "a2a1n"),
        ];
        for &(p, text) in cases.iter() {
            let m = mv(text);
            let key = p.scoring_key(&m);
            let decoded = Move::from_binary(key).unwrap();
            assert_eq!(p.render_move(&decoded), text);
        }
        assert_eq!(white.scoring_key(&mv("e1e2")), mv("e1e2").binary());
    }

    #[test]
    fn test_applied_positions_never_mutate_their_origin() {
        let mut rng = SmallRng::seed_from_u64(7);
        let walk = random_walk(&Position::standard_start(), 40, &mut rng);
        for pair in walk.windows(2) {
            let before = pair[0].0.clone();
            let (position, mv) = (&pair[0].0, pair[1].1.unwrap());
            let after = position.apply_move(&mv);
            assert_eq!(*position, before);
            assert_eq!(after, pair[1].0);
        }
    }

    #[test]
    fn test_display() {
        let text = Position::standard_start().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  OOO OO");
        assert_eq!(lines.last(), Some(&"* OOO OO"));
    }
}
