use crate::coordinates::*;
use crate::moves::*;
use crate::pieces::*;
use crate::positions::*;

// Move generation works square by square on the mailbox board. The same routine
// answers two questions, depending on the mode:
//
// * Legal:    which moves may the side to move play?
// * Guarding: which squares does a piece threaten? Used for check detection, so it
//             skips pawn pushes, lets pieces "capture" their own side and never asks
//             about king safety.

/// Mode of move generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Guarding,
    Legal,
}

// Offsets are saved as (rank, file).
const KNIGHT_OFFSETS: [(i16, i16); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (2, -1),
    (1, -2),
    (-2, 1),
    (-1, -2),
    (-2, -1),
];

const KING_OFFSETS: [(i16, i16); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

const ROOK_DIRECTIONS: [(i16, i16); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i16, i16); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

// Piece geometries probed from the king's square and the attackers each one reveals.
const ATTACK_SCANS: [(PieceType, &[PieceType]); 5] = [
    (PieceType::Knight, &[PieceType::Knight]),
    (PieceType::Bishop, &[PieceType::Bishop, PieceType::Queen]),
    (PieceType::Rook, &[PieceType::Rook, PieceType::Queen]),
    (PieceType::King, &[PieceType::King]),
    (PieceType::Pawn, &[PieceType::Pawn]),
];

impl Position {
    /// Returns the moves of the side to move. In `Legal` mode every move is proven
    /// not to leave the mover's king in check, by playing it and testing for check.
    pub fn legal_moves(&self, mode: Generation) -> Vec<Move> {
        let side = self.side_to_move();
        let mut res = Vec::new();

        for (from, piece) in self.board().iter() {
            if color_of(piece) != Some(side) {
                continue;
            }
            if let Some(kind) = PieceType::from_char(piece) {
                self.piece_moves(from, kind, side, mode, &mut res);
            }
        }

        if mode == Generation::Legal {
            self.castling_moves(side, &mut res);
            res.retain(|mv| !self.apply_move(mv).in_check(side));
        }
        res
    }

    /// Is the king of `color` attacked? A board without that king is never in check.
    pub fn in_check(&self, color: Color) -> bool {
        match self.board().find(PieceType::King.to_char(color)) {
            Some(king) => self.is_attacked(king, color.opposite()),
            None => false,
        }
    }

    /// Is the side to move in check?
    pub fn is_check(&self) -> bool {
        self.in_check(self.side_to_move())
    }

    /// Checks whether any piece of `by` attacks `square`. Each piece geometry is
    /// generated from the square itself: if a knight standing there could reach an
    /// enemy knight, that knight attacks the square, and so on.
    pub fn is_attacked(&self, square: Coordinate, by: Color) -> bool {
        let defender = by.opposite();
        let mut probes = Vec::with_capacity(28);

        ATTACK_SCANS.iter().any(|&(geometry, attackers)| {
            probes.clear();
            self.piece_moves(square, geometry, defender, Generation::Guarding, &mut probes);
            probes.iter().any(|mv| {
                let piece = self.piece_at(mv.to);
                color_of(piece) == Some(by)
                    && PieceType::from_char(piece).map_or(false, |t| attackers.contains(&t))
            })
        })
    }

    /// Appends the moves of a piece of the given kind and color standing on `from`.
    /// The piece does not need to be on the board, which check detection relies on.
    pub fn piece_moves(
        &self,
        from: Coordinate,
        kind: PieceType,
        color: Color,
        mode: Generation,
        res: &mut Vec<Move>,
    ) {
        use PieceType::*;

        match kind {
            Pawn => self.pawn_moves(from, color, mode, res),
            Knight => self.offset_moves(from, color, &KNIGHT_OFFSETS, mode, res),
            King => self.offset_moves(from, color, &KING_OFFSETS, mode, res),
            Rook => self.sliding_moves(from, color, &ROOK_DIRECTIONS, mode, res),
            Bishop => self.sliding_moves(from, color, &BISHOP_DIRECTIONS, mode, res),
            Queen => {
                self.sliding_moves(from, color, &ROOK_DIRECTIONS, mode, res);
                self.sliding_moves(from, color, &BISHOP_DIRECTIONS, mode, res);
            }
        }
    }

    fn can_land(&self, to: Coordinate, color: Color, mode: Generation) -> bool {
        mode == Generation::Guarding || color_of(self.piece_at(to)) != Some(color)
    }

    /// Jumping pieces: every offset that stays on the board.
    fn offset_moves(
        &self,
        from: Coordinate,
        color: Color,
        offsets: &[(i16, i16)],
        mode: Generation,
        res: &mut Vec<Move>,
    ) {
        for &(rank_delta, file_delta) in offsets {
            if let Some(to) = from.offset(rank_delta, file_delta) {
                if self.can_land(to, color, mode) {
                    res.push(Move::new(from, to));
                }
            }
        }
    }

    /// Gliding pieces: walk each direction until the edge or the first piece, which
    /// is included if it can be captured.
    fn sliding_moves(
        &self,
        from: Coordinate,
        color: Color,
        directions: &[(i16, i16)],
        mode: Generation,
        res: &mut Vec<Move>,
    ) {
        for &(rank_delta, file_delta) in directions {
            let mut current = from;
            while let Some(to) = current.offset(rank_delta, file_delta) {
                if self.board().is_empty(to) {
                    res.push(Move::new(from, to));
                    current = to;
                    continue;
                }
                if self.can_land(to, color, mode) {
                    res.push(Move::new(from, to));
                }
                break;
            }
        }
    }

    fn pawn_moves(&self, from: Coordinate, color: Color, mode: Generation, res: &mut Vec<Move>) {
        let forward = color.forward();

        for &file_delta in &[-1, 1] {
            let to = match from.offset(forward, file_delta) {
                Some(to) => to,
                None => continue,
            };
            match mode {
                Generation::Guarding => res.push(Move::new(from, to)),
                Generation::Legal => {
                    let enemy = color_of(self.piece_at(to)) == Some(color.opposite());
                    if enemy || Some(to) == self.en_passant() {
                        push_pawn_move(from, to, color, res);
                    }
                }
            }
        }

        if mode == Generation::Guarding {
            return;
        }
        if let Some(one) = from.offset(forward, 0) {
            if self.board().is_empty(one) {
                push_pawn_move(from, one, color, res);
                if from.rank() == color.pawn_rank() {
                    if let Some(two) = one.offset(forward, 0) {
                        if self.board().is_empty(two) {
                            res.push(Move::new(from, two));
                        }
                    }
                }
            }
        }
    }

    /// Castling moves in the encoding `castling_side` understands: two files for a
    /// king on the e-file with its rook in the corner, king-takes-rook otherwise.
    fn castling_moves(&self, color: Color, res: &mut Vec<Move>) {
        let king = match self.board().find(PieceType::King.to_char(color)) {
            Some(king) if king.rank() == color.back_rank() => king,
            _ => return,
        };

        for &side in CastlingSide::BOTH.iter() {
            let rook_file = match self.castling().get(color, side) {
                Some(f) => f,
                None => continue,
            };
            if !self.is_castling_legal(color, side, king) {
                continue;
            }
            let classical = king.file() == 4 && (rook_file == 0 || rook_file == 7);
            let to_file = if classical { side.king_file() } else { rook_file };
            res.push(Move::new(king, king.with_file(to_file)));
        }
    }
}

/// Pushes a pawn move, expanded into one move per promotion piece on the last rank.
fn push_pawn_move(from: Coordinate, to: Coordinate, color: Color, res: &mut Vec<Move>) {
    if to.rank() != color.promotion_rank() {
        res.push(Move::new(from, to));
        return;
    }
    for piece in PieceType::PROMOTIONS.iter() {
        res.push(Move::with_promotion(from, to, Some(piece.to_char(color))));
    }
}
