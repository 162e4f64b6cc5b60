use crate::chess_errors::*;
use array_const_fn_init::array_const_fn_init;
use std::fmt::{self, Display};
use std::ops;
use std::str::FromStr;

// Chessboard squares packed into 6 bits, 3 for the rank and 3 for the file:
//
//        rank   file
//      +------+------+
//      | 5 4 3| 2 1 0|
//      +------+------+
//
// Rank 0 is the first rank ("1"), file 0 is the a-file. Binary values by square:
//
//     a  b  c  d  e  f  g  h
//   ---------------------------
// 8 | 56 57 58 59 60 61 62 63 | 8
// 7 | 48 49 50 51 52 53 54 55 | 7
// 6 | 40 41 42 43 44 45 46 47 | 6
// 5 | 32 33 34 35 36 37 38 39 | 5
// 4 | 24 25 26 27 28 29 30 31 | 4
// 3 | 16 17 18 19 20 21 22 23 | 3
// 2 | 8  9  10 11 12 13 14 15 | 2
// 1 | 0  1  2  3  4  5  6  7  | 1
//   ---------------------------
//     a  b  c  d  e  f  g  h
//
// ---------------------------------------------
// Coordinates
// ---------------------------------------------

pub const BOARD_SIZE: u8 = 8;
pub const NUM_SQUARES: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

const FIELD_BITS: u8 = 3;
const FIELD_MASK: u8 = 0b111;
const BINARY_MASK: u8 = 0x3F;
const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate(u8);

const fn coordinate_at(i: usize) -> Coordinate {
    Coordinate::from_binary(i as u8)
}

const ALL_COORDINATES: [Coordinate; NUM_SQUARES] = array_const_fn_init![coordinate_at; 64];

impl Coordinate {
    /// Both fields are masked to 3 bits, so out-of-range values wrap instead of
    /// bleeding into the neighbouring field.
    pub const fn new(rank: u8, file: u8) -> Coordinate {
        Coordinate(((rank & FIELD_MASK) << FIELD_BITS) | (file & FIELD_MASK))
    }

    pub const fn from_binary(binary: u8) -> Coordinate {
        Coordinate(binary & BINARY_MASK)
    }

    /// A step of (rank_delta, file_delta) in the wrapping 3-bit arithmetic used by `+`.
    /// Negative deltas become their two's complement in 3 bits, e.g. -1 is stored as 7.
    pub const fn direction(rank_delta: i8, file_delta: i8) -> Coordinate {
        Coordinate::new(rank_delta as u8, file_delta as u8)
    }

    pub const fn binary(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn rank(self) -> u8 {
        self.0 >> FIELD_BITS
    }

    pub const fn file(self) -> u8 {
        self.0 & FIELD_MASK
    }

    pub const fn with_rank(self, rank: u8) -> Coordinate {
        Coordinate::new(rank, self.file())
    }

    pub const fn with_file(self, file: u8) -> Coordinate {
        Coordinate::new(self.rank(), file)
    }

    /// Checks if rank and file belong to a square on the board.
    pub const fn in_board(rank: i16, file: i16) -> bool {
        rank >= 0 && file >= 0 && rank < BOARD_SIZE as i16 && file < BOARD_SIZE as i16
    }

    /// Range-checked step. Returns None if the target falls off the board.
    pub fn offset(self, rank_delta: i16, file_delta: i16) -> Option<Coordinate> {
        let rank = self.rank() as i16 + rank_delta;
        let file = self.file() as i16 + file_delta;
        if Coordinate::in_board(rank, file) {
            Some(Coordinate::new(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// Iterates all 64 squares, a1 first and h8 last.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        ALL_COORDINATES.iter().copied()
    }
}

impl FromStr for Coordinate {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err_closure = || -> ChessError { format!("Invalid coordinate {:?}", s).into() };
        let mut chars = s.chars();

        let file = match chars.next().ok_or_else(err_closure)? {
            c @ 'a'..='h' => c as u8 - b'a',
            c @ 'A'..='H' => c as u8 - b'A',
            _ => return Err(err_closure()),
        };
        let rank = match chars.next().ok_or_else(err_closure)? {
            c @ '1'..='8' => c as u8 - b'1',
            _ => return Err(err_closure()),
        };

        if chars.next().is_some() {
            return Err(err_closure());
        }
        Ok(Coordinate::new(rank, file))
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILES[self.file() as usize], self.rank() + 1)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// Component-wise sum with 3-bit wraparound. No bounds checking: callers must make sure
// the result is where they expect before using it on a board.
impl_op_ex!(+ |a: &Coordinate, b: &Coordinate| -> Coordinate {
    Coordinate::new(a.rank() + b.rank(), a.file() + b.file())
});
