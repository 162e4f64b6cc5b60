use crate::chess_errors::*;
use crate::coordinates::*;
use crate::pieces::*;
use array_init::array_init;
use std::fmt::{self, Display};

// ---------------------------------------------
// Board Types
// ---------------------------------------------

// Displays the first 64 items from an iterator in a chessboard style:
//
//   a b c d e f g h
// 8 i1 i2 i3 ...   8
// 7 ....
//
// Where i1,...i64 are the items of the iterator, rank 8 first.
// It is required that the iterator has at least 64 items, else we will return with an error.
fn display_chessboard_style<I, C>(it: &mut I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: Iterator<Item = C>,
    C: Display,
{
    write!(f, " ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    for row in 0..BOARD_SIZE {
        write!(f, "\n{} ", 8 - row)?;
        for _col in 0..BOARD_SIZE {
            let i = it.next().ok_or(fmt::Error)?;
            write!(f, "{} ", i)?;
        }
        write!(f, "{} ", 8 - row)?;
    }
    write!(f, "\n ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    Ok(())
}

/// An 8x8 grid of piece characters, indexed rank first. Rank 0 is the first rank.
///
/// Cloning copies the whole grid, so two boards never share squares.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[char; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: array_init(|_| [EMPTY; BOARD_SIZE as usize]),
        }
    }

    /// Builds a board from eight rows of eight characters, rank 8 first, the way a
    /// board is read from the top of a diagram.
    pub fn from_rows(rows: &[&str]) -> ChessResult<Board> {
        if rows.len() != BOARD_SIZE as usize {
            return Err(format!("Expected 8 board rows, got {}", rows.len()).into());
        }
        let mut board = Board::empty();
        for (i, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_SIZE as usize {
                return Err(format!("Board row {:?} does not have 8 squares", row).into());
            }
            let rank = BOARD_SIZE as usize - 1 - i;
            for (file, piece) in row.chars().enumerate() {
                board.squares[rank][file] = piece;
            }
        }
        Ok(board)
    }

    /// Decodes the board field of a FEN record. Starts at a8 and walks rank by rank
    /// towards a1. Piece letters are not validated, any character that is not '/' or
    /// a digit is placed on the board.
    pub fn from_fen_field(fen: &str) -> ChessResult<Board> {
        let mut board = Board::empty();
        let mut rank: i16 = BOARD_SIZE as i16 - 1;
        let mut file: i16 = 0;
        let invalid = || ChessError::from(format!("Invalid FEN board {:?}", fen));

        for c in fen.chars() {
            match c {
                '/' => {
                    if rank == 0 {
                        return Err(invalid());
                    }
                    rank -= 1;
                    file = 0;
                }
                '0'..='9' => {
                    file += c as i16 - '0' as i16;
                    if file > BOARD_SIZE as i16 {
                        return Err(invalid());
                    }
                }
                piece => {
                    board.set_at(rank, file, piece).map_err(|_| invalid())?;
                    file += 1;
                }
            }
        }
        Ok(board)
    }

    /// Inverse of `from_fen_field`: empty runs are written as digits.
    pub fn to_fen_field(&self) -> String {
        let mut res = String::with_capacity(72);
        for rank in (0..BOARD_SIZE as usize).rev() {
            let mut empty_run = 0;
            for &piece in self.squares[rank].iter() {
                if piece == EMPTY {
                    empty_run += 1;
                    continue;
                }
                if empty_run > 0 {
                    res.push_str(&empty_run.to_string());
                    empty_run = 0;
                }
                res.push(piece);
            }
            if empty_run > 0 {
                res.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                res.push('/');
            }
        }
        res
    }

    pub fn get(&self, c: Coordinate) -> char {
        self.squares[c.rank() as usize][c.file() as usize]
    }

    pub fn set(&mut self, c: Coordinate, piece: char) {
        self.squares[c.rank() as usize][c.file() as usize] = piece;
    }

    pub fn is_empty(&self, c: Coordinate) -> bool {
        self.get(c) == EMPTY
    }

    /// Checked access by raw rank and file. Fails instead of wrapping.
    pub fn get_at(&self, rank: i16, file: i16) -> ChessResult<char> {
        if !Coordinate::in_board(rank, file) {
            return Err(ChessError::OutOfRange { rank, file });
        }
        Ok(self.squares[rank as usize][file as usize])
    }

    pub fn set_at(&mut self, rank: i16, file: i16, piece: char) -> ChessResult<()> {
        if !Coordinate::in_board(rank, file) {
            return Err(ChessError::OutOfRange { rank, file });
        }
        self.squares[rank as usize][file as usize] = piece;
        Ok(())
    }

    /// First square (from a1) holding exactly this piece character.
    pub fn find(&self, piece: char) -> Option<Coordinate> {
        Coordinate::all().find(|&c| self.get(c) == piece)
    }

    /// All squares with their contents, a1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, char)> + '_ {
        Coordinate::all().map(move |c| (c, self.get(c)))
    }

    /// Squares in display order: rank 8 first, files ascending.
    fn display_order(&self) -> impl Iterator<Item = char> + '_ {
        self.squares.iter().rev().flat_map(|row| row.iter().copied())
    }

    pub fn unicode(&self) -> UnicodeBoard<'_> {
        UnicodeBoard(self)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_chessboard_style(&mut self.display_order(), f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_field())
    }
}

/// Board rendering with chess symbols instead of letters.
pub struct UnicodeBoard<'a>(&'a Board);

impl Display for UnicodeBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_chessboard_style(&mut self.0.display_order().map(symbol), f)
    }
}
