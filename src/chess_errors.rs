use thiserror::Error;

// ---------------------------------------------
// Error Handling
// ---------------------------------------------
#[derive(Error, Debug)]
pub enum ChessError {
    /// Text that could not be decoded: FEN fields, coordinates, moves.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Square out of range: rank {rank}, file {file}")]
    OutOfRange { rank: i16, file: i16 },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("No playable moves left")]
    NoLegalMoves,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChessResult<T> = std::result::Result<T, ChessError>;

impl From<String> for ChessError {
    fn from(s: String) -> ChessError {
        ChessError::InvalidFormat(s)
    }
}

impl From<&str> for ChessError {
    fn from(s: &str) -> ChessError {
        ChessError::InvalidFormat(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion_is_format_error() {
        let e: ChessError = "bad row".into();
        assert!(matches!(e, ChessError::InvalidFormat(ref s) if s == "bad row"));
        assert_eq!(e.to_string(), "Invalid format: bad row");
    }

    #[test]
    fn test_out_of_range_message() {
        let e = ChessError::OutOfRange { rank: 8, file: -1 };
        assert_eq!(e.to_string(), "Square out of range: rank 8, file -1");
    }
}
