use std::fmt;
use std::io;

/// Errors raised at the edges of the search core: grid construction, map
/// parsing, guarded edits and driver I/O.
///
/// Search outcomes themselves (no path, missing endpoints, out-of-range
/// coordinates) are never errors; they are reported through state or `None`.
#[derive(Debug)]
pub enum AStarError {
    InvalidCellSize(u32),
    EmptyGrid { width: usize, height: usize },
    GridTooLarge { width: usize, height: usize, cell_size: u32 },
    UnknownTile { line: usize, column: usize, found: char },
    RaggedRow { line: usize, expected: usize, found: usize },
    SearchActive,
    Io(io::Error),
}

impl fmt::Display for AStarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AStarError::InvalidCellSize(size) => {
                write!(f, "cell size must be at least one pixel, got {}", size)
            }
            AStarError::EmptyGrid { width, height } => {
                write!(f, "grid of {}x{} cells has no cells", width, height)
            }
            AStarError::GridTooLarge {
                width,
                height,
                cell_size,
            } => write!(
                f,
                "grid of {}x{} cells at {} px per cell exceeds the pixel range",
                width, height, cell_size
            ),
            AStarError::UnknownTile { line, column, found } => {
                write!(f, "unknown tile {:?} at line {}, column {}", found, line, column)
            }
            AStarError::RaggedRow { line, expected, found } => write!(
                f,
                "row at line {} has {} tiles, expected {}",
                line, found, expected
            ),
            AStarError::SearchActive => write!(f, "grid cannot be edited while a search is active"),
            AStarError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for AStarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AStarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AStarError {
    fn from(e: io::Error) -> Self {
        AStarError::Io(e)
    }
}
