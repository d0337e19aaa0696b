#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// True when both positions share a row or a column.
    pub fn is_orthogonal_to(&self, other: &Position) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// True when `other` lies in the Chebyshev 1-ring around `self`.
    pub fn is_adjacent_to(&self, other: &Position) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

/// Pixel rectangle covered by a cell. Only the display side reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Walkable,
    Unwalkable,
    Source,
    Destination,
    ThickMud,
    SlowGoop,
    Path,
}

impl CellType {
    /// Extra movement cost for entering a cell of this type.
    pub fn surcharge(self) -> u32 {
        match self {
            CellType::ThickMud => 100,
            CellType::SlowGoop => 5,
            _ => 0,
        }
    }

    pub fn from_tile(tile: char) -> Option<CellType> {
        match tile {
            '.' | '*' => Some(CellType::Walkable),
            '#' => Some(CellType::Unwalkable),
            'S' => Some(CellType::Source),
            'D' => Some(CellType::Destination),
            'm' => Some(CellType::ThickMud),
            'g' => Some(CellType::SlowGoop),
            _ => None,
        }
    }

    pub fn tile(self) -> char {
        match self {
            CellType::Walkable => '.',
            CellType::Unwalkable => '#',
            CellType::Source => 'S',
            CellType::Destination => 'D',
            CellType::ThickMud => 'm',
            CellType::SlowGoop => 'g',
            CellType::Path => '*',
        }
    }
}

/// Search bookkeeping state, reset between searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    NotVisited,
    Open,
    Closed,
}

/// Emitted by every type assignment, including ones that leave the type as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeChange {
    pub position: Position,
    pub old: CellType,
    pub new: CellType,
}

#[derive(Debug, Clone)]
pub struct GridCell {
    position: Position,
    screen: ScreenRect,
    kind: CellType,
    pub state: CellState,
    pub g: i32,
    pub h: f64,
    pub f: f64,
    /// Arena index of the cell this one was opened from.
    pub parent: Option<usize>,
}

impl GridCell {
    pub fn new(kind: CellType, position: Position, screen: ScreenRect) -> Self {
        GridCell {
            position,
            screen,
            kind,
            state: CellState::NotVisited,
            g: 0,
            h: 0.0,
            f: 0.0,
            parent: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    pub fn kind(&self) -> CellType {
        self.kind
    }

    /// Assigns the terrain type. Kept crate-private so that every assignment
    /// goes through `Grid::set_type`, which reacts to the returned change.
    pub(crate) fn set_type(&mut self, kind: CellType) -> TypeChange {
        let old = self.kind;
        self.kind = kind;
        TypeChange {
            position: self.position,
            old,
            new: kind,
        }
    }

    pub fn is_orthogonal_with(&self, other: &GridCell) -> bool {
        self.position.is_orthogonal_to(&other.position)
    }

    /// Clears search bookkeeping. A `Path` marker goes back to `Walkable`
    /// without a change notification; terrain edits are kept.
    pub fn reset(&mut self) {
        if self.kind == CellType::Path {
            self.kind = CellType::Walkable;
        }
        self.state = CellState::NotVisited;
        self.parent = None;
        self.g = 0;
        self.h = 0.0;
        self.f = 0.0;
    }

    pub fn clear(&mut self) -> TypeChange {
        self.reset();
        self.set_type(CellType::Walkable)
    }
}
