use std::fmt;

use log::debug;

use crate::cell::{CellState, CellType, GridCell, Position, ScreenRect, TypeChange};
use crate::error::AStarError;

/// Fixed-shape arena of cells. Cells are addressed by index (`y * width + x`);
/// parent links and the endpoint handles are indices into the same vector.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: u32,
    screen_width: u32,
    screen_height: u32,
    cells: Vec<GridCell>,
    source: Option<usize>,
    destination: Option<usize>,
}

impl Grid {
    /// Builds a grid that covers a screen of the given pixel size.
    pub fn from_screen(screen_width: u32, screen_height: u32, cell_size: u32) -> Result<Self, AStarError> {
        if cell_size == 0 {
            return Err(AStarError::InvalidCellSize(cell_size));
        }
        let width = (screen_width / cell_size) as usize;
        let height = (screen_height / cell_size) as usize;
        Self::with_cells(width, height, cell_size, screen_width, screen_height)
    }

    pub fn new(width: usize, height: usize, cell_size: u32) -> Result<Self, AStarError> {
        if cell_size == 0 {
            return Err(AStarError::InvalidCellSize(cell_size));
        }
        let (Some(screen_width), Some(screen_height)) =
            (pixel_span(width, cell_size), pixel_span(height, cell_size))
        else {
            return Err(AStarError::GridTooLarge {
                width,
                height,
                cell_size,
            });
        };
        Self::with_cells(width, height, cell_size, screen_width, screen_height)
    }

    fn with_cells(
        width: usize,
        height: usize,
        cell_size: u32,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Self, AStarError> {
        if width == 0 || height == 0 {
            return Err(AStarError::EmptyGrid { width, height });
        }
        Ok(Grid {
            width,
            height,
            cell_size,
            screen_width,
            screen_height,
            cells: build_cells(width, height, cell_size)?,
            source: None,
            destination: None,
        })
    }

    /// Parses a text map: one row per line, see `CellType::from_tile`.
    /// Blank lines are skipped.
    pub fn parse(text: &str, cell_size: u32) -> Result<Self, AStarError> {
        let mut rows: Vec<(usize, Vec<CellType>)> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (column, tile) in line.chars().enumerate() {
                let kind = CellType::from_tile(tile).ok_or(AStarError::UnknownTile {
                    line: line_no + 1,
                    column: column + 1,
                    found: tile,
                })?;
                row.push(kind);
            }
            if let Some((_, first)) = rows.first() {
                if first.len() != row.len() {
                    return Err(AStarError::RaggedRow {
                        line: line_no + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push((line_no, row));
        }

        let width = rows.first().map_or(0, |(_, row)| row.len());
        let mut grid = Grid::new(width, rows.len(), cell_size)?;
        for (y, (_, row)) in rows.iter().enumerate() {
            for (x, &kind) in row.iter().enumerate() {
                if kind != CellType::Walkable {
                    grid.set_type(y * width + x, kind);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn destination(&self) -> Option<usize> {
        self.destination
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Panics if `index` is not a cell of this grid.
    pub fn cell(&self, index: usize) -> &GridCell {
        &self.cells[index]
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut GridCell {
        &mut self.cells[index]
    }

    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn index_at(&self, position: Position) -> Option<usize> {
        if position.x < self.width && position.y < self.height {
            Some(position.y * self.width + position.x)
        } else {
            None
        }
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<&GridCell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Maps a pixel coordinate to the grid coordinate containing it.
    /// Non-finite pixels have no grid coordinate.
    pub fn position_at_screen(&self, px: f32, py: f32) -> Option<(i32, i32)> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        let size = self.cell_size as f32;
        Some(((px / size).floor() as i32, (py / size).floor() as i32))
    }

    pub fn index_at_screen(&self, px: f32, py: f32) -> Option<usize> {
        let (x, y) = self.position_at_screen(px, py)?;
        self.index_of(x, y)
    }

    pub fn cell_at_screen(&self, px: f32, py: f32) -> Option<&GridCell> {
        self.index_at_screen(px, py).map(|i| &self.cells[i])
    }

    /// Assigns a cell type and keeps the single Source / single Destination
    /// handles consistent with it.
    pub fn set_type(&mut self, index: usize, kind: CellType) -> TypeChange {
        let change = self.cells[index].set_type(kind);
        self.on_type_changed(index, change);
        change
    }

    pub fn set_type_at(&mut self, x: i32, y: i32, kind: CellType) -> Option<TypeChange> {
        let index = self.index_of(x, y)?;
        Some(self.set_type(index, kind))
    }

    fn on_type_changed(&mut self, index: usize, change: TypeChange) {
        match change.new {
            CellType::Source => {
                if let Some(previous) = self.source.filter(|&s| s != index) {
                    debug!("demoting previous source at {:?}", self.cells[previous].position());
                    self.set_type(previous, CellType::Walkable);
                }
                if self.destination == Some(index) {
                    self.destination = None;
                }
                self.source = Some(index);
            }
            CellType::Destination => {
                if let Some(previous) = self.destination.filter(|&d| d != index) {
                    debug!("demoting previous destination at {:?}", self.cells[previous].position());
                    self.set_type(previous, CellType::Walkable);
                }
                if self.source == Some(index) {
                    self.source = None;
                }
                self.destination = Some(index);
            }
            _ => {
                if self.source == Some(index) {
                    self.source = None;
                }
                if self.destination == Some(index) {
                    self.destination = None;
                }
            }
        }
    }

    /// The up to eight cells around `index`, clipped to the grid.
    pub fn neighbors8(&self, index: usize) -> Vec<usize> {
        let centre = self.cells[index].position();
        let (cx, cy) = (centre.x as i32, centre.y as i32);
        let mut neighbors = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(n) = self.index_of(cx + dx, cy + dy) {
                    neighbors.push(n);
                }
            }
        }
        neighbors
    }

    /// Whether a move from `from` to the adjacent `to` avoids squeezing
    /// past an unwalkable corner.
    pub fn can_step(&self, from: usize, to: usize) -> bool {
        let a = self.cells[from].position();
        let b = self.cells[to].position();
        let blocks = |x: usize, y: usize| {
            self.cell_at(x as i32, y as i32)
                .is_some_and(|c| c.kind() == CellType::Unwalkable)
        };
        !(blocks(a.x, b.y) || blocks(b.x, a.y))
    }

    /// Neighbors that the search may still open from `index`.
    pub fn walkable_neighbors(&self, index: usize) -> Vec<usize> {
        self.neighbors8(index)
            .into_iter()
            .filter(|&n| {
                let cell = &self.cells[n];
                cell.state != CellState::Closed
                    && cell.kind() != CellType::Unwalkable
                    && self.can_step(index, n)
            })
            .collect()
    }

    /// Follows parent links from `index` back to the root, marks the walkable
    /// cells on the way as `Path`, and returns the route without its first
    /// cell (the source).
    pub fn reconstruct_path(&mut self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            if self.cells[i].kind() == CellType::Walkable {
                self.set_type(i, CellType::Path);
            }
            path.push(i);
            current = self.cells[i].parent;
        }
        path.reverse();
        if !path.is_empty() {
            path.remove(0);
        }
        path
    }

    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.source = None;
        self.destination = None;
    }

    /// Rebuilds every cell for a new cell size over the same screen area.
    pub fn resize(&mut self, cell_size: u32) -> Result<(), AStarError> {
        if cell_size == 0 {
            return Err(AStarError::InvalidCellSize(cell_size));
        }
        let width = (self.screen_width / cell_size) as usize;
        let height = (self.screen_height / cell_size) as usize;
        if width == 0 || height == 0 {
            return Err(AStarError::EmptyGrid { width, height });
        }
        self.cells = build_cells(width, height, cell_size)?;
        self.cell_size = cell_size;
        self.width = width;
        self.height = height;
        self.source = None;
        self.destination = None;
        Ok(())
    }

    fn tile_of(cell: &GridCell) -> char {
        match (cell.kind(), cell.state) {
            (CellType::Walkable, CellState::Closed) => 'x',
            (CellType::Walkable, CellState::Open) => 'o',
            (kind, _) => kind.tile(),
        }
    }

    /// Text frame of the grid; `grid_lines` separates columns with `|`.
    pub fn render(&self, grid_lines: bool) -> String {
        let mut out = String::with_capacity((self.width * 2 + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            for (x, cell) in row.iter().enumerate() {
                if grid_lines && x > 0 {
                    out.push('|');
                }
                out.push(Self::tile_of(cell));
            }
            out.push('\n');
        }
        out
    }
}

/// Pixel length of `cells` cells, or `None` if it does not fit in a `u32`.
fn pixel_span(cells: usize, cell_size: u32) -> Option<u32> {
    u32::try_from(cells).ok()?.checked_mul(cell_size)
}

fn build_cells(width: usize, height: usize, cell_size: u32) -> Result<Vec<GridCell>, AStarError> {
    let too_large = || AStarError::GridTooLarge {
        width,
        height,
        cell_size,
    };
    let count = width.checked_mul(height).ok_or_else(too_large)?;
    (0..count)
        .map(|i| {
            let position = Position::new(i % width, i / width);
            let screen = ScreenRect {
                x: pixel_span(position.x, cell_size).ok_or_else(too_large)?,
                y: pixel_span(position.y, cell_size).ok_or_else(too_large)?,
                width: cell_size,
                height: cell_size,
            };
            Ok(GridCell::new(CellType::Walkable, position, screen))
        })
        .collect()
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
