use super::action::Direction;

/// A position on the game grid
///
/// `x` is the column and `y` the row; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Direction that leads from `self` to an orthogonally adjacent `other`
    pub fn direction_to(&self, other: Point) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.moved_in_direction(d) == other)
    }
}

/// Contents of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Snake,
    Food,
    Border,
}

/// Rectangular grid of cells with a food counter
///
/// The outermost ring is always `Border`. `food_count` always equals the
/// number of `Food` cells and never exceeds `max_food`.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: Vec<Cell>,
    size_x: usize,
    size_y: usize,
    food_count: usize,
    max_food: usize,
}

impl Board {
    /// Create a board with an empty interior and a border ring
    pub fn new(size_x: usize, size_y: usize, max_food: usize) -> Self {
        let mut board = Self {
            cells: vec![Cell::Empty; size_x * size_y],
            size_x,
            size_y,
            food_count: 0,
            max_food,
        };
        board.reset();
        board
    }

    /// Restore the interior to `Empty`, stamp the border and zero the food counter
    ///
    /// Reuses the existing allocation.
    pub fn reset(&mut self) {
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                let on_ring =
                    x == 0 || y == 0 || x == self.size_x - 1 || y == self.size_y - 1;
                self.cells[y * self.size_x + x] = if on_ring { Cell::Border } else { Cell::Empty };
            }
        }
        self.food_count = 0;
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn food_count(&self) -> usize {
        self.food_count
    }

    pub fn max_food(&self) -> usize {
        self.max_food
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.x < self.size_x as i32 && pos.y >= 0 && pos.y < self.size_y as i32
    }

    /// Row-major index of a position, or None when out of bounds
    pub fn index_of(&self, pos: Point) -> Option<usize> {
        self.is_in_bounds(pos)
            .then(|| pos.y as usize * self.size_x + pos.x as usize)
    }

    /// Cell at a position, or None when out of bounds
    pub fn get(&self, pos: Point) -> Option<Cell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Put food on an empty cell if the food limit allows it
    ///
    /// Returns whether food was placed. Occupied cells are left untouched.
    pub fn place_food(&mut self, pos: Point) -> bool {
        if self.food_count >= self.max_food {
            return false;
        }
        match self.index_of(pos) {
            Some(idx) if self.cells[idx] == Cell::Empty => {
                self.cells[idx] = Cell::Food;
                self.food_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Turn a food cell into a snake cell, decrementing the food counter
    pub(crate) fn consume_food(&mut self, pos: Point) {
        if let Some(idx) = self.index_of(pos) {
            if self.cells[idx] == Cell::Food {
                self.cells[idx] = Cell::Snake;
                self.food_count -= 1;
            }
        }
    }

    /// Mark or clear a snake cell; border and food cells are never overwritten
    pub(crate) fn set_snake(&mut self, pos: Point, occupied: bool) {
        if let Some(idx) = self.index_of(pos) {
            let cell = &mut self.cells[idx];
            match (*cell, occupied) {
                (Cell::Empty, true) => *cell = Cell::Snake,
                (Cell::Snake, false) => *cell = Cell::Empty,
                _ => {}
            }
        }
    }

    /// Count cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }
}
