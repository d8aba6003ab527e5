use super::action::Direction;
use super::state::Point;

/// The snake's body, stored as a direction map over the grid
///
/// Each occupied cell remembers the heading the snake held while its head was
/// there. Following those entries from the tail reaches the head, so the tail
/// can advance one cell at a time without a separate body list.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeState {
    pub head: Point,
    pub tail: Point,
    pub heading: Direction,
    length: usize,
    last_direction: Vec<Option<Direction>>,
    size_x: usize,
    size_y: usize,
}

impl SnakeState {
    /// Create an empty snake state for a grid of the given size
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Self {
            head: Point::new(0, 0),
            tail: Point::new(0, 0),
            heading: Direction::Right,
            length: 0,
            last_direction: vec![None; size_x * size_y],
            size_x,
            size_y,
        }
    }

    /// Forget the whole body without reallocating the map
    pub fn clear(&mut self) {
        self.last_direction.fill(None);
        self.length = 0;
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub(crate) fn set_len(&mut self, length: usize) {
        self.length = length;
    }

    fn index_of(&self, pos: Point) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.size_x
            && (pos.y as usize) < self.size_y;
        in_bounds.then(|| pos.y as usize * self.size_x + pos.x as usize)
    }

    /// Recorded heading for a cell, if the snake occupies it
    pub fn direction_at(&self, pos: Point) -> Option<Direction> {
        self.index_of(pos).and_then(|idx| self.last_direction[idx])
    }

    pub(crate) fn set_direction(&mut self, pos: Point, direction: Direction) {
        if let Some(idx) = self.index_of(pos) {
            self.last_direction[idx] = Some(direction);
        }
    }

    pub(crate) fn clear_direction(&mut self, pos: Point) {
        if let Some(idx) = self.index_of(pos) {
            self.last_direction[idx] = None;
        }
    }

    /// Walk the body from tail to head
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            snake: self,
            next: Some(self.tail),
            remaining: self.length,
        }
    }

    /// Check if position is part of the snake
    pub fn occupies(&self, pos: Point) -> bool {
        self.direction_at(pos).is_some()
    }
}

/// Iterator over snake cells, tail first
pub struct Segments<'a> {
    snake: &'a SnakeState,
    next: Option<Point>,
    remaining: usize,
}

impl Iterator for Segments<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self
            .snake
            .direction_at(current)
            .map(|d| current.moved_in_direction(d));
        Some(current)
    }
}
