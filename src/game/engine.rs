use std::collections::HashSet;
use std::fmt;

use anyhow::{anyhow, bail, ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::Direction,
    config::GameConfig,
    snake::SnakeState,
    state::{Board, Cell, Point},
};

/// Initial tail and head of every episode; the snake starts heading Right
const START_TAIL: Point = Point { x: 2, y: 2 };
const START_HEAD: Point = Point { x: 3, y: 2 };

/// Whether the current episode can still be stepped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    Running,
    Lost,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit the border ring
    Border,
    /// Snake hit itself
    SelfCollision,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the episode has ended
    pub done: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The grid world: board, snake and episode state
///
/// Board and snake are allocated once and reset in place between episodes.
pub struct GridEnvironment {
    config: GameConfig,
    board: Board,
    snake: SnakeState,
    state: EpisodeState,
    rng: StdRng,
    score: u32,
    steps: u32,
}

impl GridEnvironment {
    /// Create a new environment; food placement draws from `rng`
    pub fn new(config: GameConfig, rng: StdRng) -> Result<Self> {
        config.validate().map_err(|msg| anyhow!("invalid game config: {msg}"))?;

        let board = Board::new(config.grid_width, config.grid_height, config.max_food);
        let snake = SnakeState::new(config.grid_width, config.grid_height);
        let mut env = Self {
            config,
            board,
            snake,
            state: EpisodeState::Running,
            rng,
            score: 0,
            steps: 0,
        };
        env.reset();
        Ok(env)
    }

    /// Create an environment with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Reset the game to its initial state
    ///
    /// Clears the interior, restamps the border and places a length-2 snake
    /// heading Right.
    pub fn reset(&mut self) {
        self.board.reset();
        self.snake.clear();

        for pos in [START_TAIL, START_HEAD] {
            self.board.set_snake(pos, true);
            self.snake.set_direction(pos, Direction::Right);
        }
        self.snake.tail = START_TAIL;
        self.snake.head = START_HEAD;
        self.snake.heading = Direction::Right;
        self.snake.set_len(2);

        self.state = EpisodeState::Running;
        self.score = 0;
        self.steps = 0;
    }

    /// Execute one step of the game
    ///
    /// A reversal onto the body is ignored and the snake keeps its heading.
    /// Leaving the grid is an error: the border ring makes it unreachable
    /// unless the state is corrupt.
    pub fn step(&mut self, action: Direction) -> Result<StepResult> {
        if self.state == EpisodeState::Lost {
            return Ok(StepResult {
                reward: 0.0,
                done: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            });
        }

        if !self.snake.heading.is_opposite(action) {
            self.snake.heading = action;
        }
        let heading = self.snake.heading;
        let new_head = self.snake.head.moved_in_direction(heading);

        let Some(cell) = self.board.get(new_head) else {
            bail!(
                "snake head moved outside the {}x{} grid to ({}, {})",
                self.board.size_x(),
                self.board.size_y(),
                new_head.x,
                new_head.y
            );
        };

        self.steps += 1;

        let collision_type = match cell {
            Cell::Border => Some(CollisionType::Border),
            Cell::Snake => Some(CollisionType::SelfCollision),
            Cell::Food | Cell::Empty => None,
        };
        if let Some(collision_type) = collision_type {
            self.state = EpisodeState::Lost;
            return Ok(StepResult {
                reward: self.config.death_penalty,
                done: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            });
        }

        let ate_food = cell == Cell::Food;
        self.advance_head(new_head, heading);

        let reward = if ate_food {
            self.board.consume_food(new_head);
            self.snake.set_len(self.snake.len() + 1);
            self.score += 1;
            self.config.food_reward
        } else {
            self.board.set_snake(new_head, true);
            self.retract_tail()?;
            self.config.step_penalty
        };

        Ok(StepResult {
            reward,
            done: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        })
    }

    fn advance_head(&mut self, new_head: Point, heading: Direction) {
        // The old head cell now points at the new one
        self.snake.set_direction(self.snake.head, heading);
        self.snake.set_direction(new_head, heading);
        self.snake.head = new_head;
    }

    fn retract_tail(&mut self) -> Result<()> {
        let tail = self.snake.tail;
        let direction = self
            .snake
            .direction_at(tail)
            .ok_or_else(|| anyhow!("tail cell ({}, {}) has no recorded direction", tail.x, tail.y))?;

        self.board.set_snake(tail, false);
        self.snake.clear_direction(tail);
        self.snake.tail = tail.moved_in_direction(direction);
        Ok(())
    }

    /// Maybe drop a piece of food on a random interior cell
    ///
    /// Does nothing when the food limit is reached. Otherwise, with the given
    /// probability, picks one interior cell; if it is occupied the attempt is
    /// skipped for this tick rather than retried.
    pub fn generate_food(&mut self, probability: f64) -> bool {
        if self.board.food_count() >= self.board.max_food() {
            return false;
        }
        if !(probability > 0.0) || !self.rng.gen_bool(probability.min(1.0)) {
            return false;
        }

        let x = self.rng.gen_range(1..self.board.size_x() - 1) as i32;
        let y = self.rng.gen_range(1..self.board.size_y() - 1) as i32;
        self.board.place_food(Point::new(x, y))
    }

    /// Place food at an exact position (same rules as random placement)
    pub fn place_food(&mut self, pos: Point) -> bool {
        self.board.place_food(pos)
    }

    /// Replace the snake with the given body, listed tail first
    ///
    /// Cells must be orthogonally adjacent, distinct and either empty or part
    /// of the current snake. Every check runs before anything is touched, so
    /// an error leaves the environment as it was. Used to set up specific
    /// positions.
    pub fn place_snake(&mut self, body: &[Point], heading: Direction) -> Result<()> {
        ensure!(body.len() >= 2, "snake needs at least two cells, got {}", body.len());
        for pair in body.windows(2) {
            ensure!(
                pair[0].direction_to(pair[1]).is_some(),
                "snake cells ({}, {}) and ({}, {}) are not adjacent",
                pair[0].x,
                pair[0].y,
                pair[1].x,
                pair[1].y
            );
        }

        let mut seen = HashSet::with_capacity(body.len());
        for &pos in body {
            ensure!(
                seen.insert(pos),
                "snake cell ({}, {}) is listed twice",
                pos.x,
                pos.y
            );
            let free = match self.board.get(pos) {
                Some(Cell::Empty) => true,
                Some(Cell::Snake) => self.snake.occupies(pos),
                _ => false,
            };
            ensure!(
                free,
                "cannot place snake on ({}, {}): cell is not empty",
                pos.x,
                pos.y
            );
        }

        for pos in self.snake.segments().collect::<Vec<_>>() {
            self.board.set_snake(pos, false);
        }
        self.snake.clear();

        for &pos in body {
            self.board.set_snake(pos, true);
        }
        for pair in body.windows(2) {
            if let Some(direction) = pair[0].direction_to(pair[1]) {
                self.snake.set_direction(pair[0], direction);
            }
        }

        let head = body[body.len() - 1];
        self.snake.set_direction(head, heading);
        self.snake.tail = body[0];
        self.snake.head = head;
        self.snake.heading = heading;
        self.snake.set_len(body.len());
        self.state = EpisodeState::Running;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &SnakeState {
        &self.snake
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EpisodeState::Running
    }

    /// Food eaten this episode
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Plain-text board: `#` border, `O` head, `o` body, `*` food, `.` empty
impl fmt::Display for GridEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.board.size_y() {
            for x in 0..self.board.size_x() {
                let pos = Point::new(x as i32, y as i32);
                let glyph = match self.board.get(pos) {
                    Some(Cell::Border) => '#',
                    Some(Cell::Snake) if pos == self.snake.head => 'O',
                    Some(Cell::Snake) => 'o',
                    Some(Cell::Food) => '*',
                    _ => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
