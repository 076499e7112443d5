use std::time::Duration;

use super::rng::GameRng;
use super::settings::GameSettings;
use super::snake::Snake;
use super::types::{Direction, EndReason, Point};

const INITIAL_SNAKE_LENGTH: usize = 3;

/// Random draws before falling back to scanning for a free cell.
const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

/// Full snapshot of one game. Transitions never mutate in place; every
/// operation returns the successor snapshot.
#[derive(Clone, Debug)]
pub struct GameState {
    pub snake: Snake,
    pub food: Point,
    pub direction: Direction,
    pub score: u32,
    pub end_reason: Option<EndReason>,
    pub started: bool,
    /// Current tick period, recomputed whenever food is consumed.
    pub tick_interval: Duration,
}

impl GameState {
    /// Fixed starting configuration: a three-segment snake centered on the
    /// board and heading up, food in the upper-left quadrant, not started.
    pub fn initial(settings: &GameSettings) -> Self {
        let grid = settings.grid_size;
        let center = Point::new(grid / 2, grid / 2);
        Self {
            snake: Snake::spawn(center, Direction::Up, INITIAL_SNAKE_LENGTH),
            food: Point::new(grid / 4, grid / 4),
            direction: Direction::Up,
            score: 0,
            end_reason: None,
            started: false,
            tick_interval: settings.tick_interval_for_score(0),
        }
    }

    /// Fresh board with the game running. Discards whatever came before.
    pub fn start(settings: &GameSettings) -> Self {
        Self {
            started: true,
            ..Self::initial(settings)
        }
    }

    pub fn is_over(&self) -> bool {
        self.end_reason.is_some()
    }

    /// Advances the snake by one cell in the current direction.
    pub fn step(&self, settings: &GameSettings, rng: &mut GameRng) -> Self {
        if self.is_over() || !self.started {
            return self.clone();
        }

        let head = self.snake.head();
        let grid = settings.grid_size;

        let new_head = match self.direction {
            Direction::Up => {
                if head.y == 0 {
                    return self.ended(EndReason::WallCollision);
                }
                Point::new(head.x, head.y - 1)
            }
            Direction::Down => {
                if head.y + 1 >= grid {
                    return self.ended(EndReason::WallCollision);
                }
                Point::new(head.x, head.y + 1)
            }
            Direction::Left => {
                if head.x == 0 {
                    return self.ended(EndReason::WallCollision);
                }
                Point::new(head.x - 1, head.y)
            }
            Direction::Right => {
                if head.x + 1 >= grid {
                    return self.ended(EndReason::WallCollision);
                }
                Point::new(head.x + 1, head.y)
            }
        };

        // Any segment counts, including the tail cell the snake is about
        // to vacate.
        if self.snake.contains(new_head) {
            return self.ended(EndReason::SelfCollision);
        }

        let mut next = self.clone();
        if new_head == self.food {
            next.snake = self.snake.advance(new_head, true);
            next.score = self.score + 1;
            next.tick_interval = settings.tick_interval_for_score(next.score);
            match place_food(&next.snake, grid, rng) {
                Some(food) => next.food = food,
                None => next.end_reason = Some(EndReason::BoardFull),
            }
        } else {
            next.snake = self.snake.advance(new_head, false);
        }
        next
    }

    /// Applies a direction request from the input layer. Rejected while the
    /// game is not running and for exact 180-degree reversals.
    pub fn request_direction(&self, requested: Direction) -> Self {
        if !self.started || self.is_over() || requested.is_opposite(&self.direction) {
            return self.clone();
        }
        Self {
            direction: requested,
            ..self.clone()
        }
    }

    fn ended(&self, reason: EndReason) -> Self {
        Self {
            end_reason: Some(reason),
            ..self.clone()
        }
    }
}

/// Picks a uniformly random free cell, or `None` if the snake covers the
/// whole grid. Rejection sampling handles every practical board; the scan
/// fallback guarantees termination on nearly-full boards.
pub fn place_food(snake: &Snake, grid_size: usize, rng: &mut GameRng) -> Option<Point> {
    let free_cells = grid_size * grid_size - snake.len();
    if free_cells == 0 {
        return None;
    }

    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(
            rng.random_range(0..grid_size),
            rng.random_range(0..grid_size),
        );
        if !snake.contains(candidate) {
            return Some(candidate);
        }
    }

    let mut remaining = rng.random_range(0..free_cells);
    for y in 0..grid_size {
        for x in 0..grid_size {
            let cell = Point::new(x, y);
            if snake.contains(cell) {
                continue;
            }
            if remaining == 0 {
                return Some(cell);
            }
            remaining -= 1;
        }
    }

    None
}
