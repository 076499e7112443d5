mod rng;
mod settings;
mod snake;
mod state;
mod types;

pub use rng::GameRng;
pub use settings::{GRID_SIZE, GameSettings, INITIAL_TICK_MS, MIN_TICK_MS, TICK_SPEEDUP_MS};
pub use snake::Snake;
pub use state::{GameState, place_food};
pub use types::{Direction, EndReason, Point};
