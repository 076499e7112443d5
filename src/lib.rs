pub mod config;
pub mod game;
pub mod logger;
pub mod session;

pub use game::{
    Direction, EndReason, GRID_SIZE, GameRng, GameSettings, GameState, Point, Snake,
};
pub use session::{GameOverSummary, SessionCommand, SnakeSession, StateBroadcaster};
