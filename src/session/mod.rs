mod broadcaster;
mod snake_session;

pub use broadcaster::StateBroadcaster;
pub use snake_session::{GameOverSummary, SessionCommand, SnakeSession};
