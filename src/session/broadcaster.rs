use std::future::Future;

use super::snake_session::GameOverSummary;
use crate::game::GameState;

/// Seam the presentation layer implements: it receives a full snapshot
/// after every transition and a summary when the game ends.
pub trait StateBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, state: GameState) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, summary: GameOverSummary) -> impl Future<Output = ()> + Send;
}
