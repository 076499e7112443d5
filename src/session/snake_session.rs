use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use super::broadcaster::StateBroadcaster;
use crate::game::{Direction, EndReason, GameRng, GameSettings, GameState};
use crate::log;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Reset to a fresh board and begin ticking.
    Start,
    /// Direction request from the input layer, already decoded from a key.
    Turn(Direction),
    /// Tear the session down.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub reason: EndReason,
}

/// One game session: owns the state and serializes every transition, both
/// timer ticks and incoming commands, through a single task.
pub struct SnakeSession {
    settings: GameSettings,
    state: GameState,
    rng: GameRng,
}

impl SnakeSession {
    pub fn new(settings: GameSettings, rng: GameRng) -> Self {
        let state = GameState::initial(&settings);
        Self {
            settings,
            state,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drives the game until the command channel closes or `Quit` arrives,
    /// returning the final snapshot.
    ///
    /// The tick deadline is re-armed from the post-step `tick_interval`, so
    /// a speed change after food applies to the very next tick. Game over
    /// clears the deadline; `Start` resets state and deadline, superseding
    /// any pending tick. Direction commands leave the deadline untouched.
    pub async fn run<B: StateBroadcaster>(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: B,
    ) -> GameState {
        broadcaster.broadcast_state(self.state.clone()).await;

        let mut next_tick: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = tick_deadline(next_tick) => {
                    let previous_score = self.state.score;
                    self.state = self.state.step(&self.settings, &mut self.rng);
                    if self.state.score > previous_score {
                        let head = self.state.snake.head();
                        log!(
                            "Ate food at ({}, {}). Score: {}",
                            head.x,
                            head.y,
                            self.state.score
                        );
                    }
                    broadcaster.broadcast_state(self.state.clone()).await;

                    if let Some(reason) = self.state.end_reason {
                        next_tick = None;
                        log!("Game over: {:?}. Final score: {}", reason, self.state.score);
                        broadcaster
                            .broadcast_game_over(GameOverSummary {
                                score: self.state.score,
                                reason,
                            })
                            .await;
                    } else {
                        next_tick = Some(Instant::now() + self.state.tick_interval);
                    }
                }
                command = commands.recv() => match command {
                    Some(SessionCommand::Start) => {
                        self.state = GameState::start(&self.settings);
                        log!("Game started (seed {})", self.rng.seed());
                        broadcaster.broadcast_state(self.state.clone()).await;
                        next_tick = Some(Instant::now() + self.state.tick_interval);
                    }
                    Some(SessionCommand::Turn(direction)) => {
                        let next = self.state.request_direction(direction);
                        let accepted = next.direction != self.state.direction;
                        self.state = next;
                        if accepted {
                            broadcaster.broadcast_state(self.state.clone()).await;
                        }
                    }
                    Some(SessionCommand::Quit) | None => break,
                },
            }
        }

        self.state
    }
}

async fn tick_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::game::Point;

    #[derive(Clone)]
    struct ChannelBroadcaster {
        states: mpsc::UnboundedSender<GameState>,
        summaries: mpsc::UnboundedSender<GameOverSummary>,
    }

    impl ChannelBroadcaster {
        fn new() -> (
            Self,
            mpsc::UnboundedReceiver<GameState>,
            mpsc::UnboundedReceiver<GameOverSummary>,
        ) {
            let (states_tx, states_rx) = mpsc::unbounded_channel();
            let (summaries_tx, summaries_rx) = mpsc::unbounded_channel();
            (
                Self {
                    states: states_tx,
                    summaries: summaries_tx,
                },
                states_rx,
                summaries_rx,
            )
        }
    }

    impl StateBroadcaster for ChannelBroadcaster {
        async fn broadcast_state(&self, state: GameState) {
            let _ = self.states.send(state);
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            let _ = self.summaries.send(summary);
        }
    }

    fn small_grid_settings() -> GameSettings {
        GameSettings {
            grid_size: 10,
            ..GameSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_lifecycle_to_wall_collision_and_restart() {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (broadcaster, mut states, mut summaries) = ChannelBroadcaster::new();
        let session = SnakeSession::new(small_grid_settings(), GameRng::new(1));
        let handle = tokio::spawn(session.run(commands_rx, broadcaster));

        let initial = states.recv().await.unwrap();
        assert!(!initial.started);

        commands_tx.send(SessionCommand::Start).unwrap();
        let started = states.recv().await.unwrap();
        assert!(started.started);
        assert_eq!(started.snake.head(), Point::new(5, 5));

        // Heading up from y=5: five moves, then the wall.
        for expected_y in (0..5).rev() {
            let state = states.recv().await.unwrap();
            assert_eq!(state.snake.head(), Point::new(5, expected_y));
            assert!(!state.is_over());
        }
        let over = states.recv().await.unwrap();
        assert!(over.is_over());
        assert_eq!(over.snake.head(), Point::new(5, 0));

        let summary = summaries.recv().await.unwrap();
        assert_eq!(summary.reason, EndReason::WallCollision);
        assert_eq!(summary.score, 0);

        // Game over cancels the timer: no further snapshots however long
        // we wait.
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(states.try_recv().is_err());

        commands_tx.send(SessionCommand::Start).unwrap();
        let fresh = states.recv().await.unwrap();
        assert!(fresh.started);
        assert!(!fresh.is_over());
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.snake.head(), Point::new(5, 5));

        commands_tx.send(SessionCommand::Quit).unwrap();
        let final_state = handle.await.unwrap();
        assert!(final_state.started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_commands_do_not_reset_tick_timing() {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (broadcaster, mut states, _summaries) = ChannelBroadcaster::new();
        let session = SnakeSession::new(GameSettings::default(), GameRng::new(1));
        tokio::spawn(session.run(commands_rx, broadcaster));

        let _initial = states.recv().await.unwrap();
        commands_tx.send(SessionCommand::Start).unwrap();
        let _started = states.recv().await.unwrap();

        let before_first = Instant::now();
        let first = states.recv().await.unwrap();
        assert_eq!(first.snake.head(), Point::new(10, 9));
        assert_eq!(before_first.elapsed(), Duration::from_millis(200));

        // A direction change mid-interval must not delay the pending tick.
        let after_first = Instant::now();
        commands_tx.send(SessionCommand::Turn(Direction::Left)).unwrap();
        let turned = states.recv().await.unwrap();
        assert_eq!(turned.direction, Direction::Left);
        assert_eq!(after_first.elapsed(), Duration::ZERO);

        let second = states.recv().await.unwrap();
        assert_eq!(second.snake.head(), Point::new(9, 9));
        assert_eq!(after_first.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_eating_food_reschedules_next_tick_faster() {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (broadcaster, mut states, _summaries) = ChannelBroadcaster::new();
        let session = SnakeSession::new(small_grid_settings(), GameRng::new(4));
        tokio::spawn(session.run(commands_rx, broadcaster));

        let _initial = states.recv().await.unwrap();
        commands_tx.send(SessionCommand::Start).unwrap();
        let _started = states.recv().await.unwrap();

        // Food sits at (2, 2); steer left to x=2, then up to y=2.
        commands_tx.send(SessionCommand::Turn(Direction::Left)).unwrap();
        let _turned = states.recv().await.unwrap();
        for expected_x in [4, 3, 2] {
            let state = states.recv().await.unwrap();
            assert_eq!(state.snake.head(), Point::new(expected_x, 5));
        }
        commands_tx.send(SessionCommand::Turn(Direction::Up)).unwrap();
        let _turned = states.recv().await.unwrap();
        for expected_y in [4, 3] {
            let state = states.recv().await.unwrap();
            assert_eq!(state.snake.head(), Point::new(2, expected_y));
        }

        let before_eating = Instant::now();
        let eaten = states.recv().await.unwrap();
        assert_eq!(eaten.score, 1);
        assert_eq!(eaten.tick_interval, Duration::from_millis(195));
        assert_eq!(before_eating.elapsed(), Duration::from_millis(200));

        // The shorter interval governs the very next tick.
        let after_eating = Instant::now();
        let next = states.recv().await.unwrap();
        assert_eq!(after_eating.elapsed(), Duration::from_millis(195));
        assert!(!next.is_over());
    }
}
