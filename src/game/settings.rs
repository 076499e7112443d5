use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

/// Board side length the presentation layer renders by default.
pub const GRID_SIZE: usize = 20;

pub const INITIAL_TICK_MS: u64 = 200;
pub const TICK_SPEEDUP_MS: u64 = 5;
pub const MIN_TICK_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub grid_size: usize,
    pub initial_tick_ms: u64,
    pub tick_speedup_ms: u64,
    pub min_tick_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            initial_tick_ms: INITIAL_TICK_MS,
            tick_speedup_ms: TICK_SPEEDUP_MS,
            min_tick_ms: MIN_TICK_MS,
        }
    }
}

impl GameSettings {
    /// Tick period after `score` pieces of food: the initial period shrinks
    /// by `tick_speedup_ms` per point, floored at `min_tick_ms`.
    pub fn tick_interval_for_score(&self, score: u32) -> Duration {
        let ms = self
            .initial_tick_ms
            .saturating_sub(u64::from(score) * self.tick_speedup_ms)
            .max(self.min_tick_ms);
        Duration::from_millis(ms)
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 10 || self.grid_size > 100 {
            return Err("Grid size must be between 10 and 100".to_string());
        }
        if self.initial_tick_ms < 50 || self.initial_tick_ms > 5000 {
            return Err("Initial tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.min_tick_ms < 10 {
            return Err("Minimum tick interval must be at least 10ms".to_string());
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err("Minimum tick interval must not exceed the initial one".to_string());
        }
        Ok(())
    }
}
