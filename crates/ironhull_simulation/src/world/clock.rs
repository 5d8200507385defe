//! Injectable clock (вместо wall-clock) для STOPPED dwell

use std::time::Duration;

use bevy::prelude::*;

/// Монотонное время в миллисекундах
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Simulation clock: двигается на fixed timestep каждый тик
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    elapsed: Duration,
    ticks: u64,
}

impl SimClock {
    pub fn advance(&mut self, step: Duration) {
        self.elapsed += step;
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Ручные часы для тестов
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    pub now_ms: u64,
}

impl ManualClock {
    pub fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock_accumulates_sub_millisecond_steps() {
        let mut clock = SimClock::default();
        let step = Duration::from_secs_f64(1.0 / 60.0);
        for _ in 0..60 {
            clock.advance(step);
        }
        assert_eq!(clock.ticks(), 60);
        // 60 × 16.666ms — без накопленной ошибки округления до целых мс
        assert!((999..=1000).contains(&clock.now_ms()));
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::at(500);
        clock.advance_ms(250);
        assert_eq!(clock.now_ms(), 750);
    }
}
