use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ModeConfig {
    pub team_size: u32,
    pub team_count: u32,
    pub initial_rating_window: i32,
    pub max_rating_window: i32,
    pub window_growth_per_second: f64,
    pub max_queue_time: Duration,
    pub allow_premade: bool,
    pub max_premade_size: u32,
    pub cross_region: bool,
    pub max_latency_ms: u32,
    /// Minimum accepted match quality in `[0, 1]`; relaxed once the oldest
    /// entry's wait exceeds `relaxation_wait`.
    pub quality_threshold: f64,
    pub relaxation_wait: Duration,
}

impl ModeConfig {
    /// 1v1 ranked duel, grounded in the reference service's ARENA_1V1 profile.
    pub fn arena_1v1() -> Self {
        Self {
            team_size: 1,
            team_count: 2,
            initial_rating_window: 100,
            max_rating_window: 400,
            window_growth_per_second: 5.0,
            max_queue_time: Duration::from_secs(180),
            allow_premade: false,
            max_premade_size: 1,
            cross_region: false,
            max_latency_ms: 120,
            quality_threshold: 0.3,
            relaxation_wait: Duration::from_secs(90),
        }
    }

    /// 3v3 arena, premades up to a full team allowed.
    pub fn arena_3v3() -> Self {
        Self {
            team_size: 3,
            team_count: 2,
            initial_rating_window: 150,
            max_rating_window: 500,
            window_growth_per_second: 8.0,
            max_queue_time: Duration::from_secs(240),
            allow_premade: true,
            max_premade_size: 3,
            cross_region: false,
            max_latency_ms: 150,
            quality_threshold: 0.3,
            relaxation_wait: Duration::from_secs(120),
        }
    }

    /// 10v10 large-scale battleground.
    pub fn battleground_10v10() -> Self {
        Self {
            team_size: 10,
            team_count: 2,
            initial_rating_window: 250,
            max_rating_window: 800,
            window_growth_per_second: 15.0,
            max_queue_time: Duration::from_secs(300),
            allow_premade: true,
            max_premade_size: 5,
            cross_region: true,
            max_latency_ms: 200,
            quality_threshold: 0.25,
            relaxation_wait: Duration::from_secs(150),
        }
    }

    pub fn group_size(&self) -> usize {
        (self.team_size * self.team_count) as usize
    }

    /// The acceptable rating window at `elapsed` seconds after enqueue.
    pub fn window_at(&self, elapsed: Duration) -> i32 {
        let grown = self.initial_rating_window as f64 + elapsed.as_secs_f64() * self.window_growth_per_second;
        grown.min(self.max_rating_window as f64) as i32
    }
}
