use std::f64::consts::TAU;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::events::MatchEvent;
use crate::pitch::Point;
use crate::tracking::{
    FramePosition, METRICA_FRAME_RATE, TrackedPlayer, TrackingDataset, TrackingFrame,
};

const HOME_SHAPE: [(f64, f64); 11] = [
    (0.05, 0.50),
    (0.20, 0.20),
    (0.18, 0.40),
    (0.18, 0.60),
    (0.20, 0.80),
    (0.38, 0.25),
    (0.36, 0.50),
    (0.38, 0.75),
    (0.55, 0.20),
    (0.60, 0.50),
    (0.55, 0.80),
];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub duration_s: f64,
    pub frame_rate: f64,
    pub goals: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 2,
            duration_s: 600.0,
            frame_rate: METRICA_FRAME_RATE,
            goals: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticMatch {
    pub events: Vec<MatchEvent>,
    pub tracking: TrackingDataset,
}

struct Runner {
    player: Arc<TrackedPlayer>,
    base: Point,
    amp: Point,
    phase: Point,
    speed: f64,
}

impl Runner {
    fn at(&self, t: f64) -> Point {
        Point::new(
            (self.base.x + self.amp.x * (self.speed * t + self.phase.x).sin()).clamp(0.0, 1.0),
            (self.base.y + self.amp.y * (self.speed * t * 0.7 + self.phase.y).cos()).clamp(0.0, 1.0),
        )
    }
}

/// Deterministic match: same config, same events and frames.
pub fn generate(config: &SyntheticConfig) -> SyntheticMatch {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let runners = build_runners(&mut rng);
    let events = build_events(&mut rng, config);
    let tracking = build_tracking(&runners, config);
    SyntheticMatch { events, tracking }
}

fn build_runners(rng: &mut StdRng) -> Vec<Runner> {
    let mut runners = Vec::with_capacity(22);
    for (side, team_id) in ["home", "away"].iter().enumerate() {
        for (slot, (x, y)) in HOME_SHAPE.iter().enumerate() {
            let jersey = (side * 11 + slot + 1) as u32;
            let base_x = if side == 0 { *x } else { 1.0 - *x };
            runners.push(Runner {
                player: Arc::new(TrackedPlayer::new(team_id, jersey)),
                base: Point::new(base_x, *y),
                amp: Point::new(rng.gen_range(0.02..0.12), rng.gen_range(0.02..0.10)),
                phase: Point::new(rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)),
                speed: rng.gen_range(0.05..0.25),
            });
        }
    }
    runners
}

fn side_label(side: usize) -> &'static str {
    if side == 0 { "Home" } else { "Away" }
}

fn jerseys(side: usize) -> Vec<u32> {
    (1..=11).map(|n| (side * 11) as u32 + n).collect()
}

fn event(t: f64, side: usize, kind: &str, subtype: &str, from: u32, to: Option<u32>) -> MatchEvent {
    MatchEvent {
        start_time_seconds: (t * 100.0).round() / 100.0,
        event_type: kind.to_string(),
        subtype: subtype.to_string(),
        from_player_ref: format!("Player{from}"),
        to_player_ref: to.map(|n| format!("Player{n}")).unwrap_or_default(),
        team: side_label(side).to_string(),
    }
}

fn build_events(rng: &mut StdRng, config: &SyntheticConfig) -> Vec<MatchEvent> {
    let mut events = vec![event(0.0, 0, "SET PIECE", "KICK OFF", 10, None)];
    let mut side = 0usize;
    let mut t = 0.5;
    while t < config.duration_s {
        let squad = jerseys(side);
        let mut pair = squad.choose_multiple(rng, 2).copied();
        let (Some(from), Some(to)) = (pair.next(), pair.next()) else {
            break;
        };
        if rng.gen_bool(0.12) {
            events.push(event(t, side, "BALL LOST", "INTERCEPTION", from, None));
            side = 1 - side;
            let winner = jerseys(side)[5];
            events.push(event(t + 0.4, side, "RECOVERY", "INTERCEPTION", winner, None));
        } else {
            events.push(event(t, side, "PASS", "", from, Some(to)));
        }
        t += rng.gen_range(1.5..6.0);
    }

    let spacing = config.duration_s / (config.goals as f64 + 1.0);
    for k in 0..config.goals {
        let side = k % 2;
        let t = spacing * (k as f64 + 1.0) + rng.gen_range(0.0..1.0);
        let scorer = (side * 11) as u32 + rng.gen_range(9..=11);
        events.push(event(t, side, "SHOT", "ON TARGET-GOAL", scorer, None));
    }

    events.sort_by(|a, b| a.start_time_seconds.total_cmp(&b.start_time_seconds));
    events
}

fn build_tracking(runners: &[Runner], config: &SyntheticConfig) -> TrackingDataset {
    let count = (config.duration_s * config.frame_rate).floor().max(0.0) as usize;
    let frames = (0..count)
        .map(|idx| {
            let t = idx as f64 / config.frame_rate;
            TrackingFrame {
                frame_id: idx as u64 + 1,
                positions: runners
                    .iter()
                    .map(|runner| FramePosition {
                        player: Arc::clone(&runner.player),
                        point: runner.at(t),
                    })
                    .collect(),
            }
        })
        .collect();
    TrackingDataset {
        frame_rate: config.frame_rate,
        frames,
    }
}
