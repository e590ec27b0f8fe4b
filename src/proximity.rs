use log::debug;

use crate::identity;
use crate::pitch::{Point, distance_m};
use crate::tracking::{TrackedPlayer, TrackingFrame};

/// Starting minimum for the nearest-opponent scan; wider than any in-pitch gap.
pub const NO_OPPONENT_DISTANCE_M: f64 = 100.0;
pub const HIGH_PRESSURE_BELOW_M: f64 = 1.5;
pub const MODERATE_PRESSURE_BELOW_M: f64 = 3.0;

pub const MOTION_UNAVAILABLE: &str = "Motion data unavailable.";
pub const POSITIONING_UNCLEAR: &str = "Player positioning unclear.";

pub const DEFAULT_ATTACKER: Point = Point::new(0.5, 0.5);
pub const DEFAULT_DEFENDER: Point = Point::new(0.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pressure {
    High,
    Moderate,
    WideOpen,
}

impl Pressure {
    pub fn narrative(self, distance_m: f64) -> String {
        match self {
            Pressure::High => {
                format!("High pressure! Nearest defender was only {distance_m:.1}m away.")
            }
            Pressure::Moderate => {
                format!("Moderate pressure. The attacker had {distance_m:.1}m of space.")
            }
            Pressure::WideOpen => {
                format!("Wide open. The defense lost the player ({distance_m:.1}m separation).")
            }
        }
    }
}

pub fn classify_pressure(distance_m: f64) -> Pressure {
    if distance_m < HIGH_PRESSURE_BELOW_M {
        Pressure::High
    } else if distance_m < MODERATE_PRESSURE_BELOW_M {
        Pressure::Moderate
    } else {
        Pressure::WideOpen
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NearestOpponent<'a> {
    pub player: Option<&'a TrackedPlayer>,
    pub point: Option<Point>,
    pub distance_m: f64,
}

pub fn nearest_opponent<'a>(
    carrier: &TrackedPlayer,
    carrier_point: Point,
    frame: &'a TrackingFrame,
) -> NearestOpponent<'a> {
    let mut nearest = NearestOpponent {
        player: None,
        point: None,
        distance_m: NO_OPPONENT_DISTANCE_M,
    };
    for pos in &frame.positions {
        if pos.player.team_id == carrier.team_id || !pos.point.is_finite() {
            continue;
        }
        let dist = distance_m(carrier_point, pos.point);
        if dist < nearest.distance_m {
            nearest = NearestOpponent {
                player: Some(pos.player.as_ref()),
                point: Some(pos.point),
                distance_m: dist,
            };
        }
    }
    nearest
}

/// Everyone except the carrier and the nearest opponent, split by side in frame order.
pub fn partition_others(
    carrier: &TrackedPlayer,
    nearest: Option<&TrackedPlayer>,
    frame: &TrackingFrame,
) -> (Vec<Point>, Vec<Point>) {
    let mut teammates = Vec::new();
    let mut opponents = Vec::new();
    for pos in &frame.positions {
        if pos.player.same_entity(carrier) {
            continue;
        }
        if nearest.is_some_and(|n| pos.player.same_entity(n)) {
            continue;
        }
        if pos.player.team_id == carrier.team_id {
            teammates.push(pos.point);
        } else {
            opponents.push(pos.point);
        }
    }
    (teammates, opponents)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionAnalysis {
    pub context: String,
    pub attacker: Point,
    pub defender: Point,
    pub teammates: Vec<Point>,
    pub opponents: Vec<Point>,
    pub has_tracking: bool,
    pub nearest_distance_m: Option<f64>,
}

impl MotionAnalysis {
    fn degraded(context: &str) -> Self {
        Self {
            context: context.to_string(),
            attacker: DEFAULT_ATTACKER,
            defender: DEFAULT_DEFENDER,
            teammates: Vec::new(),
            opponents: Vec::new(),
            has_tracking: false,
            nearest_distance_m: None,
        }
    }

    pub fn unavailable() -> Self {
        Self::degraded(MOTION_UNAVAILABLE)
    }

    pub fn unclear() -> Self {
        Self::degraded(POSITIONING_UNCLEAR)
    }
}

pub fn analyze_motion(carrier_ref: &str, frame: Option<&TrackingFrame>) -> MotionAnalysis {
    let Some(frame) = frame else {
        return MotionAnalysis::unavailable();
    };
    let Some(resolution) = identity::resolve(carrier_ref, frame) else {
        debug!("carrier {carrier_ref:?} not found in frame {}", frame.frame_id);
        return MotionAnalysis::unclear();
    };
    let carrier = resolution.player;
    let Some(carrier_point) = frame.position_of(carrier) else {
        return MotionAnalysis::unclear();
    };
    debug!(
        "carrier {carrier_ref:?} -> {} via {}",
        carrier.player_id,
        resolution.strategy.label()
    );

    let nearest = nearest_opponent(carrier, carrier_point, frame);
    let (teammates, opponents) = partition_others(carrier, nearest.player, frame);
    let pressure = classify_pressure(nearest.distance_m);

    MotionAnalysis {
        context: pressure.narrative(nearest.distance_m),
        attacker: carrier_point,
        defender: nearest.point.unwrap_or(DEFAULT_DEFENDER),
        teammates,
        opponents,
        has_tracking: true,
        nearest_distance_m: Some(nearest.distance_m),
    }
}
