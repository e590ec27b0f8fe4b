use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::build_up::{BUILD_UP_WINDOW, BuildUpEvent, build_up_window};
use crate::events::{MatchEvent, goal_events};
use crate::names::PlayerNames;
use crate::pitch::Point;
use crate::proximity::{MotionAnalysis, analyze_motion};
use crate::sync::frame_at;
use crate::tracking::TrackingDataset;

pub const GOAL_ID_BASE: u32 = 300;
pub const GOAL_EVENT_LABEL: &str = "Goal";
pub const SECONDARY_PLAYER: &str = "Team Effort";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLabels {
    pub home: String,
    pub away: String,
}

impl Default for TeamLabels {
    fn default() -> Self {
        Self {
            home: "PRIME Barcelona".to_string(),
            away: "PRIME Real Madrid".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPayload {
    pub id: u32,
    pub event_type: String,
    pub time_min: i64,
    pub primary_player: String,
    pub secondary_player: String,
    pub motion_context: String,
    pub team: String,
    pub home_team: String,
    pub away_team: String,
    pub attacker_x: f64,
    pub attacker_y: f64,
    pub defender_x: f64,
    pub defender_y: f64,
    pub teammates: Vec<Point>,
    pub opponents: Vec<Point>,
    pub has_tracking: bool,
    pub build_up_events: Vec<BuildUpEvent>,
}

pub struct Assembler<'a> {
    events: &'a [MatchEvent],
    tracking: Option<&'a TrackingDataset>,
    names: &'a PlayerNames,
    teams: &'a TeamLabels,
}

impl<'a> Assembler<'a> {
    pub fn new(
        events: &'a [MatchEvent],
        tracking: Option<&'a TrackingDataset>,
        names: &'a PlayerNames,
        teams: &'a TeamLabels,
    ) -> Self {
        Self {
            events,
            tracking,
            names,
            teams,
        }
    }

    /// One payload per goal, in source order. Goals are analyzed independently.
    pub fn assemble(&self) -> Vec<GoalPayload> {
        let goals = goal_events(self.events);
        info!("found {} goals", goals.len());
        goals
            .par_iter()
            .enumerate()
            .map(|(ordinal, goal)| self.goal_payload(GOAL_ID_BASE + ordinal as u32, goal))
            .collect()
    }

    pub fn goal_payload(&self, id: u32, goal: &MatchEvent) -> GoalPayload {
        let frame = self
            .tracking
            .and_then(|dataset| frame_at(dataset, goal.start_time_seconds));
        let analysis = analyze_motion(&goal.from_player_ref, frame);
        if !analysis.has_tracking {
            debug!("goal {id} at {:.2}s: {}", goal.start_time_seconds, analysis.context);
        }
        let build_up = build_up_window(
            self.events,
            goal.start_time_seconds,
            self.names,
            BUILD_UP_WINDOW,
        );
        self.merge(id, goal, analysis, build_up)
    }

    fn merge(
        &self,
        id: u32,
        goal: &MatchEvent,
        analysis: MotionAnalysis,
        build_up_events: Vec<BuildUpEvent>,
    ) -> GoalPayload {
        GoalPayload {
            id,
            event_type: GOAL_EVENT_LABEL.to_string(),
            time_min: goal.minute(),
            primary_player: self.names.display(&goal.from_player_ref).to_string(),
            secondary_player: SECONDARY_PLAYER.to_string(),
            motion_context: analysis.context,
            team: goal.team.clone(),
            home_team: self.teams.home.clone(),
            away_team: self.teams.away.clone(),
            attacker_x: analysis.attacker.x,
            attacker_y: analysis.attacker.y,
            defender_x: analysis.defender.x,
            defender_y: analysis.defender.y,
            teammates: analysis.teammates,
            opponents: analysis.opponents,
            has_tracking: analysis.has_tracking,
            build_up_events,
        }
    }
}

pub fn assemble(
    events: &[MatchEvent],
    tracking: Option<&TrackingDataset>,
    names: &PlayerNames,
    teams: &TeamLabels,
) -> Vec<GoalPayload> {
    Assembler::new(events, tracking, names, teams).assemble()
}
