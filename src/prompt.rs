//! Plain-text prompts for a generative commentary model.
//!
//! `goal_prompt` summarizes one assembled goal. The analysis/narrative pair
//! drives a two-stage flow: first ask for a structured reading of the event,
//! then ask for styled commentary built on that reading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::payload::GoalPayload;

const GOAL_INSTRUCTION: &str = "Analyze the following goal event and its build-up. Provide an in-depth analysis of how the goal was scored, including who passed the ball, whether defenders were near the scorer, how many passes were in the build-up, and whether the scorer passed through defenders.";
const GOAL_RESPONSE_REQUEST: &str = "Please return a JSON object with these fields: 'summary', 'pass_sequence', 'pressure_assessment', 'key_players', 'recommendations'. Keep answers factual and reference the events and tracking data provided.";

const FEW_SHOT_NARRATIVE_EXAMPLES: &str = "---
EXAMPLE ANALYSIS: {\"sentiment\": \"positive\", \"key_action\": \"pass execution\"}
EXAMPLE NARRATIVE (Neutral): The effective pass opened up space in the midfield.
---";

#[derive(Serialize)]
struct GoalHeadline<'a> {
    id: u32,
    time_min: i64,
    primary_player: &'a str,
    team: &'a str,
    motion_context: &'a str,
}

#[derive(Serialize)]
struct TrackingSummary {
    attacker_x: f64,
    attacker_y: f64,
    defender_x: f64,
    defender_y: f64,
    teammates_count: usize,
    opponents_count: usize,
}

pub fn goal_prompt(goal: &GoalPayload) -> String {
    let mut lines = vec![GOAL_INSTRUCTION.to_string(), String::new()];

    lines.push("GOAL EVENT:".to_string());
    lines.push(pretty(&GoalHeadline {
        id: goal.id,
        time_min: goal.time_min,
        primary_player: &goal.primary_player,
        team: &goal.team,
        motion_context: &goal.motion_context,
    }));
    lines.push(String::new());

    lines.push("BUILD-UP (most recent first):".to_string());
    for event in goal.build_up_events.iter().rev() {
        lines.push(serde_json::to_string(event).unwrap_or_default());
    }

    if goal.has_tracking {
        lines.push(String::new());
        lines.push("TRACKING SUMMARY:".to_string());
        lines.push(pretty(&TrackingSummary {
            attacker_x: goal.attacker_x,
            attacker_y: goal.attacker_y,
            defender_x: goal.defender_x,
            defender_y: goal.defender_y,
            teammates_count: goal.teammates.len(),
            opponents_count: goal.opponents.len(),
        }));
    }

    lines.push(String::new());
    lines.push(GOAL_RESPONSE_REQUEST.to_string());
    lines.join("\n")
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

pub fn analysis_prompt(event_type: &str, primary_player: &str, motion_context: &str) -> String {
    format!(
        "TASK: Analyze the following soccer event data and output a single JSON object.\n\
         \n\
         DATA:\n\
         Event Type: {event_type}\n\
         Primary Player: {primary_player}\n\
         Contextual Motion Insight: {motion_context}\n\
         \n\
         OUTPUT SCHEMA: {{ \"sentiment\": \"positive\" | \"negative\" | \"neutral\", \"key_action\": string, \"justification\": string }}"
    )
}

pub fn narrative_prompt(analysis_json: &str, tone: &str, focus_player: &str) -> String {
    format!(
        "You are a world-class sports commentator. Your analysis MUST be written with a {tone} tone and focused ONLY on the actions of {focus_player}.\n\
         \n\
         CONTEXTUAL ANALYSIS (JSON): {analysis_json}\n\
         \n\
         {FEW_SHOT_NARRATIVE_EXAMPLES}\n\
         \n\
         TASK: Using the JSON analysis provided above, generate a two-sentence narrative summary with the requested tone."
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub key_action: String,
    pub justification: String,
}

/// Parses a stage-one reply, tolerating a fenced ```json block around it.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim()).context("model returned unparsable analysis")
}
