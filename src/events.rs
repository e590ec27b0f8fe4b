use std::io::Read;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::tracking::read_source;

pub const GOAL_EVENT_TYPE: &str = "SHOT";
pub const GOAL_SUBTYPE_MARKER: &str = "GOAL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub start_time_seconds: f64,
    pub event_type: String,
    pub subtype: String,
    pub from_player_ref: String,
    pub to_player_ref: String,
    pub team: String,
}

impl MatchEvent {
    pub fn is_goal(&self) -> bool {
        self.event_type == GOAL_EVENT_TYPE && self.subtype.contains(GOAL_SUBTYPE_MARKER)
    }

    pub fn minute(&self) -> i64 {
        match_minute(self.start_time_seconds)
    }
}

pub fn match_minute(seconds: f64) -> i64 {
    (seconds / 60.0).floor() as i64
}

#[derive(Debug, Deserialize)]
struct RawEventRow {
    #[serde(rename = "Team")]
    team: Option<String>,
    #[serde(rename = "Type")]
    event_type: Option<String>,
    #[serde(rename = "Subtype")]
    subtype: Option<String>,
    #[serde(rename = "Start Time [s]")]
    start_time_seconds: f64,
    #[serde(rename = "From")]
    from: Option<String>,
    #[serde(rename = "To")]
    to: Option<String>,
}

impl From<RawEventRow> for MatchEvent {
    fn from(row: RawEventRow) -> Self {
        Self {
            start_time_seconds: row.start_time_seconds,
            event_type: row.event_type.unwrap_or_default(),
            subtype: row.subtype.unwrap_or_default(),
            from_player_ref: row.from.unwrap_or_default(),
            to_player_ref: row.to.unwrap_or_default(),
            team: row.team.unwrap_or_default(),
        }
    }
}

/// Loads a Metrica raw event CSV from a path or an http(s) URL.
pub fn load_events(source: &str) -> Result<Vec<MatchEvent>> {
    let raw = read_source(source).with_context(|| format!("read events {source}"))?;
    let events = parse_events_csv(raw.as_bytes())?;
    info!("events loaded: {} rows from {source}", events.len());
    Ok(events)
}

pub fn parse_events_csv<R: Read>(reader: R) -> Result<Vec<MatchEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut events = Vec::new();
    for (idx, row) in reader.deserialize::<RawEventRow>().enumerate() {
        // +2: header line and 1-based numbering
        let row = row.with_context(|| format!("parse event row {}", idx + 2))?;
        events.push(MatchEvent::from(row));
    }
    Ok(events)
}

pub fn goal_events(events: &[MatchEvent]) -> Vec<&MatchEvent> {
    events.iter().filter(|event| event.is_goal()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Team,Type,Subtype,Period,Start Frame,Start Time [s],End Frame,End Time [s],From,To,Start X,Start Y,End X,End Y
Away,SET PIECE,KICK OFF,1,51,2.04,51,2.04,Player23,,,,,
Away,PASS,,1,51,2.04,87,3.48,Player23,Player20,0.5,0.5,0.4,0.51
Home,SHOT,ON TARGET-GOAL,1,3135,125.4,3160,126.4,Player10,,0.9,0.5,1.0,0.5
Home,SHOT,OFF TARGET-OUT,1,4000,160.0,4010,160.4,Player9,,0.8,0.4,1.0,0.3
";

    #[test]
    fn parses_metrica_columns_and_empty_cells() {
        let events = parse_events_csv(CSV.as_bytes()).expect("csv parses");
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].event_type, "SET PIECE");
        assert_eq!(events[0].to_player_ref, "");
        assert_eq!(events[1].subtype, "");
        assert_eq!(events[1].to_player_ref, "Player20");
        assert!((events[2].start_time_seconds - 125.4).abs() < 1e-12);
    }

    #[test]
    fn goal_predicate_is_shot_with_goal_subtype() {
        let events = parse_events_csv(CSV.as_bytes()).expect("csv parses");
        let goals = goal_events(&events);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].from_player_ref, "Player10");
    }

    #[test]
    fn goal_marker_is_case_sensitive() {
        let event = MatchEvent {
            start_time_seconds: 10.0,
            event_type: "SHOT".to_string(),
            subtype: "on target-goal".to_string(),
            from_player_ref: "Player1".to_string(),
            to_player_ref: String::new(),
            team: "Home".to_string(),
        };
        assert!(!event.is_goal());
    }

    #[test]
    fn minute_is_floored() {
        assert_eq!(match_minute(125.4), 2);
        assert_eq!(match_minute(59.99), 0);
        assert_eq!(match_minute(60.0), 1);
    }

    #[test]
    fn bad_timestamp_reports_row() {
        let raw = "Team,Type,Subtype,Start Time [s],From,To\nHome,PASS,,abc,Player1,Player2\n";
        let err = parse_events_csv(raw.as_bytes()).expect_err("bad time");
        assert!(format!("{err:#}").contains("row 2"));
    }
}
