use serde::{Deserialize, Serialize};

use crate::events::{MatchEvent, match_minute};
use crate::names::PlayerNames;

pub const BUILD_UP_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildUpEvent {
    pub time_s: f64,
    pub time_min: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub subtype: String,
    pub from: String,
    pub to: String,
    pub team: String,
}

impl BuildUpEvent {
    pub fn summarize(event: &MatchEvent, names: &PlayerNames) -> Self {
        Self {
            time_s: event.start_time_seconds,
            time_min: match_minute(event.start_time_seconds),
            event_type: event.event_type.clone(),
            subtype: event.subtype.clone(),
            from: names.display(&event.from_player_ref).to_string(),
            to: names.display(&event.to_player_ref).to_string(),
            team: event.team.clone(),
        }
    }
}

/// The last `size` events strictly before `target_s`, oldest first.
pub fn build_up_window(
    events: &[MatchEvent],
    target_s: f64,
    names: &PlayerNames,
    size: usize,
) -> Vec<BuildUpEvent> {
    let mut prior = events
        .iter()
        .filter(|event| event.start_time_seconds < target_s)
        .collect::<Vec<_>>();
    prior.sort_by(|a, b| a.start_time_seconds.total_cmp(&b.start_time_seconds));

    let skip = prior.len().saturating_sub(size);
    prior
        .into_iter()
        .skip(skip)
        .map(|event| BuildUpEvent::summarize(event, names))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(t: f64, from: &str, to: &str) -> MatchEvent {
        MatchEvent {
            start_time_seconds: t,
            event_type: "PASS".to_string(),
            subtype: String::new(),
            from_player_ref: from.to_string(),
            to_player_ref: to.to_string(),
            team: "Home".to_string(),
        }
    }

    #[test]
    fn keeps_all_when_fewer_than_window() {
        let events = vec![
            pass(30.0, "Player1", "Player2"),
            pass(10.0, "Player3", ""),
            pass(20.0, "Player2", "Player10"),
            pass(50.0, "Player10", ""),
        ];
        let names = PlayerNames::metrica_sample();
        let window = build_up_window(&events, 40.0, &names, BUILD_UP_WINDOW);
        let times = window.iter().map(|e| e.time_s).collect::<Vec<_>>();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
        assert_eq!(window[1].from, "N. Semedo");
        assert_eq!(window[1].to, "L. Messi");
        assert_eq!(window[0].to, "");
    }

    #[test]
    fn truncates_to_latest_ten_ascending() {
        let events = (0..15)
            .rev()
            .map(|i| pass(i as f64 * 4.0, "Player99", "Player98"))
            .collect::<Vec<_>>();
        let names = PlayerNames::default();
        let window = build_up_window(&events, 1_000.0, &names, BUILD_UP_WINDOW);
        assert_eq!(window.len(), 10);
        assert_eq!(window.first().map(|e| e.time_s), Some(20.0));
        assert_eq!(window.last().map(|e| e.time_s), Some(56.0));
        assert!(window.windows(2).all(|w| w[0].time_s <= w[1].time_s));
        assert_eq!(window[0].from, "Player99");
    }

    #[test]
    fn excludes_events_at_the_target_time() {
        let events = vec![pass(5.0, "a", "b"), pass(6.0, "c", "d")];
        let window = build_up_window(&events, 6.0, &PlayerNames::default(), BUILD_UP_WINDOW);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].time_s, 5.0);
    }

    #[test]
    fn serializes_type_field_name() {
        let summary = BuildUpEvent::summarize(&pass(125.0, "x", "y"), &PlayerNames::default());
        let json = serde_json::to_value(&summary).expect("json");
        assert_eq!(json["type"], "PASS");
        assert_eq!(json["time_min"], 2);
    }
}
