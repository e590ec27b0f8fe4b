//! Maps the player reference recorded in event data onto a tracked player.
//!
//! Event feeds and tracking feeds rarely share an identifier scheme, so the
//! resolver walks a fixed list of strategies and stops at the first hit.

use crate::tracking::{TrackedPlayer, TrackingFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    PlayerId,
    DisplayName,
    JerseyNumber,
}

pub const RESOLVE_ORDER: [ResolveStrategy; 3] = [
    ResolveStrategy::PlayerId,
    ResolveStrategy::DisplayName,
    ResolveStrategy::JerseyNumber,
];

#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub player: &'a TrackedPlayer,
    pub strategy: ResolveStrategy,
}

impl ResolveStrategy {
    pub fn label(self) -> &'static str {
        match self {
            ResolveStrategy::PlayerId => "player_id",
            ResolveStrategy::DisplayName => "display_name",
            ResolveStrategy::JerseyNumber => "jersey_number",
        }
    }

    pub fn find<'a>(self, reference: &str, frame: &'a TrackingFrame) -> Option<&'a TrackedPlayer> {
        match self {
            ResolveStrategy::PlayerId => by_player_id(reference, frame),
            ResolveStrategy::DisplayName => by_display_name(reference, frame),
            ResolveStrategy::JerseyNumber => by_jersey_number(reference, frame),
        }
    }
}

pub fn resolve<'a>(reference: &str, frame: &'a TrackingFrame) -> Option<Resolution<'a>> {
    RESOLVE_ORDER.iter().find_map(|strategy| {
        strategy
            .find(reference, frame)
            .map(|player| Resolution {
                player,
                strategy: *strategy,
            })
    })
}

pub fn by_player_id<'a>(
    reference: &str,
    frame: &'a TrackingFrame,
) -> Option<&'a TrackedPlayer> {
    frame.players().find(|p| p.player_id == reference)
}

pub fn by_display_name<'a>(
    reference: &str,
    frame: &'a TrackingFrame,
) -> Option<&'a TrackedPlayer> {
    frame.players().find(|p| p.display_name == reference)
}

/// Duplicate jersey numbers resolve to the first player in frame order.
pub fn by_jersey_number<'a>(
    reference: &str,
    frame: &'a TrackingFrame,
) -> Option<&'a TrackedPlayer> {
    let digits = jersey_digits(reference)?;
    frame
        .players()
        .find(|p| p.jersey_number.to_string() == digits)
}

/// Every ASCII digit of the reference, in order ("Player10" -> "10").
pub fn jersey_digits(reference: &str) -> Option<String> {
    let digits = reference
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    (!digits.is_empty()).then_some(digits)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pitch::Point;
    use crate::tracking::FramePosition;

    fn player(id: &str, name: &str, jersey: u32, team: &str) -> TrackedPlayer {
        TrackedPlayer {
            player_id: id.to_string(),
            display_name: name.to_string(),
            jersey_number: jersey,
            team_id: team.to_string(),
        }
    }

    fn frame(players: Vec<TrackedPlayer>) -> TrackingFrame {
        TrackingFrame {
            frame_id: 1,
            positions: players
                .into_iter()
                .map(|p| FramePosition {
                    player: Arc::new(p),
                    point: Point::new(0.5, 0.5),
                })
                .collect(),
        }
    }

    #[test]
    fn exact_id_wins_first() {
        let f = frame(vec![
            player("x_10", "Player10", 7, "home"),
            player("Player10", "Someone", 3, "home"),
        ]);
        let hit = resolve("Player10", &f).expect("resolved");
        assert_eq!(hit.strategy, ResolveStrategy::PlayerId);
        assert_eq!(hit.player.player_id, "Player10");
    }

    #[test]
    fn display_name_is_second() {
        let f = frame(vec![player("home_10", "Player10", 10, "home")]);
        let hit = resolve("Player10", &f).expect("resolved");
        assert_eq!(hit.strategy, ResolveStrategy::DisplayName);
        assert_eq!(hit.player.player_id, "home_10");
    }

    #[test]
    fn jersey_fallback_uses_digits() {
        let f = frame(vec![
            player("a", "Alpha", 9, "home"),
            player("b", "Bravo", 10, "home"),
        ]);
        let hit = resolve("P10", &f).expect("resolved");
        assert_eq!(hit.strategy, ResolveStrategy::JerseyNumber);
        assert_eq!(hit.player.player_id, "b");
    }

    #[test]
    fn duplicate_jersey_takes_first_in_frame_order() {
        let f = frame(vec![
            player("home_5", "H5", 5, "home"),
            player("away_5", "A5", 5, "away"),
        ]);
        let hit = resolve("#5", &f).expect("resolved");
        assert_eq!(hit.player.player_id, "home_5");
    }

    #[test]
    fn no_digits_means_no_fallback() {
        let f = frame(vec![player("a", "Alpha", 1, "home")]);
        assert!(resolve("unknown", &f).is_none());
        assert!(resolve("", &f).is_none());
        assert_eq!(jersey_digits("unknown"), None);
    }

    #[test]
    fn leading_zero_does_not_match_rendered_jersey() {
        let f = frame(vec![player("a", "Alpha", 7, "home")]);
        assert!(resolve("Player07", &f).is_none());
    }
}
