use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::pitch::Point;
use crate::remote;

pub const METRICA_FRAME_RATE: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedPlayer {
    pub player_id: String,
    pub display_name: String,
    pub jersey_number: u32,
    pub team_id: String,
}

impl TrackedPlayer {
    pub fn new(team_id: &str, jersey_number: u32) -> Self {
        Self {
            player_id: format!("{team_id}_{jersey_number}"),
            display_name: format!("Player{jersey_number}"),
            jersey_number,
            team_id: team_id.to_string(),
        }
    }

    pub fn same_entity(&self, other: &TrackedPlayer) -> bool {
        self.player_id == other.player_id
    }
}

#[derive(Debug, Clone)]
pub struct FramePosition {
    pub player: Arc<TrackedPlayer>,
    pub point: Point,
}

#[derive(Debug, Clone, Default)]
pub struct TrackingFrame {
    pub frame_id: u64,
    pub positions: Vec<FramePosition>,
}

impl TrackingFrame {
    pub fn players(&self) -> impl Iterator<Item = &TrackedPlayer> {
        self.positions.iter().map(|pos| pos.player.as_ref())
    }

    pub fn position_of(&self, player: &TrackedPlayer) -> Option<Point> {
        self.positions
            .iter()
            .find(|pos| pos.player.same_entity(player))
            .map(|pos| pos.point)
    }
}

#[derive(Debug, Clone)]
pub struct TrackingDataset {
    pub frame_rate: f64,
    pub frames: Vec<TrackingFrame>,
}

impl TrackingDataset {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

struct SideTable {
    roster: Vec<(Arc<TrackedPlayer>, usize)>,
    rows: Vec<(u64, Vec<Option<Point>>)>,
}

/// Loads a Metrica raw tracking pair. Each source may be a path or an http(s) URL.
pub fn load_metrica_pair(home: &str, away: &str, frame_rate: f64) -> Result<TrackingDataset> {
    let home_raw = read_source(home).with_context(|| format!("read home tracking {home}"))?;
    let away_raw = read_source(away).with_context(|| format!("read away tracking {away}"))?;
    let dataset = parse_metrica_pair(&home_raw, &away_raw, frame_rate)?;
    info!(
        "tracking loaded: {} frames at {} Hz",
        dataset.frame_count(),
        dataset.frame_rate
    );
    Ok(dataset)
}

pub fn parse_metrica_pair(home_raw: &str, away_raw: &str, frame_rate: f64) -> Result<TrackingDataset> {
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return Err(anyhow!("invalid frame rate {frame_rate}"));
    }
    let home = parse_side(home_raw, "home").context("parse home tracking")?;
    let away = parse_side(away_raw, "away").context("parse away tracking")?;
    if home.rows.len() != away.rows.len() {
        warn!(
            "tracking sides differ in length (home={}, away={}); truncating",
            home.rows.len(),
            away.rows.len()
        );
    }

    let frames = home
        .rows
        .iter()
        .zip(away.rows.iter())
        .map(|((frame_id, home_points), (_, away_points))| {
            let mut positions = Vec::with_capacity(home.roster.len() + away.roster.len());
            push_positions(&mut positions, &home.roster, home_points);
            push_positions(&mut positions, &away.roster, away_points);
            TrackingFrame {
                frame_id: *frame_id,
                positions,
            }
        })
        .collect();

    Ok(TrackingDataset { frame_rate, frames })
}

fn push_positions(
    out: &mut Vec<FramePosition>,
    roster: &[(Arc<TrackedPlayer>, usize)],
    points: &[Option<Point>],
) {
    for ((player, _), point) in roster.iter().zip(points) {
        if let Some(point) = point {
            out.push(FramePosition {
                player: Arc::clone(player),
                point: *point,
            });
        }
    }
}

// Layout: two preamble rows (team, jersey), then `Period,Frame,Time [s],Player11,,...,Ball,`.
fn parse_side(raw: &str, team_id: &str) -> Result<SideTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let mut records = reader.records();

    for _ in 0..2 {
        records
            .next()
            .ok_or_else(|| anyhow!("missing preamble row"))?
            .context("read preamble row")?;
    }
    let header = records
        .next()
        .ok_or_else(|| anyhow!("missing header row"))?
        .context("read header row")?;

    let frame_col = header
        .iter()
        .position(|cell| cell.trim() == "Frame")
        .ok_or_else(|| anyhow!("header has no Frame column"))?;

    let mut roster = Vec::new();
    for (col, cell) in header.iter().enumerate() {
        let Some(number) = cell.trim().strip_prefix("Player") else {
            continue;
        };
        let Ok(jersey) = number.parse::<u32>() else {
            continue;
        };
        roster.push((Arc::new(TrackedPlayer::new(team_id, jersey)), col));
    }
    if roster.is_empty() {
        return Err(anyhow!("header lists no players"));
    }

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        let record = record.with_context(|| format!("read tracking row {}", idx + 4))?;
        let frame_id = record
            .get(frame_col)
            .and_then(|cell| cell.trim().parse::<u64>().ok())
            .unwrap_or(idx as u64 + 1);
        let points: Vec<Option<Point>> = roster
            .iter()
            .map(|(_, col)| {
                let x = parse_coord(record.get(*col))?;
                let y = parse_coord(record.get(col + 1))?;
                Some(Point::new(x, y))
            })
            .collect();
        rows.push((frame_id, points));
    }

    Ok(SideTable { roster, rows })
}

fn parse_coord(cell: Option<&str>) -> Option<f64> {
    let value = cell?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub(crate) fn read_source(source: &str) -> Result<String> {
    if remote::is_remote(source) {
        return remote::fetch_text_cached(source);
    }
    fs::read_to_string(source).with_context(|| format!("read {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "\
,,,Home,,Home,,
,,,11,,1,,
Period,Frame,Time [s],Player11,,Player1,,Ball,
1,1,0.04,0.50,0.40,0.10,0.50,0.45,0.39
1,2,0.08,0.51,0.41,NaN,NaN,0.46,0.40
";
    const AWAY: &str = "\
,,,Away,,
,,,25,,
Period,Frame,Time [s],Player25,,Ball,
1,1,0.04,0.60,0.45,0.45,0.39
1,2,0.08,0.61,0.46,0.46,0.40
";

    #[test]
    fn joins_sides_and_names_players() {
        let dataset = parse_metrica_pair(HOME, AWAY, METRICA_FRAME_RATE).expect("parse");
        assert_eq!(dataset.frame_count(), 2);

        let first = &dataset.frames[0];
        assert_eq!(first.frame_id, 1);
        let ids = first.players().map(|p| p.player_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["home_11", "home_1", "away_25"]);

        let keeper = first.players().nth(1).expect("keeper");
        assert_eq!(keeper.display_name, "Player1");
        assert_eq!(keeper.jersey_number, 1);
        assert_eq!(keeper.team_id, "home");
    }

    #[test]
    fn nan_cells_drop_the_player_from_the_frame() {
        let dataset = parse_metrica_pair(HOME, AWAY, METRICA_FRAME_RATE).expect("parse");
        let second = &dataset.frames[1];
        assert_eq!(second.positions.len(), 2);
        assert!(second.players().all(|p| p.player_id != "home_1"));
    }

    #[test]
    fn rejects_non_positive_frame_rate() {
        assert!(parse_metrica_pair(HOME, AWAY, 0.0).is_err());
    }
}
