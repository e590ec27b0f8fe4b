use std::env;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use goal_context::config::{AppConfig, InputSource};
use goal_context::dispatch::{DispatchOutcome, Dispatcher};
use goal_context::events::{self, MatchEvent};
use goal_context::names::PlayerNames;
use goal_context::payload;
use goal_context::persist;
use goal_context::prompt::goal_prompt;
use goal_context::synthetic::{self, SyntheticConfig};
use goal_context::tracking::{self, TrackingDataset};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let config = AppConfig::from_env().with_args(&args);

    let names = match config.player_names_path.as_deref() {
        Some(path) => PlayerNames::load_json(path)?,
        None => PlayerNames::metrica_sample(),
    };

    let (events, tracking) = load_inputs(&config)?;

    info!("syncing events with tracking and building goal context");
    let payloads = payload::assemble(&events, tracking.as_ref(), &names, &config.teams);
    for goal in &payloads {
        info!(
            "goal {} ({}', {}): {}",
            goal.id, goal.time_min, goal.primary_player, goal.motion_context
        );
    }

    persist::write_payloads(&config.output_path, &payloads)
        .with_context(|| format!("save {}", config.output_path.display()))?;
    info!(
        "saved {} goals to {}",
        payloads.len(),
        config.output_path.display()
    );

    let dispatcher = Dispatcher::from_config(&config);
    let failed = payloads
        .iter()
        .map(|goal| dispatcher.dispatch(goal.id, &goal_prompt(goal)))
        .filter(|outcome| *outcome == DispatchOutcome::Failed)
        .count();
    if failed > 0 {
        warn!("{failed} of {} prompts were not delivered", payloads.len());
    }

    Ok(())
}

fn load_inputs(config: &AppConfig) -> Result<(Vec<MatchEvent>, Option<TrackingDataset>)> {
    match &config.input {
        InputSource::Synthetic { seed } => {
            info!("generating synthetic match (seed {seed})");
            let generated = synthetic::generate(&SyntheticConfig {
                seed: *seed,
                frame_rate: config.frame_rate,
                ..SyntheticConfig::default()
            });
            Ok((generated.events, Some(generated.tracking)))
        }
        InputSource::Metrica {
            events,
            tracking_home,
            tracking_away,
        } => {
            let tracking = match (tracking_home, tracking_away) {
                (Some(home), Some(away)) => Some(tracking::load_metrica_pair(
                    home,
                    away,
                    config.frame_rate,
                )?),
                _ => {
                    warn!("no tracking sources configured; goals will carry no motion context");
                    None
                }
            };
            let events = events::load_events(events)?;
            Ok((events, tracking))
        }
    }
}
