use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use env_logger::Env;
use log::{info, warn};

use goal_context::config::{AppConfig, NarrativeEndpoint, flag_value};
use goal_context::dispatch::{response_text, send_prompt};
use goal_context::payload::GoalPayload;
use goal_context::persist;
use goal_context::prompt::{analysis_prompt, narrative_prompt, parse_analysis};

const DEFAULT_TONE: &str = "enthusiastic";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let config = AppConfig::from_env().with_args(&args);
    let input = flag_value(&args, "--input")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output_path.clone());
    let tone = flag_value(&args, "--tone").unwrap_or_else(|| DEFAULT_TONE.to_string());
    let focus = flag_value(&args, "--focus");

    let goals = persist::read_payloads(&input)?;
    info!("{} goals loaded from {}", goals.len(), input.display());

    for goal in &goals {
        let focus_player = focus.as_deref().unwrap_or(&goal.primary_player);
        let Some(endpoint) = config.endpoint.as_ref() else {
            println!("--- goal {} (no endpoint configured, stage-one prompt) ---", goal.id);
            println!("{}", stage_one_prompt(goal));
            continue;
        };
        match two_stage(endpoint, goal, &tone, focus_player) {
            Ok(text) => {
                println!("--- goal {} ---", goal.id);
                println!("(AI Generated Two-Stage Commentary):\n\n{text}");
            }
            Err(err) => warn!("commentary for goal {} failed: {err:#}", goal.id),
        }
    }
    Ok(())
}

fn stage_one_prompt(goal: &GoalPayload) -> String {
    analysis_prompt(&goal.event_type, &goal.primary_player, &goal.motion_context)
}

fn two_stage(
    endpoint: &NarrativeEndpoint,
    goal: &GoalPayload,
    tone: &str,
    focus_player: &str,
) -> Result<String> {
    info!("goal {}: requesting analysis", goal.id);
    let analysis_body = send_prompt(endpoint, &stage_one_prompt(goal))?;
    let analysis_text = response_text(&analysis_body);
    if analysis_text.is_empty() {
        return Err(anyhow!("model returned no analysis text"));
    }
    let analysis = parse_analysis(&analysis_text)?;
    let analysis_json = serde_json::to_string(&analysis)?;

    info!("goal {}: requesting narrative", goal.id);
    let narrative = narrative_prompt(&analysis_json, tone, focus_player);
    let narrative_body = send_prompt(endpoint, &narrative)?;
    Ok(response_text(&narrative_body))
}
