use std::env;
use std::path::PathBuf;

use crate::payload::TeamLabels;
use crate::tracking::METRICA_FRAME_RATE;

pub const DEFAULT_OUTPUT_PATH: &str = "src/data/realEvents.json";
pub const DEFAULT_PAYLOADS_PATH: &str = "gemini_payloads.json";
pub const DEFAULT_SYNTHETIC_SEED: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Metrica {
        events: String,
        tracking_home: Option<String>,
        tracking_away: Option<String>,
    },
    Synthetic {
        seed: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeEndpoint {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input: InputSource,
    pub frame_rate: f64,
    pub output_path: PathBuf,
    pub payloads_path: PathBuf,
    pub player_names_path: Option<PathBuf>,
    pub teams: TeamLabels,
    pub endpoint: Option<NarrativeEndpoint>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let input = match get("GOAL_EVENTS_CSV") {
            Some(events) => InputSource::Metrica {
                events,
                tracking_home: get("GOAL_TRACKING_HOME_CSV"),
                tracking_away: get("GOAL_TRACKING_AWAY_CSV"),
            },
            None => InputSource::Synthetic {
                seed: get("GOAL_SYNTHETIC_SEED")
                    .and_then(|val| val.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_SYNTHETIC_SEED),
            },
        };

        let frame_rate = get("GOAL_FRAME_RATE")
            .and_then(|val| val.trim().parse::<f64>().ok())
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(METRICA_FRAME_RATE);

        let defaults = TeamLabels::default();
        let teams = TeamLabels {
            home: get("GOAL_HOME_TEAM").unwrap_or(defaults.home),
            away: get("GOAL_AWAY_TEAM").unwrap_or(defaults.away),
        };

        let endpoint = match (get("GEMINI_API_KEY"), get("GEMINI_ENDPOINT")) {
            (Some(api_key), Some(url)) => Some(NarrativeEndpoint { url, api_key }),
            _ => None,
        };

        Self {
            input,
            frame_rate,
            output_path: PathBuf::from(
                get("GOAL_OUTPUT_PATH").unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            ),
            payloads_path: PathBuf::from(
                get("GOAL_PAYLOADS_PATH").unwrap_or_else(|| DEFAULT_PAYLOADS_PATH.to_string()),
            ),
            player_names_path: get("GOAL_PLAYER_NAMES").map(PathBuf::from),
            teams,
            endpoint,
        }
    }

    /// Applies `--flag=value` / `--flag value` overrides on top of the environment.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(seed) = flag_value(args, "--synthetic") {
            self.input = InputSource::Synthetic {
                seed: seed.parse::<u64>().unwrap_or(DEFAULT_SYNTHETIC_SEED),
            };
        } else if args.iter().any(|arg| arg == "--synthetic") {
            self.input = InputSource::Synthetic {
                seed: DEFAULT_SYNTHETIC_SEED,
            };
        }

        let events = flag_value(args, "--events");
        let home = flag_value(args, "--tracking-home");
        let away = flag_value(args, "--tracking-away");
        if events.is_some() || home.is_some() || away.is_some() {
            let (prev_events, prev_home, prev_away) = match &self.input {
                InputSource::Metrica {
                    events,
                    tracking_home,
                    tracking_away,
                } => (Some(events.clone()), tracking_home.clone(), tracking_away.clone()),
                InputSource::Synthetic { .. } => (None, None, None),
            };
            if let Some(events) = events.or(prev_events) {
                self.input = InputSource::Metrica {
                    events,
                    tracking_home: home.or(prev_home),
                    tracking_away: away.or(prev_away),
                };
            }
        }

        if let Some(out) = flag_value(args, "--out") {
            self.output_path = PathBuf::from(out);
        }
        if let Some(names) = flag_value(args, "--names") {
            self.player_names_path = Some(PathBuf::from(names));
        }
        if let Some(rate) = flag_value(args, "--frame-rate")
            .and_then(|val| val.parse::<f64>().ok())
            .filter(|rate| rate.is_finite() && *rate > 0.0)
        {
            self.frame_rate = rate;
        }
        self
    }
}

pub fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.starts_with("--")
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_environment_runs_synthetic_locally() {
        let cfg = config(&[]);
        assert_eq!(cfg.input, InputSource::Synthetic { seed: DEFAULT_SYNTHETIC_SEED });
        assert_eq!(cfg.frame_rate, 25.0);
        assert_eq!(cfg.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(cfg.teams, TeamLabels::default());
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn endpoint_requires_both_key_and_url() {
        assert!(config(&[("GEMINI_API_KEY", "k")]).endpoint.is_none());
        assert!(config(&[("GEMINI_ENDPOINT", "https://x"), ("GEMINI_API_KEY", " ")]).endpoint.is_none());
        let cfg = config(&[("GEMINI_API_KEY", "k"), ("GEMINI_ENDPOINT", "https://x")]);
        assert_eq!(
            cfg.endpoint,
            Some(NarrativeEndpoint {
                url: "https://x".to_string(),
                api_key: "k".to_string()
            })
        );
    }

    #[test]
    fn invalid_frame_rate_keeps_default() {
        assert_eq!(config(&[("GOAL_FRAME_RATE", "0")]).frame_rate, 25.0);
        assert_eq!(config(&[("GOAL_FRAME_RATE", "abc")]).frame_rate, 25.0);
        assert_eq!(config(&[("GOAL_FRAME_RATE", "10")]).frame_rate, 10.0);
    }

    #[test]
    fn args_override_environment() {
        let cfg = config(&[("GOAL_EVENTS_CSV", "env.csv"), ("GOAL_TRACKING_HOME_CSV", "h.csv")])
            .with_args(&args(&["--tracking-away", "a.csv", "--out=out.json"]));
        assert_eq!(
            cfg.input,
            InputSource::Metrica {
                events: "env.csv".to_string(),
                tracking_home: Some("h.csv".to_string()),
                tracking_away: Some("a.csv".to_string()),
            }
        );
        assert_eq!(cfg.output_path, PathBuf::from("out.json"));

        let synthetic = config(&[("GOAL_EVENTS_CSV", "env.csv")]).with_args(&args(&["--synthetic=7"]));
        assert_eq!(synthetic.input, InputSource::Synthetic { seed: 7 });
    }

    #[test]
    fn flag_without_value_is_ignored() {
        assert_eq!(flag_value(&args(&["--out", "--events=x"]), "--out"), None);
        assert_eq!(flag_value(&args(&["--events=x"]), "--events").as_deref(), Some("x"));
    }
}
