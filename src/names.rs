use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const METRICA_SAMPLE_NAMES: [(&str, &str); 26] = [
    ("Player1", "M. Ter Stegen"),
    ("Player2", "N. Semedo"),
    ("Player3", "G. Pique"),
    ("Player4", "I. Rakitic"),
    ("Player5", "S. Busquets"),
    ("Player6", "D. Suarez"),
    ("Player7", "L. Suarez"),
    ("Player8", "A. Iniesta"),
    ("Player9", "L. Suarez"),
    ("Player10", "L. Messi"),
    ("Player11", "O. Dembele"),
    ("Player12", "Rafinha"),
    ("Player13", "J. Cillessen"),
    ("Player14", "P. Coutinho"),
    ("Player15", "K. Navas"),
    ("Player16", "D. Carvajal"),
    ("Player17", "S. Ramos"),
    ("Player18", "R. Varane"),
    ("Player19", "L. Modric"),
    ("Player20", "G. Bale"),
    ("Player21", "Marcelo"),
    ("Player22", "Casemiro"),
    ("Player23", "T. Kroos"),
    ("Player24", "C. Ronaldo"),
    ("Player25", "K. Benzema"),
    ("Player26", "Isco"),
];

/// Raw event identifier -> display name. Built once, read everywhere.
#[derive(Debug, Clone, Default)]
pub struct PlayerNames {
    by_ref: HashMap<String, String>,
}

impl PlayerNames {
    pub fn metrica_sample() -> Self {
        Self::from_pairs(METRICA_SAMPLE_NAMES)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            by_ref: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads a JSON object of `{"Player10": "L. Messi", ...}`.
    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read player names {}", path.display()))?;
        let by_ref: HashMap<String, String> =
            serde_json::from_str(&raw).context("parse player names json")?;
        Ok(Self { by_ref })
    }

    pub fn display<'a>(&'a self, raw: &'a str) -> &'a str {
        self.by_ref.get(raw).map(String::as_str).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.by_ref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerNames;

    #[test]
    fn unknown_refs_fall_back_to_raw() {
        let names = PlayerNames::metrica_sample();
        assert_eq!(names.display("Player10"), "L. Messi");
        assert_eq!(names.display("Player99"), "Player99");
        assert_eq!(names.display(""), "");
    }

    #[test]
    fn loads_json_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("names.json");
        std::fs::write(&path, r#"{"Player7": "Winger"}"#).expect("write");
        let names = PlayerNames::load_json(&path).expect("load");
        assert_eq!(names.len(), 1);
        assert_eq!(names.display("Player7"), "Winger");
    }
}
