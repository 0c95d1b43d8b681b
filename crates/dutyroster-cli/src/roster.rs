//! Roster input files
//!
//! A run is described by one TOML document carrying the scheduling
//! parameters and the soldier list. Unknown fields are rejected so a
//! typo in a parameter name fails loudly instead of silently falling
//! back to a default.
//!
//! ```toml
//! start_date = "2026-01-01"
//! end_date = "2026-01-14"
//! default_base_days_target = 7
//! default_home_days_target = 7
//! max_consecutive_base_days = 7
//! max_consecutive_home_days = 7
//! min_base_block_days = 3
//! min_required_soldiers_per_day = 3
//!
//! [[soldiers]]
//! id = "s-001"
//! name = "Adar"
//! unavailable_days = ["2026-01-05", "2026-01-06"]
//!
//! [[soldiers]]
//! id = "s-002"
//! weekend_only = true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use dutyroster_core::{RosterParameters, Soldier};

/// One soldier entry in a roster file
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoldierEntry {
    pub id: String,
    /// Display name; defaults to the id
    pub name: Option<String>,
    #[serde(default)]
    pub unavailable_days: Vec<NaiveDate>,
    #[serde(default)]
    pub exceptional_output: bool,
    #[serde(default)]
    pub weekend_only: bool,
}

/// A complete roster run description
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterFile {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub default_base_days_target: u32,
    pub default_home_days_target: u32,
    pub max_consecutive_base_days: u32,
    pub max_consecutive_home_days: u32,
    pub min_base_block_days: u32,
    pub min_required_soldiers_per_day: u32,
    #[serde(default)]
    pub soldiers: Vec<SoldierEntry>,
}

impl RosterFile {
    /// Parse a roster document from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid roster file")
    }

    /// Load a roster document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Scheduling parameters carried by this file
    pub fn parameters(&self) -> RosterParameters {
        RosterParameters::new(self.start_date, self.end_date)
            .targets(self.default_base_days_target, self.default_home_days_target)
            .consecutive_limits(self.max_consecutive_base_days, self.max_consecutive_home_days)
            .min_base_block(self.min_base_block_days)
            .min_required_per_day(self.min_required_soldiers_per_day)
    }

    /// Soldier list carried by this file
    pub fn soldiers(&self) -> Vec<Soldier> {
        self.soldiers
            .iter()
            .map(|entry| {
                let mut soldier = Soldier::new(&entry.id);
                if let Some(name) = &entry.name {
                    soldier = soldier.name(name);
                }
                for &date in &entry.unavailable_days {
                    soldier = soldier.unavailable_on(date);
                }
                if entry.exceptional_output {
                    soldier = soldier.exceptional_output();
                }
                if entry.weekend_only {
                    soldier = soldier.weekend_only();
                }
                soldier
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
start_date = "2026-01-01"
end_date = "2026-01-14"
default_base_days_target = 7
default_home_days_target = 7
max_consecutive_base_days = 7
max_consecutive_home_days = 7
min_base_block_days = 3
min_required_soldiers_per_day = 3

[[soldiers]]
id = "s-001"
name = "Adar"
unavailable_days = ["2026-01-05"]

[[soldiers]]
id = "s-002"
weekend_only = true
"#;

    #[test]
    fn parses_a_complete_roster_file() {
        let file = RosterFile::from_toml(SAMPLE).unwrap();
        let params = file.parameters();
        assert_eq!(params.n_days(), 14);
        assert_eq!(params.default_base_days_target, 7);
        assert_eq!(params.min_required_soldiers_per_day, 3);

        let soldiers = file.soldiers();
        assert_eq!(soldiers.len(), 2);
        assert_eq!(soldiers[0].name, "Adar");
        assert_eq!(soldiers[0].unavailable_days.len(), 1);
        // Name defaults to the id
        assert_eq!(soldiers[1].name, "s-002");
        assert!(soldiers[1].weekend_only);
    }

    #[test]
    fn rejects_unknown_fields() {
        let text = SAMPLE.replace("min_base_block_days", "min_block_days");
        let err = RosterFile::from_toml(&text);
        assert!(err.is_err(), "a typoed parameter name must not parse");
    }

    #[test]
    fn rejects_unknown_soldier_fields() {
        let text = format!("{SAMPLE}\n[[soldiers]]\nid = \"s-003\"\nrank = \"REGULAR\"\n");
        assert!(RosterFile::from_toml(&text).is_err());
    }

    #[test]
    fn soldiers_default_to_an_empty_list() {
        let text: String = SAMPLE
            .lines()
            .take_while(|line| !line.starts_with("[[soldiers]]"))
            .map(|line| format!("{line}\n"))
            .collect();
        let file = RosterFile::from_toml(&text).unwrap();
        assert!(file.soldiers().is_empty());
    }
}
