use crate::allocator::TeamMode;
use crate::calendar::DEFAULT_ZONE;
use crate::slots::{LunchBreak, SlotError, SlotPlan};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Paramètres d'une journée de planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_minutes: u32,
    #[serde(default)]
    pub lunch_start: Option<NaiveTime>,
    #[serde(default)]
    pub lunch_minutes: u32,
    /// Nom IANA du fuseau des événements exportés.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub team_mode: TeamMode,
}

fn default_timezone() -> String {
    DEFAULT_ZONE.name().to_string()
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            date: Utc::now().with_timezone(&DEFAULT_ZONE).date_naive(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
            slot_minutes: 45,
            lunch_start: NaiveTime::from_hms_opt(12, 0, 0),
            lunch_minutes: 45,
            timezone: default_timezone(),
            team_mode: TeamMode::Auto,
        }
    }
}

impl DayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.slot_minutes == 0 {
            bail!("slot_minutes must be > 0");
        }
        if self.end_time <= self.start_time {
            bail!("end_time must be after start_time");
        }
        if self.lunch_minutes > 0 && self.lunch_start.is_none() {
            bail!("lunch_minutes set without lunch_start");
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("unknown time zone {}: {err}", self.timezone))
    }

    pub fn lunch(&self) -> Option<LunchBreak> {
        self.lunch_start.map(|start| LunchBreak {
            start,
            minutes: self.lunch_minutes,
        })
    }

    pub fn slot_plan(&self) -> Result<SlotPlan, SlotError> {
        SlotPlan::new(
            self.date,
            self.start_time,
            self.end_time,
            i64::from(self.slot_minutes),
            self.lunch(),
        )
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<DayConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: DayConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &DayConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
