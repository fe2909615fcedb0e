use crate::model::{Assignment, Team, WorkRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mode de répartition entre les deux équipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamMode {
    ForcedTeam1,
    ForcedTeam2,
    #[default]
    Auto,
    Split,
}

impl TeamMode {
    pub const ALL: [TeamMode; 4] = [
        TeamMode::ForcedTeam1,
        TeamMode::ForcedTeam2,
        TeamMode::Auto,
        TeamMode::Split,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TeamMode::ForcedTeam1 => "forced_team1",
            TeamMode::ForcedTeam2 => "forced_team2",
            TeamMode::Auto => "auto",
            TeamMode::Split => "split",
        }
    }
}

impl fmt::Display for TeamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown team mode: {0} (expected forced_team1, forced_team2, auto or split)")]
pub struct UnknownTeamMode(pub String);

impl FromStr for TeamMode {
    type Err = UnknownTeamMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "forced_team1" | "team1" => Ok(TeamMode::ForcedTeam1),
            "forced_team2" | "team2" => Ok(TeamMode::ForcedTeam2),
            "auto" => Ok(TeamMode::Auto),
            "split" => Ok(TeamMode::Split),
            _ => Err(UnknownTeamMode(s.to_string())),
        }
    }
}

/// Sortie de l'allocateur : deux listes triées et les visites non placées.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    pub team1: Vec<Assignment>,
    pub team2: Vec<Assignment>,
    pub unplaced: Vec<WorkRecord>,
}

impl Allocation {
    pub fn team(&self, team: Team) -> &[Assignment] {
        match team {
            Team::Team1 => &self.team1,
            Team::Team2 => &self.team2,
        }
    }

    pub(super) fn push(&mut self, assignment: Assignment) {
        match assignment.team {
            Team::Team1 => self.team1.push(assignment),
            Team::Team2 => self.team2.push(assignment),
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.team1.len() + self.team2.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}
