use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Préférence d'équipe portée par une visite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamPreference {
    #[default]
    None,
    Team1,
    Team2,
}

impl TeamPreference {
    /// Équipe demandée, si la visite en exprime une.
    pub fn team(self) -> Option<Team> {
        match self {
            TeamPreference::None => None,
            TeamPreference::Team1 => Some(Team::Team1),
            TeamPreference::Team2 => Some(Team::Team2),
        }
    }
}

/// L'une des deux équipes terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Team1,
    Team2,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Team::Team1 => Team::Team2,
            Team::Team2 => Team::Team1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Team1 => "team1",
            Team::Team2 => "team2",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visite à planifier (une ligne du fichier d'entrée, déjà dédoublonnée).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Identifiant du point de raccordement partagé (NVT).
    pub location_id: String,
    #[serde(default)]
    pub team_preference: TeamPreference,
}

impl WorkRecord {
    pub fn new<N: Into<String>, L: Into<String>>(name: N, location_id: L) -> Self {
        Self {
            name: name.into(),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
            location_id: location_id.into(),
            team_preference: TeamPreference::None,
        }
    }

    pub fn with_preference(mut self, preference: TeamPreference) -> Self {
        self.team_preference = preference;
        self
    }

    pub fn with_contact<A, E, P>(mut self, address: A, email: E, phone: P) -> Self
    where
        A: Into<String>,
        E: Into<String>,
        P: Into<String>,
    {
        self.address = address.into();
        self.email = email.into();
        self.phone = phone.into();
        self
    }
}

/// Créneau réservable : heure de début locale, durée commune au plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveDateTime,
}

impl Slot {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { start }
    }

    pub fn end(&self, duration: Duration) -> NaiveDateTime {
        self.start + duration
    }
}

/// Affectation d'une visite à un créneau d'une équipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub slot: Slot,
    pub record: WorkRecord,
    pub team: Team,
}

/// Identifiant opaque d'un plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Résultat complet d'une répartition pour une journée.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub date: NaiveDate,
    pub slot_minutes: u32,
    pub team1: Vec<Assignment>,
    pub team2: Vec<Assignment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<WorkRecord>,
}

/// Compteurs d'un plan, pour l'affichage et les logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub team1: usize,
    pub team2: usize,
    pub unplaced: usize,
}

impl PlanSummary {
    pub fn assigned(&self) -> usize {
        self.team1 + self.team2
    }
}

impl Plan {
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_minutes))
    }

    pub fn team(&self, team: Team) -> &[Assignment] {
        match team {
            Team::Team1 => &self.team1,
            Team::Team2 => &self.team2,
        }
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            team1: self.team1.len(),
            team2: self.team2.len(),
            unplaced: self.unplaced.len(),
        }
    }
}
