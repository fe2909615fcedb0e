#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use kabelplan::{
    build_plan,
    config::{export_config_json, load_config_from_file, DayConfig},
    io,
    model::Team,
    storage::{MemoryPlanStore, PlanStore},
    IcsExporter, TeamMode,
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition des visites terrain sur deux équipes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration de la journée
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

/// Surcharges de la configuration (prioritaires sur le fichier)
#[derive(Args, Debug, Default)]
struct DayArgs {
    /// Jour planifié (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Début de journée (HH:MM)
    #[arg(long, value_parser = parse_time)]
    start: Option<NaiveTime>,
    /// Fin de journée (HH:MM)
    #[arg(long, value_parser = parse_time)]
    end: Option<NaiveTime>,
    #[arg(long)]
    slot_minutes: Option<u32>,
    /// Début de pause (HH:MM)
    #[arg(long, value_parser = parse_time)]
    lunch_start: Option<NaiveTime>,
    /// Durée de pause, 0 = pas de pause
    #[arg(long)]
    lunch_minutes: Option<u32>,
    /// Fuseau IANA des événements (ex. Europe/Berlin)
    #[arg(long)]
    timezone: Option<String>,
    /// forced_team1 | forced_team2 | auto | split
    #[arg(long)]
    mode: Option<TeamMode>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Afficher les créneaux de la journée
    Slots {
        #[command(flatten)]
        day: DayArgs,
    },

    /// Répartir les visites d'un CSV et exporter les calendriers
    Plan {
        /// CSV des visites (name, address, email, phone, nvt, team)
        #[arg(long)]
        records: PathBuf,
        /// Dossier de sortie (.ics par équipe, plan.json, assignments.csv)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        day: DayArgs,
    },

    /// Écrire une configuration par défaut
    InitConfig {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        day: DayArgs,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|err| format!("expected HH:MM: {err}"))
}

impl DayArgs {
    fn apply(self, mut config: DayConfig) -> Result<DayConfig> {
        if let Some(date) = self.date {
            config.date = date;
        }
        if let Some(start) = self.start {
            config.start_time = start;
        }
        if let Some(end) = self.end {
            config.end_time = end;
        }
        if let Some(minutes) = self.slot_minutes {
            config.slot_minutes = minutes;
        }
        if let Some(lunch) = self.lunch_start {
            config.lunch_start = Some(lunch);
        }
        if let Some(minutes) = self.lunch_minutes {
            config.lunch_minutes = minutes;
        }
        if let Some(zone) = self.timezone {
            config.timezone = zone;
        }
        if let Some(mode) = self.mode {
            config.team_mode = mode;
        }
        config.validate()?;
        Ok(config)
    }
}

fn base_config(path: Option<&PathBuf>) -> Result<DayConfig> {
    match path {
        Some(p) => load_config_from_file(p),
        None => Ok(DayConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let base = base_config(cli.config.as_ref())?;

    let code = match cli.cmd {
        Commands::Slots { day } => {
            let config = day.apply(base)?;
            let plan = config.slot_plan()?;
            for slot in &plan {
                println!(
                    "{} - {}",
                    slot.start.format("%H:%M"),
                    slot.end(plan.duration()).format("%H:%M")
                );
            }
            0
        }
        Commands::Plan {
            records,
            out_dir,
            day,
        } => {
            let config = day.apply(base)?;
            let zone = config.zone()?;
            let report = io::import_records_csv(&records)
                .with_context(|| format!("importing {}", records.display()))?;
            if report.duplicates > 0 {
                eprintln!("Skipped {} duplicate record(s)", report.duplicates);
            }
            if report.incomplete > 0 {
                eprintln!(
                    "Skipped {} record(s) without name or location",
                    report.incomplete
                );
            }

            let store = MemoryPlanStore::new();
            let plan = build_plan(&report.records, &config.slot_plan()?, config.team_mode)?;
            let id = store.put(plan);
            let plan = store.get(&id)?;

            for team in [Team::Team1, Team::Team2] {
                println!("== {team}");
                for a in plan.team(team) {
                    println!(
                        "{} | {} | {}",
                        a.slot.start.format("%H:%M"),
                        a.record.location_id,
                        a.record.name
                    );
                }
            }

            if let Some(dir) = out_dir {
                let exporter = IcsExporter::new(zone);
                for path in io::write_team_calendars(&dir, &plan, &exporter)? {
                    println!("wrote {}", path.display());
                }
                io::export_plan_json(dir.join("plan.json"), &plan)?;
                io::export_assignments_csv(dir.join("assignments.csv"), &plan)?;
            }

            let summary = plan.summary();
            println!(
                "plan {id}: team1={} team2={} unplaced={}",
                summary.team1, summary.team2, summary.unplaced
            );
            if summary.unplaced > 0 {
                eprintln!(
                    "Warning: {} of {} record(s) could not be scheduled",
                    summary.unplaced,
                    report.records.len()
                );
                for r in &plan.unplaced {
                    eprintln!("  - {} ({})", r.name, r.location_id);
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                0
            }
        }
        Commands::InitConfig { out, day } => {
            let config = day.apply(base)?;
            export_config_json(&out, &config)?;
            println!("wrote {}", out.display());
            0
        }
    };

    std::process::exit(code);
}
