use crate::calendar::IcsExporter;
use crate::model::{Plan, Team, TeamPreference, WorkRecord};
use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Résultat d'un import : visites retenues, doublons et lignes incomplètes écartés.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub records: Vec<WorkRecord>,
    pub duplicates: usize,
    pub incomplete: usize,
}

/// Import de visites depuis CSV (`,` ou `;`).
/// Colonnes reconnues : `name`, `address|adresse`, `email|e_mail`,
/// `phone|telefon|tel`, `nvt|location_id|location`, `team|team_preference`.
pub fn import_records_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ImportReport> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    import_records_str(&data)
}

pub fn import_records_str(data: &str) -> anyhow::Result<ImportReport> {
    let header_line = data.lines().next().unwrap_or_default();
    let delimiter = if header_line.contains(';') && !header_line.contains(',') {
        b';'
    } else {
        b','
    };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(data.as_bytes());

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut seen_emails = HashSet::new();
    let mut seen_phones = HashSet::new();
    let mut report = ImportReport::default();

    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let name = columns.get(&rec, columns.name);
        let location_id = columns.get(&rec, columns.location);
        if name.is_empty() || location_id.is_empty() {
            warn!(row = line + 1, "record without name or location skipped");
            report.incomplete += 1;
            continue;
        }
        let record = WorkRecord {
            name: name.to_string(),
            address: columns.get(&rec, columns.address).to_string(),
            email: columns.get(&rec, columns.email).to_string(),
            phone: columns.get(&rec, columns.phone).to_string(),
            location_id: location_id.to_string(),
            team_preference: parse_preference(columns.get(&rec, columns.team)),
        };

        let email_key = record.email.to_lowercase();
        let phone_key: String = record.phone.chars().filter(char::is_ascii_digit).collect();
        let dup_email = !email_key.is_empty() && seen_emails.contains(&email_key);
        let dup_phone = !phone_key.is_empty() && seen_phones.contains(&phone_key);
        if dup_email || dup_phone {
            debug!(name = %record.name, "duplicate record skipped");
            report.duplicates += 1;
            continue;
        }
        if !email_key.is_empty() {
            seen_emails.insert(email_key);
        }
        if !phone_key.is_empty() {
            seen_phones.insert(phone_key);
        }
        report.records.push(record);
    }
    Ok(report)
}

struct Columns {
    name: usize,
    location: usize,
    address: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
    team: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> anyhow::Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| normalized.iter().position(|h| aliases.contains(&h.as_str()));

        Ok(Self {
            name: find(&["name", "kunde", "customer"]).context("missing name column")?,
            location: find(&["nvt", "location_id", "location", "locationid"])
                .context("missing location (nvt) column")?,
            address: find(&["address", "adresse", "anschrift"]),
            email: find(&["email", "e_mail", "mail"]),
            phone: find(&["phone", "telefon", "tel", "telefonnummer"]),
            team: find(&["team", "team_preference", "teampreference"]),
        })
    }

    fn get<'r, I: Into<Option<usize>>>(&self, rec: &'r StringRecord, idx: I) -> &'r str {
        idx.into().and_then(|i| rec.get(i)).unwrap_or("")
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(['-', ' '], "_")
}

fn parse_preference(raw: &str) -> TeamPreference {
    let norm = raw.trim().to_ascii_lowercase().replace(' ', "");
    match norm.as_str() {
        "" | "none" | "auto" | "-" => TeamPreference::None,
        "team1" | "1" | "t1" => TeamPreference::Team1,
        "team2" | "2" | "t2" => TeamPreference::Team2,
        _ => {
            warn!(value = raw, "unknown team preference, ignored");
            TeamPreference::None
        }
    }
}

/// Export JSON du plan, écrit de manière atomique.
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(plan)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

/// Export CSV: header `team,start,end,name,location_id,address,email,phone`.
/// Les visites non placées suivent avec `team = unplaced`.
pub fn export_assignments_csv<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "team", "start", "end", "name", "location_id", "address", "email", "phone",
    ])?;
    let duration = plan.slot_duration();
    for team in [Team::Team1, Team::Team2] {
        for a in plan.team(team) {
            let start = a.slot.start.format("%Y-%m-%dT%H:%M").to_string();
            let end = a.slot.end(duration).format("%Y-%m-%dT%H:%M").to_string();
            w.write_record([
                team.as_str(),
                start.as_str(),
                end.as_str(),
                a.record.name.as_str(),
                a.record.location_id.as_str(),
                a.record.address.as_str(),
                a.record.email.as_str(),
                a.record.phone.as_str(),
            ])?;
        }
    }
    for r in &plan.unplaced {
        w.write_record([
            "unplaced",
            "",
            "",
            r.name.as_str(),
            r.location_id.as_str(),
            r.address.as_str(),
            r.email.as_str(),
            r.phone.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Écrit `<date>_team1.ics` et `<date>_team2.ics` dans `dir`.
pub fn write_team_calendars<P: AsRef<Path>>(
    dir: P,
    plan: &Plan,
    exporter: &IcsExporter,
) -> anyhow::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();
    for team in [Team::Team1, Team::Team2] {
        let path = dir.join(format!("{}_{}.ics", plan.date, team));
        let bytes = exporter.export(plan.team(team), plan.slot_duration());
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_semicolon_export_is_understood() {
        let data = "Name;Adresse;E-Mail;Telefon;NVT;Team\n\
                    Anna;Hauptstr. 1;anna@x.de;0171 111;NVT-1;Team 2\n\
                    Bernd;Hauptstr. 3;;0171 222;NVT-1;\n";
        let report = import_records_str(data).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].team_preference, TeamPreference::Team2);
        assert_eq!(report.records[0].address, "Hauptstr. 1");
        assert_eq!(report.records[1].location_id, "NVT-1");
    }

    #[test]
    fn duplicates_by_email_or_phone_are_dropped() {
        let data = "name,email,phone,nvt\n\
                    A,a@x.de,+49 171 1,L1\n\
                    B,A@X.DE,,L1\n\
                    C,c@x.de,+49-171-1,L2\n\
                    D,d@x.de,,L2\n";
        let report = import_records_str(data).unwrap();
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
        assert_eq!(report.duplicates, 2);
    }

    #[test]
    fn rows_without_location_are_skipped_not_fatal() {
        let report = import_records_str("name,nvt\nA,L1\nB,\n,L3\nC,L2\n").unwrap();
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(report.incomplete, 2);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn missing_location_column_is_an_error() {
        assert!(import_records_str("name,email\nA,a@x.de\n").is_err());
    }

    #[test]
    fn unknown_preference_falls_back_to_none() {
        assert_eq!(parse_preference("blau"), TeamPreference::None);
        assert_eq!(parse_preference("T1"), TeamPreference::Team1);
    }
}
