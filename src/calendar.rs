//! Export iCalendar (RFC 5545) des affectations d'une équipe.
//!
//! - Une VEVENT par affectation, dans l'ordre reçu.
//! - Heures locales avec `TZID=` sur chaque propriété date, sans conversion UTC.
//! - Un bloc VTIMEZONE pour ce TZID, changements d'heure de l'année du plan.
//! - Lignes CRLF, repliées à 75 octets.

use crate::model::Assignment;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

pub const DEFAULT_ZONE: Tz = chrono_tz::Europe::Berlin;

const PRODID: &str = "-//kabelplan//slot allocation//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Sérialiseur paramétré par le fuseau civil du plan.
#[derive(Debug, Clone, Copy)]
pub struct IcsExporter {
    zone: Tz,
}

impl Default for IcsExporter {
    fn default() -> Self {
        Self { zone: DEFAULT_ZONE }
    }
}

impl IcsExporter {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn export(&self, assignments: &[Assignment], duration: Duration) -> Vec<u8> {
        self.export_at(assignments, duration, Utc::now())
    }

    /// Comme [`IcsExporter::export`] avec une horloge fixée (DTSTAMP).
    pub fn export_at(
        &self,
        assignments: &[Assignment],
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Vec<u8> {
        let stamp = now.with_timezone(&self.zone).naive_local();
        let tzid = self.zone.name();
        let mut out = String::new();

        push_line(&mut out, "BEGIN:VCALENDAR");
        push_line(&mut out, "VERSION:2.0");
        push_line(&mut out, &format!("PRODID:{PRODID}"));
        push_line(&mut out, "CALSCALE:GREGORIAN");
        push_line(&mut out, "METHOD:PUBLISH");
        push_line(&mut out, &format!("X-WR-TIMEZONE:{tzid}"));

        let year = assignments
            .first()
            .map_or(stamp.year(), |a| a.slot.start.year());
        push_timezone(&mut out, self.zone, year);

        for assignment in assignments {
            let record = &assignment.record;
            let start = assignment.slot.start;
            let end = assignment.slot.end(duration);
            let summary = format!("{} ({})", record.name, record.location_id);
            let description = format!(
                "Address: {}\nEmail: {}\nPhone: {}",
                record.address, record.email, record.phone
            );

            push_line(&mut out, "BEGIN:VEVENT");
            push_line(&mut out, &format!("UID:{}@kabelplan", Uuid::new_v4()));
            push_line(&mut out, &format!("DTSTAMP;TZID={tzid}:{}", format_local(stamp)));
            push_line(&mut out, &format!("DTSTART;TZID={tzid}:{}", format_local(start)));
            push_line(&mut out, &format!("DTEND;TZID={tzid}:{}", format_local(end)));
            push_line(&mut out, &format!("SUMMARY:{}", escape_text(&summary)));
            push_line(&mut out, &format!("DESCRIPTION:{}", escape_text(&description)));
            if !record.address.is_empty() {
                push_line(&mut out, &format!("LOCATION:{}", escape_text(&record.address)));
            }
            push_line(&mut out, &format!("CATEGORIES:{}", assignment.team));
            push_line(&mut out, "END:VEVENT");
        }

        push_line(&mut out, "END:VCALENDAR");
        out.into_bytes()
    }
}

/// Raccourci : export avec un fuseau donné et l'heure courante.
pub fn export_ics(assignments: &[Assignment], duration: Duration, zone: Tz) -> Vec<u8> {
    IcsExporter::new(zone).export(assignments, duration)
}

/// Changement d'heure : instant UTC, décalages avant/après (secondes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    at: NaiveDateTime,
    from: i32,
    to: i32,
}

fn utc_offset(zone: Tz, utc: NaiveDateTime) -> i32 {
    zone.offset_from_utc_datetime(&utc).fix().local_minus_utc()
}

/// Changements d'heure de l'année précédente et de `year`, à la minute près.
fn transitions(zone: Tz, year: i32) -> Vec<Transition> {
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year - 1, 1, 1),
        NaiveDate::from_ymd_opt(year + 1, 1, 1),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut day = first.and_time(chrono::NaiveTime::MIN);
    let end = last.and_time(chrono::NaiveTime::MIN);
    while day < end {
        let next = day + Duration::days(1);
        let (from, to) = (utc_offset(zone, day), utc_offset(zone, next));
        if from != to {
            // premier instant de la journée où le nouveau décalage s'applique
            let (mut lo, mut hi) = (0i64, 24 * 60);
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if utc_offset(zone, day + Duration::minutes(mid)) == from {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            out.push(Transition {
                at: day + Duration::minutes(hi),
                from,
                to,
            });
        }
        day = next;
    }
    out
}

/// Bloc VTIMEZONE minimal pour `zone`, valable pour l'année `year`.
fn push_timezone(out: &mut String, zone: Tz, year: i32) {
    push_line(out, "BEGIN:VTIMEZONE");
    push_line(out, &format!("TZID:{}", zone.name()));

    let changes = transitions(zone, year);
    if changes.is_empty() {
        let offset = NaiveDate::from_ymd_opt(year, 1, 1)
            .map_or(0, |d| utc_offset(zone, d.and_time(chrono::NaiveTime::MIN)));
        push_line(out, "BEGIN:STANDARD");
        push_line(out, "DTSTART:19700101T000000");
        push_line(out, &format!("TZOFFSETFROM:{}", format_offset(offset)));
        push_line(out, &format!("TZOFFSETTO:{}", format_offset(offset)));
        push_line(out, "END:STANDARD");
    } else {
        for change in changes {
            let kind = if change.to > change.from { "DAYLIGHT" } else { "STANDARD" };
            // DTSTART exprimé dans l'heure locale d'avant le changement
            let local = change.at + Duration::seconds(i64::from(change.from));
            push_line(out, &format!("BEGIN:{kind}"));
            push_line(out, &format!("DTSTART:{}", format_local(local)));
            push_line(out, &format!("TZOFFSETFROM:{}", format_offset(change.from)));
            push_line(out, &format!("TZOFFSETTO:{}", format_offset(change.to)));
            push_line(out, &format!("END:{kind}"));
        }
    }

    push_line(out, "END:VTIMEZONE");
}

fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!("{sign}{:02}{:02}", abs / 3600, (abs % 3600) / 60)
}

fn format_local(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%S").to_string()
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Ajoute une ligne logique, repliée sans couper un caractère UTF-8.
fn push_line(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0usize;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            used = 0;
            // l'espace de continuation compte dans la ligne suivante
            budget = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}
