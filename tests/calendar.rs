#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use kabelplan::{
    allocate, export_ics, generate_slots, Assignment, IcsExporter, Slot, Team, TeamMode,
    WorkRecord,
};
use std::collections::HashSet;

fn at(h: u32, m: u32) -> Slot {
    Slot::new(
        NaiveDate::from_ymd_opt(2025, 3, 12)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap(),
    )
}

fn unfold(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.ends_with("\r\n"));
    text.replace("\r\n ", "")
        .split("\r\n")
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn single_assignment_produces_one_event() {
    let record = WorkRecord::new("Anna Schmidt", "NVT-12")
        .with_contact("Hauptstr. 1, 10115 Berlin", "anna@example.org", "+49 171 000");
    let assignments = vec![Assignment {
        slot: at(8, 0),
        record,
        team: Team::Team1,
    }];
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let bytes = IcsExporter::new(chrono_tz::Europe::Berlin).export_at(
        &assignments,
        Duration::minutes(45),
        now,
    );
    let lines = unfold(&bytes);

    assert_eq!(lines.first().map(String::as_str), Some("BEGIN:VCALENDAR"));
    assert_eq!(lines.last().map(String::as_str), Some("END:VCALENDAR"));
    assert_eq!(lines.iter().filter(|l| *l == "BEGIN:VEVENT").count(), 1);
    assert!(lines.contains(&"DTSTART;TZID=Europe/Berlin:20250312T080000".to_string()));
    assert!(lines.contains(&"DTEND;TZID=Europe/Berlin:20250312T084500".to_string()));
    // 09:00 UTC = 10:00 à Berlin (CET)
    assert!(lines.contains(&"DTSTAMP;TZID=Europe/Berlin:20250310T100000".to_string()));
    assert!(lines.contains(&"SUMMARY:Anna Schmidt (NVT-12)".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("DESCRIPTION:")
        && l.contains("Hauptstr. 1\\, 10115 Berlin")
        && l.contains("anna@example.org")
        && l.contains("+49 171 000")));
    assert!(lines.iter().any(|l| l.starts_with("UID:")));
}

#[test]
fn zone_definition_precedes_events() {
    let assignments = vec![Assignment {
        slot: at(8, 0),
        record: WorkRecord::new("Anna", "NVT-1"),
        team: Team::Team2,
    }];
    let lines = unfold(&export_ics(&assignments, Duration::minutes(45), chrono_tz::Europe::Berlin));

    let pos = |needle: &str| lines.iter().position(|l| l == needle).unwrap();
    assert!(pos("BEGIN:VTIMEZONE") < pos("END:VTIMEZONE"));
    assert!(pos("END:VTIMEZONE") < pos("BEGIN:VEVENT"));
    assert!(lines.contains(&"TZID:Europe/Berlin".to_string()));
    // passage à l'heure d'été 2025 : 02:00 locale, +0100 -> +0200
    let spring = pos("DTSTART:20250330T020000");
    assert_eq!(lines[spring - 1], "BEGIN:DAYLIGHT");
    assert_eq!(lines[spring + 1], "TZOFFSETFROM:+0100");
    assert_eq!(lines[spring + 2], "TZOFFSETTO:+0200");
    assert!(lines.contains(&"BEGIN:STANDARD".to_string()));
    assert!(lines.contains(&"TZOFFSETTO:+0100".to_string()));
}

#[test]
fn events_follow_input_order_with_distinct_uids() {
    let slots = generate_slots(
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        30,
        None,
    )
    .unwrap();
    let records: Vec<_> = (0..6)
        .map(|i| WorkRecord::new(format!("Kunde {i}"), "NVT-1"))
        .collect();
    let out = allocate(&records, &slots, TeamMode::ForcedTeam1);
    let lines = unfold(&export_ics(&out.team1, Duration::minutes(30), chrono_tz::Europe::Berlin));

    let starts: Vec<_> = lines
        .iter()
        .filter(|l| l.starts_with("DTSTART;TZID="))
        .collect();
    assert_eq!(starts.len(), 6);
    assert!(starts[0].ends_with("T080000"));
    assert!(starts[5].ends_with("T103000"));

    let uids: HashSet<_> = lines.iter().filter(|l| l.starts_with("UID:")).collect();
    assert_eq!(uids.len(), 6);
}

#[test]
fn empty_team_still_yields_a_calendar() {
    let lines = unfold(&export_ics(&[], Duration::minutes(45), chrono_tz::Europe::Berlin));
    assert_eq!(lines.first().map(String::as_str), Some("BEGIN:VCALENDAR"));
    assert!(lines.contains(&"BEGIN:VTIMEZONE".to_string()));
    assert!(!lines.iter().any(|l| l == "BEGIN:VEVENT"));
}
