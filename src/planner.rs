use crate::allocator::{Allocator, TeamMode};
use crate::model::{Plan, PlanId, WorkRecord};
use crate::slots::{SlotError, SlotPlan};
use tracing::info;

/// Enchaîne génération des créneaux et répartition pour une journée.
pub fn build_plan(
    records: &[WorkRecord],
    slots: &SlotPlan,
    mode: TeamMode,
) -> Result<Plan, SlotError> {
    let generated = slots.slots();
    let minutes = u32::try_from(slots.duration().num_minutes())
        .map_err(|_| SlotError::InvalidDuration(slots.duration().num_minutes()))?;
    info!(
        date = %slots.day(),
        slots = generated.len(),
        records = records.len(),
        "building plan"
    );

    let allocation = Allocator::new(mode).allocate(records, &generated);
    Ok(Plan {
        id: PlanId::random(),
        date: slots.day(),
        slot_minutes: minutes,
        team1: allocation.team1,
        team2: allocation.team2,
        unplaced: allocation.unplaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn plan_carries_day_and_duration() {
        let slots = SlotPlan::new(
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            30,
            None,
        )
        .unwrap();
        let records: Vec<_> = (0..5)
            .map(|i| WorkRecord::new(format!("r{i}"), "L1"))
            .collect();
        let plan = build_plan(&records, &slots, TeamMode::Auto).unwrap();
        assert_eq!(plan.slot_minutes, 30);
        assert_eq!(plan.summary().assigned(), 4);
        assert_eq!(plan.summary().unplaced, 1);
    }
}
