//! Répartition des visites sur deux équipes, regroupées par NVT.

mod decision;
mod grouping;
mod queue;
mod types;

pub use decision::{decide, TeamChoice};
pub use queue::SlotQueue;
pub use types::{Allocation, TeamMode, UnknownTeamMode};

use crate::model::{Assignment, Slot, Team, WorkRecord};
use tracing::{debug, info, warn};

/// Allocateur : deux files de créneaux indépendantes, une par équipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allocator {
    mode: TeamMode,
}

impl Allocator {
    pub fn new(mode: TeamMode) -> Self {
        Self { mode }
    }

    /// Chaque équipe reçoit sa propre copie de `slots`.
    pub fn allocate(&self, records: &[WorkRecord], slots: &[Slot]) -> Allocation {
        self.allocate_with_queues(
            records,
            SlotQueue::new(slots.iter().copied()),
            SlotQueue::new(slots.iter().copied()),
        )
    }

    /// Variante avec des capacités différentes par équipe.
    pub fn allocate_with_queues(
        &self,
        records: &[WorkRecord],
        mut team1: SlotQueue,
        mut team2: SlotQueue,
    ) -> Allocation {
        let capacity = team1.len() + team2.len();
        let mut out = Allocation::default();

        for group in grouping::group_by_location(records) {
            debug!(
                location_id = group.location_id,
                size = group.records.len(),
                "allocating location group"
            );
            for record in group.records {
                let preferred = decide(self.mode, record.team_preference)
                    .resolve(team1.len(), team2.len());
                let (first, second) = match preferred {
                    Team::Team1 => (&mut team1, &mut team2),
                    Team::Team2 => (&mut team2, &mut team1),
                };

                let placed = match first.pop() {
                    Some(slot) => Some((slot, preferred)),
                    None => second.pop().map(|slot| (slot, preferred.other())),
                };

                match placed {
                    Some((slot, team)) => out.push(Assignment {
                        slot,
                        record: record.clone(),
                        team,
                    }),
                    None => out.unplaced.push(record.clone()),
                }
            }
        }

        out.team1.sort_by_key(|a| a.slot.start);
        out.team2.sort_by_key(|a| a.slot.start);

        if !out.unplaced.is_empty() {
            warn!(
                unplaced = out.unplaced.len(),
                capacity, "not enough slots for all records"
            );
        }
        info!(
            mode = %self.mode,
            team1 = out.team1.len(),
            team2 = out.team2.len(),
            unplaced = out.unplaced.len(),
            "allocation done"
        );
        out
    }
}

/// Raccourci fonctionnel autour de [`Allocator`].
pub fn allocate(records: &[WorkRecord], slots: &[Slot], mode: TeamMode) -> Allocation {
    Allocator::new(mode).allocate(records, slots)
}
