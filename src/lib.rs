#![forbid(unsafe_code)]
//! Kabelplan — répartition de visites terrain sur deux équipes (sans BD).
//!
//! - Créneaux d'une journée, pause déjeuner comprise.
//! - Regroupement par NVT, plus gros groupes d'abord, équilibrage entre équipes.
//! - Export iCalendar par équipe, heures locales du fuseau configuré.
//! - Plans conservés en mémoire le temps du processus.

pub mod allocator;
pub mod calendar;
pub mod config;
pub mod io;
pub mod model;
pub mod planner;
pub mod slots;
pub mod storage;

pub use allocator::{allocate, Allocation, Allocator, SlotQueue, TeamChoice, TeamMode};
pub use calendar::{export_ics, IcsExporter};
pub use config::{export_config_json, load_config_from_file, DayConfig};
pub use model::{Assignment, Plan, PlanId, PlanSummary, Slot, Team, TeamPreference, WorkRecord};
pub use planner::build_plan;
pub use slots::{generate_slots, LunchBreak, SlotError, SlotPlan};
pub use storage::{MemoryPlanStore, PlanStore, StoreError};
