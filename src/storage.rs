use crate::model::{Plan, PlanId};
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("plan not found: {0}")]
    PlanNotFound(String),
}

pub trait PlanStore {
    /// Enregistre un plan et retourne son identifiant.
    fn put(&self, plan: Plan) -> PlanId;
    /// Relit un plan ; `PlanNotFound` si l'id est inconnu.
    fn get(&self, id: &PlanId) -> Result<Plan, StoreError>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stockage en mémoire, partagé entre threads, sans éviction.
/// Le contenu disparaît avec le processus.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: RwLock<HashMap<PlanId, Plan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn put(&self, plan: Plan) -> PlanId {
        let id = plan.id.clone();
        debug!(plan_id = %id, "storing plan");
        self.plans.write().insert(id.clone(), plan);
        id
    }

    fn get(&self, id: &PlanId) -> Result<Plan, StoreError> {
        self.plans
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PlanNotFound(id.as_str().to_string()))
    }

    fn len(&self) -> usize {
        self.plans.read().len()
    }
}
