use crate::model::Slot;
use std::collections::VecDeque;

/// Créneaux restants d'une équipe, consommés par l'avant.
#[derive(Debug, Clone, Default)]
pub struct SlotQueue {
    slots: VecDeque<Slot>,
}

impl SlotQueue {
    pub fn new<I: IntoIterator<Item = Slot>>(slots: I) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn pop(&mut self) -> Option<Slot> {
        self.slots.pop_front()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
