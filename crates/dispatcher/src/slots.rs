//! ResultSlots - pre-sized, index-owned result holders

use contracts::DispatchResult;
use std::sync::OnceLock;

/// One write-once slot per target index
///
/// Each worker owns exactly one index; the dispatcher reads only after the
/// wait phase.
#[derive(Debug)]
pub struct ResultSlots {
    slots: Box<[OnceLock<DispatchResult>]>,
}

impl ResultSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write a slot; returns false if out of range or already written
    pub fn fill(&self, index: usize, result: DispatchResult) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.set(result).is_ok())
    }

    pub fn get(&self, index: usize) -> Option<&DispatchResult> {
        self.slots.get(index).and_then(OnceLock::get)
    }

    /// Number of written slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }

    /// Clone out all results in index order, synthesizing empty slots
    pub fn collect_or_else<F>(&self, mut fallback: F) -> Vec<DispatchResult>
    where
        F: FnMut(usize) -> DispatchResult,
    {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.get().cloned().unwrap_or_else(|| fallback(index)))
            .collect()
    }
}
