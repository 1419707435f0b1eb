use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};

use crate::catalog::AminoAcid;

/// `segment_index * 10 + role`
pub type SlotId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    FirstBranch = 1,
    Main = 2,
    LastBranch = 3,
}

pub fn slot_id(segment_index: usize, role: SlotRole) -> SlotId {
    segment_index as SlotId * 10 + role as SlotId
}

pub fn segment_of(slot: SlotId) -> usize {
    (slot / 10) as usize
}

/// Main labels in segment order followed by branch labels in segment order, unshuffled.
pub fn answer_labels(amino_acid: &AminoAcid) -> Vec<&'static str> {
    let chain = amino_acid.chain();
    chain
        .iter()
        .map(|segment| segment.main())
        .chain(chain.iter().flat_map(|segment| segment.branches().iter().copied()))
        .collect()
}

pub fn derive_label_pool(amino_acid: &AminoAcid) -> Vec<String> {
    derive_label_pool_with(amino_acid, &mut rand::thread_rng())
}

pub fn derive_label_pool_with<R: Rng + ?Sized>(amino_acid: &AminoAcid, rng: &mut R) -> Vec<String> {
    let mut labels: Vec<String> = answer_labels(amino_acid)
        .into_iter()
        .map(str::to_owned)
        .collect();
    labels.shuffle(rng);
    labels
}

pub fn expected_slots(amino_acid: &AminoAcid) -> BTreeMap<SlotId, &'static str> {
    let mut slots = BTreeMap::new();
    for (index, segment) in amino_acid.chain().iter().enumerate() {
        let branches = segment.branches();
        if let Some(first) = branches.first() {
            slots.insert(slot_id(index, SlotRole::FirstBranch), *first);
        }
        slots.insert(slot_id(index, SlotRole::Main), segment.main());
        if branches.len() >= 2 {
            if let Some(last) = branches.last() {
                slots.insert(slot_id(index, SlotRole::LastBranch), *last);
            }
        }
    }
    slots
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    label: String,
    is_correct: bool,
}

impl Placement {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// Progress on a single amino acid: the shuffled label pool and what has been put where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    amino_acid: &'static AminoAcid,
    available_labels: Vec<String>,
    slot_assignments: BTreeMap<SlotId, Placement>,
}

impl QuizState {
    pub fn reset(amino_acid: &'static AminoAcid) -> Self {
        Self::reset_with(amino_acid, &mut rand::thread_rng())
    }

    pub fn reset_with<R: Rng + ?Sized>(amino_acid: &'static AminoAcid, rng: &mut R) -> Self {
        Self {
            amino_acid,
            available_labels: derive_label_pool_with(amino_acid, rng),
            slot_assignments: BTreeMap::new(),
        }
    }

    pub fn amino_acid(&self) -> &'static AminoAcid {
        self.amino_acid
    }

    pub fn available_labels(&self) -> &[String] {
        &self.available_labels
    }

    pub fn expected_slots(&self) -> BTreeMap<SlotId, &'static str> {
        expected_slots(self.amino_acid)
    }

    pub fn placement(&self, slot: SlotId) -> Option<&Placement> {
        self.slot_assignments.get(&slot)
    }

    pub fn assignments(&self) -> &BTreeMap<SlotId, Placement> {
        &self.slot_assignments
    }

    /// Overwrites whatever was in `slot`. The label is not checked against the pool.
    pub fn assign(&mut self, slot: SlotId, label: impl Into<String>) -> &Placement {
        let label = label.into();
        let is_correct = self
            .expected_slots()
            .get(&slot)
            .is_some_and(|expected| *expected == label);
        self.slot_assignments.insert(slot, Placement { label, is_correct });
        &self.slot_assignments[&slot]
    }

    /// Every expected slot filled, correct or not.
    pub fn is_complete(&self) -> bool {
        self.expected_slots()
            .keys()
            .all(|slot| self.slot_assignments.contains_key(slot))
    }

    pub fn evaluate(&self) -> bool {
        let expected = self.expected_slots();
        if self.slot_assignments.len() != expected.len() {
            return false;
        }
        expected.keys().all(|slot| {
            self.slot_assignments
                .get(slot)
                .is_some_and(Placement::is_correct)
        })
    }
}
