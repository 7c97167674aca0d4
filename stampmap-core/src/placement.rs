//! Placement state machine
//!
//! Holds the per-session editing state (selection, two-click progress for
//! true/false pairs, confirmation set) and mutates the mapping document
//! through named transitions only, so every rule is testable without a
//! rendering surface.

use crate::coords::DocPoint;
use crate::types::{FieldRecord, MappingDocument};
use std::collections::BTreeSet;

pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_COARSE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// What a placement click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A simple field got its position.
    Placed,
    /// First click of a pair landed; the false slot is next.
    AwaitingSecondClick,
    /// Second click completed the pair.
    PairCompleted { advanced: bool },
    /// Nothing to do (no field selected, or pair already complete).
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementState {
    selected: usize,
    awaiting_second_click: bool,
    pair_started_unplaced: bool,
    confirmed: BTreeSet<usize>,
    pub auto_advance: bool,
}

impl PlacementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_awaiting_second_click(&self) -> bool {
        self.awaiting_second_click
    }

    pub fn is_confirmed(&self, index: usize) -> bool {
        self.confirmed.contains(&index)
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed.len()
    }

    /// Select a field explicitly, abandoning a half-finished pair sequence.
    pub fn select(&mut self, index: usize, doc: &MappingDocument) {
        if index < doc.len() {
            self.selected = index;
        }
        self.awaiting_second_click = false;
        self.pair_started_unplaced = false;
    }

    pub fn select_next(&mut self, doc: &MappingDocument) {
        let last = doc.len().saturating_sub(1);
        self.select((self.selected + 1).min(last), doc);
    }

    pub fn select_prev(&mut self, doc: &MappingDocument) {
        self.select(self.selected.saturating_sub(1), doc);
    }

    /// Any positional edit (click, drag, nudge, inspector) voids a prior
    /// confirmation of that field.
    pub fn note_position_edit(&mut self, index: usize) {
        self.confirmed.remove(&index);
    }

    /// Apply a placement click at document coordinates to the selected
    /// field.
    pub fn click(&mut self, doc: &mut MappingDocument, point: DocPoint) -> ClickOutcome {
        let index = self.selected;
        let last = doc.len().saturating_sub(1);
        let Some(field) = doc.field_mut(index) else {
            return ClickOutcome::Ignored;
        };

        match field {
            FieldRecord::Text(t) => {
                t.x = Some(point.x);
                t.y = Some(point.y);
                self.note_position_edit(index);
                if self.auto_advance {
                    self.selected = (index + 1).min(last);
                }
                ClickOutcome::Placed
            }
            FieldRecord::BooleanPair(p) => {
                if !p.true_slot_placed() {
                    self.pair_started_unplaced = !p.false_slot_placed();
                    p.x_true = Some(point.x);
                    p.y_true = Some(point.y);
                    self.awaiting_second_click = true;
                    self.note_position_edit(index);
                    ClickOutcome::AwaitingSecondClick
                } else if self.awaiting_second_click || !p.false_slot_placed() {
                    p.x_false = Some(point.x);
                    p.y_false = Some(point.y);
                    self.awaiting_second_click = false;
                    self.note_position_edit(index);
                    let advanced = self.pair_started_unplaced && index < last;
                    if self.pair_started_unplaced {
                        self.selected = (index + 1).min(last);
                    }
                    self.pair_started_unplaced = false;
                    ClickOutcome::PairCompleted { advanced }
                } else {
                    // Fully placed pair; repositioning happens via drag.
                    ClickOutcome::Ignored
                }
            }
        }
    }

    /// Mark the selected field complete. Valid only when fully placed.
    ///
    /// Selection then advances to the next unplaced field, else the next
    /// placed-but-unconfirmed one, else stays (forward scan, wrapping).
    pub fn confirm(&mut self, doc: &MappingDocument) -> bool {
        let index = self.selected;
        if !doc.field(index).is_some_and(FieldRecord::is_placed) {
            return false;
        }
        self.confirmed.insert(index);

        let len = doc.len();
        let scan = |pred: &dyn Fn(usize, &FieldRecord) -> bool| {
            (1..=len)
                .map(|step| (index + step) % len)
                .find(|&i| doc.field(i).is_some_and(|f| pred(i, f)))
        };
        let next = scan(&|_, f| !f.is_placed())
            .or_else(|| scan(&|i, f| f.is_placed() && !self.confirmed.contains(&i)));
        if let Some(next) = next {
            self.select(next, doc);
        }
        true
    }

    /// Shift the selected field's placed coordinates by one step (a pair
    /// moves both slots together). Returns whether anything moved.
    pub fn nudge(
        &mut self,
        doc: &mut MappingDocument,
        direction: NudgeDirection,
        coarse: bool,
    ) -> bool {
        let index = self.selected;
        let Some(field) = doc.field_mut(index) else {
            return false;
        };

        let step = if coarse { NUDGE_STEP_COARSE } else { NUDGE_STEP };
        let (dx, dy) = match direction {
            NudgeDirection::Left => (-step, 0.0),
            NudgeDirection::Right => (step, 0.0),
            NudgeDirection::Up => (0.0, step),
            NudgeDirection::Down => (0.0, -step),
        };

        let mut moved = false;
        let mut shift = |coord: &mut Option<f64>, delta: f64| {
            if delta != 0.0 {
                if let Some(v) = coord.as_mut() {
                    *v += delta;
                    moved = true;
                }
            }
        };
        match field {
            FieldRecord::Text(t) => {
                shift(&mut t.x, dx);
                shift(&mut t.y, dy);
            }
            FieldRecord::BooleanPair(p) => {
                shift(&mut p.x_true, dx);
                shift(&mut p.x_false, dx);
                shift(&mut p.y_true, dy);
                shift(&mut p.y_false, dy);
            }
        }
        if moved {
            self.note_position_edit(index);
        }
        moved
    }
}
