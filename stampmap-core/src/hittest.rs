//! Hit-testing and drag handling
//!
//! Decides what a pointer-down on the surface grabbed (a marker to move,
//! or the width handle of a text field to resize) and streams pointer-move
//! updates into the mapping document. Only the currently selected field is
//! ever tested or dragged.

use crate::coords::{snap, snap_point, DocPoint, ScreenPoint, Transform};
use crate::types::{FieldRecord, TextKind};

/// Screen-space grab radius around a marker, independent of zoom.
pub const HIT_RADIUS: f64 = 8.0;

/// Stamped widths never shrink below this many document units.
pub const MIN_FIELD_WIDTH: f64 = 10.0;

const RESIZE_X_TOLERANCE: f64 = 6.0;

fn resize_y_tolerance(scale: f64) -> f64 {
    (10.0 * scale).max(10.0)
}

/// Which coordinate slot of a field a move-drag targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSlot {
    /// The sole position of a simple field.
    Value,
    TrueSlot,
    FalseSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Move(MoveSlot),
    Resize,
}

fn within_disc(pointer: ScreenPoint, center: ScreenPoint) -> bool {
    (pointer.x - center.x).hypot(pointer.y - center.y) <= HIT_RADIUS
}

fn within_square(pointer: ScreenPoint, center: ScreenPoint, half: f64) -> bool {
    (pointer.x - center.x).abs() <= half && (pointer.y - center.y).abs() <= half
}

/// Test a pointer position against a field's grab regions.
///
/// Simple fields expose a disc around their marker (checkbox kinds use the
/// glyph's square bounds instead) and, when a stamped width exists, a
/// resize handle at the right edge of the box, centered on the baseline.
/// Pairs expose two independent discs, true slot tested first.
pub fn hit_test(
    field: &FieldRecord,
    pointer: ScreenPoint,
    transform: &Transform,
    default_font_size: f64,
) -> Option<HitTarget> {
    match field {
        FieldRecord::Text(t) => {
            let (x, y) = (t.x?, t.y?);
            let center = transform.to_screen(DocPoint::new(x, y));
            let font_size = t.font_size.unwrap_or(default_font_size);

            let on_marker = if t.kind == TextKind::Checkbox {
                let half = (font_size * transform.scale / 2.0).max(HIT_RADIUS);
                within_square(pointer, center, half)
            } else {
                within_disc(pointer, center)
            };
            if on_marker {
                return Some(HitTarget::Move(MoveSlot::Value));
            }

            if let Some(width) = t.width {
                let handle = transform.to_screen(DocPoint::new(x + width, y + font_size / 2.0));
                if (pointer.x - handle.x).abs() <= RESIZE_X_TOLERANCE
                    && (pointer.y - handle.y).abs() <= resize_y_tolerance(transform.scale)
                {
                    return Some(HitTarget::Resize);
                }
            }
            None
        }
        FieldRecord::BooleanPair(p) => {
            if let (Some(x), Some(y)) = (p.x_true, p.y_true) {
                if within_disc(pointer, transform.to_screen(DocPoint::new(x, y))) {
                    return Some(HitTarget::Move(MoveSlot::TrueSlot));
                }
            }
            if let (Some(x), Some(y)) = (p.x_false, p.y_false) {
                if within_disc(pointer, transform.to_screen(DocPoint::new(x, y))) {
                    return Some(HitTarget::Move(MoveSlot::FalseSlot));
                }
            }
            None
        }
    }
}

/// An engaged drag gesture: one sub-target of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragTarget {
    pub index: usize,
    pub target: HitTarget,
}

/// Streams pointer movement into the mapping document while a gesture is
/// engaged. Dragging never changes the selection; pointer-up clears the
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragEngine {
    active: Option<DragTarget>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<DragTarget> {
        self.active
    }

    /// Pointer-down: engage if the pointer grabbed a region of the
    /// selected field.
    pub fn begin(
        &mut self,
        field: &FieldRecord,
        index: usize,
        pointer: ScreenPoint,
        transform: &Transform,
        default_font_size: f64,
    ) -> Option<DragTarget> {
        self.active = hit_test(field, pointer, transform, default_font_size)
            .map(|target| DragTarget { index, target });
        self.active
    }

    /// Pointer-move: write the dragged sub-target's coordinates from the
    /// current pointer position. Returns whether the document changed.
    pub fn update(
        &self,
        field: &mut FieldRecord,
        pointer: ScreenPoint,
        transform: &Transform,
        snap_unit: f64,
    ) -> bool {
        let Some(drag) = self.active else {
            return false;
        };
        let point = snap_point(transform.to_doc(pointer), snap_unit);

        match (drag.target, field) {
            (HitTarget::Move(MoveSlot::Value), FieldRecord::Text(t)) => {
                t.x = Some(point.x);
                t.y = Some(point.y);
                true
            }
            (HitTarget::Move(MoveSlot::TrueSlot), FieldRecord::BooleanPair(p)) => {
                p.x_true = Some(point.x);
                p.y_true = Some(point.y);
                true
            }
            (HitTarget::Move(MoveSlot::FalseSlot), FieldRecord::BooleanPair(p)) => {
                p.x_false = Some(point.x);
                p.y_false = Some(point.y);
                true
            }
            (HitTarget::Resize, FieldRecord::Text(t)) => {
                let Some(base_x) = t.x else { return false };
                let width = snap(point.x - base_x, snap_unit).max(MIN_FIELD_WIDTH);
                t.width = Some(width);
                true
            }
            _ => false,
        }
    }

    /// Pointer-up.
    pub fn end(&mut self) {
        self.active = None;
    }
}
