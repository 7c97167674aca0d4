//! Editing session
//!
//! Owns the one live mapping document of a session and routes pointer and
//! keyboard events into the placement machine and the drag engine. All
//! mutation is synchronous, one event at a time; a save takes a snapshot
//! of the document as it stands at that moment.

use crate::coords::{clamp_scale, snap_point, DocPoint, ScreenPoint, Transform};
use crate::hittest::{DragEngine, DragTarget};
use crate::mapping::PreviewData;
use crate::overlay::{self, OverlayOptions, OverlaySurface, OverflowWarning};
use crate::placement::{ClickOutcome, NudgeDirection, PlacementState};
use crate::types::{Align, FieldRecord, MappingDocument};

/// Rendered surface geometry plus the current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub surface_width: f64,
    pub surface_height: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(surface_width: f64, surface_height: f64, scale: f64) -> Self {
        Self {
            surface_width,
            surface_height,
            scale: clamp_scale(scale),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.surface_height, self.scale)
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= 0.0 && p.x <= self.surface_width && p.y >= 0.0 && p.y <= self.surface_height
    }
}

/// What a pointer-down turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    DragStarted(DragTarget),
    Click(ClickOutcome),
}

pub struct EditorSession {
    doc: MappingDocument,
    placement: PlacementState,
    drag: DragEngine,
    viewport: Viewport,
    pub snap_unit: f64,
    pub overlay: OverlayOptions,
    preview: PreviewData,
    hover: Option<DocPoint>,
}

impl EditorSession {
    pub fn new(doc: MappingDocument, viewport: Viewport) -> Self {
        Self {
            doc,
            placement: PlacementState::new(),
            drag: DragEngine::new(),
            viewport,
            snap_unit: 0.0,
            overlay: OverlayOptions::default(),
            preview: PreviewData::new(),
            hover: None,
        }
    }

    pub fn doc(&self) -> &MappingDocument {
        &self.doc
    }

    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selected_field(&self) -> Option<&FieldRecord> {
        self.doc.field(self.placement.selected())
    }

    /// Last hover position in document coordinates, for the readout.
    pub fn hover(&self) -> Option<DocPoint> {
        self.hover
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.placement.auto_advance = enabled;
    }

    pub fn set_preview(&mut self, preview: PreviewData) {
        self.preview = preview;
    }

    /// Change zoom, clamped to the editor's range. Drag gestures survive a
    /// zoom change because coordinates are recomputed per move event.
    pub fn set_scale(&mut self, scale: f64) {
        self.viewport.scale = clamp_scale(scale);
    }

    fn doc_point(&self, pointer: ScreenPoint) -> DocPoint {
        snap_point(self.viewport.transform().to_doc(pointer), self.snap_unit)
    }

    /// Pointer-down: grab a handle of the selected field if one is under
    /// the pointer, otherwise treat the press as a placement click.
    pub fn pointer_down(&mut self, pointer: ScreenPoint) -> PointerOutcome {
        let transform = self.viewport.transform();
        let index = self.placement.selected();
        if let Some(field) = self.doc.field(index) {
            if let Some(target) =
                self.drag
                    .begin(field, index, pointer, &transform, self.doc.font_size())
            {
                return PointerOutcome::DragStarted(target);
            }
        }
        let point = self.doc_point(pointer);
        PointerOutcome::Click(self.placement.click(&mut self.doc, point))
    }

    /// Pointer-move: update the hover readout and stream an engaged drag.
    /// Positions outside the surface are ignored, so releasing out of
    /// bounds keeps the last in-bounds coordinate.
    pub fn pointer_move(&mut self, pointer: ScreenPoint) -> bool {
        if !self.viewport.contains(pointer) {
            return false;
        }
        let transform = self.viewport.transform();
        self.hover = Some(transform.to_doc(pointer));

        let Some(drag) = self.drag.active() else {
            return false;
        };
        let Some(field) = self.doc.field_mut(drag.index) else {
            return false;
        };
        let changed = self
            .drag
            .update(field, pointer, &transform, self.snap_unit);
        if changed {
            self.placement.note_position_edit(drag.index);
        }
        changed
    }

    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    pub fn confirm(&mut self) -> bool {
        self.placement.confirm(&self.doc)
    }

    pub fn nudge(&mut self, direction: NudgeDirection, coarse: bool) -> bool {
        self.placement.nudge(&mut self.doc, direction, coarse)
    }

    pub fn select(&mut self, index: usize) {
        self.placement.select(index, &self.doc);
    }

    pub fn select_next(&mut self) {
        self.placement.select_next(&self.doc);
    }

    pub fn select_prev(&mut self) {
        self.placement.select_prev(&self.doc);
    }

    /// Change zoom so the page width fills the available screen width.
    pub fn fit_to_width(&mut self, available_width: f64, page_width: f64) {
        self.viewport.scale = crate::coords::fit_scale(available_width, page_width);
    }

    /// Direct inspector edit of a simple field's position.
    pub fn set_field_position(&mut self, index: usize, x: f64, y: f64) -> bool {
        match self.doc.field_mut(index) {
            Some(FieldRecord::Text(t)) => {
                t.x = Some(x);
                t.y = Some(y);
                self.placement.note_position_edit(index);
                true
            }
            _ => false,
        }
    }

    /// Direct inspector edit of one slot of a pair. `true_slot` picks the
    /// Ja coordinates.
    pub fn set_pair_slot(&mut self, index: usize, true_slot: bool, x: f64, y: f64) -> bool {
        match self.doc.field_mut(index) {
            Some(FieldRecord::BooleanPair(p)) => {
                if true_slot {
                    p.x_true = Some(x);
                    p.y_true = Some(y);
                } else {
                    p.x_false = Some(x);
                    p.y_false = Some(y);
                }
                self.placement.note_position_edit(index);
                true
            }
            _ => false,
        }
    }

    /// Direct inspector edit of a simple field's declared width.
    pub fn set_field_width(&mut self, index: usize, width: Option<f64>) -> bool {
        match self.doc.field_mut(index) {
            Some(FieldRecord::Text(t)) => {
                t.width = width.map(|w| w.max(0.0));
                self.placement.note_position_edit(index);
                true
            }
            _ => false,
        }
    }

    /// Direct inspector edit of a simple field's font size, floored at a
    /// readable minimum.
    pub fn set_field_font_size(&mut self, index: usize, size: Option<f64>) -> bool {
        match self.doc.field_mut(index) {
            Some(FieldRecord::Text(t)) => {
                t.font_size = size.map(|s| s.max(6.0));
                true
            }
            _ => false,
        }
    }

    pub fn set_field_align(&mut self, index: usize, align: Align) -> bool {
        match self.doc.field_mut(index) {
            Some(FieldRecord::Text(t)) => {
                t.align = Some(align);
                true
            }
            _ => false,
        }
    }

    /// Draw the overlay for the current state.
    pub fn render(&self, surface: &mut dyn OverlaySurface) -> Vec<OverflowWarning> {
        overlay::render(
            surface,
            &self.doc,
            self.placement.selected(),
            &self.viewport.transform(),
            self.overlay,
            &self.preview,
        )
    }

    /// Consistent snapshot of the document for persisting. Later edits do
    /// not affect a snapshot already taken.
    pub fn snapshot(&self) -> MappingDocument {
        self.doc.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextKind;

    fn session() -> EditorSession {
        let doc = MappingDocument::new(vec![
            FieldRecord::text("name"),
            FieldRecord::boolean_pair("zustimmung"),
        ]);
        EditorSession::new(doc, Viewport::new(600.0, 800.0, 1.0))
    }

    #[test]
    fn test_click_places_through_transform() {
        let mut s = session();
        // Screen (100, 600) on an 800px surface is doc (100, 200).
        let out = s.pointer_down(ScreenPoint::new(100.0, 600.0));
        assert_eq!(out, PointerOutcome::Click(ClickOutcome::Placed));
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => {
                assert_eq!(t.x, Some(100.0));
                assert_eq!(t.y, Some(200.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_snap_applied_in_doc_space() {
        let mut s = session();
        s.snap_unit = 5.0;
        s.pointer_down(ScreenPoint::new(101.0, 598.0));
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => {
                assert_eq!(t.x, Some(100.0));
                assert_eq!(t.y, Some(200.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pointer_down_on_marker_starts_drag() {
        let mut s = session();
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        s.pointer_up();

        let out = s.pointer_down(ScreenPoint::new(103.0, 602.0));
        assert!(matches!(out, PointerOutcome::DragStarted(_)));

        assert!(s.pointer_move(ScreenPoint::new(250.0, 300.0)));
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => {
                assert_eq!(t.x, Some(250.0));
                assert_eq!(t.y, Some(500.0));
            }
            _ => unreachable!(),
        }
        // Selection is untouched by dragging.
        assert_eq!(s.placement().selected(), 0);
        s.pointer_up();
    }

    #[test]
    fn test_out_of_bounds_move_keeps_last_coordinate() {
        let mut s = session();
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        s.pointer_up();
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        assert!(s.pointer_move(ScreenPoint::new(200.0, 400.0)));
        assert!(!s.pointer_move(ScreenPoint::new(700.0, 400.0)), "outside the surface");
        s.pointer_up();
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => assert_eq!(t.x, Some(200.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_drag_invalidates_confirmation() {
        let mut s = session();
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        s.pointer_up();
        assert!(s.confirm());
        // Confirm moved selection to the unplaced pair; go back and drag.
        s.select(0);
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        s.pointer_move(ScreenPoint::new(110.0, 610.0));
        s.pointer_up();
        assert!(!s.placement().is_confirmed(0));
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let mut s = session();
        s.pointer_down(ScreenPoint::new(100.0, 600.0));
        s.pointer_up();
        let snap = s.snapshot();
        s.nudge(NudgeDirection::Right, true);
        match snap.field(0).unwrap() {
            FieldRecord::Text(t) => assert_eq!(t.x, Some(100.0)),
            _ => unreachable!(),
        }
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => assert_eq!(t.x, Some(105.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_set_field_width_floors_at_zero() {
        let mut s = session();
        assert!(s.set_field_width(0, Some(-5.0)));
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => {
                assert_eq!(t.kind, TextKind::Text);
                assert_eq!(t.width, Some(0.0));
            }
            _ => unreachable!(),
        }
        assert!(!s.set_field_width(1, Some(10.0)), "pairs have no width");
    }

    #[test]
    fn test_inspector_edits() {
        let mut s = session();
        assert!(s.set_field_position(0, 50.0, 60.0));
        assert!(s.confirm());
        s.select(0);
        assert!(s.set_pair_slot(1, true, 10.0, 20.0));
        assert!(!s.set_pair_slot(0, true, 0.0, 0.0), "simple fields have no slots");
        assert!(s.set_field_font_size(0, Some(2.0)));
        assert!(s.set_field_align(0, Align::Right));
        match s.doc().field(0).unwrap() {
            FieldRecord::Text(t) => {
                assert_eq!((t.x, t.y), (Some(50.0), Some(60.0)));
                assert_eq!(t.font_size, Some(6.0), "font size floored");
                assert_eq!(t.align, Some(Align::Right));
            }
            _ => unreachable!(),
        }

        // A later position edit voids the earlier confirmation.
        assert!(s.placement().is_confirmed(0));
        assert!(s.set_field_position(0, 51.0, 60.0));
        assert!(!s.placement().is_confirmed(0));
    }

    #[test]
    fn test_fit_to_width() {
        let mut s = session();
        s.fit_to_width(306.0, 612.0);
        assert_eq!(s.viewport().scale, 0.5);
    }

    #[test]
    fn test_scale_clamped() {
        let mut s = session();
        s.set_scale(9.0);
        assert_eq!(s.viewport().scale, 2.5);
        s.set_scale(0.1);
        assert_eq!(s.viewport().scale, 0.5);
    }
}
