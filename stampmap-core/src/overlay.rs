//! Overlay rendering contract
//!
//! The engine never touches a concrete canvas. A hosting editor implements
//! [`OverlaySurface`] with whatever drawing backend it has; the renderer
//! walks the mapping document through the coordinate transform and emits
//! primitives. Rendering is stateless: the only output besides draw calls
//! is the list of overflow advisories.

use crate::coords::{DocPoint, ScreenPoint, Transform};
use crate::mapping::PreviewData;
use crate::types::{Align, FieldRecord, MappingDocument, TextKind};
use regex::Regex;
use std::sync::OnceLock;

/// Grid spacing in screen pixels.
pub const GRID_STEP: f64 = 25.0;

/// Marker disc radius at scale 1.0; never drawn smaller.
pub const MARKER_RADIUS: f64 = 5.0;

/// Visual role of a marker, mapped to colors by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
    /// Marker of the currently selected field.
    Active,
    /// Placed marker of an unselected simple field.
    Placed,
    TrueSlot,
    FalseSlot,
}

/// Minimal capability interface a rendering backend provides.
pub trait OverlaySurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn grid_line(&mut self, from: ScreenPoint, to: ScreenPoint);
    fn marker(&mut self, center: ScreenPoint, radius: f64, style: MarkStyle);
    /// Small labelled tag next to a marker.
    fn tag(&mut self, anchor: ScreenPoint, text: &str);
    /// Translucent box visualizing a stamped width. `emphasized` flags
    /// money fields.
    fn stamp_box(&mut self, origin: ScreenPoint, width: f64, height: f64, emphasized: bool);
    fn sample_text(&mut self, pos: ScreenPoint, text: &str, font_px: f64, align: Align);
    fn resize_handle(&mut self, center: ScreenPoint, extent: f64);
    /// Rendered width of `text` at `font_px`, in pixels.
    fn measure_text(&self, text: &str, font_px: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub show_grid: bool,
    pub show_ids: bool,
    pub show_values: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_ids: true,
            show_values: true,
        }
    }
}

/// Advisory: sample text is wider than the declared stamp width. Never
/// blocks anything; the operator widens the field or shrinks the font.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowWarning {
    pub id: String,
    pub text_width: f64,
    pub box_width: f64,
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"betrag|wert|summe|eur|€").expect("valid regex"))
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"name|aussteller|ort").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"datum").expect("valid regex"))
}

/// Stand-in value shown at a placed field: the loaded preview value when
/// one exists, else a plausible sample by id/kind.
fn sample_value<'a>(field: &FieldRecord, preview: &'a PreviewData) -> &'a str {
    if let Some(v) = preview.get(field.id()) {
        if !v.is_empty() {
            return v;
        }
    }
    let id = field.id().to_lowercase();
    match field {
        FieldRecord::Text(t) if t.kind == TextKind::Date || date_re().is_match(&id) => "01.01.2025",
        FieldRecord::Text(t) if t.align() == Align::Right || money_re().is_match(&id) => {
            "1.234,56 €"
        }
        _ if name_re().is_match(&id) => "Max Mustermann",
        _ => "Beispiel Text",
    }
}

fn draw_grid(surface: &mut dyn OverlaySurface) {
    let (w, h) = (surface.width(), surface.height());
    let mut x = 0.0;
    while x < w {
        surface.grid_line(ScreenPoint::new(x, 0.0), ScreenPoint::new(x, h));
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y < h {
        surface.grid_line(ScreenPoint::new(0.0, y), ScreenPoint::new(w, y));
        y += GRID_STEP;
    }
}

/// Draw the full overlay for a document and return overflow advisories.
pub fn render(
    surface: &mut dyn OverlaySurface,
    doc: &MappingDocument,
    selected: usize,
    transform: &Transform,
    options: OverlayOptions,
    preview: &PreviewData,
) -> Vec<OverflowWarning> {
    if options.show_grid {
        draw_grid(surface);
    }

    let scale = transform.scale;
    let radius = (MARKER_RADIUS * scale).max(MARKER_RADIUS);
    let mut warnings = Vec::new();

    for (i, field) in doc.fields.iter().enumerate() {
        let active = i == selected;
        match field {
            FieldRecord::BooleanPair(p) => {
                if let (Some(x), Some(y)) = (p.x_true, p.y_true) {
                    let c = transform.to_screen(DocPoint::new(x, y));
                    surface.marker(c, radius, if active { MarkStyle::Active } else { MarkStyle::TrueSlot });
                    if options.show_ids {
                        surface.tag(c, &format!("{}: Ja", p.id));
                    }
                }
                if let (Some(x), Some(y)) = (p.x_false, p.y_false) {
                    let c = transform.to_screen(DocPoint::new(x, y));
                    surface.marker(c, radius, if active { MarkStyle::Active } else { MarkStyle::FalseSlot });
                    if options.show_ids {
                        surface.tag(c, &format!("{}: Nein", p.id));
                    }
                }
            }
            FieldRecord::Text(t) => {
                let (Some(x), Some(y)) = (t.x, t.y) else {
                    continue;
                };
                let c = transform.to_screen(DocPoint::new(x, y));
                surface.marker(c, radius, if active { MarkStyle::Active } else { MarkStyle::Placed });

                let font_px = (t.font_size.unwrap_or(doc.font_size()) * scale).max(8.0);
                match t.width {
                    Some(width) => {
                        let box_w = (width * scale).max(0.0);
                        let origin = ScreenPoint::new(c.x, c.y - (font_px + 2.0));
                        let emphasized = money_re().is_match(&t.id.to_lowercase());
                        surface.stamp_box(origin, box_w, font_px + 6.0 * scale, emphasized);

                        let text = sample_value(field, preview);
                        if options.show_values {
                            let pos = match t.align() {
                                Align::Right => ScreenPoint::new(c.x + box_w - 2.0, c.y - font_px),
                                Align::Left => ScreenPoint::new(c.x + 2.0, c.y - font_px),
                            };
                            surface.sample_text(pos, text, font_px, t.align());
                        }
                        let text_width = surface.measure_text(text, font_px);
                        if text_width > box_w {
                            warnings.push(OverflowWarning {
                                id: t.id.clone(),
                                text_width,
                                box_width: box_w,
                            });
                        }

                        if options.show_ids {
                            surface.tag(c, &t.id);
                        }
                        surface.resize_handle(
                            ScreenPoint::new(c.x + box_w, c.y - font_px / 2.0),
                            (8.0 * scale).max(8.0),
                        );
                    }
                    None => {
                        if options.show_ids {
                            let label = if options.show_values {
                                format!("{}: {}", t.id, sample_value(field, preview))
                            } else {
                                t.id.clone()
                            };
                            surface.tag(c, &label);
                        }
                    }
                }
            }
        }
    }
    warnings
}
