//! Wheel geometry for the SVG renderer
//!
//! Angles here are degrees clockwise from the pointer at 12 o'clock, in SVG
//! user space (y down) centred on the wheel hub. Must agree with
//! `sim::selector`, which decides which segment lands under the pointer.

use glam::Vec2;

use crate::consts::{LABEL_RADIUS, WHEEL_RADIUS};
use crate::polar_to_cartesian;

/// Segment fills, cycled by index
pub const BRAND_COLORS: [&str; 8] = [
    "#5eead4", "#fcd34d", "#f9a8d4", "#93c5fd", "#c4b5fd", "#fdba74", "#86efac", "#fca5a5",
];

pub const BASE_FONT_PX: u32 = 18;
pub const MIN_FONT_PX: u32 = 12;
pub const MAX_FONT_PX: u32 = 22;
/// Labels longer than this are shortened
pub const MAX_LABEL_CHARS: usize = 18;
const TRUNCATED_LABEL_CHARS: usize = 16;

/// One wheel segment, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// SVG path data for the filled wedge
    pub path: String,
    pub fill: &'static str,
    /// Outer end of the divider line at the segment's start edge
    pub divider: Vec2,
    pub label_pos: Vec2,
    pub label: String,
    pub font_px: u32,
}

/// Point on a circle of radius `r` at `degrees` clockwise from the top
#[inline]
pub fn wheel_point(r: f32, degrees: f32) -> Vec2 {
    polar_to_cartesian(r, (degrees - 90.0).to_radians())
}

/// Font size for a label: smaller for crowded wheels and long names
pub fn label_font_px(label: &str, segments: usize) -> u32 {
    let mut px = if segments > 12 {
        14
    } else if segments > 8 {
        16
    } else {
        BASE_FONT_PX
    };

    let len = label.chars().count();
    if len > 15 {
        px = px.saturating_sub(2).max(MIN_FONT_PX);
    } else if len > 10 {
        px = px.saturating_sub(1).max(MIN_FONT_PX);
    }

    px.clamp(MIN_FONT_PX, MAX_FONT_PX)
}

/// Label text as drawn, with an ellipsis past `MAX_LABEL_CHARS`
pub fn display_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let mut short: String = label.chars().take(TRUNCATED_LABEL_CHARS).collect();
        short.push('…');
        short
    } else {
        label.to_owned()
    }
}

fn wedge_path(start_deg: f32, sweep_deg: f32) -> String {
    let r = WHEEL_RADIUS;
    if sweep_deg >= 360.0 {
        // A single name fills the whole wheel; an arc with equal endpoints draws nothing
        return format!("M 0 {:.2} A {r} {r} 0 1 1 0 {:.2} A {r} {r} 0 1 1 0 {:.2} Z", -r, r, -r);
    }
    let start = wheel_point(r, start_deg);
    let end = wheel_point(r, start_deg + sweep_deg);
    let large_arc = if sweep_deg > 180.0 { 1 } else { 0 };
    format!(
        "M 0 0 L {:.2} {:.2} A {r} {r} 0 {} 1 {:.2} {:.2} Z",
        start.x, start.y, large_arc, end.x, end.y
    )
}

/// Lay out one segment per name
pub fn layout(names: &[String]) -> Vec<Segment> {
    let n = names.len();
    if n == 0 {
        return Vec::new();
    }
    let sweep = 360.0 / n as f32;

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let start = sweep * index as f32;
            Segment {
                index,
                path: wedge_path(start, sweep),
                fill: BRAND_COLORS[index % BRAND_COLORS.len()],
                divider: wheel_point(WHEEL_RADIUS, start),
                label_pos: wheel_point(LABEL_RADIUS, start + sweep / 2.0),
                label: display_label(name),
                font_px: label_font_px(name, n),
            }
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full SVG markup for the wheel face (empty string for an empty pool)
pub fn render_svg(names: &[String]) -> String {
    let segments = layout(names);
    if segments.is_empty() {
        return String::new();
    }

    let r = WHEEL_RADIUS;
    let mut svg = format!(
        r#"<svg viewBox="{} {} {} {}" class="wheel-face" xmlns="http://www.w3.org/2000/svg">"#,
        -r,
        -r,
        2.0 * r,
        2.0 * r
    );
    for seg in &segments {
        svg.push_str(&format!(
            r#"<g><path d="{}" fill="{}"/><line x1="0" y1="0" x2="{:.2}" y2="{:.2}" class="wheel-divider"/><text x="{:.2}" y="{:.2}" class="wheel-label" style="font-size:{}px">{}</text></g>"#,
            seg.path,
            seg.fill,
            seg.divider.x,
            seg.divider.y,
            seg.label_pos.x,
            seg.label_pos.y,
            seg.font_px,
            escape_xml(&seg.label)
        ));
    }
    svg.push_str("</svg>");
    svg
}
