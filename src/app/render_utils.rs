use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::data::{Connection, ConnectionKind, RiskLevel};

/// Padding added to the visual radius for collision resolution, so circles
/// keep a visible gap instead of kissing.
pub(super) const COLLISION_PADDING: f32 = 4.0;

pub(super) fn entity_radius(weight: f32) -> f32 {
    weight.max(0.0).sqrt() * 5.0
}

// Zoom-damped: nodes shrink slower than the scene.
pub(super) fn screen_radius(base_radius: f32, zoom: f32) -> f32 {
    (base_radius * zoom.powf(0.40)).clamp(2.5, 46.0)
}

/// Total mapping from risk classification to stroke color. Adding a risk
/// variant forces a decision here.
pub(super) fn risk_color(risk: RiskLevel) -> Color32 {
    match risk {
        RiskLevel::Low => Color32::from_rgb(0x48, 0xBB, 0x78),
        RiskLevel::Medium => Color32::from_rgb(0xEC, 0xC9, 0x4B),
        RiskLevel::High => Color32::from_rgb(0xED, 0x89, 0x36),
        RiskLevel::Critical => Color32::from_rgb(0xF5, 0x65, 0x65),
    }
}

/// Stroke for a connection: width from strength, color from the
/// classification, opacity from interaction volume.
pub(super) fn connection_stroke(connection: &Connection) -> Stroke {
    let width = connection.strength.max(0.0).sqrt().clamp(0.6, 4.5);
    let alpha = connection_opacity(connection.interactions);
    let color = match connection.kind {
        ConnectionKind::Risk => Color32::from_rgba_unmultiplied(0xF5, 0x65, 0x65, alpha),
        ConnectionKind::Strong => Color32::from_rgba_unmultiplied(0x71, 0x80, 0x96, alpha),
        ConnectionKind::Weak | ConnectionKind::Potential => {
            Color32::from_rgba_unmultiplied(0x4A, 0x55, 0x68, alpha)
        }
    };
    Stroke::new(width, color)
}

fn connection_opacity(interactions: u64) -> u8 {
    // ln(1 + x) saturates around the sample data's interaction volumes.
    let scaled = ((interactions as f32).ln_1p() * 14.0).clamp(70.0, 200.0);
    scaled as u8
}

/// Control point for the curved connection path: the chord midpoint offset
/// along the perpendicular, matching the bowed arcs of the scene.
pub(super) fn curve_control_point(start: Pos2, end: Pos2) -> Pos2 {
    let chord = end - start;
    let mid = start + chord * 0.5;
    let normal = vec2(-chord.y, chord.x) * 0.15;
    mid + normal
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Conservative culling for curved connections: bounding box of the chord
/// plus the bow padding.
pub(super) fn curve_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let padding = (end - start).length() * 0.15 + 2.0;
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
