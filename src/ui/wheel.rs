use letterwheel::layout::Slot;
use ratatui::layout::Rect;

/// Width of a rendered letter button, e.g. "[A]"
pub const BUTTON_WIDTH: u16 = 3;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Maps a layout slot onto a terminal cell inside `area`.
///
/// Slots are in layout units; only their direction matters here, the ring is
/// stretched to the largest ellipse that fits the area.
pub fn button_position(slot: &Slot, area: Rect) -> Option<(u16, u16)> {
    if area.width < BUTTON_WIDTH + 2 || area.height < 3 {
        return None;
    }

    let (cx, cy) = slot.center();
    let radius = (cx * cx + cy * cy).sqrt();
    let (nx, ny) = if radius > f64::EPSILON {
        (cx / radius, cy / radius)
    } else {
        (0.0, 0.0)
    };

    let ry = (area.height as f64 - 1.0) / 2.0;
    let rx = (ry * CELL_ASPECT).min((area.width - BUTTON_WIDTH) as f64 / 2.0);

    let mid_x = area.x as f64 + (area.width - BUTTON_WIDTH) as f64 / 2.0;
    let mid_y = area.y as f64 + ry;

    let col = (mid_x + nx * rx).round().max(area.x as f64) as u16;
    let row = (mid_y + ny * ry).round().max(area.y as f64) as u16;

    Some((
        col.min(area.right() - BUTTON_WIDTH),
        row.min(area.bottom() - 1),
    ))
}

/// The square-ish center region left inside the ring for the timer
pub fn hub(area: Rect) -> Rect {
    let height = area.height / 2;
    let width = area.width / 3;
    centered_rect(width, height, area)
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
