use std::f64::consts::PI;

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LETTER_COUNT: usize = 26;

/// Gap between the container edge and the ring of letters
pub const RING_PADDING: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub container_radius: f64,
    pub element_half_size: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            container_radius: 150.0,
            element_half_size: 25.0,
        }
    }
}

/// Placement of one element relative to the ring center.
///
/// `x`/`y` is the element origin, already shifted by the half size so that
/// the element's center (see [`Slot::center`]) sits on the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    pub half_size: f64,
}

impl Slot {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.half_size, self.y + self.half_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum InteractionState {
    Disabled,
    Enabled,
    Activated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterElement {
    pub symbol: char,
    pub index: usize,
    pub slot: Slot,
    pub state: InteractionState,
}

impl LetterElement {
    pub fn is_enabled(&self) -> bool {
        self.state == InteractionState::Enabled
    }
}

/// Evenly spaces `n` elements on a circle, index 0 at angle 0.
pub fn compute_layout(n: usize, container_radius: f64, element_half_size: f64) -> Vec<Slot> {
    let radius = container_radius + RING_PADDING;

    (0..n)
        .map(|i| {
            let angle = (i as f64 / n as f64) * 2.0 * PI;
            Slot {
                angle,
                x: radius * angle.cos() - element_half_size,
                y: radius * angle.sin() - element_half_size,
                half_size: element_half_size,
            }
        })
        .collect()
}

/// One element per letter, alphabetical, all starting disabled.
pub fn letter_elements(params: LayoutParams) -> Vec<LetterElement> {
    compute_layout(
        LETTER_COUNT,
        params.container_radius,
        params.element_half_size,
    )
    .into_iter()
    .zip(ALPHABET.chars())
    .enumerate()
    .map(|(index, (slot, symbol))| LetterElement {
        symbol,
        index,
        slot,
        state: InteractionState::Disabled,
    })
    .collect()
}

/// Index of the element for a letter key, case insensitive.
pub fn letter_index(c: char) -> Option<usize> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}
