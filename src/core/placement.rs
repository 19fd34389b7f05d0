//! Anchored overlay positioning.
//!
//! Given the anchor's rect, a preferred [`Placement`], the panel's desired
//! size and the rect of the nearest scroll container, compute where the
//! panel goes.  The preferred side is never flipped.  Overflow along the
//! alignment axis is fixed by shifting; overflow along the side axis is
//! fixed by clipping the panel (which then scrolls its content).

use std::fmt;
use std::str::FromStr;

use ratatui::layout::Rect;

use crate::error::ConfigError;

/// Which side of the anchor the panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// How the panel lines up with the anchor along that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// Preferred placement, e.g. `bottom-end`: below the anchor, right edges
/// aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
}

impl Placement {
    pub const BOTTOM_END: Placement = Placement {
        side: Side::Bottom,
        align: Align::End,
    };
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM_END
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        };
        match self.align {
            Align::Start => write!(f, "{side}-start"),
            Align::Center => write!(f, "{side}"),
            Align::End => write!(f, "{side}-end"),
        }
    }
}

impl FromStr for Placement {
    type Err = ConfigError;

    /// Accepts `side` or `side-start` / `side-end`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (side, align) = match lower.split_once('-') {
            Some((side, align)) => (side, Some(align)),
            None => (lower.as_str(), None),
        };
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return Err(ConfigError::InvalidPlacement(s.to_string())),
        };
        let align = match align {
            None => Align::Center,
            Some("start") => Align::Start,
            Some("end") => Align::End,
            Some(_) => return Err(ConfigError::InvalidPlacement(s.to_string())),
        };
        Ok(Placement { side, align })
    }
}

// ───────────────────────────────────────── positioner ────────

/// Positioner options.  Flipping is not configurable: it is always off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionerConfig {
    pub placement: Placement,
    /// Keep the panel inside the scroll container.
    pub prevent_overflow: bool,
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            prevent_overflow: true,
        }
    }
}

/// Result of one positioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOverlay {
    pub area: Rect,
    /// Always equal to the requested placement.
    pub placement: Placement,
    /// The panel was shrunk to fit the boundary.
    pub clipped: bool,
    /// The panel was moved along its alignment axis to fit the boundary.
    pub shifted: bool,
}

/// A half-open interval on one axis, in signed coordinates so that
/// pre-clamp positions may go negative.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: i32,
    len: i32,
}

impl Span {
    fn end(self) -> i32 {
        self.start + self.len
    }
}

fn h_span(r: Rect) -> Span {
    Span { start: i32::from(r.x), len: i32::from(r.width) }
}

fn v_span(r: Rect) -> Span {
    Span { start: i32::from(r.y), len: i32::from(r.height) }
}

/// Line `len` up against `anchor` according to `align`.
fn align_on(anchor: Span, len: i32, align: Align) -> i32 {
    match align {
        Align::Start => anchor.start,
        Align::Center => anchor.start + (anchor.len - len) / 2,
        Align::End => anchor.end() - len,
    }
}

/// Shift `start` so `[start, start+len)` lies inside `bound`; `len` must
/// already fit.  Returns the new start and whether it moved.
fn shift_into(start: i32, len: i32, bound: Span) -> (i32, bool) {
    let max_start = bound.end() - len;
    let clamped = start.clamp(bound.start, max_start.max(bound.start));
    (clamped, clamped != start)
}

/// Place a `width × height` panel next to `anchor` inside `boundary`.
pub fn position(
    anchor: Rect,
    width: u16,
    height: u16,
    boundary: Rect,
    config: PositionerConfig,
) -> PlacedOverlay {
    let placement = config.placement;
    let vertical = matches!(placement.side, Side::Top | Side::Bottom);

    // Alignment axis runs along the anchor's edge; side axis points away.
    let (anchor_align, anchor_side, bound_align, bound_side, want_align, want_side) = if vertical {
        (h_span(anchor), v_span(anchor), h_span(boundary), v_span(boundary), i32::from(width), i32::from(height))
    } else {
        (v_span(anchor), h_span(anchor), v_span(boundary), h_span(boundary), i32::from(height), i32::from(width))
    };

    let mut align_len = want_align;
    let mut align_start = align_on(anchor_align, align_len, placement.align);
    let mut side_len = want_side;
    let mut side_start = match placement.side {
        Side::Bottom | Side::Right => anchor_side.end(),
        Side::Top | Side::Left => anchor_side.start - side_len,
    };
    let mut shifted = false;
    let mut clipped = false;

    if config.prevent_overflow {
        if align_len > bound_align.len {
            align_len = bound_align.len.max(0);
            clipped = true;
        }
        let (start, moved) = shift_into(align_start, align_len, bound_align);
        align_start = start;
        shifted = moved;

        // Stay on the requested side; give up cells instead of flipping.
        match placement.side {
            Side::Bottom | Side::Right => {
                let start = side_start.clamp(bound_side.start, bound_side.end());
                let end = (start + side_len).min(bound_side.end());
                clipped |= end - start < side_len;
                side_start = start;
                side_len = end - start;
            }
            Side::Top | Side::Left => {
                let end = anchor_side.start.clamp(bound_side.start, bound_side.end());
                let start = (end - side_len).max(bound_side.start);
                clipped |= end - start < side_len;
                side_start = start;
                side_len = end - start;
            }
        }
    }

    let to_u16 = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
    let area = if vertical {
        Rect::new(to_u16(align_start), to_u16(side_start), to_u16(align_len), to_u16(side_len))
    } else {
        Rect::new(to_u16(side_start), to_u16(align_start), to_u16(side_len), to_u16(align_len))
    };

    PlacedOverlay {
        area,
        placement,
        clipped,
        shifted,
    }
}
