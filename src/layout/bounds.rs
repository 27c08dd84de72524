use crate::foundation::core::{Edges, Point, Rect, Size};

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Horizontal placement of a node inside its parent.
pub enum HorizontalAlignment {
    /// Flush with the parent's left edge plus the left margin.
    #[default]
    Left,
    /// Centered in the parent; margins are ignored.
    Center,
    /// Flush with the parent's right edge minus the right margin.
    Right,
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Vertical placement of a node inside its parent.
pub enum VerticalAlignment {
    /// Flush with the parent's top edge plus the top margin.
    #[default]
    Top,
    /// Centered in the parent; margins are ignored.
    Middle,
    /// Flush with the parent's bottom edge minus the bottom margin.
    Bottom,
}

/// Compute a node rectangle from its candidate size and its parent's bounds.
///
/// A zero candidate axis means "fill the parent along this axis, minus margins". Without a
/// parent the candidate is anchored at the origin unchanged.
pub fn compute_bounds(
    candidate: Size,
    parent: Option<Rect>,
    margin: Edges,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
) -> Rect {
    let Some(parent) = parent else {
        return Rect::from_origin_size(Point::ZERO, candidate);
    };

    let width = if candidate.width != 0.0 {
        candidate.width
    } else {
        (parent.width() - margin.horizontal()).max(0.0)
    };
    let height = if candidate.height != 0.0 {
        candidate.height
    } else {
        (parent.height() - margin.vertical()).max(0.0)
    };

    let x = match h_align {
        HorizontalAlignment::Left => parent.x0 + margin.left,
        HorizontalAlignment::Right => parent.x0 + parent.width() - width - margin.right,
        HorizontalAlignment::Center => parent.x0 + (parent.width() - width) / 2.0,
    };
    let y = match v_align {
        VerticalAlignment::Top => parent.y0 + margin.top,
        VerticalAlignment::Bottom => parent.y0 + parent.height() - height - margin.bottom,
        VerticalAlignment::Middle => parent.y0 + (parent.height() - height) / 2.0,
    };

    Rect::from_origin_size(Point::new(x, y), Size::new(width, height))
}

/// Largest size with `natural`'s aspect ratio that fits inside `within`.
pub fn aspect_fit_size(natural: Size, within: Size) -> Size {
    if natural.width <= 0.0
        || natural.height <= 0.0
        || within.width <= 0.0
        || within.height <= 0.0
    {
        return Size::ZERO;
    }
    // Pin the limiting axis to `within` exactly so callers don't see 399.99999 widths.
    if within.width / natural.width <= within.height / natural.height {
        Size::new(within.width, natural.height * within.width / natural.width)
    } else {
        Size::new(natural.width * within.height / natural.height, within.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bounds.rs"]
mod tests;
