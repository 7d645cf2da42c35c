//! Dash pattern application: rewrites a path into alternating "on"/"off"
//! segments before stroking.
//!
//! The teacher has no dash support (`Stroke` in `stroke.rs` is just a
//! width+color pair); this is new functionality, implemented by flattening
//! curves to line segments (lyon's `Flattened` iterator, the same
//! tolerance-based approach `PathShape::tessellate` already relies on
//! lyon for internally) and walking the flattened polyline, emitting a new
//! `MoveTo`/`LineTo` subpath for each "on" interval of the dash pattern.

use super::{Path, PathElement};
use lyon::math::Point as LyonPoint;

const FLATTEN_TOLERANCE: f32 = 0.25;

/// Splits `path` into dashed subpaths. `pattern` alternates on/off lengths
/// starting with "on"; `phase` offsets into the pattern before the first
/// point. An empty or all-zero pattern returns `path` unchanged.
pub fn apply_dash(path: &Path, pattern: &[f32], phase: f32) -> Path {
    if pattern.is_empty() || pattern.iter().all(|&l| l <= 0.0) {
        return path.clone();
    }

    let lyon_path = path.to_lyon_path();
    let total: f32 = pattern.iter().sum();
    let mut phase = phase.rem_euclid(total);
    let mut pattern_index = 0usize;
    while phase >= pattern[pattern_index] {
        phase -= pattern[pattern_index];
        pattern_index = (pattern_index + 1) % pattern.len();
    }
    let mut remaining = pattern[pattern_index] - phase;
    let mut on = pattern_index % 2 == 0;

    let mut out = Path::new();
    let mut pen_down = false;

    for sub in lyon_path.iter().flattened(FLATTEN_TOLERANCE) {
        use lyon::path::Event;
        match sub {
            Event::Begin { at } => {
                pen_down = false;
                advance_pen(&mut out, at, &mut pen_down, on);
            }
            Event::Line { from, to } => {
                walk_segment(
                    from,
                    to,
                    pattern,
                    &mut pattern_index,
                    &mut remaining,
                    &mut on,
                    &mut out,
                    &mut pen_down,
                );
            }
            Event::End { last, first, close } => {
                if close {
                    walk_segment(
                        last,
                        first,
                        pattern,
                        &mut pattern_index,
                        &mut remaining,
                        &mut on,
                        &mut out,
                        &mut pen_down,
                    );
                }
            }
            Event::Quadratic { .. } | Event::Cubic { .. } => {
                unreachable!("flattened() only yields Begin/Line/End events")
            }
        }
    }

    out
}

fn advance_pen(out: &mut Path, at: LyonPoint, pen_down: &mut bool, on: bool) {
    if on {
        out.move_to([at.x, at.y]);
        *pen_down = true;
    } else {
        *pen_down = false;
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_segment(
    from: LyonPoint,
    to: LyonPoint,
    pattern: &[f32],
    pattern_index: &mut usize,
    remaining: &mut f32,
    on: &mut bool,
    out: &mut Path,
    pen_down: &mut bool,
) {
    let mut cursor = from;
    let mut segment_len = (to - from).length();

    if *on && !*pen_down {
        out.move_to([cursor.x, cursor.y]);
        *pen_down = true;
    }

    while segment_len > *remaining {
        let direction = (to - from) / (to - from).length().max(f32::EPSILON);
        let step_point = cursor + direction * *remaining;

        if *on {
            out.line_to([step_point.x, step_point.y]);
        }

        segment_len -= *remaining;
        cursor = step_point;
        *pattern_index = (*pattern_index + 1) % pattern.len();
        *remaining = pattern[*pattern_index];
        *on = !*on;

        if *on {
            out.move_to([cursor.x, cursor.y]);
            *pen_down = true;
        } else {
            *pen_down = false;
        }
    }

    *remaining -= segment_len;
    if *on {
        out.line_to([to.x, to.y]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpatterned_dash_returns_original_path() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([10.0, 0.0]);
        let dashed = apply_dash(&path, &[], 0.0);
        assert_eq!(dashed.elements().len(), path.elements().len());
    }

    #[test]
    fn simple_dash_pattern_produces_multiple_subpaths() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([100.0, 0.0]);
        let dashed = apply_dash(&path, &[10.0, 10.0], 0.0);
        let move_tos = dashed.elements().iter().filter(|e| matches!(e, PathElement::MoveTo(_))).count();
        assert!(move_tos >= 4, "expected several dash segments, got {move_tos}");
    }

    #[test]
    fn zero_length_dash_off_segments_are_ignored() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([5.0, 0.0]);
        let dashed = apply_dash(&path, &[0.0, 0.0], 0.0);
        // All-zero pattern is treated as "no dashing".
        assert_eq!(dashed.elements().len(), path.elements().len());
    }
}
