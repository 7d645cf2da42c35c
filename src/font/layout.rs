//! Line breaking and alignment over shaped glyph runs (spec.md §4.H):
//! breaking a run sequence at width boundaries, then aligning the
//! resulting lines and the runs within each line inside a rectangle. No
//! teacher analogue (the teacher hands a whole string straight to
//! `glyphon`'s own layout); this is implemented directly against
//! `GlyphRun`'s already-measured advances.

use super::shaper::GlyphRun;
use crate::geometry::Rectangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Start,
    Center,
    End,
}

/// Breaks `runs` into lines whose summed advance width does not exceed
/// `max_width`, breaking before a run rather than inside one (runs are the
/// shaper's atomic unit here; sub-run breaking would need re-shaping).
/// A single run wider than `max_width` still gets its own line — it is not
/// dropped or truncated.
pub fn break_lines(runs: &[GlyphRun], max_width: f32) -> Vec<Vec<GlyphRun>> {
    if max_width <= 0.0 {
        return vec![runs.to_vec()];
    }
    let mut lines: Vec<Vec<GlyphRun>> = Vec::new();
    let mut current: Vec<GlyphRun> = Vec::new();
    let mut current_width = 0.0f32;

    for run in runs {
        let width = run.advance_width();
        if !current.is_empty() && current_width + width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current_width += width;
        current.push(run.clone());
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Horizontal offset to apply to every run in a line so the line as a
/// whole aligns within `area`.
pub fn align_horizontal(line_width: f32, area: Rectangle, align: HorizontalAlign) -> f32 {
    match align {
        HorizontalAlign::Start => area.min.x,
        HorizontalAlign::Center => area.min.x + (area.width() - line_width) / 2.0,
        HorizontalAlign::End => area.max.x - line_width,
    }
}

/// Vertical offset for the top of the whole block of `line_count` lines of
/// `line_height` each, aligning the block within `area`.
pub fn align_vertical(line_count: usize, line_height: f32, area: Rectangle, align: VerticalAlign) -> f32 {
    let total_height = line_count as f32 * line_height;
    match align {
        VerticalAlign::Start => area.min.y,
        VerticalAlign::Center => area.min.y + (area.height() - total_height) / 2.0,
        VerticalAlign::End => area.max.y - total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::shaper::{Decoration, FaceId, FontMetrics, TextDirection};
    use crate::geometry::Point;

    fn run(width: f32) -> GlyphRun {
        GlyphRun {
            glyphs: vec![crate::font::shaper::Glyph {
                glyph_id: 1,
                codepoint: 'a' as u32,
                pos: Point::new(0.0, 0.0),
                left_caret: 0.0,
                right_caret: width,
                begin_char: 0,
                end_char: 1,
                direction: TextDirection::LeftToRight,
                flags: Default::default(),
            }],
            face: FaceId(1),
            size: 16.0,
            metrics: FontMetrics::default(),
            decoration: Decoration::default(),
            direction: TextDirection::LeftToRight,
            visual_order: 0,
            position: Point::new(0.0, 0.0),
        }
    }

    #[test]
    fn breaks_when_width_exceeded() {
        let runs = vec![run(50.0), run(50.0), run(50.0)];
        let lines = break_lines(&runs, 90.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 1);
        assert_eq!(lines[1].len(), 2);
    }

    #[test]
    fn an_oversized_run_still_gets_its_own_line() {
        let runs = vec![run(500.0)];
        let lines = break_lines(&runs, 90.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn center_alignment_splits_remaining_space_evenly() {
        let area = Rectangle::from_corners((0.0, 0.0), (100.0, 20.0));
        let offset = align_horizontal(40.0, area, HorizontalAlign::Center);
        assert_eq!(offset, 30.0);
    }
}
