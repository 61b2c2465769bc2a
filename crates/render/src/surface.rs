//! Backend-neutral drawing interface.

use crate::geometry::{PageSize, Point, Rect, pt_to_mm};
use crate::text::text_width_mm;

/// RGB colour, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GREY: Color = Color::rgb(0.55, 0.55, 0.55);
    pub const LIGHT_GREY: Color = Color::rgb(0.92, 0.92, 0.92);
    pub const GUIDE: Color = Color::rgb(0.9, 0.1, 0.3);
    pub const BANNER: Color = Color::rgb(0.13, 0.22, 0.37);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub fn regular(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: false,
            color: Color::BLACK,
            align: Align::Left,
        }
    }

    pub fn bold(size_pt: f64) -> Self {
        Self {
            bold: true,
            ..Self::regular(size_pt)
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Distance from the top of a text line to its baseline.
    pub fn ascent_mm(&self) -> f64 {
        pt_to_mm(self.size_pt) * 0.8
    }

    pub fn line_height_mm(&self) -> f64 {
        pt_to_mm(self.size_pt) * 1.25
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width_mm: f64,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: Color, width_mm: f64) -> Self {
        Self {
            color,
            width_mm,
            dashed: false,
        }
    }

    pub fn dashed(color: Color, width_mm: f64) -> Self {
        Self {
            color,
            width_mm,
            dashed: true,
        }
    }

    pub fn hairline() -> Self {
        Self::solid(Color::BLACK, 0.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Stroke(Stroke),
    Fill(Color),
}

/// Minimal drawing surface shared by every renderer.
///
/// Coordinates are millimetres from the top-left corner of the current page.
/// Text is positioned by its baseline; `style.align` decides whether `x` is
/// the left edge, the centre or the right edge of the run.
pub trait DrawingSurface {
    /// Start a new page; every later call draws on it.
    fn begin_page(&mut self, size: PageSize);

    fn text(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle);

    fn rect(&mut self, rect: Rect, paint: Paint);

    fn line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn page_count(&self) -> usize;

    /// Draw a run of equal-width modules (`true` = dark) filling `area`.
    fn bars(&mut self, area: Rect, modules: &[bool]) {
        if modules.is_empty() {
            return;
        }
        let module_w = area.width / modules.len() as f64;
        let mut idx = 0;
        while idx < modules.len() {
            if !modules[idx] {
                idx += 1;
                continue;
            }
            let start = idx;
            while idx < modules.len() && modules[idx] {
                idx += 1;
            }
            let bar = Rect::new(
                area.x + start as f64 * module_w,
                area.y,
                (idx - start) as f64 * module_w,
                area.height,
            );
            self.rect(bar, Paint::Fill(Color::BLACK));
        }
    }
}

/// Left edge of a text run once alignment is applied.
pub(crate) fn aligned_left(x: f64, text: &str, style: &TextStyle) -> f64 {
    match style.align {
        Align::Left => x,
        Align::Center => x - text_width_mm(text, style) / 2.0,
        Align::Right => x - text_width_mm(text, style),
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f64,
        baseline: f64,
        text: String,
        style: TextStyle,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPage {
    pub size: PageSize,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// In-memory surface: keeps every operation so pages can be inspected or
/// replayed onto another backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pages: Vec<RecordedPage>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    fn current(&mut self) -> &mut RecordedPage {
        if self.pages.is_empty() {
            self.begin_page(PageSize::A4);
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Replay every page onto `target`, in order.
    pub fn replay(&self, target: &mut dyn DrawingSurface) {
        self.replay_with(target, |_, _, _| {});
    }

    /// Replay every page, calling `decorate(target, page_index, page_total)`
    /// after each page's own operations.
    pub fn replay_with(
        &self,
        target: &mut dyn DrawingSurface,
        mut decorate: impl FnMut(&mut dyn DrawingSurface, usize, usize),
    ) {
        let total = self.pages.len();
        for (idx, page) in self.pages.iter().enumerate() {
            target.begin_page(page.size);
            replay_ops(&page.ops, target);
            decorate(target, idx, total);
        }
    }

    /// All text runs across pages, in drawing order.
    pub fn all_texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(RecordedPage::texts).collect()
    }
}

fn replay_ops(ops: &[DrawOp], target: &mut dyn DrawingSurface) {
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                baseline,
                text,
                style,
            } => target.text(*x, *baseline, text, style),
            DrawOp::Rect { rect, paint } => target.rect(*rect, *paint),
            DrawOp::Line { from, to, stroke } => target.line(*from, *to, *stroke),
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_page(&mut self, size: PageSize) {
        self.pages.push(RecordedPage {
            size,
            ops: Vec::new(),
        });
    }

    fn text(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle) {
        self.current().ops.push(DrawOp::Text {
            x,
            baseline,
            text: text.to_string(),
            style: *style,
        });
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        self.current().ops.push(DrawOp::Rect { rect, paint });
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.current().ops.push(DrawOp::Line { from, to, stroke });
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_merge_adjacent_dark_modules() {
        let mut surface = RecordingSurface::new();
        surface.begin_page(PageSize::A4);
        surface.bars(
            Rect::new(0.0, 0.0, 10.0, 5.0),
            &[true, true, false, true, false],
        );

        let rects: Vec<Rect> = surface.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 2);
        assert!((rects[0].width - 4.0).abs() < 1e-9);
        assert!((rects[1].x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn drawing_without_page_opens_a4() {
        let mut surface = RecordingSurface::new();
        surface.text(10.0, 10.0, "hello", &TextStyle::regular(10.0));
        assert_eq!(surface.page_count(), 1);
        assert_eq!(surface.pages()[0].size, PageSize::A4);
        assert!(surface.pages()[0].contains_text("hell"));
    }

    #[test]
    fn replay_reproduces_pages() {
        let mut source = RecordingSurface::new();
        source.begin_page(PageSize::new(100.0, 50.0));
        source.line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), Stroke::hairline());
        source.begin_page(PageSize::A4);
        source.text(1.0, 2.0, "two", &TextStyle::bold(8.0));

        let mut target = RecordingSurface::new();
        source.replay(&mut target);
        assert_eq!(target.pages(), source.pages());
    }
}
