//! Top-to-bottom flow layout for A4 documents.
//!
//! Blocks are drawn into an in-memory recording so the page count is known
//! before the "Page i of n" footer is stamped onto every page.

use packforge_render::{
    Align, Color, DrawingSurface, PageSize, Paint, Point, RecordingSurface, Rect, Stroke,
    TextStyle, fit_text, wrap_text,
};

pub const MARGIN_MM: f64 = 15.0;
const FOOTER_SPACE_MM: f64 = 12.0;
const BANNER_HEIGHT_MM: f64 = 16.0;
const LABEL_COLUMN_MM: f64 = 48.0;
const CELL_PAD_MM: f64 = 1.5;
const BLOCK_GAP_MM: f64 = 4.0;

fn body() -> TextStyle {
    TextStyle::regular(9.0)
}

fn body_bold() -> TextStyle {
    TextStyle::bold(9.0)
}

/// A table column; `width` is a share of the content width.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: f64,
    pub align: Align,
}

impl Column {
    pub const fn new(title: &'static str, width: f64, align: Align) -> Self {
        Self {
            title,
            width,
            align,
        }
    }
}

pub struct PageComposer {
    page: PageSize,
    recording: RecordingSurface,
    cursor: f64,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageComposer {
    pub fn new() -> Self {
        let page = PageSize::A4;
        let mut recording = RecordingSurface::new();
        recording.begin_page(page);
        Self {
            page,
            recording,
            cursor: MARGIN_MM,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.page.width_mm - 2.0 * MARGIN_MM
    }

    fn bottom_limit(&self) -> f64 {
        self.page.height_mm - MARGIN_MM - FOOTER_SPACE_MM
    }

    pub fn page_count(&self) -> usize {
        self.recording.page_count()
    }

    pub fn new_page(&mut self) {
        self.recording.begin_page(self.page);
        self.cursor = MARGIN_MM;
    }

    /// Break the page unless `height` more millimetres fit. Returns whether a
    /// break happened.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.cursor + height > self.bottom_limit() && self.cursor > MARGIN_MM {
            self.new_page();
            return true;
        }
        false
    }

    pub fn spacer(&mut self, height: f64) {
        self.cursor += height;
    }

    /// Filled title bar across the content width, with an optional
    /// right-aligned note.
    pub fn banner(&mut self, title: &str, note: Option<&str>) {
        let rect = Rect::new(MARGIN_MM, self.cursor, self.content_width(), BANNER_HEIGHT_MM);
        self.recording.rect(rect, Paint::Fill(Color::BANNER));

        let title_style = TextStyle::bold(16.0).with_color(Color::WHITE);
        let baseline = rect.y + (rect.height + title_style.ascent_mm()) / 2.0;
        self.recording.text(rect.x + 4.0, baseline, title, &title_style);

        if let Some(note) = note {
            let note_style = TextStyle::bold(10.0)
                .with_color(Color::WHITE)
                .aligned(Align::Right);
            self.recording.text(rect.right() - 4.0, baseline, note, &note_style);
        }
        self.cursor = rect.bottom() + BLOCK_GAP_MM;
    }

    /// Section title with a rule underneath.
    pub fn heading(&mut self, text: &str) {
        let style = TextStyle::bold(11.0).with_color(Color::BANNER);
        self.ensure_space(style.line_height_mm() + 2.0 * body().line_height_mm());
        self.cursor += style.ascent_mm();
        self.recording.text(MARGIN_MM, self.cursor, text, &style);
        self.cursor += 1.2;
        self.recording.line(
            Point::new(MARGIN_MM, self.cursor),
            Point::new(MARGIN_MM + self.content_width(), self.cursor),
            Stroke::solid(Color::GREY, 0.2),
        );
        self.cursor += 2.0;
    }

    /// Label/value rows. Long values wrap under themselves.
    pub fn fields(&mut self, rows: &[(&str, String)]) {
        let value_width = self.content_width() - LABEL_COLUMN_MM;
        let line_height = body().line_height_mm();
        for (label, value) in rows {
            let lines = wrap_text(value, value_width, &body());
            let height = lines.len().max(1) as f64 * line_height;
            self.ensure_space(height);

            let baseline = self.cursor + body().ascent_mm();
            self.recording.text(MARGIN_MM, baseline, label, &body_bold());
            for (idx, line) in lines.iter().enumerate() {
                self.recording.text(
                    MARGIN_MM + LABEL_COLUMN_MM,
                    baseline + idx as f64 * line_height,
                    line,
                    &body(),
                );
            }
            self.cursor += height;
        }
        self.cursor += BLOCK_GAP_MM;
    }

    /// Two titled columns of lines side by side.
    pub fn columns(&mut self, left: (&str, &[String]), right: (&str, &[String])) {
        let gap = 8.0;
        let width = (self.content_width() - gap) / 2.0;
        let line_height = body().line_height_mm();
        let rows = left.1.len().max(right.1.len()) + 1;
        self.ensure_space(rows as f64 * line_height);

        let top = self.cursor;
        for (idx, (title, lines)) in [left, right].into_iter().enumerate() {
            let x = MARGIN_MM + idx as f64 * (width + gap);
            let mut baseline = top + body().ascent_mm();
            self.recording.text(x, baseline, title, &body_bold().with_color(Color::BANNER));
            for line in lines {
                baseline += line_height;
                self.recording.text(x, baseline, &fit_text(line, width, &body()), &body());
            }
        }
        self.cursor = top + rows as f64 * line_height + BLOCK_GAP_MM;
    }

    /// Plain lines, one per entry.
    pub fn lines(&mut self, lines: &[String]) {
        let line_height = body().line_height_mm();
        for line in lines {
            self.ensure_space(line_height);
            self.recording
                .text(MARGIN_MM, self.cursor + body().ascent_mm(), line, &body());
            self.cursor += line_height;
        }
        self.cursor += BLOCK_GAP_MM;
    }

    /// Wrapped free text.
    pub fn paragraph(&mut self, text: &str) {
        let mut wrapped = Vec::new();
        for raw in text.lines() {
            if raw.trim().is_empty() {
                wrapped.push(String::new());
            } else {
                wrapped.extend(wrap_text(raw, self.content_width(), &body()));
            }
        }
        self.lines(&wrapped);
    }

    /// Table with a shaded header row that repeats after every page break.
    /// `totals` rows are set in bold below a rule.
    pub fn table(&mut self, columns: &[Column], rows: &[Vec<String>], totals: &[Vec<String>]) {
        let share: f64 = columns.iter().map(|c| c.width).sum();
        let widths: Vec<f64> = columns
            .iter()
            .map(|c| c.width / share * self.content_width())
            .collect();

        self.ensure_space(3.0 * body().line_height_mm());
        self.table_header(columns, &widths);

        for row in rows {
            let lines = self.cell_lines(row, &widths, &body());
            let height = row_height(&lines);
            if self.ensure_space(height) {
                self.table_header(columns, &widths);
            }
            self.table_row(columns, &widths, &lines, &body());
            self.cursor += height;
            self.recording.line(
                Point::new(MARGIN_MM, self.cursor),
                Point::new(MARGIN_MM + self.content_width(), self.cursor),
                Stroke::solid(Color::LIGHT_GREY, 0.15),
            );
        }

        if !totals.is_empty() {
            self.ensure_space(totals.len() as f64 * body().line_height_mm() + 2.0 * CELL_PAD_MM);
            self.recording.line(
                Point::new(MARGIN_MM, self.cursor),
                Point::new(MARGIN_MM + self.content_width(), self.cursor),
                Stroke::solid(Color::BLACK, 0.3),
            );
            for row in totals {
                let lines = self.cell_lines(row, &widths, &body_bold());
                self.table_row(columns, &widths, &lines, &body_bold());
                self.cursor += row_height(&lines);
            }
        }
        self.cursor += BLOCK_GAP_MM;
    }

    fn cell_lines(&self, row: &[String], widths: &[f64], style: &TextStyle) -> Vec<Vec<String>> {
        widths
            .iter()
            .enumerate()
            .map(|(idx, width)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                wrap_text(text, width - 2.0 * CELL_PAD_MM, style)
            })
            .collect()
    }

    fn table_header(&mut self, columns: &[Column], widths: &[f64]) {
        let height = body_bold().line_height_mm() + 2.0 * CELL_PAD_MM;
        self.recording.rect(
            Rect::new(MARGIN_MM, self.cursor, self.content_width(), height),
            Paint::Fill(Color::LIGHT_GREY),
        );
        let titles: Vec<Vec<String>> = columns.iter().map(|c| vec![c.title.to_string()]).collect();
        self.table_row(columns, widths, &titles, &body_bold());
        self.cursor += height;
    }

    fn table_row(&mut self, columns: &[Column], widths: &[f64], cells: &[Vec<String>], style: &TextStyle) {
        let line_height = style.line_height_mm();
        let mut x = MARGIN_MM;
        for ((column, width), lines) in columns.iter().zip(widths).zip(cells) {
            let anchor = match column.align {
                Align::Left => x + CELL_PAD_MM,
                Align::Center => x + width / 2.0,
                Align::Right => x + width - CELL_PAD_MM,
            };
            let aligned = style.aligned(column.align);
            for (idx, line) in lines.iter().enumerate() {
                let baseline = self.cursor + CELL_PAD_MM + style.ascent_mm() + idx as f64 * line_height;
                self.recording.text(anchor, baseline, line, &aligned);
            }
            x += width;
        }
    }

    /// Signature lines spread across the content width.
    pub fn signatures(&mut self, labels: &[&str]) {
        if labels.is_empty() {
            return;
        }
        let block = 22.0;
        self.ensure_space(block);
        let gap = 10.0;
        let width = (self.content_width() - gap * (labels.len() - 1) as f64) / labels.len() as f64;
        let line_y = self.cursor + 14.0;
        let caption = TextStyle::regular(8.0).with_color(Color::GREY);

        for (idx, label) in labels.iter().enumerate() {
            let x = MARGIN_MM + idx as f64 * (width + gap);
            self.recording.line(
                Point::new(x, line_y),
                Point::new(x + width, line_y),
                Stroke::solid(Color::BLACK, 0.3),
            );
            self.recording
                .text(x, line_y + 1.0 + caption.ascent_mm(), label, &caption);
            self.recording.text(
                x + width,
                line_y + 1.0 + caption.ascent_mm(),
                "Date",
                &caption.aligned(Align::Right),
            );
        }
        self.cursor += block;
    }

    /// Replay the composed pages onto `target`, stamping `footer` and a page
    /// counter at the bottom of each page.
    pub fn finish(self, target: &mut dyn DrawingSurface, footer: &str) {
        let page = self.page;
        let style = TextStyle::regular(7.5).with_color(Color::GREY);
        self.recording.replay_with(target, |surface, idx, total| {
            let rule_y = page.height_mm - MARGIN_MM - FOOTER_SPACE_MM / 2.0;
            surface.line(
                Point::new(MARGIN_MM, rule_y),
                Point::new(page.width_mm - MARGIN_MM, rule_y),
                Stroke::solid(Color::LIGHT_GREY, 0.2),
            );
            let baseline = rule_y + 4.0;
            surface.text(MARGIN_MM, baseline, footer, &style);
            surface.text(
                page.width_mm - MARGIN_MM,
                baseline,
                &format!("Page {} of {}", idx + 1, total),
                &style.aligned(Align::Right),
            );
        });
    }
}

fn row_height(lines: &[Vec<String>]) -> f64 {
    let count = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    count as f64 * body().line_height_mm() + 2.0 * CELL_PAD_MM
}
