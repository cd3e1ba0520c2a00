//! Drawing primitives in page units: origin at the top-left corner, y grows
//! downwards, one unit is `1 / scale` points.

use pdf_writer::{Content, Name, Str};

use crate::fonts::Fonts;

pub(super) type Rgb = [u8; 3];

pub(super) const BLACK: Rgb = [33, 37, 41];
pub(super) const GREY: Rgb = [108, 117, 125];
pub(super) const LIGHT: Rgb = [233, 236, 239];
pub(super) const PALE: Rgb = [248, 249, 250];
pub(super) const WHITE: Rgb = [255, 255, 255];

fn rgb(c: Rgb) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

pub(super) struct Canvas<'f> {
    pub(super) content: Content,
    pub(super) fonts: &'f Fonts,
    pub(super) width: f32,
    height: f32,
}

impl<'f> Canvas<'f> {
    /// A page of `width` x `height` units drawn at `scale` points per unit.
    pub(super) fn new(fonts: &'f Fonts, width: f32, height: f32, scale: f32) -> Self {
        let mut content = Content::new();
        content.transform([scale, 0.0, 0.0, scale, 0.0, 0.0]);
        Self {
            content,
            fonts,
            width,
            height,
        }
    }

    pub(super) fn finish(self) -> Vec<u8> {
        self.content.finish().as_slice().to_vec()
    }

    fn y(&self, top: f32) -> f32 {
        self.height - top
    }

    pub(super) fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.fonts.get(bold).text_width(text, size)
    }

    /// Draw `text` with its top edge at `top`.
    pub(super) fn text(&mut self, x: f32, top: f32, size: f32, bold: bool, color: Rgb, text: &str) {
        if text.is_empty() {
            return;
        }
        let fonts = self.fonts;
        let font = fonts.get(bold);
        let baseline = self.y(top) - size * font.ascender_ratio;
        let (r, g, b) = rgb(color);
        let bytes = font.encode(text);
        self.content
            .set_fill_rgb(r, g, b)
            .begin_text()
            .set_font(Name(font.pdf_name.as_bytes()), size)
            .next_line(x, baseline)
            .show(Str(&bytes))
            .end_text();
    }

    pub(super) fn text_right(&mut self, right: f32, top: f32, size: f32, bold: bool, color: Rgb, text: &str) {
        let w = self.text_width(text, size, bold);
        self.text(right - w, top, size, bold, color, text);
    }

    pub(super) fn text_centered(&mut self, center: f32, top: f32, size: f32, bold: bool, color: Rgb, text: &str) {
        let w = self.text_width(text, size, bold);
        self.text(center - w / 2.0, top, size, bold, color, text);
    }

    /// `text` cut down to `max_width`, ending in "..." when shortened.
    pub(super) fn fit(&self, text: &str, max_width: f32, size: f32, bold: bool) -> String {
        if self.text_width(text, size, bold) <= max_width {
            return text.to_string();
        }
        let ellipsis = self.text_width("...", size, bold);
        let mut out = String::new();
        let mut width = 0.0;
        for ch in text.chars() {
            let w = self.text_width(ch.encode_utf8(&mut [0; 4]), size, bold);
            if width + w + ellipsis > max_width {
                break;
            }
            out.push(ch);
            width += w;
        }
        out.push_str("...");
        out
    }

    /// Greedy word wrap. Words wider than the line are cut with [`Canvas::fit`].
    pub(super) fn wrap(&self, text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
        let space = self.text_width(" ", size, bold);
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            let mut line = String::new();
            let mut line_w = 0.0;
            for word in paragraph.split_whitespace() {
                let word_w = self.text_width(word, size, bold);
                if !line.is_empty() && line_w + space + word_w > max_width {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0.0;
                }
                if line.is_empty() {
                    if word_w > max_width {
                        lines.push(self.fit(word, max_width, size, bold));
                        continue;
                    }
                    line.push_str(word);
                    line_w = word_w;
                } else {
                    line.push(' ');
                    line.push_str(word);
                    line_w += space + word_w;
                }
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Like [`Canvas::wrap`], keeping at most `max_lines` lines. When lines
    /// are dropped the last kept one ends in "..."; returns the kept lines
    /// and the number dropped.
    pub(super) fn wrap_clipped(
        &self,
        text: &str,
        max_width: f32,
        size: f32,
        bold: bool,
        max_lines: usize,
    ) -> (Vec<String>, usize) {
        let mut lines = self.wrap(text, max_width, size, bold);
        if lines.len() <= max_lines {
            return (lines, 0);
        }
        let cut = lines.len() - max_lines;
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let marked = format!("{} ...", last.trim_end_matches("..."));
            *last = self.fit(&marked, max_width, size, bold);
        }
        (lines, cut)
    }

    pub(super) fn fill_rect(&mut self, x: f32, top: f32, w: f32, h: f32, color: Rgb) {
        let (r, g, b) = rgb(color);
        let y = self.y(top + h);
        self.content
            .save_state()
            .set_fill_rgb(r, g, b)
            .rect(x, y, w, h)
            .fill_nonzero()
            .restore_state();
    }

    pub(super) fn stroke_rect(&mut self, x: f32, top: f32, w: f32, h: f32, color: Rgb, width: f32) {
        let (r, g, b) = rgb(color);
        let y = self.y(top + h);
        self.content
            .save_state()
            .set_line_width(width)
            .set_stroke_rgb(r, g, b)
            .rect(x, y, w, h)
            .stroke()
            .restore_state();
    }

    pub(super) fn line(&mut self, x1: f32, top1: f32, x2: f32, top2: f32, color: Rgb, width: f32) {
        self.polyline(&[(x1, top1), (x2, top2)], color, width);
    }

    pub(super) fn polyline(&mut self, points: &[(f32, f32)], color: Rgb, width: f32) {
        let Some((&(x0, t0), rest)) = points.split_first() else {
            return;
        };
        let (r, g, b) = rgb(color);
        let y0 = self.y(t0);
        self.content
            .save_state()
            .set_line_width(width)
            .set_stroke_rgb(r, g, b)
            .move_to(x0, y0);
        for &(x, top) in rest {
            let y = self.y(top);
            self.content.line_to(x, y);
        }
        self.content.stroke().restore_state();
    }

    /// Place an image XObject in the box with top-left corner `(x, top)`.
    pub(super) fn image(&mut self, name: &str, x: f32, top: f32, w: f32, h: f32) {
        let y = self.y(top + h);
        self.content
            .save_state()
            .transform([w, 0.0, 0.0, h, x, y])
            .x_object(Name(name.as_bytes()))
            .restore_state();
    }
}
