//! Text metrics for the standard Helvetica faces.

use crate::geometry::pt_to_mm;
use crate::surface::TextStyle;

/// Helvetica advance widths (1/1000 em) for printable ASCII, starting at space.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const BOLD_FACTOR: f64 = 1.06;
const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Width of `text` in millimetres when set in `style`.
pub fn text_width_mm(text: &str, style: &TextStyle) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let factor = if style.bold { BOLD_FACTOR } else { 1.0 };
    pt_to_mm(style.size_pt) * f64::from(units) / 1000.0 * factor
}

/// Shorten `text` with a trailing `...` until it fits `max_width_mm`.
pub fn fit_text(text: &str, max_width_mm: f64, style: &TextStyle) -> String {
    if text_width_mm(text, style) <= max_width_mm {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>().trim_end().to_string() + ELLIPSIS;
        if text_width_mm(&candidate, style) <= max_width_mm {
            return candidate;
        }
    }
    String::new()
}

/// Greedy word wrap into lines no wider than `max_width_mm`.
///
/// Words longer than a whole line are cut with [`fit_text`].
pub fn wrap_text(text: &str, max_width_mm: f64, style: &TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width_mm(&candidate, style) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = fit_text(word, max_width_mm, style);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
