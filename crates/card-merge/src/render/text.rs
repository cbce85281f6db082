//! Text measurement and line breaking for builtin fonts

use crate::layout::line_height_mm;
use crate::units::pt_to_mm;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Prefix for each item of a list field
pub const BULLET: &str = "- ";

/// Separator between items of a flat list field
pub const LIST_DELIMITER: char = '|';

/// Characters that fit on one line of `width_mm`
fn chars_per_line(width_mm: f32, font_size_pt: f32) -> usize {
    let char_width = pt_to_mm(font_size_pt) * HELVETICA_CHAR_WIDTH_RATIO;
    ((width_mm / char_width).floor() as usize).max(1)
}

/// Break `text` into lines no wider than `width_mm`.
///
/// Explicit newlines are kept; words longer than a line are split.
pub fn wrap_text(text: &str, width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let max_chars = chars_per_line(width_mm, font_size_pt);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-break words that can never fit
            while word.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }

        if line_len > 0 {
            lines.push(line);
        }
    }

    lines
}

/// Keep only the lines that fit in `height_mm`; the first line always stays
pub fn clip_lines(mut lines: Vec<String>, height_mm: f32, font_size_pt: f32) -> Vec<String> {
    let max_lines = ((height_mm / line_height_mm(font_size_pt)).floor() as usize).max(1);
    lines.truncate(max_lines);
    lines
}

/// Items of a multi-value field.
///
/// A JSON string array is taken as-is, anything else is split on `|`.
pub fn split_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
        }
    }
    trimmed
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lines for a bulleted list, each item wrapped on its own
pub fn bullet_lines(value: &str, width_mm: f32, font_size_pt: f32) -> Vec<String> {
    split_list(value)
        .iter()
        .flat_map(|item| wrap_text(&format!("{}{}", BULLET, item), width_mm, font_size_pt))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Hello world", 100.0, 10.0), vec!["Hello world"]);
        assert!(wrap_text("", 100.0, 10.0).is_empty());
        assert!(wrap_text("   ", 100.0, 10.0).is_empty());
    }

    #[test]
    fn test_wrap_respects_width() {
        // 10pt Helvetica: ~1.76mm per char, so 20mm holds 11 chars
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 20.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 11, "line too long: {:?}", line);
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap_text("abcdefghijklmnopqrstuvwxyz", 10.0, 10.0);
        assert_eq!(lines.concat(), "abcdefghijklmnopqrstuvwxyz");
        assert!(lines.iter().all(|l| l.chars().count() <= 5));
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("one\ntwo", 100.0, 10.0), vec!["one", "two"]);
    }

    #[test]
    fn test_clip_lines() {
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        // 10pt line is ~4.23mm
        assert_eq!(clip_lines(lines.clone(), 13.0, 10.0).len(), 3);
        assert_eq!(clip_lines(lines, 1.0, 10.0).len(), 1);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Fast | Light||Cheap "), vec!["Fast", "Light", "Cheap"]);
        assert_eq!(split_list(r#"["Fast", "", "Light"]"#), vec!["Fast", "Light"]);
        assert!(split_list("").is_empty());
        // Not valid JSON: fall back to the delimiter
        assert_eq!(split_list("[draft|final"), vec!["[draft", "final"]);
    }

    #[test]
    fn test_bullet_lines() {
        let lines = bullet_lines("Fast|Light", 100.0, 10.0);
        assert_eq!(lines, vec!["- Fast", "- Light"]);
    }
}
