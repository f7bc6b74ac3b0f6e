//! Filename labels: Helvetica metrics and truncation.
//!
//! Labels are set in the standard Helvetica font, which every PDF reader
//! ships, so no font program is embedded. The font uses `WinAnsiEncoding`,
//! which agrees with Latin-1 for printable ASCII and U+00A0..=U+00FF, so
//! those characters are drawn as their single code byte
//! ([`win_ansi_bytes`]). Widths come from the Adobe Helvetica AFM (units of
//! 1/1000 em). Anything else is replaced with `?` before measuring so the
//! measured text is exactly the text that gets drawn.

/// Glyph widths for characters 32 (space) through 126 (`~`).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Glyph widths for U+00A0 (no-break space) through U+00FF (`ÿ`).
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // A0..AF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // B0..BF
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // À..Ï
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Ð..ß
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // à..ï
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // ð..ÿ
];

const ELLIPSIS: &str = "...";

fn is_drawable(c: char) -> bool {
    (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c)
}

fn glyph_width(c: char) -> u16 {
    match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        code @ 0xA0..=0xFF => HELVETICA_LATIN1_WIDTHS[(code - 0xA0) as usize],
        _ => HELVETICA_WIDTHS[('?' as u32 - 32) as usize],
    }
}

/// Replace characters Helvetica cannot draw from a single-byte string.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if is_drawable(c) { c } else { '?' })
        .collect()
}

/// Encode sanitized text as WinAnsi string bytes, one byte per character.
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if is_drawable(c) { c as u32 as u8 } else { b'?' })
        .collect()
}

/// Width of `text` in points at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    units as f32 * font_size / 1000.0
}

/// Sanitize `text` and shorten it with a trailing `...` until it fits
/// `max_width`. Returns an empty string if not even the ellipsis fits.
pub fn fit_label(text: &str, max_width: f32, font_size: f32) -> String {
    let text = sanitize(text);
    if text_width(&text, font_size) <= max_width {
        return text;
    }

    let budget = max_width - text_width(ELLIPSIS, font_size);
    if budget < 0.0 {
        return String::new();
    }

    let mut used = 0.0;
    let mut kept = String::new();
    for c in text.chars() {
        let w = glyph_width(c) as f32 * font_size / 1000.0;
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }
    kept.push_str(ELLIPSIS);
    kept
}
