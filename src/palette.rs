//! Colours: default series palette and CSS hex parsing for the painter.

use plotters::style::RGBColor;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [&str; 10] = [
    "#4472C4", // blue
    "#ED7D31", // orange
    "#A5A5A5", // gray
    "#FFC000", // gold
    "#5B9BD5", // light blue
    "#70AD47", // green
    "#264478", // dark blue
    "#9E480E", // dark orange
    "#636363", // dark gray
    "#997300", // brownish gold
];

/// Default colour for the `idx`-th series or category.
#[inline]
pub fn office_hex(idx: usize) -> &'static str {
    OFFICE10[idx % OFFICE10.len()]
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;
    match digits.len() {
        3 => Some(RGBColor(digits[0] * 17, digits[1] * 17, digits[2] * 17)),
        6 => Some(RGBColor(
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        )),
        _ => None,
    }
}

/// Like [`parse_hex_color`], falling back to `fallback` for unparsable input.
pub fn color_or(s: &str, fallback: RGBColor) -> RGBColor {
    parse_hex_color(s).unwrap_or(fallback)
}
