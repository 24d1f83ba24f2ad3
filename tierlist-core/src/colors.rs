//! Tier row colors.

/// Default palette for a fresh tier list, top row first.
pub const DEFAULT_TIER_COLORS: [(&str, &str); 5] = [
    ("S", "#ff7f7f"),
    ("A", "#ffbf7f"),
    ("B", "#ffdf7f"),
    ("C", "#ffff7f"),
    ("D", "#bfff7f"),
];

/// Background color for freshly added text items.
pub const DEFAULT_ITEM_COLOR: &str = "#ffffff";

/// Pick black or white text for a given background color.
///
/// Accepts `#rrggbb` or shorthand `#rgb`, with or without the leading `#`.
/// Unparseable input falls back to white, matching what the UI does for
/// missing colors.
pub fn contrast_color(hex: &str) -> &'static str {
    let hex = hex.trim_start_matches('#');

    let expanded;
    let hex = if hex.len() == 3 {
        expanded = hex
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>();
        expanded.as_str()
    } else {
        hex
    };

    if hex.len() != 6 {
        return "white";
    }

    let channel = |range: std::ops::Range<usize>| u32::from_str_radix(&hex[range], 16).ok();
    let (r, g, b) = match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => (r, g, b),
        _ => return "white",
    };

    // YIQ luminance
    let yiq = (r * 299 + g * 587 + b * 114) / 1000;
    if yiq >= 128 {
        "black"
    } else {
        "white"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_backgrounds_get_black_text() {
        assert_eq!(contrast_color("#ffffff"), "black");
        assert_eq!(contrast_color("#ffff7f"), "black");
        assert_eq!(contrast_color("ffdf7f"), "black");
    }

    #[test]
    fn dark_backgrounds_get_white_text() {
        assert_eq!(contrast_color("#000000"), "white");
        assert_eq!(contrast_color("#1a1a2e"), "white");
    }

    #[test]
    fn shorthand_hex_expands() {
        assert_eq!(contrast_color("#fff"), "black");
        assert_eq!(contrast_color("#000"), "white");
    }

    #[test]
    fn garbage_falls_back_to_white() {
        assert_eq!(contrast_color(""), "white");
        assert_eq!(contrast_color("#zzz"), "white");
        assert_eq!(contrast_color("#12345"), "white");
    }

    #[test]
    fn default_palette_has_five_rows() {
        assert_eq!(DEFAULT_TIER_COLORS.len(), 5);
        assert_eq!(DEFAULT_TIER_COLORS[0].0, "S");
    }
}
