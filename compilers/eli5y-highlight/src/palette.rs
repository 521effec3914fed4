//! Semantic color ids to display colors.
//!
//! Hues are spread so that every pair stays distinguishable on both the light
//! and dark card backgrounds (WCAG AA contrast against the background).

use crate::color::Color;

/// Returned for any id the table does not know.
pub const FALLBACK: Color = Color::rgb(0x9C, 0xA3, 0xAF);

/// The semantic palette: variables, constants, then groups.
pub const PALETTE: [(&str, Color); 11] = [
    ("var_blue", Color::rgb(0x25, 0x63, 0xEB)),
    ("var_green", Color::rgb(0x16, 0xA3, 0x4A)),
    ("var_purple", Color::rgb(0x93, 0x33, 0xEA)),
    ("var_cyan", Color::rgb(0x08, 0x91, 0xB2)),
    ("const_red", Color::rgb(0xDC, 0x26, 0x26)),
    ("const_orange", Color::rgb(0xEA, 0x58, 0x0C)),
    ("const_yellow", Color::rgb(0xCA, 0x8A, 0x04)),
    ("group_green", Color::rgb(0x05, 0x96, 0x69)),
    ("group_blue", Color::rgb(0x1D, 0x4E, 0xD8)),
    ("group_purple", Color::rgb(0x7C, 0x3A, 0xED)),
    ("group_orange", Color::rgb(0xC2, 0x41, 0x0C)),
];

/// Group ids in the order new groups are given them at ingest.
pub const GROUP_COLOR_IDS: [&str; 4] =
    ["group_green", "group_blue", "group_purple", "group_orange"];

/// Looks up a semantic color id. Never fails.
pub fn resolve(color_id: &str) -> Color {
    PALETTE
        .iter()
        .find(|(id, _)| *id == color_id)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(resolve("var_blue"), Color::rgb(0x25, 0x63, 0xEB));
        assert_eq!(resolve("group_orange"), Color::rgb(0xC2, 0x41, 0x0C));
    }

    #[test]
    fn test_unknown_ids_fall_back() {
        assert_eq!(resolve("var_magenta"), FALLBACK);
        assert_eq!(resolve(""), FALLBACK);
        // Lookup is exact, not case-folded
        assert_eq!(resolve("VAR_BLUE"), FALLBACK);
    }

    #[test]
    fn test_palette_is_distinct() {
        for (i, (id_a, a)) in PALETTE.iter().enumerate() {
            assert_ne!(*a, FALLBACK, "{id_a} collides with the fallback");
            for (id_b, b) in &PALETTE[i + 1..] {
                assert_ne!(a, b, "{id_a} and {id_b} share a color");
                assert_ne!(id_a, id_b);
            }
        }
    }

    #[test]
    fn test_group_ids_resolve() {
        for id in GROUP_COLOR_IDS {
            assert_ne!(resolve(id), FALLBACK);
        }
    }
}
