use crate::color::Color;

/// The ordered pool regions without a semantic color are drawn from.
pub const DEFAULT_POOL: [Color; 7] = [
    Color::rgb(0x3B, 0x82, 0xF6), // blue
    Color::rgb(0xEF, 0x44, 0x44), // red
    Color::rgb(0x10, 0xB9, 0x81), // green
    Color::rgb(0xF5, 0x9E, 0x0B), // amber
    Color::rgb(0x8B, 0x5C, 0xF6), // violet
    Color::rgb(0xEC, 0x48, 0x99), // pink
    Color::rgb(0x06, 0xB6, 0xD4), // cyan
];

/// `count` colors from [`DEFAULT_POOL`], never repeating a color in two
/// consecutive positions.
pub fn assign(count: isize) -> Vec<Color> {
    assign_from(&DEFAULT_POOL, count)
}

/// `count` colors walked cyclically from `pool`.
///
/// Starts at `pool[0]` and advances one slot per entry. When the next slot
/// holds the color that was just emitted, the cursor skips one slot further.
/// Only the previous entry is checked, so colors repeat once `count` exceeds
/// the pool size. A single-color pool cannot avoid repeats.
pub fn assign_from(pool: &[Color], count: isize) -> Vec<Color> {
    if count <= 0 || pool.is_empty() {
        return Vec::new();
    }

    let count = count as usize;
    let mut colors = Vec::with_capacity(count);
    let mut cursor = 0;
    colors.push(pool[cursor]);

    while colors.len() < count {
        cursor = (cursor + 1) % pool.len();
        if colors.last() == Some(&pool[cursor]) {
            cursor = (cursor + 1) % pool.len();
        }
        colors.push(pool[cursor]);
    }

    colors
}
