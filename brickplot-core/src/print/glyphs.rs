//! Stroke font
//!
//! Glyphs are drawn on an integer grid `GLYPH_WIDTH` units wide and
//! `GLYPH_HEIGHT` units tall, origin at the bottom left. The built-in font
//! only uses horizontal, vertical and 45° strokes so that every diagonal
//! can be drawn with both axes running together.

/// One pen-down line on the glyph grid: `[[x0, y0], [x1, y1]]`
pub type Stroke = [[i8; 2]; 2];

/// Glyph grid width in units
pub const GLYPH_WIDTH: i8 = 2;

/// Glyph grid height in units
pub const GLYPH_HEIGHT: i8 = 4;

/// Most strokes in any built-in glyph
pub const MAX_GLYPH_STROKES: usize = 8;

/// Source of glyph outlines
pub trait GlyphTable {
    /// Strokes for a character, or `None` if the table has no glyph for it
    fn glyph(&self, ch: char) -> Option<&[Stroke]>;
}

impl<T: GlyphTable + ?Sized> GlyphTable for &T {
    fn glyph(&self, ch: char) -> Option<&[Stroke]> {
        (**self).glyph(ch)
    }
}

/// Built-in block capitals, digits and a little punctuation
///
/// Lookup ignores case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl GlyphTable for BlockFont {
    fn glyph(&self, ch: char) -> Option<&[Stroke]> {
        block_glyph(ch.to_ascii_uppercase())
    }
}

fn block_glyph(ch: char) -> Option<&'static [Stroke]> {
    let strokes: &'static [Stroke] = match ch {
        ' ' => &[],

        '0' => &[
            [[0, 0], [2, 0]],
            [[2, 0], [2, 4]],
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[0, 0], [2, 2]],
        ],
        '1' => &[[[0, 3], [1, 4]], [[1, 4], [1, 0]], [[0, 0], [2, 0]]],
        '2' => &[
            [[0, 4], [2, 4]],
            [[2, 4], [2, 2]],
            [[2, 2], [0, 0]],
            [[0, 0], [2, 0]],
        ],
        '3' => &[
            [[0, 4], [2, 4]],
            [[2, 4], [2, 0]],
            [[2, 0], [0, 0]],
            [[0, 2], [2, 2]],
        ],
        '4' => &[[[0, 4], [0, 2]], [[0, 2], [2, 2]], [[2, 4], [2, 0]]],
        '5' | 'S' => &[
            [[2, 4], [0, 4]],
            [[0, 4], [0, 2]],
            [[0, 2], [2, 2]],
            [[2, 2], [2, 0]],
            [[2, 0], [0, 0]],
        ],
        '6' => &[
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[0, 0], [2, 0]],
            [[2, 0], [2, 2]],
            [[2, 2], [0, 2]],
        ],
        '7' => &[[[0, 4], [2, 4]], [[2, 4], [2, 2]], [[2, 2], [0, 0]]],
        '8' => &[
            [[0, 0], [2, 0]],
            [[2, 0], [2, 4]],
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[0, 2], [2, 2]],
        ],
        '9' => &[
            [[2, 2], [0, 2]],
            [[0, 2], [0, 4]],
            [[0, 4], [2, 4]],
            [[2, 4], [2, 0]],
            [[2, 0], [0, 0]],
        ],

        'A' => &[
            [[0, 0], [0, 3]],
            [[0, 3], [1, 4]],
            [[1, 4], [2, 3]],
            [[2, 3], [2, 0]],
            [[0, 2], [2, 2]],
        ],
        'B' => &[
            [[0, 0], [0, 4]],
            [[0, 4], [1, 4]],
            [[1, 4], [2, 3]],
            [[2, 3], [1, 2]],
            [[1, 2], [2, 1]],
            [[2, 1], [1, 0]],
            [[1, 0], [0, 0]],
            [[0, 2], [1, 2]],
        ],
        'C' => &[[[2, 4], [0, 4]], [[0, 4], [0, 0]], [[0, 0], [2, 0]]],
        'D' => &[
            [[0, 0], [0, 4]],
            [[0, 4], [1, 4]],
            [[1, 4], [2, 3]],
            [[2, 3], [2, 1]],
            [[2, 1], [1, 0]],
            [[1, 0], [0, 0]],
        ],
        'E' => &[
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[0, 0], [2, 0]],
            [[0, 2], [1, 2]],
        ],
        'F' => &[[[2, 4], [0, 4]], [[0, 4], [0, 0]], [[0, 2], [1, 2]]],
        'G' => &[
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[0, 0], [2, 0]],
            [[2, 0], [2, 2]],
            [[2, 2], [1, 2]],
        ],
        'H' => &[[[0, 0], [0, 4]], [[2, 0], [2, 4]], [[0, 2], [2, 2]]],
        'I' => &[[[0, 4], [2, 4]], [[1, 4], [1, 0]], [[0, 0], [2, 0]]],
        'J' => &[[[2, 4], [2, 0]], [[2, 0], [0, 0]], [[0, 0], [0, 1]]],
        'K' => &[[[0, 0], [0, 4]], [[2, 4], [0, 2]], [[0, 2], [2, 0]]],
        'L' => &[[[0, 4], [0, 0]], [[0, 0], [2, 0]]],
        'M' => &[
            [[0, 0], [0, 4]],
            [[0, 4], [1, 3]],
            [[1, 3], [2, 4]],
            [[2, 4], [2, 0]],
        ],
        'N' => &[[[0, 0], [0, 4]], [[0, 4], [2, 2]], [[2, 0], [2, 4]]],
        'O' => &[
            [[0, 0], [2, 0]],
            [[2, 0], [2, 4]],
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
        ],
        'P' => &[
            [[0, 0], [0, 4]],
            [[0, 4], [2, 4]],
            [[2, 4], [2, 2]],
            [[2, 2], [0, 2]],
        ],
        'Q' => &[
            [[0, 0], [2, 0]],
            [[2, 0], [2, 4]],
            [[2, 4], [0, 4]],
            [[0, 4], [0, 0]],
            [[1, 1], [2, 0]],
        ],
        'R' => &[
            [[0, 0], [0, 4]],
            [[0, 4], [2, 4]],
            [[2, 4], [2, 2]],
            [[2, 2], [0, 2]],
            [[0, 2], [2, 0]],
        ],
        'T' => &[[[0, 4], [2, 4]], [[1, 4], [1, 0]]],
        'U' => &[[[0, 4], [0, 0]], [[0, 0], [2, 0]], [[2, 0], [2, 4]]],
        'V' => &[
            [[0, 4], [0, 1]],
            [[0, 1], [1, 0]],
            [[1, 0], [2, 1]],
            [[2, 1], [2, 4]],
        ],
        'W' => &[
            [[0, 4], [0, 0]],
            [[0, 0], [1, 1]],
            [[1, 1], [2, 0]],
            [[2, 0], [2, 4]],
        ],
        'X' => &[
            [[0, 4], [0, 3]],
            [[0, 3], [2, 1]],
            [[2, 1], [2, 0]],
            [[2, 4], [2, 3]],
            [[2, 3], [0, 1]],
            [[0, 1], [0, 0]],
        ],
        'Y' => &[
            [[0, 4], [0, 3]],
            [[0, 3], [1, 2]],
            [[1, 2], [2, 3]],
            [[2, 3], [2, 4]],
            [[1, 2], [1, 0]],
        ],
        'Z' => &[
            [[0, 4], [2, 4]],
            [[2, 4], [2, 3]],
            [[2, 3], [0, 1]],
            [[0, 1], [0, 0]],
            [[0, 0], [2, 0]],
        ],

        '-' => &[[[0, 2], [2, 2]]],
        '+' => &[[[0, 2], [2, 2]], [[1, 1], [1, 3]]],
        '=' => &[[[0, 1], [2, 1]], [[0, 3], [2, 3]]],
        '_' => &[[[0, 0], [2, 0]]],
        '/' => &[[[0, 1], [2, 3]]],
        '.' => &[[[1, 0], [1, 0]]],
        ':' => &[[[1, 1], [1, 1]], [[1, 3], [1, 3]]],
        '!' => &[[[1, 4], [1, 1]], [[1, 0], [1, 0]]],

        _ => return None,
    };
    Some(strokes)
}
