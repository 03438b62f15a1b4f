use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal cells.
pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Display column of the char at `char_idx`, walking grapheme clusters
/// so wide characters and combining sequences position the cursor
/// correctly. An index at or past the end returns the full line width.
pub fn col_at_char(s: &str, char_idx: usize) -> usize {
    let mut chars_seen = 0;
    let mut width = 0;
    for grapheme in s.graphemes(true) {
        let grapheme_chars = grapheme.chars().count();
        if chars_seen + grapheme_chars > char_idx {
            return width;
        }
        chars_seen += grapheme_chars;
        width += UnicodeWidthStr::width(grapheme);
    }
    width
}
