//! Character-grid layout for the compose box.
//!
//! The buffer is split into visual rows: hard breaks at `\n`, soft breaks
//! when the next character would overflow the inner width. Wrapping is per
//! character so every byte offset maps to exactly one screen cell.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Left + right border
pub(super) const BORDER_COLS: u16 = 2;
/// Top + bottom border
pub(super) const BORDER_ROWS: u16 = 2;

/// A visual row as a byte range of the buffer. A hard break's `\n` lies
/// between `end` of one row and `start` of the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

pub(super) fn inner_width(outer: u16) -> u16 {
    outer.saturating_sub(BORDER_COLS)
}

/// Visual rows for `buffer` at `width` columns. Never empty.
pub(super) fn rows(buffer: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;

    for (i, ch) in buffer.char_indices() {
        if ch == '\n' {
            rows.push(Row { start, end: i });
            start = i + 1;
            col = 0;
            continue;
        }
        let w = ch.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(Row { start, end: i });
            start = i;
            col = 0;
        }
        col += w;
    }
    rows.push(Row {
        start,
        end: buffer.len(),
    });
    // A full last row leaves the end-of-text cursor on a fresh row
    if col >= width {
        rows.push(Row {
            start: buffer.len(),
            end: buffer.len(),
        });
    }
    rows
}

/// Row index and display column of byte offset `pos`.
pub(super) fn locate(buffer: &str, rows: &[Row], pos: usize) -> (usize, u16) {
    let idx = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let row = rows.get(idx).copied().unwrap_or_default();
    let upto = pos.clamp(row.start, row.end);
    let col = buffer.get(row.start..upto).map_or(0, UnicodeWidthStr::width);
    (idx, u16::try_from(col).unwrap_or(u16::MAX))
}

/// Byte offset in `row` closest to display column `target` without passing it.
pub(super) fn offset_at(buffer: &str, row: Row, target: u16) -> usize {
    let target = usize::from(target);
    let mut col = 0;
    let Some(text) = buffer.get(row.start..row.end) else {
        return row.start;
    };
    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if col + w > target {
            return row.start + i;
        }
        col += w;
    }
    row.end
}

pub(super) fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
