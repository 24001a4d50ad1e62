//! Fixed-size ASCII rendering of a board.
//!
//! For an `N`×`N` board a frame is `2N` rows of `2N+2` bytes followed by
//! one extra newline:
//!
//! ```text
//! |X| |O|
//! -------
//! | |X| |
//! -------
//! | | | |
//! -------
//!
//! ```
//!
//! Frames are concatenated into the output stream with no delimiter; a
//! reader recovers boundaries from [`frame_len`].

use super::grid::Board;

/// Bytes in one frame for a board of edge `size`.
#[must_use]
pub const fn frame_len(size: usize) -> usize {
    2 * size * (2 * size + 2) + 1
}

/// Immutable rendered snapshot of a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Raw ASCII bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; a frame holds at least its trailing newline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // only ASCII is ever written
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

/// Draw `board` into a new frame.
#[must_use]
pub fn render(board: &Board) -> Frame {
    let size = board.size();
    let mut bytes = Vec::with_capacity(frame_len(size));

    for row in 0..size {
        for col in 0..size {
            bytes.push(b'|');
            bytes.push(board.at(row, col).glyph() as u8);
        }
        bytes.extend_from_slice(b"|\n");

        bytes.resize(bytes.len() + 2 * size + 1, b'-');
        bytes.push(b'\n');
    }
    bytes.push(b'\n');

    Frame { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_frame_len() {
        assert_eq!(frame_len(1), 9);
        assert_eq!(frame_len(3), 49);
        assert_eq!(frame_len(4), 81);
    }

    #[test]
    fn test_render_empty_board() {
        let frame = render(&Board::new(GameConfig::new(3, 3)));
        let expected = "| | | |\n-------\n| | | |\n-------\n| | | |\n-------\n\n";
        assert_eq!(frame.to_string(), expected);
        assert_eq!(frame.len(), frame_len(3));
    }

    #[test]
    fn test_render_glyph_positions() {
        let board = Board::from_glyphs(GameConfig::new(3, 3), "X.O .X. ..O").unwrap();
        let frame = render(&board);
        let text = frame.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "|X| |O|");
        assert_eq!(lines[2], "| |X| |");
        assert_eq!(lines[4], "| | |O|");

        // glyph of (row, col) sits at row * 2 * (2N + 2) + 2 * col + 1
        let row_stride = 2 * (2 * 3 + 2);
        assert_eq!(frame.as_bytes()[2 * row_stride + 2 * 2 + 1], b'O');
    }

    #[test]
    fn test_render_length_for_every_size() {
        for size in 1..=8 {
            let frame = render(&Board::new(GameConfig::new(size, 1)));
            assert_eq!(frame.len(), frame_len(size));
            assert!(!frame.is_empty());
        }
    }
}
