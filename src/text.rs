//! Fixed-width text helpers for the 16-column character display.

use core::fmt::{self, Write};

/// Columns on one display row.
pub const DISPLAY_COLS: usize = 16;

/// One display row.  Never longer than [`DISPLAY_COLS`] characters.
pub type Line = heapless::String<DISPLAY_COLS>;

/// Truncate `text` to one display row.
pub fn fit(text: &str) -> Line {
    let mut line = Line::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Format straight into a row, dropping whatever does not fit.
pub fn fit_fmt(args: fmt::Arguments<'_>) -> Line {
    truncate_fmt(args)
}

/// Format into a fixed-capacity string of `N` bytes, cutting at the last
/// whole character that fits.
pub fn truncate_fmt<const N: usize>(args: fmt::Arguments<'_>) -> heapless::String<N> {
    let mut sink = Truncating {
        buf: heapless::String::new(),
        full: false,
    };
    // Truncating never reports an error.
    let _ = sink.write_fmt(args);
    sink.buf
}

struct Truncating<const N: usize> {
    buf: heapless::String<N>,
    /// Set on the first character that did not fit; later pieces are dropped.
    full: bool,
}

impl<const N: usize> Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.buf.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}
