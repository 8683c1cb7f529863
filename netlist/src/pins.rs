use std::ops::Range;

use crate::{ComponentId, Error};

/// Number of input switch lines on the target board.
pub const INPUT_LINES: usize = 8;
/// Number of output LED lines on the target board.
pub const OUTPUT_LINES: usize = 8;

/// Hands out consecutive external pin lines to pin components in traversal order.
#[derive(Debug, Clone)]
pub struct PinCursor {
    kind: &'static str,
    available: usize,
    next: usize,
}

impl PinCursor {
    pub fn inputs() -> PinCursor {
        PinCursor { kind: "input", available: INPUT_LINES, next: 0 }
    }

    pub fn outputs() -> PinCursor {
        PinCursor { kind: "output", available: OUTPUT_LINES, next: 0 }
    }

    /// The first line not yet handed out.
    pub fn next(&self) -> usize {
        self.next
    }

    pub fn available(&self) -> usize {
        self.available
    }

    pub fn take(&mut self, id: ComponentId, count: u32) -> Result<Range<usize>, Error> {
        let start = self.next;
        let end = start + count as usize;
        if end > self.available {
            return Err(Error::PinsExhausted { id, kind: self.kind, line: end - 1, available: self.available });
        }
        self.next = end;
        Ok(start..end)
    }
}
