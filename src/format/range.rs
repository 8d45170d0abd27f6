/// Inclusive byte interval `[start, end]` within an output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    /// First byte.
    pub start: u64,
    /// Last byte, inclusive.
    pub end: u64,
}

impl Range {
    /// A range covering `start..=end`.
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Converts an offset/size pair into an inclusive range.
    ///
    /// A zero size yields `end == start - 1` (wrapping), which
    /// [`Range::is_empty`] recognises.
    pub fn from_offset_and_size(offset: u64, size: u64) -> Self {
        Self {
            start: offset,
            end: offset.wrapping_add(size).wrapping_sub(1),
        }
    }

    /// The range of `size` bytes immediately after `previous`, or starting
    /// at 0 when there is none.
    pub fn following(previous: Option<&Range>, size: u64) -> Self {
        let start = previous.map_or(0, |r| r.end.wrapping_add(1));
        Self::from_offset_and_size(start, size)
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end.wrapping_sub(self.start).wrapping_add(1)
    }

    /// True for the zero-size form built by [`Range::from_offset_and_size`].
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// True when `ranges` start at 0 and each begins right after its predecessor.
pub fn are_contiguous(ranges: &[Range]) -> bool {
    match ranges.first() {
        None => true,
        Some(first) if first.start != 0 => false,
        Some(_) => ranges.windows(2).all(|w| w[1].start == w[0].end + 1),
    }
}
