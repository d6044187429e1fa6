//! Splits the unique descriptions into bounded windows for prompting

/// Boundary sequence `0, W, 2W, …` (every multiple of W below N) followed by N.
///
/// Consecutive pairs of boundaries form the chunk ranges. For `len == 0` the
/// sequence is just `[0]`, i.e. no chunks at all.
pub fn boundaries(len: usize, window: usize) -> impl Iterator<Item = usize> {
    let step = window.max(1);
    (0..len).step_by(step).chain(std::iter::once(len))
}

/// A window of the description list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position of this chunk in the run (0-based)
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub descriptions: &'a [String],
}

impl Chunk<'_> {
    /// Join the descriptions into the single string handed to the prompt
    pub fn joined(&self, separator: &str) -> String {
        self.descriptions.join(separator)
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

/// Lazily slice `descriptions` into windows of at most `window` items.
///
/// Zero-length windows are skipped rather than yielded.
pub fn chunks(descriptions: &[String], window: usize) -> impl Iterator<Item = Chunk<'_>> {
    let bounds: Vec<usize> = boundaries(descriptions.len(), window).collect();
    let ranges: Vec<(usize, usize)> = bounds.windows(2).map(|w| (w[0], w[1])).collect();

    ranges
        .into_iter()
        .filter(|(start, end)| end > start)
        .enumerate()
        .map(move |(index, (start, end))| Chunk {
            index,
            start,
            end,
            descriptions: &descriptions[start..end],
        })
}
