/// Fixed-size visited set over a row-major grid index.
pub(crate) struct VisitBits {
    words: Vec<u64>,
    len: usize,
}

impl VisitBits {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, i: usize) -> bool {
        i < self.len && (self.words[i >> 6] >> (i & 63)) & 1 != 0
    }

    /// Marks `i`; returns false if it was already marked or out of range.
    #[inline]
    pub(crate) fn insert(&mut self, i: usize) -> bool {
        if i >= self.len || self.contains(i) {
            return false;
        }
        self.words[i >> 6] |= 1u64 << (i & 63);
        true
    }

    pub(crate) fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
