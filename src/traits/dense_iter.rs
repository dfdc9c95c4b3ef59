use minarrow::Bitmask;

/// Iterator over the valid (non-null) element indices of a contiguous range,
/// using an optional Bitmask. A `None` mask yields every index in the range.
pub struct ValidIndices<'a> {
    idx: usize,
    end: usize,
    mask: Option<&'a Bitmask>,
}

impl<'a> ValidIndices<'a> {
    #[inline(always)]
    pub fn new(start: usize, end: usize, mask: Option<&'a Bitmask>) -> Self {
        Self {
            idx: start,
            end,
            mask,
        }
    }
}

impl<'a> Iterator for ValidIndices<'a> {
    type Item = usize;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        match self.mask {
            None => {
                if self.idx >= self.end {
                    None
                } else {
                    let i = self.idx;
                    self.idx += 1;
                    Some(i)
                }
            }
            Some(m) => {
                while self.idx < self.end {
                    let i = self.idx;
                    self.idx += 1;
                    if m.get(i) {
                        return Some(i);
                    }
                }
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.idx);
        match self.mask {
            None => (remaining, Some(remaining)),
            Some(_) => (0, Some(remaining)),
        }
    }
}
