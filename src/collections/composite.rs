//! Iterator that drains a list of optional iterators in order.

use std::iter::FusedIterator;

/// Chains any number of iterators; absent (`None`) entries are skipped
///
/// # Example
/// ```
/// use toolbelt::collections::CompositeIter;
///
/// let parts = vec![Some(vec![1, 2].into_iter()), None, Some(vec![3].into_iter())];
/// let all: Vec<i32> = CompositeIter::new(parts).collect();
/// assert_eq!(all, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct CompositeIter<I> {
    parts: std::vec::IntoIter<Option<I>>,
    current: Option<I>,
}

impl<I: Iterator> CompositeIter<I> {
    pub fn new(parts: Vec<Option<I>>) -> Self {
        Self {
            parts: parts.into_iter(),
            current: None,
        }
    }

    /// Build from iterators that are all present
    pub fn from_iters(parts: impl IntoIterator<Item = I>) -> Self {
        Self::new(parts.into_iter().map(Some).collect())
    }
}

impl<I: Iterator> Iterator for CompositeIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(item) = current.next() {
                    return Some(item);
                }
                self.current = None;
            }

            // Advance to the next present iterator, or finish
            self.current = Some(self.parts.by_ref().flatten().next()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut low = 0usize;
        let mut high = Some(0usize);

        let hints = self
            .current
            .iter()
            .chain(self.parts.as_slice().iter().flatten())
            .map(|part| part.size_hint());

        for (part_low, part_high) in hints {
            low = low.saturating_add(part_low);
            high = match (high, part_high) {
                (Some(a), Some(b)) => a.checked_add(b),
                _ => None,
            };
        }

        (low, high)
    }
}

impl<I: Iterator> FusedIterator for CompositeIter<I> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_missing_and_empty_parts() {
        let parts = vec![
            None,
            Some(Vec::<u8>::new().into_iter()),
            Some(vec![1, 2].into_iter()),
            None,
            Some(vec![3].into_iter()),
        ];

        let items: Vec<u8> = CompositeIter::new(parts).collect();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_all_missing_is_empty() {
        let parts: Vec<Option<std::vec::IntoIter<u8>>> = vec![None, None];
        let mut iter = CompositeIter::new(parts);

        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_size_hint_counts_remaining() {
        let mut iter = CompositeIter::from_iters(vec![vec![1, 2].into_iter(), vec![3].into_iter()]);
        assert_eq!(iter.size_hint(), (3, Some(3)));

        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }
}
