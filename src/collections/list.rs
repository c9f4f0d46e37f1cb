//! Slice accessors with negative-index wraparound.
//!
//! Non-negative indexes count from the front, negative ones from the back:
//! `-1` is the last element, `-len` the first. Anything further out is
//! `None`, never a panic.

/// Resolve a possibly negative index against `len`
pub fn resolve_index(len: usize, index: isize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then_some(index)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

/// Element at `index`, counting from the back when negative
pub fn get_wrapped<T>(items: &[T], index: isize) -> Option<&T> {
    resolve_index(items.len(), index).map(|i| &items[i])
}

/// Mutable element at `index`, counting from the back when negative
pub fn get_wrapped_mut<T>(items: &mut [T], index: isize) -> Option<&mut T> {
    resolve_index(items.len(), index).map(move |i| &mut items[i])
}

/// Element at `index`, or `default` when out of range
pub fn get_or<'a, T>(items: &'a [T], index: isize, default: &'a T) -> &'a T {
    get_wrapped(items, index).unwrap_or(default)
}

/// Replace the element at `index`; returns the old value
///
/// Out-of-range indexes leave the slice untouched and return `None`.
pub fn set_wrapped<T>(items: &mut [T], index: isize, value: T) -> Option<T> {
    get_wrapped_mut(items, index).map(|slot| std::mem::replace(slot, value))
}

pub fn first<T>(items: &[T]) -> Option<&T> {
    items.first()
}

pub fn last<T>(items: &[T]) -> Option<&T> {
    items.last()
}

/// Wraparound accessors as slice methods
pub trait ListExt<T> {
    fn at(&self, index: isize) -> Option<&T>;
    fn at_mut(&mut self, index: isize) -> Option<&mut T>;
}

impl<T> ListExt<T> for [T] {
    fn at(&self, index: isize) -> Option<&T> {
        get_wrapped(self, index)
    }

    fn at_mut(&mut self, index: isize) -> Option<&mut T> {
        get_wrapped_mut(self, index)
    }
}
