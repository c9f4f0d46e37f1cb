//! Small named tuple types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn swap(self) -> Pair<B, A> {
        Pair::new(self.second, self.first)
    }

    pub fn into_tuple(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((first, second): (A, B)) -> Self {
        Self::new(first, second)
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for Pair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Triple<A, B, C> {
    pub first: A,
    pub second: B,
    pub third: C,
}

impl<A, B, C> Triple<A, B, C> {
    pub fn new(first: A, second: B, third: C) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn into_tuple(self) -> (A, B, C) {
        (self.first, self.second, self.third)
    }
}

impl<A, B, C> From<(A, B, C)> for Triple<A, B, C> {
    fn from((first, second, third): (A, B, C)) -> Self {
        Self::new(first, second, third)
    }
}

impl<A: fmt::Display, B: fmt::Display, C: fmt::Display> fmt::Display for Triple<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.first, self.second, self.third)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair() {
        let pair = Pair::from(("key", 7));
        assert_eq!(pair.to_string(), "(key, 7)");
        assert_eq!(pair.swap(), Pair::new(7, "key"));
        assert_eq!(pair.into_tuple(), ("key", 7));
    }

    #[test]
    fn test_pair_orders_by_first_then_second() {
        let mut pairs = vec![Pair::new(2, 'a'), Pair::new(1, 'b'), Pair::new(1, 'a')];
        pairs.sort();
        assert_eq!(pairs, vec![Pair::new(1, 'a'), Pair::new(1, 'b'), Pair::new(2, 'a')]);
    }

    #[test]
    fn test_triple_serde() {
        let triple = Triple::new(1, "two".to_string(), 3.5);
        let json = serde_json::to_string(&triple).unwrap();
        assert_eq!(json, r#"{"first":1,"second":"two","third":3.5}"#);

        let back: Triple<i32, String, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "(1, two, 3.5)");
    }
}
