//! # Bounded Arithmetic
//!
//! Integer values pinned to an inclusive range. Every room coordinate is built
//! from these, so a move can never leave the grid: it either lands inside the
//! bounds or is refused.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// An integer clamped to `[min, max]`.
///
/// Equality, ordering and hashing only look at the stored value.
///
/// # Examples
///
/// ```
/// use cryptwalk::Bounded;
///
/// let mut v = Bounded::new(12, 0, 10);
/// assert_eq!(v.value(), 10);
///
/// v.increment();
/// assert_eq!(v.value(), 10);
///
/// // A blocked add leaves the value where it was
/// assert_eq!(v.add(3).value(), 10);
/// assert_eq!(v.add(-3).value(), 7);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounded {
    value: i32,
    min: i32,
    max: i32,
}

impl Bounded {
    /// Creates a bounded value, clamping `value` into range.
    ///
    /// Swapped bounds are reordered rather than rejected.
    pub fn new(value: i32, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// The stored value.
    pub fn value(self) -> i32 {
        self.value
    }

    /// Lower bound (inclusive).
    pub fn min(self) -> i32 {
        self.min
    }

    /// Upper bound (inclusive).
    pub fn max(self) -> i32 {
        self.max
    }

    /// Moves up by one unless already at `max`.
    pub fn increment(&mut self) {
        if self.value < self.max {
            self.value += 1;
        }
    }

    /// Moves down by one unless already at `min`.
    pub fn decrement(&mut self) {
        if self.value > self.min {
            self.value -= 1;
        }
    }

    /// Returns the value moved by `delta`, or `self` unchanged when the result
    /// would fall outside the bounds.
    pub fn add(self, delta: i32) -> Self {
        match self.value.checked_add(delta) {
            Some(moved) if moved >= self.min && moved <= self.max => Self {
                value: moved,
                ..self
            },
            _ => self,
        }
    }

    /// Replaces the value, clamping into range.
    pub fn set(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// True when the value sits on either bound.
    pub fn at_bound(self) -> bool {
        self.value == self.min || self.value == self.max
    }
}

impl PartialEq for Bounded {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Bounded {}

impl PartialOrd for Bounded {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bounded {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Bounded {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl std::fmt::Display for Bounded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_construction_clamps() {
        assert_eq!(Bounded::new(-4, 0, 9).value(), 0);
        assert_eq!(Bounded::new(14, 0, 9).value(), 9);
        assert_eq!(Bounded::new(5, 0, 9).value(), 5);
        assert_eq!(Bounded::new(5, 9, 0).min(), 0);
    }

    #[test]
    fn test_increment_and_decrement_saturate() {
        let mut v = Bounded::new(9, 0, 9);
        v.increment();
        assert_eq!(v.value(), 9);

        let mut v = Bounded::new(0, 0, 9);
        v.decrement();
        assert_eq!(v.value(), 0);
        v.increment();
        assert_eq!(v.value(), 1);
    }

    #[test]
    fn test_blocked_add_keeps_value() {
        let v = Bounded::new(8, 0, 9);
        assert_eq!(v.add(1).value(), 9);
        assert_eq!(v.add(2).value(), 8);
        assert_eq!(v.add(-8).value(), 0);
        assert_eq!(v.add(-9).value(), 8);
        assert_eq!(v.add(i32::MAX).value(), 8);
    }

    #[test]
    fn test_equality_ignores_bounds() {
        assert_eq!(Bounded::new(3, 0, 5), Bounded::new(3, 1, 10));
        assert!(Bounded::new(2, 0, 5) < Bounded::new(3, 0, 5));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Inc,
        Dec,
        Add(i32),
        Set(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Inc),
            Just(Op::Dec),
            (-50i32..50).prop_map(Op::Add),
            (-100i32..100).prop_map(Op::Set),
        ]
    }

    proptest! {
        #[test]
        fn test_value_never_leaves_bounds(
            start in -100i32..100,
            min in -20i32..0,
            span in 0i32..40,
            ops in proptest::collection::vec(op_strategy(), 0..64),
        ) {
            let max = min + span;
            let mut v = Bounded::new(start, min, max);
            prop_assert!(v.value() >= min && v.value() <= max);
            for op in ops {
                match op {
                    Op::Inc => v.increment(),
                    Op::Dec => v.decrement(),
                    Op::Add(d) => v = v.add(d),
                    Op::Set(x) => v.set(x),
                }
                prop_assert!(v.value() >= min && v.value() <= max);
                prop_assert_eq!(v.min(), min);
                prop_assert_eq!(v.max(), max);
            }
        }
    }
}
