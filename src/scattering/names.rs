//! Scattering dimension names.
//!
//! A SCoP carries one name per output dimension, used only to keep generated
//! code readable. The engine keeps this list length-synchronized with the
//! matrices: interchange swaps two names, strip-mining splices in two fresh
//! ones. OSL convention names even (scattering) dimensions `b0, b1, ...` and
//! odd (iterator) dimensions `t1, t2, ...`.

use crate::utils::errors::ScopError;
use std::fmt;

/// The ordered per-SCoP list of scattering dimension names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScatterNames(Vec<String>);

impl ScatterNames {
    /// An empty name list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap an explicit name list.
    pub fn from_names(names: Vec<String>) -> Self {
        Self(names)
    }

    /// The canonical `b0, t1, b1, t2, b2, ...` names for `n` output dims.
    pub fn canonical(n: usize) -> Self {
        Self(
            (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        format!("b{}", i / 2)
                    } else {
                        format!("t{}", (i + 1) / 2)
                    }
                })
                .collect(),
        )
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The name of output dimension `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// All names in dimension order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Swap the names of two output dimensions.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), ScopError> {
        let len = self.0.len();
        for index in [a, b] {
            if index >= len {
                return Err(ScopError::NameOutOfRange { index, len });
            }
        }
        self.0.swap(a, b);
        Ok(())
    }

    /// Synthesize a fresh name by probing `<stem>0`, `<stem>1`, ... against
    /// the existing names until one does not collide.
    pub fn fresh(&self, stem: &str) -> String {
        let mut counter = 0usize;
        loop {
            let candidate = format!("{stem}{counter}");
            if !self.0.iter().any(|n| *n == candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Splice two names in at `at`, shifting subsequent names down two slots.
    /// An `at` past the end appends.
    pub fn insert_pair(&mut self, at: usize, first: String, second: String) {
        let at = at.min(self.0.len());
        self.0.insert(at, first);
        self.0.insert(at + 1, second);
    }
}

impl fmt::Display for ScatterNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        let names = ScatterNames::canonical(5);
        assert_eq!(names.as_slice(), &["b0", "t1", "b1", "t2", "b2"]);
    }

    #[test]
    fn test_swap_out_of_range() {
        let mut names = ScatterNames::canonical(3);
        assert!(names.swap(0, 7).is_err());
        names.swap(0, 2).unwrap();
        assert_eq!(names.get(0), Some("b1"));
        assert_eq!(names.get(2), Some("b0"));
    }

    #[test]
    fn test_fresh_probes_past_collisions() {
        let names =
            ScatterNames::from_names(vec!["__b0".to_string(), "__b1".to_string()]);
        assert_eq!(names.fresh("__b"), "__b2");
        assert_eq!(names.fresh("__t1t1"), "__t1t10");
    }

    #[test]
    fn test_insert_pair_shifts() {
        let mut names = ScatterNames::canonical(3);
        names.insert_pair(1, "__t1t10".to_string(), "__b0".to_string());
        assert_eq!(
            names.as_slice(),
            &["b0", "__t1t10", "__b0", "t1", "b1"]
        );
    }
}
