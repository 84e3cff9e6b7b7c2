//! Collection size policy.
//!
//! Sizes resolve by exact path, then erased path, then property name, then
//! the default range. A fixed range (`min == max`) yields exactly `min`;
//! anything else draws uniformly from `[min, max)` on every resolution.

use crate::error::GeneratorError;
use beanfill_core::{normalize_key, PropertyPath};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Range of element counts for a container position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    /// Lower bound (inclusive)
    pub min: usize,
    /// Upper bound (exclusive unless equal to `min`)
    pub max: usize,
}

impl SizeRange {
    /// Range used when nothing else is configured.
    pub const DEFAULT: SizeRange = SizeRange { min: 1, max: 5 };

    /// A range; rejects `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self, GeneratorError> {
        if min > max {
            return Err(GeneratorError::InvalidSizeRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A fixed size.
    pub fn fixed(size: usize) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    /// Whether the range yields a single size.
    pub fn is_fixed(&self) -> bool {
        self.min >= self.max
    }

    /// Draw a concrete size.
    pub fn draw(&self, rng: &mut dyn RngCore) -> usize {
        if self.is_fixed() {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-path and per-property size overrides over a default range.
#[derive(Debug, Clone, Default)]
pub struct SizePolicy {
    default: SizeRange,
    paths: HashMap<String, SizeRange>,
    properties: HashMap<String, SizeRange>,
}

impl SizePolicy {
    /// The default range.
    pub fn default_range(&self) -> SizeRange {
        self.default
    }

    /// Replace the default range.
    pub fn set_default(&mut self, range: SizeRange) {
        self.default = range;
    }

    /// Set the range for an exact or erased path.
    pub fn set_path(&mut self, path: &str, range: SizeRange) {
        self.paths.insert(normalize_key(path), range);
    }

    /// Set the range for a property name.
    pub fn set_property(&mut self, property: &str, range: SizeRange) {
        self.properties.insert(normalize_key(property), range);
    }

    /// Resolve the range for a container position.
    pub fn resolve(&self, path: &PropertyPath) -> SizeRange {
        self.paths
            .get(&path.exact_key())
            .or_else(|| self.paths.get(&path.erased_key()))
            .or_else(|| {
                path.property_name()
                    .and_then(|name| self.properties.get(&normalize_key(name)))
            })
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_range_rejected() {
        assert!(matches!(
            SizeRange::new(5, 2),
            Err(GeneratorError::InvalidSizeRange { min: 5, max: 2 })
        ));
        assert!(SizeRange::new(2, 2).is_ok());
    }

    #[test]
    fn test_draw_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = SizeRange::new(2, 4).unwrap();
        for _ in 0..100 {
            let n = range.draw(&mut rng);
            assert!((2..4).contains(&n));
        }
        assert_eq!(SizeRange::fixed(3).draw(&mut rng), 3);
    }

    #[test]
    fn test_resolution_order() {
        let mut policy = SizePolicy::default();
        policy.set_default(SizeRange::fixed(1));
        policy.set_property("Wheels", SizeRange::fixed(2));
        policy.set_path("car.wheels", SizeRange::fixed(3));
        policy.set_path("car.spares[0].wheels", SizeRange::fixed(4));

        let root = PropertyPath::root("car");
        assert_eq!(policy.resolve(&root.child("wheels")), SizeRange::fixed(3));
        assert_eq!(
            policy.resolve(&root.child("spares").index(0).child("wheels")),
            SizeRange::fixed(4)
        );
        assert_eq!(
            policy.resolve(&root.child("spares").index(1).child("wheels")),
            SizeRange::fixed(2)
        );
        assert_eq!(policy.resolve(&root.child("tags")), SizeRange::fixed(1));
    }
}
