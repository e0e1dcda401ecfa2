//! Sized collection generators and the dynamic rules that resolve
//! parametrized container shapes.
//!
//! Every builder draws a target size from the registered size generator,
//! then fills the container. De-duplicating backings (sets, maps) count a
//! rejected insert against a consecutive-failure budget and return the
//! collection as accumulated so far when the budget runs out: with true
//! random draws an exact target size may be unreachable, so undershooting
//! is a best-effort outcome, not an error.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::generator::{Generator, SharedGenerator};
use crate::identifier::TypeIdentifier;
use crate::registry::{AnyGenerator, DynamicRule, Registry};

/// Default budget of consecutive rejected inserts before a set or map
/// builder gives up on reaching its target size.
pub const DEFAULT_MAX_FAILED_INSERTS: usize = 100;

/// The shape under which collection builders look up their size generator.
pub fn size_shape() -> TypeIdentifier {
    TypeIdentifier::of("collection-size")
}

fn resolve_size(registry: &dyn Registry) -> Option<SharedGenerator<usize>> {
    registry.lookup(&size_shape())?.downcast::<usize>()
}

/// Generates vectors of a drawn target size. Duplicates are kept, so the
/// target size is always reached exactly.
pub struct VecGenerator<T> {
    size: SharedGenerator<usize>,
    element: SharedGenerator<T>,
}

impl<T> VecGenerator<T> {
    pub fn new(size: SharedGenerator<usize>, element: SharedGenerator<T>) -> Self {
        Self { size, element }
    }
}

impl<T> Generator<Vec<T>> for VecGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> Vec<T> {
        let target = self.size.generate(rng);
        (0..target).map(|_| self.element.generate(rng)).collect()
    }
}

/// Generates hash sets of up to a drawn target size, best effort.
pub struct SetGenerator<T> {
    size: SharedGenerator<usize>,
    element: SharedGenerator<T>,
    max_failed_inserts: usize,
}

impl<T> SetGenerator<T> {
    pub fn new(size: SharedGenerator<usize>, element: SharedGenerator<T>) -> Self {
        Self::with_insert_budget(size, element, DEFAULT_MAX_FAILED_INSERTS)
    }

    pub fn with_insert_budget(
        size: SharedGenerator<usize>,
        element: SharedGenerator<T>,
        max_failed_inserts: usize,
    ) -> Self {
        Self {
            size,
            element,
            max_failed_inserts,
        }
    }
}

impl<T: Eq + Hash> Generator<HashSet<T>> for SetGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> HashSet<T> {
        let target = self.size.generate(rng);
        let mut set = HashSet::new();
        let mut consecutive_failures = 0;
        while set.len() < target && consecutive_failures < self.max_failed_inserts {
            if set.insert(self.element.generate(rng)) {
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
            }
        }
        set
    }
}

/// Ordered-backing counterpart of [`SetGenerator`].
pub struct OrderedSetGenerator<T> {
    size: SharedGenerator<usize>,
    element: SharedGenerator<T>,
    max_failed_inserts: usize,
}

impl<T> OrderedSetGenerator<T> {
    pub fn new(size: SharedGenerator<usize>, element: SharedGenerator<T>) -> Self {
        Self {
            size,
            element,
            max_failed_inserts: DEFAULT_MAX_FAILED_INSERTS,
        }
    }
}

impl<T: Ord> Generator<BTreeSet<T>> for OrderedSetGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> BTreeSet<T> {
        let target = self.size.generate(rng);
        let mut set = BTreeSet::new();
        let mut consecutive_failures = 0;
        while set.len() < target && consecutive_failures < self.max_failed_inserts {
            if set.insert(self.element.generate(rng)) {
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
            }
        }
        set
    }
}

/// Generates hash maps of up to a drawn target size, best effort. A drawn
/// key that is already present counts as a rejected insert and never
/// overwrites the existing entry.
pub struct MapTableGenerator<K, V> {
    size: SharedGenerator<usize>,
    key: SharedGenerator<K>,
    value: SharedGenerator<V>,
    max_failed_inserts: usize,
}

impl<K, V> MapTableGenerator<K, V> {
    pub fn new(
        size: SharedGenerator<usize>,
        key: SharedGenerator<K>,
        value: SharedGenerator<V>,
    ) -> Self {
        Self::with_insert_budget(size, key, value, DEFAULT_MAX_FAILED_INSERTS)
    }

    pub fn with_insert_budget(
        size: SharedGenerator<usize>,
        key: SharedGenerator<K>,
        value: SharedGenerator<V>,
        max_failed_inserts: usize,
    ) -> Self {
        Self {
            size,
            key,
            value,
            max_failed_inserts,
        }
    }
}

impl<K: Eq + Hash, V> Generator<HashMap<K, V>> for MapTableGenerator<K, V> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> HashMap<K, V> {
        let target = self.size.generate(rng);
        let mut map = HashMap::new();
        let mut consecutive_failures = 0;
        while map.len() < target && consecutive_failures < self.max_failed_inserts {
            let key = self.key.generate(rng);
            if map.contains_key(&key) {
                consecutive_failures += 1;
            } else {
                map.insert(key, self.value.generate(rng));
                consecutive_failures = 0;
            }
        }
        map
    }
}

/// Ordered-backing counterpart of [`MapTableGenerator`].
pub struct OrderedMapGenerator<K, V> {
    size: SharedGenerator<usize>,
    key: SharedGenerator<K>,
    value: SharedGenerator<V>,
    max_failed_inserts: usize,
}

impl<K, V> OrderedMapGenerator<K, V> {
    pub fn new(
        size: SharedGenerator<usize>,
        key: SharedGenerator<K>,
        value: SharedGenerator<V>,
    ) -> Self {
        Self {
            size,
            key,
            value,
            max_failed_inserts: DEFAULT_MAX_FAILED_INSERTS,
        }
    }
}

impl<K: Ord, V> Generator<BTreeMap<K, V>> for OrderedMapGenerator<K, V> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> BTreeMap<K, V> {
        let target = self.size.generate(rng);
        let mut map = BTreeMap::new();
        let mut consecutive_failures = 0;
        while map.len() < target && consecutive_failures < self.max_failed_inserts {
            let key = self.key.generate(rng);
            if map.contains_key(&key) {
                consecutive_failures += 1;
            } else {
                map.insert(key, self.value.generate(rng));
                consecutive_failures = 0;
            }
        }
        map
    }
}

/// Rule resolving `vec<X>` from the size generator and the registered
/// generator for `X`.
pub fn vec_rule<T: 'static>() -> DynamicRule {
    DynamicRule::new("vec", |owner, params| {
        let size = resolve_size(owner)?;
        let element = owner.lookup(params.first()?)?.downcast::<T>()?;
        Some(AnyGenerator::new(VecGenerator::new(size, element)))
    })
}

/// Rule resolving `set<X>` with a hash backing. Register before
/// [`ordered_set_rule`] to keep the hash backing as the preferred family
/// member.
pub fn set_rule<T: Eq + Hash + 'static>() -> DynamicRule {
    DynamicRule::new("set", |owner, params| {
        let size = resolve_size(owner)?;
        let element = owner.lookup(params.first()?)?.downcast::<T>()?;
        Some(AnyGenerator::new(SetGenerator::new(size, element)))
    })
}

/// Rule resolving `set<X>` with an ordered backing.
pub fn ordered_set_rule<T: Ord + 'static>() -> DynamicRule {
    DynamicRule::new("set", |owner, params| {
        let size = resolve_size(owner)?;
        let element = owner.lookup(params.first()?)?.downcast::<T>()?;
        Some(AnyGenerator::new(OrderedSetGenerator::new(size, element)))
    })
}

/// Rule resolving `map<K, V>` with a hash backing.
pub fn map_rule<K: Eq + Hash + 'static, V: 'static>() -> DynamicRule {
    DynamicRule::new("map", |owner, params| {
        let [key_shape, value_shape] = params else {
            return None;
        };
        let size = resolve_size(owner)?;
        let key = owner.lookup(key_shape)?.downcast::<K>()?;
        let value = owner.lookup(value_shape)?.downcast::<V>()?;
        Some(AnyGenerator::new(MapTableGenerator::new(size, key, value)))
    })
}

/// Rule resolving `map<K, V>` with an ordered backing.
pub fn ordered_map_rule<K: Ord + 'static, V: 'static>() -> DynamicRule {
    DynamicRule::new("map", |owner, params| {
        let [key_shape, value_shape] = params else {
            return None;
        };
        let size = resolve_size(owner)?;
        let key = owner.lookup(key_shape)?.downcast::<K>()?;
        let value = owner.lookup(value_shape)?.downcast::<V>()?;
        Some(AnyGenerator::new(OrderedMapGenerator::new(size, key, value)))
    })
}
