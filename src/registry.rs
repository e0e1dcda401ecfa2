//! Type-directed generator lookup.
//!
//! A registry is a pure, total function from a [`TypeIdentifier`] to an
//! optional generator. Generators of different value types live in one
//! table behind [`AnyGenerator`], a type-erased handle recovered by
//! downcast, and registries compose: a fixed table, an ordered
//! fallback chain, and dynamic synthesis rules for parametrized shapes.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::generator::{BoxedGenerator, Generator, SharedGenerator};
use crate::identifier::TypeIdentifier;

/// Object-safe draw channel for erased generators.
trait ErasedGenerator: Send + Sync {
    fn generate_value(&self, rng: &mut dyn rand::RngCore) -> Box<dyn Any>;
}

impl<T: 'static> ErasedGenerator for BoxedGenerator<T> {
    fn generate_value(&self, rng: &mut dyn rand::RngCore) -> Box<dyn Any> {
        Box::new(self.generate(rng))
    }
}

/// A cloneable, type-erased generator handle.
///
/// Holds one underlying generator reachable two ways: typed, via
/// [`AnyGenerator::downcast`], and erased, via
/// [`AnyGenerator::generate_value`] (used by the argument resolver, which
/// cannot know each parameter's type statically).
#[derive(Clone)]
pub struct AnyGenerator {
    concrete: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedGenerator>,
}

impl AnyGenerator {
    /// Erase a concrete generator of `T` values.
    pub fn new<T, G>(generator: G) -> Self
    where
        T: 'static,
        G: Generator<T> + Send + Sync + 'static,
    {
        let shared: Arc<BoxedGenerator<T>> = Arc::new(BoxedGenerator::new(generator));
        Self {
            concrete: shared.clone(),
            erased: shared,
        }
    }

    /// Recover the typed generator, if this handle produces `T` values.
    pub fn downcast<T: 'static>(&self) -> Option<SharedGenerator<T>> {
        Arc::downcast::<BoxedGenerator<T>>(self.concrete.clone())
            .ok()
            .map(SharedGenerator::from_arc)
    }

    /// Draw one value with the static type erased.
    pub fn generate_value(&self, rng: &mut dyn rand::RngCore) -> Box<dyn Any> {
        self.erased.generate_value(rng)
    }
}

/// A type-directed lookup table resolving a shape to a generator.
///
/// Lookup is total and side-effect-free; registries are immutable once
/// built.
pub trait Registry: Send + Sync {
    /// Resolve a generator for the requested shape, or `None`.
    fn lookup(&self, id: &TypeIdentifier) -> Option<AnyGenerator>;
}

/// A registry backed by a fixed table built at construction.
pub struct MapRegistry {
    entries: HashMap<TypeIdentifier, AnyGenerator>,
}

impl MapRegistry {
    /// Start building a map registry.
    pub fn builder() -> MapRegistryBuilder {
        MapRegistryBuilder {
            entries: HashMap::new(),
        }
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Registry for MapRegistry {
    fn lookup(&self, id: &TypeIdentifier) -> Option<AnyGenerator> {
        self.entries.get(id).cloned()
    }
}

/// Builder for [`MapRegistry`].
pub struct MapRegistryBuilder {
    entries: HashMap<TypeIdentifier, AnyGenerator>,
}

impl MapRegistryBuilder {
    /// Register a generator under the given shape.
    ///
    /// # Panics
    /// Panics if the shape is a wildcard: wildcards are query placeholders
    /// and never valid entry keys.
    pub fn with<T, G>(mut self, id: TypeIdentifier, generator: G) -> Self
    where
        T: 'static,
        G: Generator<T> + Send + Sync + 'static,
    {
        if id.is_wildcard() {
            panic!("a wildcard identifier cannot be a registry entry key");
        }
        self.entries.insert(id, AnyGenerator::new(generator));
        self
    }

    /// Finish building.
    pub fn build(self) -> MapRegistry {
        MapRegistry {
            entries: self.entries,
        }
    }
}

/// An ordered fallback chain of registries.
///
/// Lookup tries the delegates strictly in construction order and returns
/// the first hit; earlier delegates take priority by design.
pub struct AlternativeRegistry {
    delegates: Vec<Box<dyn Registry>>,
}

impl AlternativeRegistry {
    /// Chain the given delegates in priority order.
    ///
    /// # Panics
    /// Panics with fewer than two delegates; a single-delegate
    /// "alternative" is a modeling error.
    pub fn new(delegates: Vec<Box<dyn Registry>>) -> Self {
        if delegates.len() < 2 {
            panic!(
                "AlternativeRegistry requires at least 2 delegates, got {}",
                delegates.len()
            );
        }
        Self { delegates }
    }
}

impl Registry for AlternativeRegistry {
    fn lookup(&self, id: &TypeIdentifier) -> Option<AnyGenerator> {
        self.delegates
            .iter()
            .find_map(|delegate| delegate.lookup(id))
    }
}

type ResolveFn =
    dyn Fn(&dyn Registry, &[TypeIdentifier]) -> Option<AnyGenerator> + Send + Sync;

/// One synthesis rule of a [`DynamicRegistry`].
///
/// A rule handles every identifier whose base shape matches; it is invoked
/// with the owning registry so it can recursively resolve the identifier's
/// parameter shapes, and yields `None` whenever any sub-lookup fails —
/// never a partial generator.
pub struct DynamicRule {
    base: String,
    resolve: Box<ResolveFn>,
}

impl DynamicRule {
    /// Create a rule for the given base shape.
    pub fn new<F>(base: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&dyn Registry, &[TypeIdentifier]) -> Option<AnyGenerator> + Send + Sync + 'static,
    {
        Self {
            base: base.into(),
            resolve: Box::new(resolve),
        }
    }

    /// The base shape this rule matches.
    pub fn base(&self) -> &str {
        &self.base
    }
}

/// A registry that synthesizes generators for parametrized shapes on
/// demand, on top of a static table of entries.
///
/// Lookup checks the static table first, then tries the rules in
/// registration order, passing the registry itself so rules can resolve
/// their parameter shapes through it.
pub struct DynamicRegistry {
    statics: HashMap<TypeIdentifier, AnyGenerator>,
    rules: Vec<DynamicRule>,
}

impl DynamicRegistry {
    /// Start building a dynamic registry.
    pub fn builder() -> DynamicRegistryBuilder {
        DynamicRegistryBuilder {
            statics: HashMap::new(),
            rules: Vec::new(),
        }
    }
}

impl Registry for DynamicRegistry {
    fn lookup(&self, id: &TypeIdentifier) -> Option<AnyGenerator> {
        if let Some(found) = self.statics.get(id) {
            return Some(found.clone());
        }
        if id.is_wildcard() {
            return None;
        }
        self.rules
            .iter()
            .filter(|rule| rule.base == id.base())
            .find_map(|rule| (rule.resolve)(self, id.params()))
    }
}

/// Builder for [`DynamicRegistry`].
pub struct DynamicRegistryBuilder {
    statics: HashMap<TypeIdentifier, AnyGenerator>,
    rules: Vec<DynamicRule>,
}

impl DynamicRegistryBuilder {
    /// Register a static entry.
    ///
    /// # Panics
    /// Panics if the shape is a wildcard.
    pub fn with<T, G>(mut self, id: TypeIdentifier, generator: G) -> Self
    where
        T: 'static,
        G: Generator<T> + Send + Sync + 'static,
    {
        if id.is_wildcard() {
            panic!("a wildcard identifier cannot be a registry entry key");
        }
        self.statics.insert(id, AnyGenerator::new(generator));
        self
    }

    /// Register a synthesis rule.
    pub fn with_rule(mut self, rule: DynamicRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Finish building.
    pub fn build(self) -> DynamicRegistry {
        DynamicRegistry {
            statics: self.statics,
            rules: self.rules,
        }
    }
}
