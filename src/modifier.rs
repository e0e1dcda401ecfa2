//! Declarative value constraints applied as a chain of generator
//! transforms.
//!
//! A [`Modifiers`] value enumerates the recognized constraints for one
//! generated parameter: excluded values, a range restriction, a custom
//! predicate, and an optional absence rate. How a caller declared them is
//! irrelevant here; they are applied to a base generator left to right, in
//! the fixed order exclude, range, custom predicate, with absence wrapped
//! on last.

use std::sync::Arc;

use crate::combinator::GeneratorExt;
use crate::generator::{BoxedGenerator, Generator};
use crate::range::Range;

/// The recognized constraints for one generated value shape.
pub struct Modifiers<T> {
    exclude: Vec<T>,
    range: Option<Range<T>>,
    filter: Option<Arc<dyn Fn(&T) -> bool + Send + Sync>>,
    nullable: Option<f64>,
}

impl<T> Default for Modifiers<T> {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            range: None,
            filter: None,
            nullable: None,
        }
    }
}

impl<T> Modifiers<T> {
    /// No constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject these exact values.
    pub fn exclude(mut self, values: Vec<T>) -> Self {
        self.exclude = values;
        self
    }

    /// Keep only values inside `range`.
    pub fn within(mut self, range: Range<T>) -> Self {
        self.range = Some(range);
        self
    }

    /// Keep only values satisfying `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }

    /// Allow absence with the given probability.
    ///
    /// # Panics
    /// Panics unless `rate` is in `[0, 1]`.
    pub fn nullable(mut self, rate: f64) -> Self {
        if !(0.0..=1.0).contains(&rate) {
            panic!("nullable probability must be in [0, 1], got {}", rate);
        }
        self.nullable = Some(rate);
        self
    }

    /// The configured absence rate, if any.
    pub fn nullable_rate(&self) -> Option<f64> {
        self.nullable
    }
}

impl<T> Modifiers<T>
where
    T: PartialOrd + Clone + Send + Sync + 'static,
{
    /// Constrain `base` with every configured value constraint, ignoring
    /// the absence rate. Each constraint redraws on rejection, with the
    /// usual filter retry ceiling.
    pub fn apply<G>(&self, base: G) -> BoxedGenerator<T>
    where
        G: Generator<T> + Send + Sync + 'static,
    {
        let mut constrained = base.boxed();
        if !self.exclude.is_empty() {
            let excluded = self.exclude.clone();
            constrained = constrained
                .filter(move |value| !excluded.contains(value))
                .boxed();
        }
        if let Some(range) = &self.range {
            let range = range.clone();
            constrained = constrained.filter(move |value| range.contains(value)).boxed();
        }
        if let Some(predicate) = &self.filter {
            let predicate = Arc::clone(predicate);
            constrained = constrained.filter(move |value| predicate(value)).boxed();
        }
        constrained
    }

    /// Constrain `base` and wrap it with the configured absence rate (or
    /// always-present when no rate was configured).
    pub fn apply_nullable<G>(&self, base: G) -> BoxedGenerator<Option<T>>
    where
        G: Generator<T> + Send + Sync + 'static,
    {
        let constrained = self.apply(base);
        constrained.nullable(self.nullable.unwrap_or(0.0)).boxed()
    }
}
