//! The generator abstraction and its basic building blocks.

use std::sync::Arc;

/// Core trait for producing one random value of a declared shape.
///
/// A generator is a pure function of its random source: given the same
/// source state it returns the same value, and it owns no state across
/// calls beyond what was captured at construction time.
pub trait Generator<T> {
    /// Draw one value from this generator using the provided source.
    fn generate(&self, rng: &mut dyn rand::RngCore) -> T;
}

/// Internal object-safe trait for type-erased generators.
trait GeneratorObj<T> {
    fn generate_obj(&self, rng: &mut dyn rand::RngCore) -> T;
}

struct GeneratorWrapper<G> {
    inner: G,
}

impl<T, G: Generator<T>> GeneratorObj<T> for GeneratorWrapper<G> {
    fn generate_obj(&self, rng: &mut dyn rand::RngCore) -> T {
        self.inner.generate(rng)
    }
}

/// A generator stored behind a uniform boxed representation.
///
/// This is what registries hold and what combinators produce when the
/// concrete generator type must be erased.
pub struct BoxedGenerator<T> {
    generator: Box<dyn GeneratorObj<T> + Send + Sync>,
}

impl<T> BoxedGenerator<T> {
    /// Box a concrete generator.
    pub fn new<G: Generator<T> + Send + Sync + 'static>(generator: G) -> Self {
        Self {
            generator: Box::new(GeneratorWrapper { inner: generator }),
        }
    }
}

impl<T> Generator<T> for BoxedGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> T {
        self.generator.generate_obj(rng)
    }
}

/// A cheaply-cloneable handle to a boxed generator.
///
/// Registries hand these out so several resolved shapes can share one
/// underlying generator.
pub struct SharedGenerator<T> {
    inner: Arc<BoxedGenerator<T>>,
}

impl<T> SharedGenerator<T> {
    pub(crate) fn from_arc(inner: Arc<BoxedGenerator<T>>) -> Self {
        Self { inner }
    }

    /// Share a concrete generator.
    pub fn new<G: Generator<T> + Send + Sync + 'static>(generator: G) -> Self {
        Self {
            inner: Arc::new(BoxedGenerator::new(generator)),
        }
    }
}

impl<T> Clone for SharedGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Generator<T> for SharedGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> T {
        self.inner.generate(rng)
    }
}

/// A generator that always produces the same value.
#[derive(Debug, Clone)]
pub struct ConstantGenerator<T> {
    value: T,
}

impl<T: Clone> Generator<T> for ConstantGenerator<T> {
    fn generate(&self, _rng: &mut dyn rand::RngCore) -> T {
        self.value.clone()
    }
}

/// Create a generator that ignores its source and always returns `value`.
pub fn constant<T: Clone>(value: T) -> ConstantGenerator<T> {
    ConstantGenerator { value }
}

/// A generator that picks uniformly from a fixed universe of values.
#[derive(Debug, Clone)]
pub struct OneOfGenerator<T> {
    universe: Vec<T>,
}

impl<T: Clone> Generator<T> for OneOfGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> T {
        use rand::Rng;
        let index = rng.gen_range(0..self.universe.len());
        self.universe[index].clone()
    }
}

/// Create a generator that draws one uniform element from `universe`.
///
/// # Panics
/// Panics if `universe` is empty.
pub fn one_of<T: Clone>(universe: Vec<T>) -> OneOfGenerator<T> {
    if universe.is_empty() {
        panic!("one_of cannot be created with an empty universe");
    }
    OneOfGenerator { universe }
}

/// A generator that picks one of several generators uniformly, then
/// delegates the draw to the picked generator.
pub struct OneOfGeneratorsGenerator<T> {
    generators: Vec<BoxedGenerator<T>>,
}

impl<T> Generator<T> for OneOfGeneratorsGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> T {
        use rand::Rng;
        let index = rng.gen_range(0..self.generators.len());
        self.generators[index].generate(rng)
    }
}

/// Create a generator that picks one of `generators` uniformly and invokes it.
///
/// # Panics
/// Panics if `generators` is empty.
pub fn one_of_generators<T>(generators: Vec<BoxedGenerator<T>>) -> OneOfGeneratorsGenerator<T> {
    if generators.is_empty() {
        panic!("one_of_generators cannot be created with an empty universe");
    }
    OneOfGeneratorsGenerator { generators }
}

/// A biased coin: draws one uniform double in `[0, 1]` and returns `true`
/// iff the draw is `<= p`.
#[derive(Debug, Clone, Copy)]
pub struct CoinGenerator {
    p: f64,
}

impl Generator<bool> for CoinGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> bool {
        use rand::Rng;
        rng.r#gen::<f64>() <= self.p
    }
}

/// Create a coin generator with success probability `p`.
///
/// # Panics
/// Panics unless `p` is in `[0, 1]`.
pub fn coin(p: f64) -> CoinGenerator {
    if !(0.0..=1.0).contains(&p) {
        panic!("coin probability must be in [0, 1], got {}", p);
    }
    CoinGenerator { p }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_seeded_rng;

    #[test]
    fn test_constant_generator() {
        let generator = constant(42);
        let mut rng = create_seeded_rng(1);

        for _ in 0..10 {
            assert_eq!(generator.generate(&mut rng), 42);
        }
    }

    #[test]
    fn test_one_of_stays_in_universe() {
        let universe = vec![1, 2, 3, 4, 5];
        let generator = one_of(universe.clone());
        let mut rng = create_seeded_rng(2);

        for _ in 0..50 {
            let value = generator.generate(&mut rng);
            assert!(universe.contains(&value));
        }
    }

    #[test]
    #[should_panic(expected = "empty universe")]
    fn test_one_of_rejects_empty_universe() {
        one_of::<i32>(vec![]);
    }

    #[test]
    fn test_one_of_generators_delegates() {
        let generator = one_of_generators(vec![
            BoxedGenerator::new(constant(1)),
            BoxedGenerator::new(constant(2)),
        ]);
        let mut rng = create_seeded_rng(3);

        for _ in 0..50 {
            let value = generator.generate(&mut rng);
            assert!(value == 1 || value == 2);
        }
    }

    #[test]
    #[should_panic(expected = "empty universe")]
    fn test_one_of_generators_rejects_empty() {
        one_of_generators::<i32>(vec![]);
    }

    #[test]
    fn test_coin_extremes() {
        let mut rng = create_seeded_rng(4);

        let always = coin(1.0);
        let never = coin(0.0);
        for _ in 0..100 {
            assert!(always.generate(&mut rng));
            // p = 0.0 is hit only by an exact 0.0 draw, which a 100-draw
            // run will not produce.
            assert!(!never.generate(&mut rng));
        }
    }

    #[test]
    #[should_panic(expected = "must be in [0, 1]")]
    fn test_coin_rejects_invalid_probability() {
        coin(1.5);
    }

    #[test]
    fn test_coin_is_roughly_fair() {
        let generator = coin(0.5);
        let mut rng = create_seeded_rng(5);
        let heads = (0..1000).filter(|_| generator.generate(&mut rng)).count();
        assert!((350..=650).contains(&heads), "heads: {}", heads);
    }

    #[test]
    fn test_generator_is_deterministic_given_source_state() {
        let generator = one_of(vec![10, 20, 30, 40]);
        let mut rng1 = create_seeded_rng(6);
        let mut rng2 = create_seeded_rng(6);

        for _ in 0..20 {
            assert_eq!(generator.generate(&mut rng1), generator.generate(&mut rng2));
        }
    }

    #[test]
    fn test_shared_generator_clones_share_state() {
        let shared = SharedGenerator::new(constant("x"));
        let clone = shared.clone();
        let mut rng = create_seeded_rng(7);
        assert_eq!(shared.generate(&mut rng), "x");
        assert_eq!(clone.generate(&mut rng), "x");
    }
}
