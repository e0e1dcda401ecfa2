#![allow(clippy::result_large_err)]

//! # Randcheck - Randomized Test Data for Rust
//!
//! Randcheck is a randomized-testing engine: composable generators of test
//! data, bias-free bounded numeric generation over ranges (fixed-width and
//! arbitrary-precision), a type-directed registry that resolves a
//! generator from a declared value shape, and a runner that drives a check
//! over many freshly drawn argument tuples while tracking skipped and
//! failed trials.
//!
//! ## Quick Start
//!
//! ```rust
//! use randcheck::{
//!     Arguments, MapRegistry, RandomTestRunner, Range, RunnerConfig, TestResult,
//!     TypeIdentifier, argument, I32RangeGenerator,
//! };
//!
//! let registry = MapRegistry::builder()
//!     .with(
//!         TypeIdentifier::of("i32"),
//!         I32RangeGenerator::new(Range::closed(0, 100)),
//!     )
//!     .build();
//!
//! let runner = RandomTestRunner::resolve(
//!     &registry,
//!     &[TypeIdentifier::of("i32")],
//!     |args: Arguments| {
//!         let value = *argument::<i32>(&args, 0).unwrap();
//!         if (0..=100).contains(&value) {
//!             TestResult::ok()
//!         } else {
//!             TestResult::failed(format!("out of range: {}", value))
//!         }
//!     },
//!     RunnerConfig::new(100, 0.0, Some(1)).unwrap(),
//! )
//! .unwrap();
//!
//! assert!(!runner.run_seeded().is_failure());
//! ```

// Public modules
pub mod collections;
pub mod combinator;
pub mod config;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod modifier;
pub mod numeric;
pub mod outcome;
pub mod range;
pub mod registry;
pub mod rng;
pub mod runner;

// Re-export the main public API
pub use collections::{
    DEFAULT_MAX_FAILED_INSERTS, MapTableGenerator, OrderedMapGenerator, OrderedSetGenerator,
    SetGenerator, VecGenerator, map_rule, ordered_map_rule, ordered_set_rule, set_rule, size_shape,
    vec_rule,
};
pub use combinator::{
    DEFAULT_FILTER_RETRIES, Fun1, Fun1Generator, GeneratorExt, co_generate, select,
};
pub use config::{ConfigError, DEFAULT_NB_RUN, GroupConfig, RunnerConfig};
pub use error::CheckError;
pub use generator::{
    BoxedGenerator, CoinGenerator, ConstantGenerator, Generator, OneOfGenerator,
    OneOfGeneratorsGenerator, SharedGenerator, coin, constant, one_of, one_of_generators,
};
pub use identifier::TypeIdentifier;
pub use modifier::Modifiers;
pub use numeric::{
    BigDecimalRangeGenerator, BigIntRangeGenerator, F64RangeGenerator, I32RangeGenerator,
    I64RangeGenerator,
};
pub use outcome::{Failure, TestResult};
pub use range::{DoubleRange, IntRange, LongRange, Range};
pub use registry::{AlternativeRegistry, AnyGenerator, DynamicRegistry, DynamicRule, MapRegistry, Registry};
pub use rng::{DefaultRngProvider, RngProvider, create_rng, create_seeded_rng, derived_stream};
pub use runner::{Arguments, ArgumentsGenerator, Check, RandomTestRunner, argument, arguments_generator};
