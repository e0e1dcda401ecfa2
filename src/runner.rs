//! The randomized execution loop.
//!
//! A runner owns one resolved arguments generator, one check, and one
//! configuration, and drives strictly sequential trials over a single
//! random source. Trials fail fast: the first failing trial ends the run
//! and later trials are never attempted. A run that completes all trials
//! is then subjected to the configured skip-rate policy.

use std::any::Any;

use crate::config::RunnerConfig;
use crate::error::CheckError;
use crate::generator::Generator;
use crate::identifier::TypeIdentifier;
use crate::outcome::TestResult;
use crate::registry::{AnyGenerator, Registry};
use crate::rng::{create_rng, create_seeded_rng};

/// One drawn argument tuple, type-erased per position.
pub type Arguments = Vec<Box<dyn Any>>;

/// Borrow the argument at `index` as a `T`, if present and of that type.
pub fn argument<T: 'static>(args: &Arguments, index: usize) -> Option<&T> {
    args.get(index)?.downcast_ref::<T>()
}

/// The user check under randomized execution.
///
/// A check receives one drawn argument tuple and reports the trial's
/// outcome. Closures of the matching shape are checks.
pub trait Check {
    fn invoke(&self, args: Arguments) -> TestResult;
}

impl<F> Check for F
where
    F: Fn(Arguments) -> TestResult,
{
    fn invoke(&self, args: Arguments) -> TestResult {
        self(args)
    }
}

/// Generator of complete argument tuples, one erased draw per declared
/// parameter shape, in declaration order.
pub struct ArgumentsGenerator {
    positions: Vec<AnyGenerator>,
}

impl ArgumentsGenerator {
    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.positions.len()
    }
}

impl Generator<Arguments> for ArgumentsGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore) -> Arguments {
        self.positions
            .iter()
            .map(|position| position.generate_value(rng))
            .collect()
    }
}

/// Resolve a generator for every declared parameter shape.
///
/// Fails with [`CheckError::UnresolvableShape`] naming the first shape the
/// registry cannot resolve; a partially resolved tuple is never returned.
pub fn arguments_generator(
    registry: &dyn Registry,
    shapes: &[TypeIdentifier],
) -> Result<ArgumentsGenerator, CheckError> {
    let positions = shapes
        .iter()
        .map(|shape| {
            registry
                .lookup(shape)
                .ok_or_else(|| CheckError::unresolvable_shape(shape.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArgumentsGenerator { positions })
}

/// Runs one check `nb_run` times against freshly drawn arguments.
pub struct RandomTestRunner<C> {
    arguments: ArgumentsGenerator,
    check: C,
    config: RunnerConfig,
}

impl<C: Check> RandomTestRunner<C> {
    /// Create a runner over an already-resolved arguments generator.
    pub fn new(arguments: ArgumentsGenerator, check: C, config: RunnerConfig) -> Self {
        Self {
            arguments,
            check,
            config,
        }
    }

    /// Resolve the declared shapes against `registry`, then create a runner.
    pub fn resolve(
        registry: &dyn Registry,
        shapes: &[TypeIdentifier],
        check: C,
        config: RunnerConfig,
    ) -> Result<Self, CheckError> {
        Ok(Self::new(
            arguments_generator(registry, shapes)?,
            check,
            config,
        ))
    }

    /// The runner's configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Drive all trials against the provided random source.
    ///
    /// The source is owned by this run for its duration and mutated
    /// sequentially by each trial's argument draw; callers wanting
    /// parallel runs must give each its own independently seeded source.
    pub fn run(&self, rng: &mut dyn rand::RngCore) -> TestResult {
        let mut aggregate = TestResult::Outcome {
            skipped: 0,
            total: 0,
        };
        for _ in 0..self.config.nb_run {
            let args = self.arguments.generate(rng);
            let trial = self.check.invoke(args);
            if trial.is_failure() {
                return trial;
            }
            aggregate = aggregate.merge(trial);
        }

        let TestResult::Outcome { skipped, total } = aggregate else {
            return aggregate;
        };
        match self.config.check_skip_budget(skipped, total) {
            Ok(()) => TestResult::Outcome { skipped, total },
            Err(error) => TestResult::failure(error),
        }
    }

    /// Drive all trials against a source built from the configured seed
    /// policy: the fixed seed when one is set, fresh entropy otherwise.
    pub fn run_seeded(&self) -> TestResult {
        match self.config.seed {
            Some(seed) => self.run(&mut create_seeded_rng(seed)),
            None => self.run(&mut create_rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{constant, one_of};
    use crate::registry::MapRegistry;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn registry() -> MapRegistry {
        MapRegistry::builder()
            .with(TypeIdentifier::of("i32"), one_of((0..100).collect::<Vec<i32>>()))
            .with(TypeIdentifier::of("bool"), constant(true))
            .build()
    }

    fn config(nb_run: u32, accept_skip_rate: f64) -> RunnerConfig {
        RunnerConfig::new(nb_run, accept_skip_rate, Some(42)).unwrap()
    }

    #[test]
    fn test_all_passing_trials_aggregate() {
        let runner = RandomTestRunner::resolve(
            &registry(),
            &[TypeIdentifier::of("i32")],
            |args: Arguments| {
                let value = argument::<i32>(&args, 0).copied();
                assert!(matches!(value, Some(0..=99)));
                TestResult::ok()
            },
            config(10, 0.0),
        )
        .unwrap();

        assert_eq!(
            runner.run_seeded(),
            TestResult::Outcome {
                skipped: 0,
                total: 10
            }
        );
    }

    #[test]
    fn test_fail_fast_stops_after_third_trial() {
        let invocations = AtomicU32::new(0);
        let runner = RandomTestRunner::resolve(
            &registry(),
            &[TypeIdentifier::of("i32")],
            |_args: Arguments| {
                let n = invocations.fetch_add(1, Ordering::Relaxed) + 1;
                if n == 3 {
                    TestResult::failed("third trial fails")
                } else {
                    TestResult::ok()
                }
            },
            config(100, 0.0),
        )
        .unwrap();

        let result = runner.run_seeded();
        assert!(result.is_failure());
        assert_eq!(invocations.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_zero_skip_rate_fails_fully_skipped_run() {
        let runner = RandomTestRunner::resolve(
            &registry(),
            &[TypeIdentifier::of("i32")],
            |_args: Arguments| TestResult::skipped(),
            config(10, 0.0),
        )
        .unwrap();

        assert_eq!(
            runner.run_seeded(),
            TestResult::failure(CheckError::skip_budget_exceeded(10, 0, 10))
        );
    }

    #[test]
    fn test_full_skip_rate_tolerates_fully_skipped_run() {
        let runner = RandomTestRunner::resolve(
            &registry(),
            &[TypeIdentifier::of("i32")],
            |_args: Arguments| TestResult::skipped(),
            config(10, 1.0),
        )
        .unwrap();

        assert_eq!(
            runner.run_seeded(),
            TestResult::Outcome {
                skipped: 10,
                total: 10
            }
        );
    }

    #[test]
    fn test_unresolvable_shape_reports_the_missing_shape() {
        let error = arguments_generator(
            &registry(),
            &[
                TypeIdentifier::of("i32"),
                TypeIdentifier::parameterized("vec", vec![TypeIdentifier::of("string")]),
            ],
        )
        .err()
        .unwrap();

        assert_eq!(error, CheckError::unresolvable_shape("vec<string>"));
    }

    #[test]
    fn test_arguments_arrive_in_declaration_order() {
        let runner = RandomTestRunner::resolve(
            &registry(),
            &[TypeIdentifier::of("bool"), TypeIdentifier::of("i32")],
            |args: Arguments| {
                assert_eq!(args.len(), 2);
                assert_eq!(argument::<bool>(&args, 0), Some(&true));
                assert!(argument::<i32>(&args, 1).is_some());
                TestResult::ok()
            },
            config(5, 0.0),
        )
        .unwrap();

        assert!(!runner.run_seeded().is_failure());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let make = || {
            RandomTestRunner::resolve(
                &registry(),
                &[TypeIdentifier::of("i32")],
                |args: Arguments| {
                    let value = *argument::<i32>(&args, 0).unwrap();
                    if value < 90 {
                        TestResult::ok()
                    } else {
                        TestResult::failed(format!("saw {}", value))
                    }
                },
                config(100, 0.0),
            )
            .unwrap()
        };

        assert_eq!(make().run_seeded(), make().run_seeded());
    }
}
