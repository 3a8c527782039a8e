use log::debug;

use crate::core::{OError, Problem, SearchSpace};
use crate::execution::BatchExecution;
use crate::random::RandomStream;

/// Create the genotypes of the initial population.
pub trait Creator<P: Problem>: Send + Sync {
    /// Create `count` genotypes. All genotypes must belong to `space`.
    ///
    /// # Arguments
    ///
    /// * `count`: The number of genotypes.
    /// * `rng`: The stream to draw from.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Vec<P::Genotype>, OError>`
    fn create(
        &self,
        count: usize,
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<P::Genotype>, OError>;
}

/// Create one genotype of type `T` in a search space of type `S`.
pub trait Creation<T, S: ?Sized>: Send + Sync {
    /// Create one genotype.
    ///
    /// # Arguments
    ///
    /// * `rng`: The stream reserved to this genotype.
    /// * `space`: The search space.
    ///
    /// returns: `Result<T, OError>`
    fn create_one(&self, rng: &mut RandomStream, space: &S) -> Result<T, OError>;
}

/// A [`Creator`] applying a [`Creation`] to each item of the batch.
#[derive(Debug, Clone)]
pub struct BatchCreator<C> {
    creation: C,
    execution: BatchExecution,
}

/// Lift a per-item creation to a batch [`Creator`]. Genotype `i` is created with `rng.fork(i)`.
///
/// # Arguments
///
/// * `creation`: The per-item creation.
/// * `execution`: How the batch is run.
///
/// returns: `BatchCreator<C>`
pub fn batch_creator<C>(creation: C, execution: BatchExecution) -> BatchCreator<C> {
    BatchCreator {
        creation,
        execution,
    }
}

impl<P, C> Creator<P> for BatchCreator<C>
where
    P: Problem,
    C: Creation<P::Genotype, P::Space>,
{
    fn create(
        &self,
        count: usize,
        rng: &RandomStream,
        space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<P::Genotype>, OError> {
        debug!("Creating {count} genotypes");
        self.execution.try_generate(count, rng, |i, r| {
            let genotype = self.creation.create_one(r, space)?;
            if !space.contains(&genotype) {
                return Err(OError::CreatorOperator(
                    "batch creator".to_string(),
                    format!("The genotype #{i} is outside the search space"),
                ));
            }
            Ok(genotype)
        })
    }
}

/// A [`Creation`] from a closure.
#[derive(Clone)]
pub struct CreationFn<F>(F);

/// Wrap a closure returning one genotype into a [`Creation`].
///
/// # Example
/// ```
///  use metarustic::core::{OError, SearchSpace};
///  use metarustic::operators::{creation_fn, Creation};
///  use metarustic::random::RandomStream;
///
///  #[derive(Debug)]
///  struct UnitInterval;
///  impl SearchSpace<f64> for UnitInterval {
///     fn contains(&self, x: &f64) -> bool {
///         (0.0..1.0).contains(x)
///     }
///  }
///
///  let creation = creation_fn(|r: &mut RandomStream, _: &UnitInterval| r.next_double());
///  let x = creation.create_one(&mut RandomStream::from_seed(1), &UnitInterval).unwrap();
///  assert!(UnitInterval.contains(&x));
/// ```
pub fn creation_fn<F>(f: F) -> CreationFn<F> {
    CreationFn(f)
}

impl<T, S, F> Creation<T, S> for CreationFn<F>
where
    S: ?Sized,
    F: Fn(&mut RandomStream, &S) -> T + Send + Sync,
{
    fn create_one(&self, rng: &mut RandomStream, space: &S) -> Result<T, OError> {
        Ok((self.0)(rng, space))
    }
}
