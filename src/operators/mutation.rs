use log::debug;

use crate::core::{OError, Problem, SearchSpace};
use crate::execution::BatchExecution;
use crate::random::RandomStream;

/// Mutate a batch of genotypes.
pub trait Mutator<P: Problem>: Send + Sync {
    /// Create one mutated genotype for each given genotype.
    ///
    /// # Arguments
    ///
    /// * `genotypes`: The genotypes to mutate.
    /// * `rng`: The stream to draw from.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Vec<P::Genotype>, OError>`
    fn mutate(
        &self,
        genotypes: &[P::Genotype],
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<P::Genotype>, OError>;
}

/// Mutate one genotype of type `T` in a search space of type `S`.
pub trait Mutation<T, S: ?Sized>: Send + Sync {
    /// Return the mutated copy of a genotype.
    ///
    /// # Arguments
    ///
    /// * `genotype`: The genotype to mutate.
    /// * `rng`: The stream reserved to this genotype.
    /// * `space`: The search space.
    ///
    /// returns: `Result<T, OError>`
    fn mutate_one(&self, genotype: &T, rng: &mut RandomStream, space: &S) -> Result<T, OError>;
}

/// A [`Mutator`] applying a [`Mutation`] to each item of the batch.
#[derive(Debug, Clone)]
pub struct BatchMutator<M> {
    mutation: M,
    execution: BatchExecution,
}

/// Lift a per-item mutation to a batch [`Mutator`]. Genotype `i` is mutated with `rng.fork(i)`.
///
/// # Arguments
///
/// * `mutation`: The per-item mutation.
/// * `execution`: How the batch is run.
///
/// returns: `BatchMutator<M>`
pub fn batch_mutator<M>(mutation: M, execution: BatchExecution) -> BatchMutator<M> {
    BatchMutator {
        mutation,
        execution,
    }
}

impl<P, M> Mutator<P> for BatchMutator<M>
where
    P: Problem,
    M: Mutation<P::Genotype, P::Space>,
{
    fn mutate(
        &self,
        genotypes: &[P::Genotype],
        rng: &RandomStream,
        space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<P::Genotype>, OError> {
        debug!("Mutating {} genotypes", genotypes.len());
        self.execution.try_map(genotypes, rng, |genotype, r| {
            let mutated = self.mutation.mutate_one(genotype, r, space)?;
            if !space.contains(&mutated) {
                return Err(OError::MutationOperator(
                    "batch mutator".to_string(),
                    "The mutated genotype is outside the search space".to_string(),
                ));
            }
            Ok(mutated)
        })
    }
}

/// A [`Mutation`] from a closure.
#[derive(Clone)]
pub struct MutationFn<F>(F);

/// Wrap a closure returning the mutated genotype into a [`Mutation`].
pub fn mutation_fn<F>(f: F) -> MutationFn<F> {
    MutationFn(f)
}

impl<T, S, F> Mutation<T, S> for MutationFn<F>
where
    S: ?Sized,
    F: Fn(&T, &mut RandomStream, &S) -> T + Send + Sync,
{
    fn mutate_one(&self, genotype: &T, rng: &mut RandomStream, space: &S) -> Result<T, OError> {
        Ok((self.0)(genotype, rng, space))
    }
}
