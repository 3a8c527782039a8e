use log::debug;

use crate::core::{OError, Problem, SearchSpace};
use crate::execution::BatchExecution;
use crate::random::RandomStream;

/// Recombine pairs of parents into offspring.
pub trait Crossover<P: Problem>: Send + Sync {
    /// Create one child for each pair of parents.
    ///
    /// # Arguments
    ///
    /// * `parent_pairs`: The parents.
    /// * `rng`: The stream to draw from.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Vec<P::Genotype>, OError>`
    fn cross(
        &self,
        parent_pairs: &[(P::Genotype, P::Genotype)],
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<P::Genotype>, OError>;
}

/// Recombine two genotypes of type `T` in a search space of type `S`.
pub trait Recombination<T, S: ?Sized>: Send + Sync {
    /// Create a child from two parents.
    ///
    /// # Arguments
    ///
    /// * `first`: The first parent.
    /// * `second`: The second parent.
    /// * `rng`: The stream reserved to this child.
    /// * `space`: The search space.
    ///
    /// returns: `Result<T, OError>`
    fn recombine(&self, first: &T, second: &T, rng: &mut RandomStream, space: &S)
        -> Result<T, OError>;
}

/// A [`Crossover`] applying a [`Recombination`] to each pair of the batch.
#[derive(Debug, Clone)]
pub struct BatchCrossover<R> {
    recombination: R,
    execution: BatchExecution,
}

/// Lift a per-pair recombination to a batch [`Crossover`]. Pair `i` is recombined with
/// `rng.fork(i)`.
///
/// # Arguments
///
/// * `recombination`: The per-pair recombination.
/// * `execution`: How the batch is run.
///
/// returns: `BatchCrossover<R>`
pub fn batch_crossover<R>(recombination: R, execution: BatchExecution) -> BatchCrossover<R> {
    BatchCrossover {
        recombination,
        execution,
    }
}

impl<P, R> Crossover<P> for BatchCrossover<R>
where
    P: Problem,
    R: Recombination<P::Genotype, P::Space>,
{
    fn cross(
        &self,
        parent_pairs: &[(P::Genotype, P::Genotype)],
        rng: &RandomStream,
        space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<P::Genotype>, OError> {
        debug!("Recombining {} pairs of parents", parent_pairs.len());
        self.execution
            .try_map(parent_pairs, rng, |(first, second), r| {
                let child = self.recombination.recombine(first, second, r, space)?;
                if !space.contains(&child) {
                    return Err(OError::CrossoverOperator(
                        "batch crossover".to_string(),
                        "The child is outside the search space".to_string(),
                    ));
                }
                Ok(child)
            })
    }
}

/// A [`Recombination`] from a closure.
#[derive(Clone)]
pub struct RecombinationFn<F>(F);

/// Wrap a closure returning one child into a [`Recombination`].
pub fn recombination_fn<F>(f: F) -> RecombinationFn<F> {
    RecombinationFn(f)
}

impl<T, S, F> Recombination<T, S> for RecombinationFn<F>
where
    S: ?Sized,
    F: Fn(&T, &T, &mut RandomStream, &S) -> T + Send + Sync,
{
    fn recombine(
        &self,
        first: &T,
        second: &T,
        rng: &mut RandomStream,
        space: &S,
    ) -> Result<T, OError> {
        Ok((self.0)(first, second, rng, space))
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::{BlendRecombination, BoxSpace, SphereProblem};
    use crate::core::OError;
    use crate::execution::BatchExecution;
    use crate::operators::{batch_crossover, recombination_fn, Crossover};
    use crate::random::RandomStream;

    #[test]
    /// Each child lies between its parents and does not depend on the execution strategy.
    fn test_batch_crossover() {
        let problem = SphereProblem::new(2);
        let space = BoxSpace::new(2, -5.0, 5.0);
        let rng = RandomStream::from_seed(7);
        let pairs: Vec<(Vec<f64>, Vec<f64>)> = (0..10)
            .map(|i| (vec![0.0, i as f64 / 2.0], vec![1.0, -(i as f64) / 2.0]))
            .collect();

        let crossover = batch_crossover(BlendRecombination, BatchExecution::Sequential);
        let children = crossover.cross(&pairs, &rng, &space, &problem).unwrap();
        assert_eq!(children.len(), pairs.len());
        for (child, (first, second)) in children.iter().zip(&pairs) {
            for d in 0..2 {
                let (lo, hi) = if first[d] < second[d] {
                    (first[d], second[d])
                } else {
                    (second[d], first[d])
                };
                assert!(child[d] >= lo && child[d] <= hi);
            }
        }

        let parallel = batch_crossover(BlendRecombination, BatchExecution::parallel(3).unwrap());
        assert_eq!(parallel.cross(&pairs, &rng, &space, &problem).unwrap(), children);
    }

    #[test]
    /// A child outside the search space is rejected.
    fn test_batch_crossover_outside_space() {
        let problem = SphereProblem::new(1);
        let space = BoxSpace::new(1, -1.0, 1.0);
        let crossover = batch_crossover(
            recombination_fn(|a: &Vec<f64>, b: &Vec<f64>, _: &mut RandomStream, _: &BoxSpace| {
                vec![a[0] + b[0]]
            }),
            BatchExecution::Sequential,
        );
        let pairs = vec![(vec![0.9], vec![0.9])];
        let result = crossover.cross(&pairs, &RandomStream::from_seed(1), &space, &problem);
        assert!(matches!(result, Err(OError::CrossoverOperator(_, _))));
    }
}
