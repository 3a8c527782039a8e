use log::info;

use crate::algorithms::AlgorithmState;
use crate::core::{evaluate_genotypes, OError, Population, Problem, Solution};
use crate::execution::BatchExecution;
use crate::random::RandomStream;

/// Transform a freshly computed state before the executor yields it and uses it as the next
/// previous state. An interceptor never sees states older than `previous`.
pub trait Interceptor<S, P: Problem>: Send + Sync {
    /// Transform the state.
    ///
    /// # Arguments
    ///
    /// * `current`: The state produced by the last step, or the seeding state.
    /// * `previous`: The state the step started from. This is `None` for the seeding state.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<S, OError>`
    fn intercept(
        &self,
        current: S,
        previous: Option<&S>,
        space: &P::Space,
        problem: &P,
    ) -> Result<S, OError>;
}

/// Apply interceptors one after the other.
pub struct InterceptorChain<S, P: Problem>(Vec<Box<dyn Interceptor<S, P>>>);

impl<S, P: Problem> InterceptorChain<S, P> {
    /// Chain interceptors.
    ///
    /// # Arguments
    ///
    /// * `interceptors`: The interceptors, in application order.
    ///
    /// returns: `InterceptorChain<S, P>`
    pub fn new(interceptors: Vec<Box<dyn Interceptor<S, P>>>) -> Self {
        Self(interceptors)
    }
}

impl<S, P: Problem> Interceptor<S, P> for InterceptorChain<S, P> {
    fn intercept(
        &self,
        current: S,
        previous: Option<&S>,
        space: &P::Space,
        problem: &P,
    ) -> Result<S, OError> {
        self.0.iter().try_fold(current, |state, interceptor| {
            interceptor.intercept(state, previous, space, problem)
        })
    }
}

/// Remove the solutions whose genotype equals the genotype of an earlier solution.
#[derive(Debug, Clone, Default)]
pub struct DuplicateRemover;

impl<S, P> Interceptor<S, P> for DuplicateRemover
where
    S: AlgorithmState,
    S::Genotype: PartialEq,
    P: Problem,
{
    fn intercept(
        &self,
        current: S,
        _previous: Option<&S>,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<S, OError> {
        let mut unique: Vec<Solution<S::Genotype>> = Vec::new();
        for solution in current.population().iter() {
            if !unique.iter().any(|u| u.genotype() == solution.genotype()) {
                unique.push(solution.clone());
            }
        }
        if unique.len() == current.population().len() {
            return Ok(current);
        }
        Ok(current.with_population(Population::new(unique)))
    }
}

/// Evaluate the population again. Use this when the problem changes over time, so that the
/// objective values of the surviving solutions stay current. The evaluation of the state with
/// iteration `i` uses the stream `rng.fork(i)`.
#[derive(Debug)]
pub struct Reevaluator {
    rng: RandomStream,
    execution: BatchExecution,
}

impl Reevaluator {
    /// Create the interceptor.
    ///
    /// # Arguments
    ///
    /// * `seed`: The seed of the evaluation streams.
    /// * `execution`: How the evaluations are run.
    ///
    /// returns: `Reevaluator`
    pub fn new(seed: u64, execution: BatchExecution) -> Self {
        Self {
            rng: RandomStream::from_seed(seed),
            execution,
        }
    }
}

impl<S, P> Interceptor<S, P> for Reevaluator
where
    S: AlgorithmState<Genotype = P::Genotype>,
    P: Problem,
{
    fn intercept(
        &self,
        current: S,
        _previous: Option<&S>,
        _space: &P::Space,
        problem: &P,
    ) -> Result<S, OError> {
        let genotypes = current
            .population()
            .iter()
            .map(|s| s.genotype().clone())
            .collect();
        let solutions = evaluate_genotypes(
            problem,
            genotypes,
            &self.rng.fork(current.iteration() as u64),
            &self.execution,
        )?;
        Ok(current.with_population(Population::new(solutions)))
    }
}

/// Log the progress of each generation with the `info` level.
#[derive(Debug, Clone, Default)]
pub struct GenerationLogger;

impl<S, P> Interceptor<S, P> for GenerationLogger
where
    S: AlgorithmState,
    P: Problem,
{
    fn intercept(
        &self,
        current: S,
        _previous: Option<&S>,
        _space: &P::Space,
        problem: &P,
    ) -> Result<S, OError> {
        let population = current.population();
        match population.best(problem.objective()) {
            Ok(best) => info!(
                "Generation #{} - {} solutions - best objectives {}",
                current.iteration(),
                population.len(),
                best.objectives()
            ),
            Err(_) => info!(
                "Generation #{} - {} solutions",
                current.iteration(),
                population.len()
            ),
        }
        Ok(current)
    }
}
