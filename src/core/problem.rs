use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;

use crate::core::{OError, Objective, ObjectiveVector, Solution};
use crate::execution::BatchExecution;
use crate::random::RandomStream;

/// The set of valid genotypes.
pub trait SearchSpace<T>: Debug + Send + Sync {
    /// Whether a genotype belongs to the space.
    ///
    /// # Arguments
    ///
    /// * `genotype`: The genotype.
    ///
    /// returns: `bool`
    fn contains(&self, genotype: &T) -> bool;

    /// Whether every genotype of this space also belongs to `other`. A space that does not
    /// override this method never declares itself a subspace, so it can only be used as the
    /// problem's own search space.
    ///
    /// # Arguments
    ///
    /// * `other`: The enclosing space.
    ///
    /// returns: `bool`
    fn is_subspace_of(&self, _other: &Self) -> bool {
        false
    }
}

/// The problem being optimised.
///
/// # Example
/// ```
///  use metarustic::core::{Objective, ObjectiveVector, OError, Problem, SearchSpace};
///  use metarustic::random::RandomStream;
///
///  #[derive(Debug)]
///  struct Interval(f64, f64);
///  impl SearchSpace<f64> for Interval {
///     fn contains(&self, x: &f64) -> bool {
///         (self.0..=self.1).contains(x)
///     }
///  }
///
///  // minimise x^2 on [-10, 10]
///  struct Square {
///     space: Interval,
///     objective: Objective,
///  }
///  impl Problem for Square {
///     type Genotype = f64;
///     type Space = Interval;
///     fn objective(&self) -> &Objective {
///         &self.objective
///     }
///     fn search_space(&self) -> &Interval {
///         &self.space
///     }
///     fn evaluate(&self, x: &f64, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
///         ObjectiveVector::single(x.powi(2))
///     }
///  }
///
///  let problem = Square { space: Interval(-10.0, 10.0), objective: Objective::minimise() };
///  let value = problem.evaluate(&3.0, &mut RandomStream::from_seed(1)).unwrap();
///  assert_eq!(value.values(), &[9.0]);
/// ```
pub trait Problem: Send + Sync {
    /// The genotype type.
    type Genotype: Clone + Debug + Send + Sync;
    /// The search space of the genotypes.
    type Space: SearchSpace<Self::Genotype>;

    /// The objective directions and comparator.
    fn objective(&self) -> &Objective;

    /// The problem's own search space.
    fn search_space(&self) -> &Self::Space;

    /// Evaluate one genotype. Stochastic problems must draw from `rng` only.
    ///
    /// # Arguments
    ///
    /// * `genotype`: The genotype.
    /// * `rng`: The stream reserved to this evaluation.
    ///
    /// returns: `Result<ObjectiveVector, OError>`
    fn evaluate(
        &self,
        genotype: &Self::Genotype,
        rng: &mut RandomStream,
    ) -> Result<ObjectiveVector, OError>;
}

/// Evaluate a batch of genotypes. Genotype `i` is evaluated with `rng.fork(i)`. This returns an
/// error if an evaluation fails or returns a vector whose length does not match the problem
/// objective.
///
/// # Arguments
///
/// * `problem`: The problem.
/// * `genotypes`: The genotypes to evaluate.
/// * `rng`: The stream to fork the evaluation streams from.
/// * `execution`: The batch execution strategy.
///
/// returns: `Result<Vec<Solution<P::Genotype>>, OError>`
pub fn evaluate_genotypes<P: Problem + ?Sized>(
    problem: &P,
    genotypes: Vec<P::Genotype>,
    rng: &RandomStream,
    execution: &BatchExecution,
) -> Result<Vec<Solution<P::Genotype>>, OError> {
    debug!("Evaluating {} genotypes", genotypes.len());
    let objectives = execution.try_map(&genotypes, rng, |g, r| {
        let values = problem.evaluate(g, r)?;
        problem.objective().check_length(&values)?;
        Ok(values)
    })?;

    Ok(genotypes
        .into_iter()
        .zip(objectives)
        .map(|(g, o)| Solution::new(g, o))
        .collect())
}

/// A thread-safe evaluation counter. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCounter(Arc<AtomicUsize>);

impl EvaluationCounter {
    /// Create a counter starting at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of counted evaluations.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Count one evaluation and return the count before it.
    pub fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Wrap a problem to count its evaluations against a budget. Once the budget is spent, the
/// wrapped problem is no longer called and the objective's worst sentinel
/// ([`Objective::worst`]) is returned instead, so batch sizes never change. Pair it with
/// [`crate::algorithms::EvaluationBudgetTerminator`] sharing the same counter to stop the run.
///
/// With a parallel [`BatchExecution`], which items of the batch that crosses the budget receive
/// the sentinel depends on thread scheduling.
#[derive(Debug)]
pub struct BudgetedProblem<P: Problem> {
    /// The wrapped problem.
    inner: P,
    /// The shared evaluation counter.
    counter: EvaluationCounter,
    /// The maximum number of evaluations forwarded to `inner`.
    budget: usize,
}

impl<P: Problem> BudgetedProblem<P> {
    /// Wrap a problem.
    ///
    /// # Arguments
    ///
    /// * `inner`: The problem.
    /// * `counter`: The counter to update.
    /// * `budget`: The maximum number of evaluations forwarded to the problem.
    ///
    /// returns: `BudgetedProblem<P>`
    pub fn new(inner: P, counter: EvaluationCounter, budget: usize) -> Self {
        Self {
            inner,
            counter,
            budget,
        }
    }

    /// The wrapped problem.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The shared evaluation counter.
    pub fn counter(&self) -> &EvaluationCounter {
        &self.counter
    }

    /// Whether the budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.counter.count() >= self.budget
    }
}

impl<P: Problem> Problem for BudgetedProblem<P> {
    type Genotype = P::Genotype;
    type Space = P::Space;

    fn objective(&self) -> &Objective {
        self.inner.objective()
    }

    fn search_space(&self) -> &Self::Space {
        self.inner.search_space()
    }

    fn evaluate(
        &self,
        genotype: &Self::Genotype,
        rng: &mut RandomStream,
    ) -> Result<ObjectiveVector, OError> {
        if self.counter.increment() >= self.budget {
            return Ok(self.inner.objective().worst());
        }
        self.inner.evaluate(genotype, rng)
    }
}
