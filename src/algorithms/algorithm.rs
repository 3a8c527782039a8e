use std::fmt::Debug;

use crate::core::{OError, Population, Problem};
use crate::random::RandomStream;

/// An immutable snapshot produced by one step of an [`IterativeAlgorithm`].
pub trait AlgorithmState: Clone + Debug + Send + Sync {
    /// The genotype type of the population.
    type Genotype: Clone + Debug + Send + Sync;

    /// The current population.
    fn population(&self) -> &Population<Self::Genotype>;

    /// The iteration that produced the state. The seeding state has iteration `0`.
    fn iteration(&self) -> usize;

    /// A copy of this state with a different population. This is used by interceptors that
    /// change the population.
    ///
    /// # Arguments
    ///
    /// * `population`: The new population.
    ///
    /// returns: `Self`
    fn with_population(&self, population: Population<Self::Genotype>) -> Self;
}

/// The state of algorithms that only carry a population.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationState<T> {
    /// The population.
    pub population: Population<T>,
    /// The iteration.
    pub iteration: usize,
}

impl<T> PopulationState<T> {
    /// Create a state.
    ///
    /// # Arguments
    ///
    /// * `population`: The population.
    /// * `iteration`: The iteration that produced the population.
    ///
    /// returns: `PopulationState<T>`
    pub fn new(population: Population<T>, iteration: usize) -> Self {
        Self {
            population,
            iteration,
        }
    }
}

impl<T: Clone + Debug + Send + Sync> AlgorithmState for PopulationState<T> {
    type Genotype = T;

    fn population(&self) -> &Population<T> {
        &self.population
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn with_population(&self, population: Population<T>) -> Self {
        Self {
            population,
            iteration: self.iteration,
        }
    }
}

/// An algorithm that evolves a state generation by generation. Both operations must be pure given
/// their inputs: every random number is drawn from the supplied stream, so that the same inputs
/// always produce the same state.
pub trait IterativeAlgorithm<P: Problem>: Send + Sync {
    /// The state produced by each step.
    type State: AlgorithmState<Genotype = P::Genotype>;

    /// The algorithm name.
    fn name(&self) -> String;

    /// Create the seeding state (usually by creating and evaluating the initial population).
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem.
    /// * `space`: The search space to explore.
    /// * `rng`: The stream to draw from.
    ///
    /// returns: `Result<Self::State, OError>`
    fn initialise(
        &self,
        problem: &P,
        space: &P::Space,
        rng: &RandomStream,
    ) -> Result<Self::State, OError>;

    /// Evolve the previous state into the next one. The new state has iteration
    /// `previous.iteration() + 1`.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem.
    /// * `space`: The search space to explore.
    /// * `previous`: The previous state.
    /// * `rng`: The stream to draw from.
    ///
    /// returns: `Result<Self::State, OError>`
    fn execute_step(
        &self,
        problem: &P,
        space: &P::Space,
        previous: &Self::State,
        rng: &RandomStream,
    ) -> Result<Self::State, OError>;
}
