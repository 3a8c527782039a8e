use std::cmp::Ordering;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithms::{AlgorithmState, IterativeAlgorithm};
use crate::core::{evaluate_genotypes, OError, Population, Problem, SearchSpace};
use crate::execution::BatchExecution;
use crate::operators::{CommaSelectionReplacer, Creator, PlusSelectionReplacer, Replacer};
use crate::random::RandomStream;

/// Mutate one genotype of type `T` with a given mutation strength. The strength is the step
/// size adapted by the [`EvolutionStrategy`] (for example the standard deviation of a gaussian
/// perturbation).
pub trait AdaptiveMutation<T, S: ?Sized>: Send + Sync {
    /// Create a mutated copy of a genotype.
    ///
    /// # Arguments
    ///
    /// * `genotype`: The genotype.
    /// * `strength`: The mutation strength.
    /// * `rng`: The stream reserved to this genotype.
    /// * `space`: The search space.
    ///
    /// returns: `Result<T, OError>`
    fn mutate_with_strength(
        &self,
        genotype: &T,
        strength: f64,
        rng: &mut RandomStream,
        space: &S,
    ) -> Result<T, OError>;
}

/// Rechenberg's success rule. When more than `target_ratio` of the offspring improve on their
/// parent, the mutation strength is divided by `factor`; when fewer do, it is multiplied by
/// `factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessRule {
    /// The success ratio to aim for. This defaults to `1/5`.
    pub target_ratio: f64,
    /// The adaptation factor in `(0, 1)`. This defaults to `0.817`.
    pub factor: f64,
}

impl Default for SuccessRule {
    fn default() -> Self {
        Self {
            target_ratio: 0.2,
            factor: 0.817,
        }
    }
}

impl SuccessRule {
    /// Adapt the mutation strength.
    ///
    /// # Arguments
    ///
    /// * `strength`: The current mutation strength.
    /// * `success_ratio`: The share of offspring better than their parent.
    ///
    /// returns: `f64`
    pub fn adapt(&self, strength: f64, success_ratio: f64) -> f64 {
        match success_ratio.total_cmp(&self.target_ratio) {
            Ordering::Greater => strength / self.factor,
            Ordering::Less => strength * self.factor,
            Ordering::Equal => strength,
        }
    }
}

/// Input arguments for the [`EvolutionStrategy`].
pub struct EvolutionStrategyArg<P: Problem> {
    /// The number of parents (`mu`).
    pub parent_count: usize,
    /// The number of offspring created at each generation (`lambda`).
    pub offspring_count: usize,
    /// The operator creating the initial parents.
    pub creator: Box<dyn Creator<P>>,
    /// The mutation applied to a random parent to create each child.
    pub mutator: Box<dyn AdaptiveMutation<P::Genotype, P::Space>>,
    /// Whether the parents compete with the offspring (`mu + lambda`) or are discarded
    /// (`mu, lambda`).
    pub plus_selection: bool,
    /// The initial mutation strength.
    pub initial_strength: f64,
    /// How the mutation strength is adapted. This defaults to [`SuccessRule::default()`].
    pub success_rule: Option<SuccessRule>,
    /// How the offspring are created and evaluated. This defaults to
    /// [`BatchExecution::Sequential`].
    pub execution: Option<BatchExecution>,
}

/// The state of an [`EvolutionStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionStrategyState<T> {
    /// The parents.
    pub population: Population<T>,
    /// The iteration.
    pub iteration: usize,
    /// The mutation strength used by the next generation.
    pub mutation_strength: f64,
    /// The share of offspring that improved on their parent in the generation that produced
    /// this state. This is `None` for the seeding state.
    pub success_ratio: Option<f64>,
}

impl<T: Clone + std::fmt::Debug + Send + Sync> AlgorithmState for EvolutionStrategyState<T> {
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
            ..self.clone()
        }
    }
}

/// The `(mu + lambda)` and `(mu, lambda)` evolution strategies with the success rule.
///
/// Each generation, every child mutates a parent drawn uniformly (stream `rng.fork(0)`, child
/// `i` on its own fork), the children are evaluated (`rng.fork(1)`) and the best `mu`
/// solutions among the parents and the children (plus selection) or among the children only
/// (comma selection) become the next parents (`rng.fork(2)`). A child is successful when it is
/// better than its parent according to [`crate::core::Objective::compare_scalar`].
pub struct EvolutionStrategy<P: Problem> {
    /// The number of parents.
    parent_count: usize,
    /// The number of offspring.
    offspring_count: usize,
    /// The operator creating the initial parents.
    creator: Box<dyn Creator<P>>,
    /// The mutation.
    mutator: Box<dyn AdaptiveMutation<P::Genotype, P::Space>>,
    /// The plus or comma replacement.
    replacer: Box<dyn Replacer<P>>,
    /// The initial mutation strength.
    initial_strength: f64,
    /// The strength adaptation.
    success_rule: SuccessRule,
    /// How the offspring are created and evaluated.
    execution: BatchExecution,
    /// Whether plus selection is used.
    plus_selection: bool,
}

impl<P: Problem> EvolutionStrategy<P> {
    /// Initialise the algorithm. This returns an error if `mu` or `lambda` is `0`, if comma
    /// selection has fewer offspring than parents, or if the strength or success rule are not
    /// valid.
    ///
    /// # Arguments
    ///
    /// * `args`: The [`EvolutionStrategyArg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<EvolutionStrategy<P>, OError>`
    pub fn new(args: EvolutionStrategyArg<P>) -> Result<Self, OError> {
        let name = "EvolutionStrategy".to_string();
        if args.parent_count < 1 || args.offspring_count < 1 {
            return Err(OError::AlgorithmInit(
                name,
                "At least one parent and one offspring are needed".to_string(),
            ));
        }
        if !args.plus_selection && args.offspring_count < args.parent_count {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "The comma selection needs at least {} offspring, but {} were given",
                    args.parent_count, args.offspring_count
                ),
            ));
        }
        if !args.initial_strength.is_finite() || args.initial_strength <= 0.0 {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "The initial mutation strength must be a positive number, but {} was given",
                    args.initial_strength
                ),
            ));
        }
        let success_rule = args.success_rule.unwrap_or_default();
        if !(0.0..1.0).contains(&success_rule.target_ratio)
            || success_rule.factor <= 0.0
            || success_rule.factor >= 1.0
        {
            return Err(OError::AlgorithmInit(
                name,
                format!("The success rule {success_rule:?} is not valid"),
            ));
        }

        let replacer: Box<dyn Replacer<P>> = if args.plus_selection {
            Box::new(PlusSelectionReplacer::new(Some(args.offspring_count)))
        } else {
            Box::new(CommaSelectionReplacer::new(args.offspring_count))
        };
        let execution = args.execution.unwrap_or_default();

        info!(
            "({} {} {})-ES with initial strength {} and {success_rule:?}",
            args.parent_count,
            if args.plus_selection { "+" } else { "," },
            args.offspring_count,
            args.initial_strength
        );

        Ok(Self {
            parent_count: args.parent_count,
            offspring_count: args.offspring_count,
            creator: args.creator,
            mutator: args.mutator,
            replacer,
            initial_strength: args.initial_strength,
            success_rule,
            execution,
            plus_selection: args.plus_selection,
        })
    }
}

impl<P: Problem> IterativeAlgorithm<P> for EvolutionStrategy<P> {
    type State = EvolutionStrategyState<P::Genotype>;

    fn name(&self) -> String {
        let selection = if self.plus_selection { "+" } else { "," };
        format!(
            "({} {selection} {})-ES",
            self.parent_count, self.offspring_count
        )
    }

    fn initialise(
        &self,
        problem: &P,
        space: &P::Space,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        let genotypes = self
            .creator
            .create(self.parent_count, &rng.fork(0), space, problem)?;
        let solutions = evaluate_genotypes(problem, genotypes, &rng.fork(1), &self.execution)?;
        Ok(EvolutionStrategyState {
            population: Population::new(solutions),
            iteration: 0,
            mutation_strength: self.initial_strength,
            success_ratio: None,
        })
    }

    fn execute_step(
        &self,
        problem: &P,
        space: &P::Space,
        previous: &Self::State,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        let parents = previous.population();
        if parents.is_empty() {
            return Err(OError::EmptyPopulation("offspring".to_string()));
        }
        let strength = previous.mutation_strength;

        let children = self
            .execution
            .try_generate(self.offspring_count, &rng.fork(0), |_, r| {
                let parent = r.next_index(parents.len());
                let child = self.mutator.mutate_with_strength(
                    parents.solutions()[parent].genotype(),
                    strength,
                    r,
                    space,
                )?;
                if !space.contains(&child) {
                    return Err(OError::MutationOperator(
                        self.name(),
                        format!("The child {child:?} is outside the search space"),
                    ));
                }
                Ok((parent, child))
            })?;
        let (parent_indexes, genotypes): (Vec<usize>, Vec<P::Genotype>) =
            children.into_iter().unzip();
        let offspring = Population::new(evaluate_genotypes(
            problem,
            genotypes,
            &rng.fork(1),
            &self.execution,
        )?);

        let objective = problem.objective();
        let mut successes = 0;
        for (child, parent) in offspring.iter().zip(&parent_indexes) {
            let parent = &parents.solutions()[*parent];
            if objective.compare_scalar(child.objectives(), parent.objectives())? == Ordering::Less {
                successes += 1;
            }
        }
        let success_ratio = successes as f64 / self.offspring_count as f64;
        let mutation_strength = self.success_rule.adapt(strength, success_ratio);
        debug!(
            "Success ratio {success_ratio:.3}, mutation strength {strength:.5} -> {mutation_strength:.5}"
        );

        let population =
            self.replacer
                .replace(parents, &offspring, objective, &rng.fork(2), space, problem)?;
        Ok(EvolutionStrategyState {
            population,
            iteration: previous.iteration + 1,
            mutation_strength,
            success_ratio: Some(success_ratio),
        })
    }
}
