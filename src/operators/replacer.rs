use log::debug;

use crate::core::{OError, Objective, Population, Problem, Solution};
use crate::random::RandomStream;
use crate::utils::{argsort, crowding_distance, fast_non_dominated_sort, DominancePolicy, Sort};

/// Build the next population from the previous one and the offspring.
pub trait Replacer<P: Problem>: Send + Sync {
    /// The number of offspring the algorithm must create for a population of
    /// `population_size` solutions.
    ///
    /// # Arguments
    ///
    /// * `population_size`: The size of the previous population.
    ///
    /// returns: `usize`
    fn offspring_count(&self, population_size: usize) -> usize;

    /// Build the next population.
    ///
    /// # Arguments
    ///
    /// * `previous`: The previous population.
    /// * `offspring`: The evaluated offspring.
    /// * `objective`: The objective used to rank the solutions.
    /// * `rng`: The stream to draw from.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Population<P::Genotype>, OError>`
    fn replace(
        &self,
        previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        objective: &Objective,
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Population<P::Genotype>, OError>;
}

/// Keep the `count` best solutions of `population`, best first.
fn keep_best<T: Clone>(
    population: &Population<T>,
    objective: &Objective,
    count: usize,
) -> Result<Vec<Solution<T>>, OError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    Ok(population
        .ranked_indexes(objective)?
        .into_iter()
        .take(count)
        .map(|i| population.solutions()[i].clone())
        .collect())
}

/// The whole population is replaced by the offspring.
#[derive(Debug, Clone, Default)]
pub struct GenerationalReplacer;

impl<P: Problem> Replacer<P> for GenerationalReplacer {
    fn offspring_count(&self, population_size: usize) -> usize {
        population_size
    }

    fn replace(
        &self,
        _previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        _objective: &Objective,
        _rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Population<P::Genotype>, OError> {
        Ok(offspring.clone())
    }
}

/// Keep the `elites` best solutions of the previous population and fill the rest with the
/// offspring. The elites come first, from best to worst, followed by the offspring in their
/// order.
#[derive(Debug, Clone)]
pub struct ElitismReplacer {
    /// The number of solutions kept from the previous population.
    elites: usize,
}

impl ElitismReplacer {
    /// Create the replacer.
    ///
    /// # Arguments
    ///
    /// * `elites`: The number of solutions kept from the previous population.
    ///
    /// returns: `ElitismReplacer`
    pub fn new(elites: usize) -> Self {
        Self { elites }
    }

    /// The number of solutions kept from the previous population.
    pub fn elites(&self) -> usize {
        self.elites
    }
}

impl<P: Problem> Replacer<P> for ElitismReplacer {
    fn offspring_count(&self, population_size: usize) -> usize {
        population_size.saturating_sub(self.elites)
    }

    fn replace(
        &self,
        previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        objective: &Objective,
        _rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Population<P::Genotype>, OError> {
        if self.elites > previous.len() {
            return Err(OError::ReplacementOperator(
                "ElitismReplacer".to_string(),
                format!(
                    "Cannot keep {} elites from a population of {} solutions",
                    self.elites,
                    previous.len()
                ),
            ));
        }
        let mut solutions = keep_best(previous, objective, self.elites)?;
        solutions.extend(offspring.iter().cloned());
        Ok(Population::new(solutions))
    }
}

/// The `(mu + lambda)` replacement: the best solutions among the previous population and the
/// offspring survive. The population size does not change.
#[derive(Debug, Clone, Default)]
pub struct PlusSelectionReplacer {
    /// The number of offspring. When `None`, as many offspring as solutions are created.
    offspring: Option<usize>,
}

impl PlusSelectionReplacer {
    /// Create the replacer.
    ///
    /// # Arguments
    ///
    /// * `offspring`: The number of offspring (`lambda`). When `None`, this equals the
    ///    population size.
    ///
    /// returns: `PlusSelectionReplacer`
    pub fn new(offspring: Option<usize>) -> Self {
        Self { offspring }
    }
}

impl<P: Problem> Replacer<P> for PlusSelectionReplacer {
    fn offspring_count(&self, population_size: usize) -> usize {
        self.offspring.unwrap_or(population_size)
    }

    fn replace(
        &self,
        previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        objective: &Objective,
        _rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Population<P::Genotype>, OError> {
        let merged: Population<P::Genotype> =
            previous.iter().chain(offspring.iter()).cloned().collect();
        Ok(Population::new(keep_best(&merged, objective, previous.len())?))
    }
}

/// The `(mu, lambda)` replacement: the best offspring replace the whole previous population.
/// The population size does not change, so there must be at least as many offspring as
/// solutions.
#[derive(Debug, Clone)]
pub struct CommaSelectionReplacer {
    /// The number of offspring.
    offspring: usize,
}

impl CommaSelectionReplacer {
    /// Create the replacer.
    ///
    /// # Arguments
    ///
    /// * `offspring`: The number of offspring (`lambda`).
    ///
    /// returns: `CommaSelectionReplacer`
    pub fn new(offspring: usize) -> Self {
        Self { offspring }
    }
}

impl<P: Problem> Replacer<P> for CommaSelectionReplacer {
    fn offspring_count(&self, _population_size: usize) -> usize {
        self.offspring
    }

    fn replace(
        &self,
        previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        objective: &Objective,
        _rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Population<P::Genotype>, OError> {
        if offspring.len() < previous.len() {
            return Err(OError::ReplacementOperator(
                "CommaSelectionReplacer".to_string(),
                format!(
                    "{} offspring cannot replace a population of {} solutions",
                    offspring.len(),
                    previous.len()
                ),
            ));
        }
        Ok(Population::new(keep_best(offspring, objective, previous.len())?))
    }
}

/// The NSGA-II replacement. The previous population and the offspring are merged and sorted
/// into non-dominated fronts; the next population is filled front by front. When a front does
/// not fit, the solutions with the largest crowding distance are taken from it.
#[derive(Debug, Clone, Default)]
pub struct ParetoCrowdingReplacer {
    /// The size of the next population. When `None`, the size of the previous population.
    target_size: Option<usize>,
    /// How equal objective vectors are sorted into fronts.
    policy: DominancePolicy,
}

impl ParetoCrowdingReplacer {
    /// Create the replacer.
    ///
    /// # Arguments
    ///
    /// * `target_size`: The size of the next population. When `None`, the population size does
    ///    not change.
    /// * `policy`: How equal objective vectors are sorted into fronts.
    ///
    /// returns: `ParetoCrowdingReplacer`
    pub fn new(target_size: Option<usize>, policy: DominancePolicy) -> Self {
        Self {
            target_size,
            policy,
        }
    }
}

impl<P: Problem> Replacer<P> for ParetoCrowdingReplacer {
    fn offspring_count(&self, population_size: usize) -> usize {
        population_size
    }

    fn replace(
        &self,
        previous: &Population<P::Genotype>,
        offspring: &Population<P::Genotype>,
        objective: &Objective,
        _rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Population<P::Genotype>, OError> {
        let merged: Vec<&Solution<P::Genotype>> =
            previous.iter().chain(offspring.iter()).collect();
        let target_size = self.target_size.unwrap_or(previous.len());
        if merged.len() < target_size {
            return Err(OError::ReplacementOperator(
                "ParetoCrowdingReplacer".to_string(),
                format!(
                    "Cannot fill a population of {target_size} solutions with {} solutions",
                    merged.len()
                ),
            ));
        }
        if target_size == 0 {
            return Ok(Population::default());
        }

        let vectors: Vec<_> = merged.iter().map(|s| s.objectives()).collect();
        let sorting = fast_non_dominated_sort(&vectors, objective, self.policy)?;

        let mut selected: Vec<usize> = Vec::with_capacity(target_size);
        for (rank, front) in sorting.front_indexes.iter().enumerate() {
            let missing = target_size - selected.len();
            if front.len() <= missing {
                selected.extend(front);
            } else {
                debug!(
                    "Front #{rank} has {} solutions but {missing} slots are left",
                    front.len()
                );
                let front_vectors: Vec<_> = front.iter().map(|i| vectors[*i]).collect();
                let distances = crowding_distance(&front_vectors)?;
                selected.extend(
                    argsort(&distances, Sort::Descending)
                        .into_iter()
                        .take(missing)
                        .map(|p| front[p]),
                );
            }
            if selected.len() == target_size {
                break;
            }
        }

        Ok(selected.into_iter().map(|i| merged[i].clone()).collect())
    }
}
