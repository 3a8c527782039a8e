use log::{debug, info};

use crate::algorithms::{AlgorithmState, IterativeAlgorithm, PopulationState};
use crate::core::{evaluate_genotypes, OError, Population, Problem};
use crate::execution::BatchExecution;
use crate::operators::{Creator, Crossover, Mutator, Replacer, Selector};
use crate::random::RandomStream;

/// Input arguments for the [`GeneticAlgorithm`].
pub struct GeneticAlgorithmArg<P: Problem> {
    /// The number of solutions in the initial population. This is also the population size
    /// passed to [`Replacer::offspring_count`] at each generation.
    pub population_size: usize,
    /// The operator creating the initial genotypes.
    pub creator: Box<dyn Creator<P>>,
    /// The operator choosing the parents.
    pub selector: Box<dyn Selector<P>>,
    /// The operator recombining pairs of parents.
    pub crossover: Box<dyn Crossover<P>>,
    /// The operator mutating the children.
    pub mutator: Box<dyn Mutator<P>>,
    /// The operator building the next population.
    pub replacer: Box<dyn Replacer<P>>,
    /// The probability that a pair of parents is recombined. When the pair is not recombined,
    /// the child is a copy of the first parent. This defaults to `1`.
    pub crossover_probability: Option<f64>,
    /// The probability that a child is mutated. This defaults to `1`.
    pub mutation_probability: Option<f64>,
    /// How the solutions are evaluated. This defaults to [`BatchExecution::Sequential`].
    pub execution: Option<BatchExecution>,
}

/// A generational genetic algorithm.
///
/// Each generation:
///  1. the selector picks two parents for each offspring (stream `rng.fork(0)`);
///  2. each pair is recombined with the crossover probability (coin flips on `rng.fork(1)`,
///     recombination on `rng.fork(2)`);
///  3. each child is mutated with the mutation probability (coin flips on `rng.fork(3)`,
///     mutation on `rng.fork(4)`);
///  4. the children are evaluated (`rng.fork(5)`);
///  5. the replacer builds the next population from the previous one and the offspring
///     (`rng.fork(6)`).
///
/// The number of offspring is given by [`Replacer::offspring_count`] for the configured
/// population size.
pub struct GeneticAlgorithm<P: Problem> {
    /// The number of solutions in the initial population.
    population_size: usize,
    /// The operator creating the initial genotypes.
    creator: Box<dyn Creator<P>>,
    /// The operator choosing the parents.
    selector: Box<dyn Selector<P>>,
    /// The operator recombining the parents.
    crossover: Box<dyn Crossover<P>>,
    /// The operator mutating the children.
    mutator: Box<dyn Mutator<P>>,
    /// The operator building the next population.
    replacer: Box<dyn Replacer<P>>,
    /// The crossover probability.
    crossover_probability: f64,
    /// The mutation probability.
    mutation_probability: f64,
    /// How the solutions are evaluated.
    execution: BatchExecution,
    /// The algorithm name.
    name: String,
}

/// Check that a probability is in `[0, 1]`.
pub(crate) fn check_probability(name: &str, label: &str, value: f64) -> Result<f64, OError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(OError::AlgorithmInit(
            name.to_string(),
            format!("The {label} probability must be between 0 and 1, but {value} was given"),
        ));
    }
    Ok(value)
}

impl<P: Problem> GeneticAlgorithm<P> {
    /// Initialise the algorithm. This returns an error if the population is empty or a
    /// probability is not in `[0, 1]`.
    ///
    /// # Arguments
    ///
    /// * `args`: The [`GeneticAlgorithmArg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<GeneticAlgorithm<P>, OError>`
    pub fn new(args: GeneticAlgorithmArg<P>) -> Result<Self, OError> {
        Self::with_name("GeneticAlgorithm", args)
    }

    /// Initialise the algorithm with a custom name used in logs and errors.
    pub(crate) fn with_name(name: &str, args: GeneticAlgorithmArg<P>) -> Result<Self, OError> {
        if args.population_size < 1 {
            return Err(OError::AlgorithmInit(
                name.to_string(),
                "The population must have at least one solution".to_string(),
            ));
        }
        let crossover_probability = check_probability(
            name,
            "crossover",
            args.crossover_probability.unwrap_or(1.0),
        )?;
        let mutation_probability =
            check_probability(name, "mutation", args.mutation_probability.unwrap_or(1.0))?;
        let execution = args.execution.unwrap_or_default();

        info!(
            "{name} with {} solutions, crossover probability {crossover_probability}, mutation probability {mutation_probability} and {} evaluation worker(s)",
            args.population_size,
            execution.degree_of_parallelism()
        );

        Ok(Self {
            population_size: args.population_size,
            creator: args.creator,
            selector: args.selector,
            crossover: args.crossover,
            mutator: args.mutator,
            replacer: args.replacer,
            crossover_probability,
            mutation_probability,
            execution,
            name: name.to_string(),
        })
    }

    /// The number of solutions in the initial population.
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Recombine the pairs that win the crossover coin flip. The other pairs give a copy of
    /// their first parent.
    fn recombine(
        &self,
        pairs: Vec<(P::Genotype, P::Genotype)>,
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<P::Genotype>, OError> {
        let p = self.crossover_probability;
        let coins = BatchExecution::Sequential.generate(pairs.len(), &rng.fork(1), |_, r| {
            r.next_bool(p)
        });
        let (crossed, copied): (Vec<_>, Vec<_>) = pairs
            .into_iter()
            .zip(&coins)
            .partition(|(_, coin)| **coin);
        let crossed: Vec<_> = crossed.into_iter().map(|(pair, _)| pair).collect();
        debug!("Recombining {} pairs of parents", crossed.len());

        let mut crossed_children = self
            .crossover
            .cross(&crossed, &rng.fork(2), space, problem)?
            .into_iter();
        let mut copied_children = copied.into_iter().map(|((first, _), _)| first);

        coins
            .iter()
            .map(|coin| {
                let child = if *coin {
                    crossed_children.next()
                } else {
                    copied_children.next()
                };
                child.ok_or_else(|| {
                    OError::CrossoverOperator(
                        self.name.clone(),
                        "The crossover returned fewer children than pairs".to_string(),
                    )
                })
            })
            .collect()
    }

    /// Mutate the children that win the mutation coin flip.
    fn mutate(
        &self,
        children: Vec<P::Genotype>,
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<P::Genotype>, OError> {
        let p = self.mutation_probability;
        let coins = BatchExecution::Sequential.generate(children.len(), &rng.fork(3), |_, r| {
            r.next_bool(p)
        });
        let selected: Vec<P::Genotype> = children
            .iter()
            .zip(&coins)
            .filter(|(_, coin)| **coin)
            .map(|(child, _)| child.clone())
            .collect();
        debug!("Mutating {} children", selected.len());

        let mut mutated = self
            .mutator
            .mutate(&selected, &rng.fork(4), space, problem)?
            .into_iter();
        children
            .into_iter()
            .zip(coins)
            .map(|(child, coin)| {
                if !coin {
                    return Ok(child);
                }
                mutated.next().ok_or_else(|| {
                    OError::MutationOperator(
                        self.name.clone(),
                        "The mutator returned fewer genotypes than it was given".to_string(),
                    )
                })
            })
            .collect()
    }
}

impl<P: Problem> IterativeAlgorithm<P> for GeneticAlgorithm<P> {
    type State = PopulationState<P::Genotype>;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn initialise(
        &self,
        problem: &P,
        space: &P::Space,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        let genotypes = self
            .creator
            .create(self.population_size, &rng.fork(0), space, problem)?;
        let solutions = evaluate_genotypes(problem, genotypes, &rng.fork(1), &self.execution)?;
        info!("Created initial population of {} solutions", solutions.len());
        Ok(PopulationState::new(Population::new(solutions), 0))
    }

    fn execute_step(
        &self,
        problem: &P,
        space: &P::Space,
        previous: &Self::State,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        let objective = problem.objective();
        let offspring_count = self.replacer.offspring_count(self.population_size);
        debug!("Creating {offspring_count} offspring");

        let parents = self.selector.select(
            previous.population(),
            objective,
            2 * offspring_count,
            &rng.fork(0),
            space,
            problem,
        )?;
        if parents.len() != 2 * offspring_count {
            return Err(OError::SelectorOperator(
                self.name.clone(),
                format!(
                    "{} parents were selected but {} were requested",
                    parents.len(),
                    2 * offspring_count
                ),
            ));
        }
        let pairs: Vec<(P::Genotype, P::Genotype)> = parents
            .chunks_exact(2)
            .map(|pair| (pair[0].genotype().clone(), pair[1].genotype().clone()))
            .collect();

        let children = self.recombine(pairs, rng, space, problem)?;
        let children = self.mutate(children, rng, space, problem)?;
        let offspring = Population::new(evaluate_genotypes(
            problem,
            children,
            &rng.fork(5),
            &self.execution,
        )?);

        let population = self.replacer.replace(
            previous.population(),
            &offspring,
            objective,
            &rng.fork(6),
            space,
            problem,
        )?;
        Ok(PopulationState::new(population, previous.iteration() + 1))
    }
}
