use log::info;

use crate::algorithms::{
    GeneticAlgorithm, GeneticAlgorithmArg, IterativeAlgorithm, PopulationState,
};
use crate::core::{OError, Population, Problem, Solution};
use crate::execution::BatchExecution;
use crate::operators::{
    Creator, Crossover, CrowdedTournamentSelector, Mutator, ParetoCrowdingReplacer,
};
use crate::random::RandomStream;
use crate::utils::{fast_non_dominated_sort, DominancePolicy};

/// Input arguments for the NSGA2 algorithm.
pub struct NSGA2Arg<P: Problem> {
    /// The number of solutions in the population. This must be at least `3`.
    pub population_size: usize,
    /// The operator creating the initial genotypes.
    pub creator: Box<dyn Creator<P>>,
    /// The operator used to generate new children by recombining the parents.
    pub crossover: Box<dyn Crossover<P>>,
    /// The operator used to mutate the children.
    pub mutator: Box<dyn Mutator<P>>,
    /// The probability that a pair of parents is recombined. This defaults to `1`.
    pub crossover_probability: Option<f64>,
    /// The probability that a child is mutated. This defaults to `1`.
    pub mutation_probability: Option<f64>,
    /// The number of competitors in the crowded tournament. This defaults to `2` (binary
    /// tournament).
    pub tournament_size: Option<usize>,
    /// How equal objective vectors are sorted into fronts. This defaults to
    /// [`DominancePolicy::default()`].
    pub dominance_policy: Option<DominancePolicy>,
    /// How the solutions are evaluated. This defaults to [`BatchExecution::Sequential`].
    pub execution: Option<BatchExecution>,
}

/// The Non-dominated Sorting Genetic Algorithm (NSGA2).
///
/// Implemented based on:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// See: <https://doi.org/10.1109/4235.996017>.
///
/// This is a [`GeneticAlgorithm`] whose parents are chosen with the
/// [`CrowdedTournamentSelector`] and whose next population is built by the
/// [`ParetoCrowdingReplacer`] from the parents and as many offspring.
pub struct NSGA2<P: Problem> {
    /// The underlying genetic algorithm.
    algorithm: GeneticAlgorithm<P>,
    /// How equal objective vectors are sorted into fronts.
    policy: DominancePolicy,
}

impl<P: Problem> NSGA2<P> {
    /// Initialise the NSGA2 algorithm.
    ///
    /// # Arguments
    ///
    /// * `args`: The [`NSGA2Arg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<NSGA2<P>, OError>`
    pub fn new(args: NSGA2Arg<P>) -> Result<Self, OError> {
        let name = "NSGA2";
        if args.population_size < 3 {
            return Err(OError::AlgorithmInit(
                name.to_string(),
                "The population size must have at least 3 individuals".to_string(),
            ));
        }
        let tournament_size = args.tournament_size.unwrap_or(2);
        let policy = args.dominance_policy.unwrap_or_default();
        info!("{name} with tournament size {tournament_size} and {policy:?}");

        let selector = CrowdedTournamentSelector::new(tournament_size, policy)
            .map_err(|e| OError::AlgorithmInit(name.to_string(), e.to_string()))?;
        let algorithm = GeneticAlgorithm::with_name(
            name,
            GeneticAlgorithmArg {
                population_size: args.population_size,
                creator: args.creator,
                selector: Box::new(selector),
                crossover: args.crossover,
                mutator: args.mutator,
                replacer: Box::new(ParetoCrowdingReplacer::new(
                    Some(args.population_size),
                    policy,
                )),
                crossover_probability: args.crossover_probability,
                mutation_probability: args.mutation_probability,
                execution: args.execution,
            },
        )?;

        Ok(Self { algorithm, policy })
    }

    /// The solutions of a population that no other solution dominates.
    ///
    /// # Arguments
    ///
    /// * `population`: The population.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Vec<Solution<P::Genotype>>, OError>`
    pub fn pareto_front(
        &self,
        population: &Population<P::Genotype>,
        problem: &P,
    ) -> Result<Vec<Solution<P::Genotype>>, OError> {
        let sorting = fast_non_dominated_sort(
            &population.objective_vectors(),
            problem.objective(),
            self.policy,
        )?;
        Ok(sorting.front_indexes[0]
            .iter()
            .map(|i| population.solutions()[*i].clone())
            .collect())
    }
}

impl<P: Problem> IterativeAlgorithm<P> for NSGA2<P> {
    type State = PopulationState<P::Genotype>;

    fn name(&self) -> String {
        self.algorithm.name()
    }

    fn initialise(
        &self,
        problem: &P,
        space: &P::Space,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        self.algorithm.initialise(problem, space, rng)
    }

    fn execute_step(
        &self,
        problem: &P,
        space: &P::Space,
        previous: &Self::State,
        rng: &RandomStream,
    ) -> Result<Self::State, OError> {
        self.algorithm.execute_step(problem, space, previous, rng)
    }
}
