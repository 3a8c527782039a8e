use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::core::{OError, Objective, Population, Problem, Solution};
use crate::execution::BatchExecution;
use crate::random::RandomStream;
use crate::utils::{crowding_distance, fast_non_dominated_sort, DominancePolicy};

/// Choose solutions from a population for reproduction.
pub trait Selector<P: Problem>: Send + Sync {
    /// Select `count` solutions from the population. The same solution may be selected more than
    /// once.
    ///
    /// # Arguments
    ///
    /// * `population`: The population.
    /// * `objective`: The objective used to rank the solutions.
    /// * `count`: The number of solutions to select.
    /// * `rng`: The stream to draw from.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `Result<Vec<Solution<P::Genotype>>, OError>`
    fn select(
        &self,
        population: &Population<P::Genotype>,
        objective: &Objective,
        count: usize,
        rng: &RandomStream,
        space: &P::Space,
        problem: &P,
    ) -> Result<Vec<Solution<P::Genotype>>, OError>;
}

/// Check that the population can be selected from.
fn check_population<T>(name: &str, population: &Population<T>, count: usize) -> Result<(), OError> {
    if count > 0 && population.is_empty() {
        return Err(OError::SelectorOperator(
            name.to_string(),
            "The population is empty and no solution can be selected".to_string(),
        ));
    }
    Ok(())
}

/// Run `count` tournaments. Tournament `i` samples `size` competitors with `rng.fork(i)`; the
/// winner is the first competitor that no other competitor beats according to `beats`.
fn run_tournaments<F>(
    population_size: usize,
    size: usize,
    count: usize,
    rng: &RandomStream,
    beats: F,
) -> Result<Vec<usize>, OError>
where
    F: Fn(usize, usize) -> Result<bool, OError> + Sync,
{
    BatchExecution::Sequential.try_generate(count, rng, |_, r| {
        let mut winner = r.next_index(population_size);
        for _ in 1..size {
            let competitor = r.next_index(population_size);
            if beats(competitor, winner)? {
                winner = competitor;
            }
        }
        Ok(winner)
    })
}

/// Check the number of competitors.
fn check_tournament_size(name: &str, tournament_size: usize) -> Result<(), OError> {
    if tournament_size < 1 {
        return Err(OError::InvalidConfiguration(
            name.to_string(),
            "The tournament needs at least one competitor".to_string(),
        ));
    }
    Ok(())
}

/// Tournament selection method between multiple competitors for choosing solutions from a
/// population for reproduction. `tournament_size` solutions are uniformly sampled (with
/// replacement) from the population, then the best one according to
/// [`Objective::compare_scalar`] becomes a parent. Multi-objective problems need a scalar
/// comparator on the objective.
#[derive(Debug, Clone)]
pub struct TournamentSelector {
    /// The number of competitors in each tournament. For example, 2 to run a binary tournament.
    tournament_size: usize,
}

impl TournamentSelector {
    /// Create a new tournament. This returns an error if `tournament_size` is `0`.
    ///
    /// # Arguments
    ///
    /// * `tournament_size`: The number of competitors in the tournament.
    ///
    /// returns: `Result<TournamentSelector, OError>`
    pub fn new(tournament_size: usize) -> Result<Self, OError> {
        check_tournament_size("TournamentSelector", tournament_size)?;
        Ok(Self { tournament_size })
    }
}

impl<P: Problem> Selector<P> for TournamentSelector {
    fn select(
        &self,
        population: &Population<P::Genotype>,
        objective: &Objective,
        count: usize,
        rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<Solution<P::Genotype>>, OError> {
        check_population("TournamentSelector", population, count)?;
        let solutions = population.solutions();
        let winners = run_tournaments(
            population.len(),
            self.tournament_size,
            count,
            rng,
            |competitor, winner| {
                Ok(objective.compare_scalar(
                    solutions[competitor].objectives(),
                    solutions[winner].objectives(),
                )? == Ordering::Less)
            },
        )?;
        Ok(winners.into_iter().map(|i| solutions[i].clone()).collect())
    }
}

/// Select solutions uniformly at random.
#[derive(Debug, Clone, Default)]
pub struct RandomSelector;

impl<P: Problem> Selector<P> for RandomSelector {
    fn select(
        &self,
        population: &Population<P::Genotype>,
        _objective: &Objective,
        count: usize,
        rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<Solution<P::Genotype>>, OError> {
        check_population("RandomSelector", population, count)?;
        let solutions = population.solutions();
        Ok(BatchExecution::Sequential
            .generate(count, rng, |_, r| solutions[r.next_index(solutions.len())].clone()))
    }
}

/// The crowded-comparison tournament of NSGA-II. The population is sorted into non-dominated
/// fronts; a competitor beats another one when its front rank is lower or, in the same front,
/// when its crowding distance is larger. Crowding distances are only calculated for the fronts
/// where two competitors meet, once per [`Selector::select`] call.
#[derive(Debug, Clone)]
pub struct CrowdedTournamentSelector {
    /// The number of competitors in each tournament.
    tournament_size: usize,
    /// How equal objective vectors are sorted into fronts.
    policy: DominancePolicy,
}

impl CrowdedTournamentSelector {
    /// Create a new crowded tournament. This returns an error if `tournament_size` is `0`.
    ///
    /// # Arguments
    ///
    /// * `tournament_size`: The number of competitors in the tournament.
    /// * `policy`: How equal objective vectors are sorted into fronts.
    ///
    /// returns: `Result<CrowdedTournamentSelector, OError>`
    pub fn new(tournament_size: usize, policy: DominancePolicy) -> Result<Self, OError> {
        check_tournament_size("CrowdedTournamentSelector", tournament_size)?;
        Ok(Self {
            tournament_size,
            policy,
        })
    }
}

impl<P: Problem> Selector<P> for CrowdedTournamentSelector {
    fn select(
        &self,
        population: &Population<P::Genotype>,
        objective: &Objective,
        count: usize,
        rng: &RandomStream,
        _space: &P::Space,
        _problem: &P,
    ) -> Result<Vec<Solution<P::Genotype>>, OError> {
        check_population("CrowdedTournamentSelector", population, count)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let vectors = population.objective_vectors();
        let sorting = fast_non_dominated_sort(&vectors, objective, self.policy)?;

        // position of each solution in its front
        let mut position = vec![0; population.len()];
        for front in &sorting.front_indexes {
            for (p, i) in front.iter().enumerate() {
                position[*i] = p;
            }
        }
        let cache: Vec<OnceLock<Result<Vec<f64>, OError>>> =
            sorting.front_indexes.iter().map(|_| OnceLock::new()).collect();
        let front_crowding = |rank: usize| {
            cache[rank]
                .get_or_init(|| {
                    let front: Vec<_> = sorting.front_indexes[rank]
                        .iter()
                        .map(|i| vectors[*i])
                        .collect();
                    crowding_distance(&front)
                })
                .as_ref()
                .map_err(|e| e.clone())
        };

        let winners = run_tournaments(
            population.len(),
            self.tournament_size,
            count,
            rng,
            |competitor, winner| {
                let (rank_c, rank_w) = (sorting.ranks[competitor], sorting.ranks[winner]);
                if rank_c != rank_w {
                    return Ok(rank_c < rank_w);
                }
                let distances = front_crowding(rank_c)?;
                Ok(distances[position[competitor]] > distances[position[winner]])
            },
        )?;

        let solutions = population.solutions();
        Ok(winners.into_iter().map(|i| solutions[i].clone()).collect())
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::population_from_obj_values;
    use crate::core::{
        OError, Objective, ObjectiveDirection, ObjectiveVector, Problem, ScalarComparator,
        SearchSpace,
    };
    use crate::operators::{CrowdedTournamentSelector, RandomSelector, Selector, TournamentSelector};
    use crate::random::RandomStream;
    use crate::utils::DominancePolicy;

    #[derive(Debug)]
    struct AnyIndex;
    impl SearchSpace<usize> for AnyIndex {
        fn contains(&self, _: &usize) -> bool {
            true
        }
    }

    /// A problem over genotype indexes, only used for its types.
    struct IndexProblem(Objective, AnyIndex);
    impl Problem for IndexProblem {
        type Genotype = usize;
        type Space = AnyIndex;
        fn objective(&self) -> &Objective {
            &self.0
        }
        fn search_space(&self) -> &AnyIndex {
            &self.1
        }
        fn evaluate(&self, _: &usize, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
            ObjectiveVector::single(0.0)
        }
    }

    fn problem(objective: Objective) -> IndexProblem {
        IndexProblem(objective, AnyIndex)
    }

    #[test]
    /// With a tournament as large as the population, the best solution almost always wins.
    fn test_tournament_selector() {
        let population = population_from_obj_values(&[vec![3.0], vec![1.0], vec![2.0]]);
        let p = problem(Objective::minimise());
        let selector = TournamentSelector::new(50).unwrap();
        let rng = RandomStream::from_seed(1);

        let winners = selector
            .select(&population, p.objective(), 10, &rng, p.search_space(), &p)
            .unwrap();
        assert_eq!(winners.len(), 10);
        assert!(winners.iter().all(|s| *s.genotype() == 1));

        // same stream, same winners
        let again = selector
            .select(&population, p.objective(), 10, &rng, p.search_space(), &p)
            .unwrap();
        assert_eq!(winners, again);
    }

    #[test]
    /// The multi-objective tournament needs a scalar comparator.
    fn test_tournament_selector_comparator() {
        let population = population_from_obj_values(&[vec![3.0, 0.0], vec![1.0, 1.0]]);
        let rng = RandomStream::from_seed(1);
        let selector = TournamentSelector::new(2).unwrap();

        let objective = Objective::new(vec![ObjectiveDirection::Minimise; 2]).unwrap();
        let p = problem(objective.clone());
        let result = selector.select(&population, &objective, 10, &rng, p.search_space(), &p);
        assert_eq!(result.unwrap_err(), OError::MissingComparator(2));

        let objective = objective.with_comparator(ScalarComparator::Lexicographic);
        let result = selector.select(&population, &objective, 10, &rng, p.search_space(), &p);
        assert_eq!(result.unwrap().len(), 10);
    }

    #[test]
    /// Test the invalid configurations and populations.
    fn test_selector_errors() {
        assert!(matches!(
            TournamentSelector::new(0),
            Err(OError::InvalidConfiguration(_, _))
        ));
        assert!(CrowdedTournamentSelector::new(0, DominancePolicy::default()).is_err());

        let p = problem(Objective::minimise());
        let empty = population_from_obj_values(&[]);
        let rng = RandomStream::from_seed(1);
        let result = RandomSelector.select(&empty, p.objective(), 1, &rng, p.search_space(), &p);
        assert!(matches!(result, Err(OError::SelectorOperator(_, _))));
        let result = RandomSelector.select(&empty, p.objective(), 0, &rng, p.search_space(), &p);
        assert!(result.unwrap().is_empty());
    }

    #[test]
    /// The crowded tournament prefers lower ranks, then larger crowding distances.
    fn test_crowded_tournament_selector() {
        // front 0: 0, 1, 2, 3 (1 and 2 are interior); front 1: 4
        let population = population_from_obj_values(&[
            vec![0.0, 10.0],
            vec![1.0, 5.0],
            vec![5.0, 4.5],
            vec![10.0, 0.0],
            vec![11.0, 11.0],
        ]);
        let p = problem(Objective::new(vec![ObjectiveDirection::Minimise; 2]).unwrap());
        let selector = CrowdedTournamentSelector::new(2, DominancePolicy::default()).unwrap();
        let rng = RandomStream::from_seed(8);
        let winners = selector
            .select(&population, p.objective(), 1000, &rng, p.search_space(), &p)
            .unwrap();
        assert_eq!(winners.len(), 1000);

        let count = |g: usize| winners.iter().filter(|s| *s.genotype() == g).count();
        // the dominated solution only wins against itself
        assert!(count(4) < count(1));
        // the boundary solutions have infinite crowding distance
        assert!(count(0) > count(1));
        assert!(count(3) > count(2));
    }
}
