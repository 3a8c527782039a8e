use std::error::Error;

use log::{info, LevelFilter};
use rand_distr::{Distribution, Normal};

use metarustic::algorithms::{
    AdaptiveMutation, AfterIterations, AnyTerminator, EvolutionStrategy, EvolutionStrategyArg,
    EvolutionStrategyState, ExecutorArg, IterativeAlgorithm, StreamingExecutor, TargetObjective,
};
use metarustic::core::{OError, Objective, ObjectiveVector, Problem, SearchSpace};
use metarustic::execution::BatchExecution;
use metarustic::operators::{batch_creator, creation_fn};
use metarustic::random::RandomStream;

/// A hyper-cube centred on the origin.
#[derive(Debug)]
struct Cube {
    dimensions: usize,
    half_side: f64,
}

impl SearchSpace<Vec<f64>> for Cube {
    fn contains(&self, x: &Vec<f64>) -> bool {
        x.len() == self.dimensions && x.iter().all(|v| v.abs() <= self.half_side)
    }
}

/// Minimise the sum of the squared variables.
struct Sphere {
    space: Cube,
    objective: Objective,
}

impl Problem for Sphere {
    type Genotype = Vec<f64>;
    type Space = Cube;

    fn objective(&self) -> &Objective {
        &self.objective
    }

    fn search_space(&self) -> &Cube {
        &self.space
    }

    fn evaluate(&self, x: &Vec<f64>, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
        ObjectiveVector::single(x.iter().map(|v| v * v).sum())
    }
}

/// Add gaussian noise with the adapted standard deviation to each variable.
struct GaussianPerturbation;

impl AdaptiveMutation<Vec<f64>, Cube> for GaussianPerturbation {
    fn mutate_with_strength(
        &self,
        x: &Vec<f64>,
        strength: f64,
        rng: &mut RandomStream,
        space: &Cube,
    ) -> Result<Vec<f64>, OError> {
        let normal = Normal::new(0.0, strength).map_err(|e| {
            OError::MutationOperator("GaussianPerturbation".to_string(), e.to_string())
        })?;
        Ok(x.iter()
            .map(|v| (v + normal.sample(rng)).clamp(-space.half_side, space.half_side))
            .collect())
    }
}

/// Minimise a 10-dimensional sphere with a (5 + 35)-ES and the 1/5 success rule. The run stops
/// when the best value is below `1e-8` or after 2000 generations.
///
/// `cargo run --example es_sphere --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = Sphere {
        space: Cube {
            dimensions: 10,
            half_side: 5.0,
        },
        objective: Objective::minimise(),
    };

    let algorithm = EvolutionStrategy::new(EvolutionStrategyArg {
        parent_count: 5,
        offspring_count: 35,
        creator: Box::new(batch_creator(
            creation_fn(|r: &mut RandomStream, s: &Cube| {
                (0..s.dimensions)
                    .map(|_| s.half_side * (2.0 * r.next_double() - 1.0))
                    .collect::<Vec<f64>>()
            }),
            BatchExecution::Sequential,
        )),
        mutator: Box::new(GaussianPerturbation),
        plus_selection: true,
        initial_strength: 1.0,
        success_rule: None,
        execution: None,
    })?;

    let args = ExecutorArg::new(Box::new(AnyTerminator::<
        EvolutionStrategyState<Vec<f64>>,
        Sphere,
    >::new(vec![
        Box::new(AfterIterations::new(2000)?),
        Box::new(TargetObjective::new(ObjectiveVector::single(1e-8)?)),
    ])));

    // print every 100th generation while the executor runs
    let executor =
        StreamingExecutor::new(&problem, &algorithm, RandomStream::from_seed(1), args)?;
    let mut last = None;
    for state in executor {
        let state = state?;
        if state.iteration % 100 == 0 {
            let best = state.population.best(problem.objective())?;
            info!(
                "Generation #{} - strength {:.3e} - best {}",
                state.iteration,
                state.mutation_strength,
                best.objectives()
            );
        }
        last = Some(state);
    }

    if let Some(state) = last {
        let best = state.population.best(problem.objective())?;
        info!(
            "{} stopped at generation #{} with {}",
            algorithm.name(),
            state.iteration,
            best.objectives()
        );
    }
    Ok(())
}
