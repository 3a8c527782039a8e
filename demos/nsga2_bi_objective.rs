use std::error::Error;

use log::{info, LevelFilter};

use metarustic::algorithms::{
    AfterIterations, ExecutorArg, GenerationLogger, PopulationState, StreamingExecutor, NSGA2Arg,
    NSGA2,
};
use metarustic::core::{
    OError, Objective, ObjectiveDirection, ObjectiveVector, Problem, SearchSpace,
};
use metarustic::execution::BatchExecution;
use metarustic::operators::{
    batch_creator, batch_crossover, batch_mutator, Creation, Mutation, Recombination,
};
use metarustic::random::RandomStream;

/// An interval of the real line.
#[derive(Debug)]
struct Interval {
    lower: f64,
    upper: f64,
}

impl SearchSpace<f64> for Interval {
    fn contains(&self, x: &f64) -> bool {
        (self.lower..=self.upper).contains(x)
    }

    fn is_subspace_of(&self, other: &Self) -> bool {
        self.lower >= other.lower && self.upper <= other.upper
    }
}

/// The Schaffer's problem (SCH) where the following 2 objectives are minimised:
/// - `f_1(x) = x^2`
/// - `f_2(x) = (x - 2)^2`
struct SCHProblem {
    space: Interval,
    objective: Objective,
}

impl Problem for SCHProblem {
    type Genotype = f64;
    type Space = Interval;

    fn objective(&self) -> &Objective {
        &self.objective
    }

    fn search_space(&self) -> &Interval {
        &self.space
    }

    fn evaluate(&self, x: &f64, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
        ObjectiveVector::new(vec![x.powi(2), (x - 2.0).powi(2)])
    }
}

/// Sample uniformly in the interval.
struct Uniform;

impl Creation<f64, Interval> for Uniform {
    fn create_one(&self, rng: &mut RandomStream, space: &Interval) -> Result<f64, OError> {
        Ok(space.lower + rng.next_double() * (space.upper - space.lower))
    }
}

/// Blend the two parents with a random weight.
struct Blend;

impl Recombination<f64, Interval> for Blend {
    fn recombine(
        &self,
        first: &f64,
        second: &f64,
        rng: &mut RandomStream,
        _space: &Interval,
    ) -> Result<f64, OError> {
        let alpha = rng.next_double();
        Ok(alpha * first + (1.0 - alpha) * second)
    }
}

/// Move the variable by a uniform step and clamp it to the interval.
struct UniformStep(f64);

impl Mutation<f64, Interval> for UniformStep {
    fn mutate_one(&self, x: &f64, rng: &mut RandomStream, space: &Interval) -> Result<f64, OError> {
        let step = self.0 * (2.0 * rng.next_double() - 1.0);
        Ok((x + step).clamp(space.lower, space.upper))
    }
}

/// Solve the Schaffer's problem. The variable is bounded to -1000 and 1000 but the search is
/// restricted to [-10, 10]. The optimal solutions lie in the [0; 2] range.
///
/// Make sure to compile this in release mode to speed up the calculation:
///
/// `cargo run --example nsga2_bi_objective --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = SCHProblem {
        space: Interval {
            lower: -1000.0,
            upper: 1000.0,
        },
        objective: Objective::new(vec![ObjectiveDirection::Minimise; 2])?,
    };

    // evaluate and vary the solutions on 4 workers
    let execution = BatchExecution::parallel(4)?;
    let algorithm = NSGA2::new(NSGA2Arg {
        population_size: 100,
        creator: Box::new(batch_creator(Uniform, execution.clone())),
        crossover: Box::new(batch_crossover(Blend, execution.clone())),
        mutator: Box::new(batch_mutator(UniformStep(0.5), execution.clone())),
        crossover_probability: Some(0.9),
        mutation_probability: Some(0.3),
        tournament_size: None,
        dominance_policy: None,
        execution: Some(execution),
    })?;

    let mut args: ExecutorArg<PopulationState<f64>, SCHProblem> =
        ExecutorArg::new(Box::new(AfterIterations::new(250)?));
    args.interceptor = Some(Box::new(GenerationLogger));
    args.search_space = Some(Interval {
        lower: -10.0,
        upper: 10.0,
    });
    // the same seed always gives the same front
    let executor =
        StreamingExecutor::new(&problem, &algorithm, RandomStream::from_seed(10), args)?;
    let state = executor.run()?;

    let mut front = algorithm.pareto_front(&state.population, &problem)?;
    front.sort_by(|a, b| a.genotype().total_cmp(b.genotype()));
    info!("{} solutions on the Pareto front", front.len());
    for solution in front.iter().step_by(10) {
        info!("{solution}");
    }

    Ok(())
}
