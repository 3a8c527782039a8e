use std::fmt::{Display, Formatter};
use std::time::Instant;

use log::{debug, info};

use crate::algorithms::{AlgorithmState, Interceptor, IterativeAlgorithm, Terminator};
use crate::core::{OError, Problem, SearchSpace};
use crate::random::RandomStream;

/// The life cycle of a [`StreamingExecutor`]. An executor never goes back to a previous status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorStatus {
    /// No state was produced yet.
    Uninitialized,
    /// At least one state was produced and the terminator was not met.
    Running,
    /// The terminator was met or a step failed. No more states are produced.
    Terminated,
}

impl Display for ExecutorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorStatus::Uninitialized => f.write_str("uninitialized"),
            ExecutorStatus::Running => f.write_str("running"),
            ExecutorStatus::Terminated => f.write_str("terminated"),
        }
    }
}

/// Input arguments for the [`StreamingExecutor`].
pub struct ExecutorArg<S, P: Problem> {
    /// When to stop.
    pub terminator: Box<dyn Terminator<S, P>>,
    /// The transformation applied to each new state, the seeding state included.
    pub interceptor: Option<Box<dyn Interceptor<S, P>>>,
    /// The space to explore. It must be a subspace of the problem's search space. When `None`,
    /// the problem's search space is explored.
    pub search_space: Option<P::Space>,
    /// The state to restart from. This state is used as the previous state of the first step
    /// and is not yielded again. When `None`, the algorithm creates the seeding state.
    pub initial_state: Option<S>,
}

impl<S, P: Problem> ExecutorArg<S, P> {
    /// Create the arguments with a terminator and no interceptor, search space or initial
    /// state.
    ///
    /// # Arguments
    ///
    /// * `terminator`: When to stop.
    ///
    /// returns: `ExecutorArg<S, P>`
    pub fn new(terminator: Box<dyn Terminator<S, P>>) -> Self {
        Self {
            terminator,
            interceptor: None,
            search_space: None,
            initial_state: None,
        }
    }
}

/// Drive an [`IterativeAlgorithm`] generation by generation.
///
/// The executor is an [`Iterator`] of states. Each call to `next` runs exactly one step:
///  1. the first call creates the seeding state with the stream `rng.fork(0)` (unless an initial
///     state was given);
///  2. any later call first asks the terminator about the latest two states and returns `None`
///     if it is met; otherwise the step producing iteration `i` runs with `rng.fork(i)`, and the
///     interceptor, if any, transforms the new state.
///
/// States are produced lazily, so a consumer that stops iterating stops the algorithm with no
/// extra work. A failed step is yielded once as an error and then the executor terminates.
pub struct StreamingExecutor<'a, P: Problem, A: IterativeAlgorithm<P>> {
    /// The problem.
    problem: &'a P,
    /// The algorithm.
    algorithm: &'a A,
    /// The root stream.
    rng: RandomStream,
    /// When to stop.
    terminator: Box<dyn Terminator<A::State, P>>,
    /// The optional state transformation.
    interceptor: Option<Box<dyn Interceptor<A::State, P>>>,
    /// The explored space, when different from the problem's one.
    search_space: Option<P::Space>,
    /// The latest state.
    latest: Option<A::State>,
    /// The state before `latest`.
    before_latest: Option<A::State>,
    /// The number of yielded states.
    yielded: usize,
    /// The life cycle status.
    status: ExecutorStatus,
    /// The time when the first step started.
    start_time: Option<Instant>,
}

impl<'a, P: Problem, A: IterativeAlgorithm<P>> StreamingExecutor<'a, P, A> {
    /// Create the executor. This returns an error if the search space in `args` does not declare
    /// itself a subspace of the problem's search space.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem.
    /// * `algorithm`: The algorithm.
    /// * `rng`: The root stream.
    /// * `args`: The executor arguments.
    ///
    /// returns: `Result<StreamingExecutor<P, A>, OError>`
    pub fn new(
        problem: &'a P,
        algorithm: &'a A,
        rng: RandomStream,
        args: ExecutorArg<A::State, P>,
    ) -> Result<Self, OError> {
        if let Some(space) = &args.search_space {
            if !space.is_subspace_of(problem.search_space()) {
                return Err(OError::IncompatibleSearchSpace(format!(
                    "The search space {:?} is not a subspace of the problem's search space {:?}",
                    space,
                    problem.search_space()
                )));
            }
        }

        Ok(Self {
            problem,
            algorithm,
            rng,
            terminator: args.terminator,
            interceptor: args.interceptor,
            search_space: args.search_space,
            latest: args.initial_state,
            before_latest: None,
            yielded: 0,
            status: ExecutorStatus::Uninitialized,
            start_time: None,
        })
    }

    /// The status of the executor.
    pub fn status(&self) -> ExecutorStatus {
        self.status
    }

    /// The latest state, if any.
    pub fn latest(&self) -> Option<&A::State> {
        self.latest.as_ref()
    }

    /// The explored search space.
    pub fn search_space(&self) -> &P::Space {
        self.search_space
            .as_ref()
            .unwrap_or_else(|| self.problem.search_space())
    }

    /// Run the algorithm until the terminator is met and return the last state.
    ///
    /// returns: `Result<A::State, OError>`
    pub fn run(mut self) -> Result<A::State, OError> {
        let mut last = None;
        for state in self.by_ref() {
            last = Some(state?);
        }
        last.ok_or_else(|| {
            OError::AlgorithmRun(
                self.algorithm.name(),
                "The executor did not produce any state".to_string(),
            )
        })
    }

    /// Produce the next state without checking the terminator.
    fn advance(&self) -> Result<A::State, OError> {
        let space = self.search_space();
        let state = match &self.latest {
            None => {
                debug!("Creating the seeding state");
                self.algorithm
                    .initialise(self.problem, space, &self.rng.fork(0))?
            }
            Some(previous) => {
                let iteration = previous.iteration() + 1;
                debug!("Running iteration #{iteration}");
                self.algorithm.execute_step(
                    self.problem,
                    space,
                    previous,
                    &self.rng.fork(iteration as u64),
                )?
            }
        };
        match &self.interceptor {
            Some(interceptor) => {
                interceptor.intercept(state, self.latest.as_ref(), space, self.problem)
            }
            None => Ok(state),
        }
    }

    fn terminate(&mut self, reason: &str) {
        self.status = ExecutorStatus::Terminated;
        info!("Stopping {} because {reason}", self.algorithm.name());
        if let Some(start_time) = self.start_time {
            info!(
                "Took {:.3} seconds for {} states",
                start_time.elapsed().as_secs_f64(),
                self.yielded
            );
        }
    }
}

impl<'a, P: Problem, A: IterativeAlgorithm<P>> Iterator for StreamingExecutor<'a, P, A> {
    type Item = Result<A::State, OError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.status == ExecutorStatus::Terminated {
            return None;
        }

        if self.yielded > 0 {
            if let Some(latest) = &self.latest {
                if self.terminator.is_met(
                    latest,
                    self.before_latest.as_ref(),
                    self.search_space(),
                    self.problem,
                ) {
                    let reason = format!("the {} was reached", self.terminator.name());
                    self.terminate(&reason);
                    return None;
                }
            }
        } else {
            info!("Starting {}", self.algorithm.name());
            self.start_time = Some(Instant::now());
        }

        match self.advance() {
            Ok(state) => {
                self.status = ExecutorStatus::Running;
                self.before_latest = self.latest.replace(state.clone());
                self.yielded += 1;
                Some(Ok(state))
            }
            Err(e) => {
                self.terminate(&format!("a step failed: {e}"));
                Some(Err(e))
            }
        }
    }
}
