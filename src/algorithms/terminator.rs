use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::warn;

use crate::algorithms::AlgorithmState;
use crate::core::{EvaluationCounter, OError, ObjectiveVector, Problem};

/// Decide whether an iterative algorithm should stop. Terminators are predicates: the executor
/// asks them after each yielded state and never looks at their internals.
pub trait Terminator<S, P: Problem>: Send + Sync {
    /// Whether the algorithm should stop after `current`.
    ///
    /// # Arguments
    ///
    /// * `current`: The latest state.
    /// * `previous`: The state before `current`, if any.
    /// * `space`: The search space.
    /// * `problem`: The problem.
    ///
    /// returns: `bool`
    fn is_met(&self, current: &S, previous: Option<&S>, space: &P::Space, problem: &P) -> bool;

    /// A name describing the terminator.
    fn name(&self) -> String;
}

/// Stop after a number of states have been produced (the seeding state included).
#[derive(Debug, Clone)]
pub struct AfterIterations(usize);

impl AfterIterations {
    /// Create the terminator. This returns an error if `iterations` is `0`.
    ///
    /// # Arguments
    ///
    /// * `iterations`: The number of states to produce.
    ///
    /// returns: `Result<AfterIterations, OError>`
    pub fn new(iterations: usize) -> Result<Self, OError> {
        if iterations < 1 {
            return Err(OError::InvalidConfiguration(
                "AfterIterations".to_string(),
                "At least one iteration is needed".to_string(),
            ));
        }
        Ok(Self(iterations))
    }
}

impl<S: AlgorithmState, P: Problem> Terminator<S, P> for AfterIterations {
    fn is_met(&self, current: &S, _: Option<&S>, _: &P::Space, _: &P) -> bool {
        current.iteration() + 1 >= self.0
    }

    fn name(&self) -> String {
        format!("maximum number of iterations ({})", self.0)
    }
}

/// Stop when at least one terminator is met.
pub struct AnyTerminator<S, P: Problem>(Vec<Box<dyn Terminator<S, P>>>);

impl<S, P: Problem> AnyTerminator<S, P> {
    /// Combine terminators.
    ///
    /// # Arguments
    ///
    /// * `terminators`: The terminators.
    ///
    /// returns: `AnyTerminator<S, P>`
    pub fn new(terminators: Vec<Box<dyn Terminator<S, P>>>) -> Self {
        Self(terminators)
    }
}

impl<S, P: Problem> Terminator<S, P> for AnyTerminator<S, P> {
    fn is_met(&self, current: &S, previous: Option<&S>, space: &P::Space, problem: &P) -> bool {
        self.0
            .iter()
            .any(|t| t.is_met(current, previous, space, problem))
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.0.iter().map(|t| t.name()).collect();
        format!("any of [{}]", names.join(", "))
    }
}

/// Stop when all terminators are met.
pub struct AllTerminator<S, P: Problem>(Vec<Box<dyn Terminator<S, P>>>);

impl<S, P: Problem> AllTerminator<S, P> {
    /// Combine terminators.
    ///
    /// # Arguments
    ///
    /// * `terminators`: The terminators.
    ///
    /// returns: `AllTerminator<S, P>`
    pub fn new(terminators: Vec<Box<dyn Terminator<S, P>>>) -> Self {
        Self(terminators)
    }
}

impl<S, P: Problem> Terminator<S, P> for AllTerminator<S, P> {
    fn is_met(&self, current: &S, previous: Option<&S>, space: &P::Space, problem: &P) -> bool {
        !self.0.is_empty()
            && self
                .0
                .iter()
                .all(|t| t.is_met(current, previous, space, problem))
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.0.iter().map(|t| t.name()).collect();
        format!("all of [{}]", names.join(", "))
    }
}

/// A flag shared between a [`PauseTerminator`] and the code that wants to stop the run. Clones
/// share the same flag.
#[derive(Debug, Clone, Default)]
pub struct PauseToken(Arc<AtomicBool>);

impl PauseToken {
    /// Create a token that is not paused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop after the current step.
    pub fn pause(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }

    /// Withdraw a pause request.
    pub fn resume(&self) {
        self.0.store(false, AtomicOrdering::SeqCst);
    }

    /// Whether a pause was requested.
    pub fn is_paused(&self) -> bool {
        self.0.load(AtomicOrdering::SeqCst)
    }
}

/// Stop when the [`PauseToken`] is paused.
#[derive(Debug, Clone)]
pub struct PauseTerminator {
    token: PauseToken,
}

impl PauseTerminator {
    /// Create the terminator.
    ///
    /// # Arguments
    ///
    /// * `token`: The shared flag.
    ///
    /// returns: `PauseTerminator`
    pub fn new(token: PauseToken) -> Self {
        Self { token }
    }
}

impl<S, P: Problem> Terminator<S, P> for PauseTerminator {
    fn is_met(&self, _: &S, _: Option<&S>, _: &P::Space, _: &P) -> bool {
        self.token.is_paused()
    }

    fn name(&self) -> String {
        "pause request".to_string()
    }
}

/// Stop when an [`EvaluationCounter`] reaches the budget. Share the counter with a
/// [`crate::core::BudgetedProblem`] to count the problem evaluations.
#[derive(Debug, Clone)]
pub struct EvaluationBudgetTerminator {
    counter: EvaluationCounter,
    budget: usize,
}

impl EvaluationBudgetTerminator {
    /// Create the terminator.
    ///
    /// # Arguments
    ///
    /// * `counter`: The evaluation counter.
    /// * `budget`: The maximum number of evaluations.
    ///
    /// returns: `EvaluationBudgetTerminator`
    pub fn new(counter: EvaluationCounter, budget: usize) -> Self {
        Self { counter, budget }
    }
}

impl<S, P: Problem> Terminator<S, P> for EvaluationBudgetTerminator {
    fn is_met(&self, _: &S, _: Option<&S>, _: &P::Space, _: &P) -> bool {
        self.counter.count() >= self.budget
    }

    fn name(&self) -> String {
        format!("maximum number of function evaluations ({})", self.budget)
    }
}

/// Stop when the best solution of the population is at least as good as a target vector,
/// according to [`crate::core::Objective::compare_scalar`]. Objectives with more than one
/// component need a [`crate::core::ScalarComparator`]; without one the target is never met and
/// a warning is logged on the first check.
#[derive(Debug, Clone)]
pub struct TargetObjective {
    target: ObjectiveVector,
    misconfigured: Arc<AtomicBool>,
}

impl TargetObjective {
    /// Create the terminator.
    ///
    /// # Arguments
    ///
    /// * `target`: The objective values to reach.
    ///
    /// returns: `TargetObjective`
    pub fn new(target: ObjectiveVector) -> Self {
        Self {
            target,
            misconfigured: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the target could not be compared with the population because the problem's
    /// objective cannot rank vectors on a single scale.
    pub fn is_misconfigured(&self) -> bool {
        self.misconfigured.load(AtomicOrdering::SeqCst)
    }
}

impl<S: AlgorithmState, P: Problem> Terminator<S, P> for TargetObjective {
    fn is_met(&self, current: &S, _: Option<&S>, _: &P::Space, problem: &P) -> bool {
        let objective = problem.objective();
        let population = current.population();
        if population.is_empty() {
            return false;
        }
        match population
            .best(objective)
            .and_then(|best| objective.compare_scalar(best.objectives(), &self.target))
        {
            Ok(ordering) => ordering != Ordering::Greater,
            Err(e) => {
                if !self.misconfigured.swap(true, AtomicOrdering::SeqCst) {
                    warn!("The target objective ({}) is ignored: {e}", self.target);
                }
                false
            }
        }
    }

    fn name(&self) -> String {
        format!("target objective ({})", self.target)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::{
        AfterIterations, AllTerminator, AnyTerminator, EvaluationBudgetTerminator,
        PauseTerminator, PauseToken, PopulationState, TargetObjective, Terminator,
    };
    use crate::core::test_utils::{BoxSpace, SchProblem, SphereProblem};
    use crate::core::{EvaluationCounter, ObjectiveVector, Population, Solution};

    type State = PopulationState<Vec<f64>>;
    type Boxed = Box<dyn Terminator<State, SphereProblem>>;

    fn state(iteration: usize, values: &[f64]) -> State {
        let population: Population<Vec<f64>> = values
            .iter()
            .map(|v| Solution::new(vec![*v], ObjectiveVector::single(*v).unwrap()))
            .collect();
        PopulationState::new(population, iteration)
    }

    fn is_met(terminator: &dyn Terminator<State, SphereProblem>, current: &State) -> bool {
        terminator.is_met(
            current,
            None,
            &BoxSpace::new(1, -5.0, 5.0),
            &SphereProblem::new(1),
        )
    }

    #[test]
    /// Test the iteration count.
    fn test_after_iterations() {
        assert!(AfterIterations::new(0).is_err());
        let terminator: Boxed = Box::new(AfterIterations::new(3).unwrap());
        assert!(!is_met(terminator.as_ref(), &state(0, &[1.0])));
        assert!(!is_met(terminator.as_ref(), &state(1, &[1.0])));
        assert!(is_met(terminator.as_ref(), &state(2, &[1.0])));
    }

    #[test]
    /// Test the compound terminators.
    fn test_compound() {
        let token = PauseToken::new();
        let any: Boxed = Box::new(AnyTerminator::<State, SphereProblem>::new(vec![
            Box::new(AfterIterations::new(10).unwrap()),
            Box::new(PauseTerminator::new(token.clone())),
        ]));
        let all: Boxed = Box::new(AllTerminator::<State, SphereProblem>::new(vec![
            Box::new(AfterIterations::new(10).unwrap()),
            Box::new(PauseTerminator::new(token.clone())),
        ]));
        let current = state(3, &[1.0]);

        assert!(!is_met(any.as_ref(), &current));
        token.pause();
        assert!(is_met(any.as_ref(), &current));
        assert!(!is_met(all.as_ref(), &current));
        assert!(is_met(all.as_ref(), &state(9, &[1.0])));
        token.resume();
        assert!(!is_met(any.as_ref(), &current));
        assert!(any.name().contains("pause request"));

        let empty: Boxed = Box::new(AllTerminator::<State, SphereProblem>::new(vec![]));
        assert!(!is_met(empty.as_ref(), &current));
    }

    #[test]
    /// Test the evaluation budget.
    fn test_evaluation_budget() {
        let counter = EvaluationCounter::new();
        let terminator: Boxed = Box::new(EvaluationBudgetTerminator::new(counter.clone(), 2));
        let current = state(0, &[1.0]);
        assert!(!is_met(terminator.as_ref(), &current));
        counter.increment();
        counter.increment();
        assert!(is_met(terminator.as_ref(), &current));
    }

    #[test]
    /// Test the target objective.
    fn test_target_objective() {
        let terminator: Boxed = Box::new(TargetObjective::new(
            ObjectiveVector::single(0.5).unwrap(),
        ));
        assert!(!is_met(terminator.as_ref(), &state(0, &[3.0, 1.0])));
        assert!(is_met(terminator.as_ref(), &state(0, &[3.0, 0.5])));
        assert!(is_met(terminator.as_ref(), &state(0, &[0.1, 1.0])));
        // an empty population never reaches the target
        assert!(!is_met(terminator.as_ref(), &state(0, &[])));
    }

    #[test]
    /// Test that the target is flagged when the objective has no scalar comparator.
    fn test_target_objective_without_comparator() {
        let terminator = TargetObjective::new(ObjectiveVector::new(vec![0.0, 0.0]).unwrap());
        let problem = SchProblem::new();
        let population: Population<Vec<f64>> = [0.0, 1.0]
            .iter()
            .map(|x: &f64| {
                let values = vec![x.powi(2), (x - 2.0).powi(2)];
                Solution::new(vec![*x], ObjectiveVector::new(values).unwrap())
            })
            .collect();
        let current = PopulationState::new(population, 0);
        let space = BoxSpace::new(1, -1000.0, 1000.0);

        assert!(!terminator.is_misconfigured());
        for _ in 0..2 {
            assert!(!Terminator::<State, SchProblem>::is_met(
                &terminator,
                &current,
                None,
                &space,
                &problem
            ));
        }
        assert!(terminator.is_misconfigured());

        // a comparator makes the target usable
        let problem = SphereProblem::new(1);
        let terminator = TargetObjective::new(ObjectiveVector::single(1.0).unwrap());
        assert!(Terminator::<State, SphereProblem>::is_met(
            &terminator,
            &state(0, &[0.5]),
            None,
            &BoxSpace::new(1, -5.0, 5.0),
            &problem
        ));
        assert!(!terminator.is_misconfigured());
    }
}
