pub use error::OError;
pub use objective::{Dominance, Objective, ObjectiveDirection, ObjectiveVector, ScalarComparator};
pub use problem::{evaluate_genotypes, BudgetedProblem, EvaluationCounter, Problem, SearchSpace};
pub use solution::{Population, Solution};

pub mod error;
pub mod objective;
pub mod problem;
pub mod solution;
#[cfg(test)]
pub(crate) mod test_utils;
