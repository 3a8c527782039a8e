//! Reproducible building blocks for metaheuristic optimisation.
//!
//! The crate provides:
//!  - a forkable random number scheme ([`random::RandomStream`]) so that a run gives the same
//!    results whatever the number of workers;
//!  - a batch execution discipline ([`execution::BatchExecution`]) fanning a per-item function
//!    out over many items, sequentially or on a thread pool;
//!  - the operator contracts (creation, crossover, mutation, selection, replacement) and their
//!    generic implementations ([`operators`]);
//!  - the Pareto ranking engine (non-dominated sorting and crowding distance, [`utils`]);
//!  - a lazy executor driving any [`algorithms::IterativeAlgorithm`] generation by generation,
//!    with terminators and interceptors, and the genetic algorithm, evolution strategy and
//!    NSGA2 shells built on top of it ([`algorithms`]).
//!
//! Problems and genotype-specific operators are supplied by the user through the
//! [`core::Problem`], [`core::SearchSpace`] and operator traits.

pub mod algorithms;
pub mod core;
pub mod execution;
pub mod operators;
pub mod random;
pub mod utils;
