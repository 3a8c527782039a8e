//! Operator contracts used by the algorithms.
//!
//! Each role (creation, crossover, mutation, selection, replacement) is a batch contract taking
//! the whole batch and one [`crate::random::RandomStream`]. Operators that work on one genotype
//! at a time implement the per-item traits ([`Creation`], [`Recombination`], [`Mutation`]) and
//! are lifted to batch contracts with [`batch_creator`], [`batch_crossover`] and
//! [`batch_mutator`]. Per-item operators of composite genotypes are composed as tuples.

pub use creator::{batch_creator, creation_fn, BatchCreator, Creation, CreationFn, Creator};
pub use crossover::{
    batch_crossover, recombination_fn, BatchCrossover, Crossover, Recombination, RecombinationFn,
};
pub use mutation::{batch_mutator, mutation_fn, BatchMutator, Mutation, MutationFn, Mutator};
pub use replacer::{
    CommaSelectionReplacer, ElitismReplacer, GenerationalReplacer, ParetoCrowdingReplacer,
    PlusSelectionReplacer, Replacer,
};
pub use selector::{CrowdedTournamentSelector, RandomSelector, Selector, TournamentSelector};

mod composite;
mod creator;
mod crossover;
mod mutation;
mod replacer;
mod selector;
