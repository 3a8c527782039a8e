//! Deterministic, forkable random number streams.
//!
//! A root [`RandomStream`] is created from a seed; every operator call receives a stream and
//! forks one child per item it processes. Child keys are derived by a [`KeyCombiner`] and turned
//! into numbers by an engine built by an [`EngineFactory`]; the pair forms a [`RandomProfile`].

pub use combiner::{KeyCombiner, MixKeyCombiner};
pub use engine::{ChaChaEngineFactory, Engine, EngineFactory, NoOpEngineFactory, PcgEngineFactory};
pub use profile::RandomProfile;
pub use seed::SeedSequence;
pub use stream::RandomStream;

mod combiner;
mod engine;
mod profile;
mod seed;
mod stream;
