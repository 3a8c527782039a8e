use std::sync::Arc;

use crate::random::{
    ChaChaEngineFactory, EngineFactory, KeyCombiner, MixKeyCombiner, NoOpEngineFactory,
    PcgEngineFactory,
};

/// The pair of strategies used by every stream forked from a root stream: how keys are combined
/// and which engine family turns a key into numbers. Profiles are cheap to clone.
#[derive(Debug, Clone)]
pub struct RandomProfile {
    combiner: Arc<dyn KeyCombiner>,
    factory: Arc<dyn EngineFactory>,
}

impl Default for RandomProfile {
    /// The [`RandomProfile::pcg`] profile.
    fn default() -> Self {
        Self::pcg()
    }
}

impl RandomProfile {
    /// Create a profile from a combiner and an engine factory.
    ///
    /// # Arguments
    ///
    /// * `combiner`: The key combiner.
    /// * `factory`: The engine factory.
    ///
    /// returns: `RandomProfile`
    pub fn new(combiner: Arc<dyn KeyCombiner>, factory: Arc<dyn EngineFactory>) -> Self {
        Self { combiner, factory }
    }

    /// Mixed keys with PCG engines.
    pub fn pcg() -> Self {
        Self::new(Arc::new(MixKeyCombiner), Arc::new(PcgEngineFactory))
    }

    /// Mixed keys with counter-based ChaCha8 engines.
    pub fn counter_based() -> Self {
        Self::new(Arc::new(MixKeyCombiner), Arc::new(ChaChaEngineFactory))
    }

    /// Mixed keys with engines that panic when used.
    pub fn no_op() -> Self {
        Self::new(Arc::new(MixKeyCombiner), Arc::new(NoOpEngineFactory))
    }

    /// The key combiner.
    pub fn combiner(&self) -> &dyn KeyCombiner {
        self.combiner.as_ref()
    }

    /// The engine factory.
    pub fn factory(&self) -> &dyn EngineFactory {
        self.factory.as_ref()
    }
}
