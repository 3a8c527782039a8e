use std::fmt::{Debug, Formatter};

use rand::seq::SliceRandom;
use rand::{Error, Rng, RngCore};

use crate::random::{Engine, RandomProfile};

/// A forkable source of random numbers.
///
/// A stream is identified by a 64-bit key and a [`RandomProfile`]. Its engine is created lazily
/// from the key on the first draw. [`RandomStream::fork`] derives a child stream whose key only
/// depends on the parent key and the child key, so the numbers a child produces do not depend on
/// how many numbers the parent (or any sibling) has already drawn. This is what makes results
/// identical regardless of how work is split across threads.
///
/// The stream implements [`RngCore`], so any `rand` distribution can sample from it.
///
/// # Example
/// ```
///  use metarustic::random::RandomStream;
///
///  let root = RandomStream::from_seed(42);
///  let mut a = root.fork(3);
///  let mut b = root.fork(3);
///  assert_eq!(a.next_double(), b.next_double());
/// ```
pub struct RandomStream {
    /// The stream key.
    key: u64,
    /// The key combiner and engine family.
    profile: RandomProfile,
    /// The engine, created on the first draw.
    engine: Option<Engine>,
}

impl Debug for RandomStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomStream")
            .field("key", &format_args!("{:#018x}", self.key))
            .field("engine", &self.profile.factory().name())
            .field("initialised", &self.engine.is_some())
            .finish()
    }
}

impl RandomStream {
    /// Create a root stream.
    ///
    /// # Arguments
    ///
    /// * `seed`: The seed. This is used as the root key.
    /// * `profile`: The key combiner and engine family shared by all descendants.
    ///
    /// returns: `RandomStream`
    pub fn new(seed: u64, profile: RandomProfile) -> Self {
        Self {
            key: seed,
            profile,
            engine: None,
        }
    }

    /// Create a root stream with the default PCG profile.
    ///
    /// # Arguments
    ///
    /// * `seed`: The seed.
    ///
    /// returns: `RandomStream`
    pub fn from_seed(seed: u64) -> Self {
        Self::new(seed, RandomProfile::default())
    }

    /// The stream key.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The profile shared with all descendants.
    pub fn profile(&self) -> &RandomProfile {
        &self.profile
    }

    /// Derive a child stream. This does not change the state of this stream.
    ///
    /// # Arguments
    ///
    /// * `child_key`: The key identifying the child (for example the index of an individual).
    ///
    /// returns: `RandomStream`
    pub fn fork(&self, child_key: u64) -> RandomStream {
        RandomStream {
            key: self.profile.combiner().combine(self.key, child_key),
            profile: self.profile.clone(),
            engine: None,
        }
    }

    fn engine(&mut self) -> &mut Engine {
        let key = self.key;
        let profile = &self.profile;
        self.engine
            .get_or_insert_with(|| profile.factory().create(key))
    }

    /// A number uniformly distributed in `[0, 1)`, with 53 bits of precision.
    pub fn next_double(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// A number uniformly distributed over the full range of `i32`.
    pub fn next_int(&mut self) -> i32 {
        self.next_u32() as i32
    }

    /// An integer uniformly distributed in `[low, high)`.
    ///
    /// # Panics
    ///
    /// This panics if `low >= high`.
    pub fn next_int_in(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..high)
    }

    /// An index uniformly distributed in `[0, length)`.
    ///
    /// # Panics
    ///
    /// This panics if `length` is `0`.
    pub fn next_index(&mut self, length: usize) -> usize {
        self.gen_range(0..length)
    }

    /// `true` with probability `probability`. Values outside `[0, 1]` are clamped.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next_double() < probability.clamp(0.0, 1.0)
    }

    /// `count` numbers uniformly distributed in `[0, 1)`.
    pub fn next_doubles(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_double()).collect()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.engine().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.engine().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.engine().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.engine().try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod test {
    use rand::seq::SliceRandom;

    use crate::random::{RandomProfile, RandomStream};

    fn sequence(stream: &mut RandomStream) -> Vec<u64> {
        (0..16).map(|_| rand::RngCore::next_u64(stream)).collect()
    }

    #[test]
    /// Forking is a pure function of the parent and child keys.
    fn test_fork_is_pure() {
        for profile in [RandomProfile::pcg(), RandomProfile::counter_based()] {
            let root = RandomStream::new(42, profile.clone());
            let mut parent = RandomStream::new(42, profile);

            let before = sequence(&mut root.fork(5));
            // consuming the parent must not change its children
            sequence(&mut parent);
            let after = sequence(&mut parent.fork(5));
            assert_eq!(before, after);

            assert_ne!(sequence(&mut root.fork(5)), sequence(&mut root.fork(6)));
        }
    }

    #[test]
    /// The order of forks matters.
    fn test_fork_order() {
        let root = RandomStream::from_seed(1);
        let mut ab = root.fork(1).fork(2);
        let mut ba = root.fork(2).fork(1);
        assert_ne!(sequence(&mut ab), sequence(&mut ba));
    }

    #[test]
    /// Test the ranges of the derived numbers.
    fn test_number_ranges() {
        let mut rng = RandomStream::from_seed(3);
        for _ in 0..1000 {
            let d = rng.next_double();
            assert!((0.0..1.0).contains(&d));
            let i = rng.next_int_in(-3, 4);
            assert!((-3..4).contains(&i));
        }
        assert!(!rng.next_bool(0.0));
        assert!(rng.next_bool(1.0));
        assert_eq!(rng.next_doubles(5).len(), 5);
        assert!(rng.next_index(3) < 3);

        let mut items: Vec<usize> = (0..10).collect();
        rng.shuffle(&mut items);
        items.sort();
        assert_eq!(items, (0..10).collect::<Vec<_>>());

        // the stream works with rand's helpers
        let items = [1, 2, 3];
        assert!(items.choose(&mut rng).is_some());
    }

    #[test]
    /// Forking a no-op stream is allowed, drawing from it is not.
    fn test_no_op_profile() {
        let root = RandomStream::new(0, RandomProfile::no_op());
        let child = root.fork(1).fork(2);
        assert!(format!("{:?}", child).contains("no-op"));
        let mut child = child;
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| child.next_double()));
        assert!(result.is_err());
    }
}
