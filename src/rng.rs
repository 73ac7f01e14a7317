//! # Random Number Generation
//!
//! Every randomized operation of the engine receives an explicit `&mut dyn RngCore`
//! handle. [`RandomNumberGenerator`] is the handle the engine owns: a seedable
//! `StdRng` that can [`split`](RandomNumberGenerator::split) deterministic children
//! for tasks that run on worker threads.
//!
//! ```rust
//! use genforge::rng::RandomNumberGenerator;
//! use rand::Rng;
//!
//! let mut a = RandomNumberGenerator::from_seed(42);
//! let mut b = RandomNumberGenerator::from_seed(42);
//! assert_eq!(a.gen::<u64>(), b.gen::<u64>());
//! ```
//!
//! ## Registry
//!
//! For single-threaded convenience code the crate keeps a process-wide
//! [`RandomRegistry`]. Setting a global seed makes every subsequently created
//! `RandomNumberGenerator::new()` reproducible, and each thread gets its own
//! generator through [`ThreadLocalRng`]:
//!
//! ```rust
//! use genforge::rng::ThreadLocalRng;
//!
//! let random_number = ThreadLocalRng::gen_range(0.0..1.0);
//! assert!((0.0..1.0).contains(&random_number));
//! ```

use std::cell::RefCell;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use thread_local::ThreadLocal;

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new generator from the global [`RandomRegistry`].
    ///
    /// The generator is seeded from system entropy unless a global seed was set.
    pub fn new() -> Self {
        RandomRegistry::global().next_generator()
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derives an independent child generator.
    ///
    /// The child is seeded from this generator's stream, so a sequence of splits is
    /// reproducible whenever the parent is.
    pub fn split(&mut self) -> Self {
        Self::from_seed(self.rng.next_u64())
    }

    /// Derives `count` child generators, see [`split`](Self::split).
    pub fn split_n(rng: &mut dyn RngCore, count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::from_seed(rng.next_u64())).collect()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for RandomNumberGenerator {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Process-wide source of random generators.
///
/// The registry hands out fresh [`RandomNumberGenerator`]s and keeps one generator
/// per thread for code that has no handle to pass around.
pub struct RandomRegistry {
    seed: Option<u64>,
    source: Mutex<Option<StdRng>>,
    local: ThreadLocal<RefCell<RandomNumberGenerator>>,
}

fn registry_slot() -> &'static RwLock<Arc<RandomRegistry>> {
    static REGISTRY: OnceLock<RwLock<Arc<RandomRegistry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Arc::new(RandomRegistry::new(None))))
}

impl RandomRegistry {
    /// Creates a registry. With `Some(seed)` every generator it creates is reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            source: Mutex::new(seed.map(StdRng::seed_from_u64)),
            local: ThreadLocal::new(),
        }
    }

    /// Returns the current global registry.
    pub fn global() -> Arc<RandomRegistry> {
        registry_slot()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the global registry with a seeded one.
    pub fn set_global_seed(seed: u64) {
        Self::set_global(RandomRegistry::new(Some(seed)));
    }

    /// Replaces the global registry with an entropy-seeded one.
    pub fn reset_global() {
        Self::set_global(RandomRegistry::new(None));
    }

    fn set_global(registry: RandomRegistry) {
        *registry_slot()
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(registry);
    }

    /// The seed this registry was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Creates a new generator.
    pub fn next_generator(&self) -> RandomNumberGenerator {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        match source.as_mut() {
            Some(rng) => RandomNumberGenerator::from_seed(rng.next_u64()),
            None => RandomNumberGenerator {
                rng: StdRng::from_entropy(),
            },
        }
    }

    /// Runs `f` with the calling thread's generator.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within `f` on the same thread.
    pub fn with_local<T>(&self, f: impl FnOnce(&mut RandomNumberGenerator) -> T) -> T {
        let cell = self.local.get_or(|| RefCell::new(self.next_generator()));
        let mut rng = cell.borrow_mut();
        f(&mut rng)
    }
}

impl std::fmt::Debug for RandomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomRegistry")
            .field("seed", &self.seed)
            .finish()
    }
}

/// Access to the calling thread's generator of the global registry.
pub struct ThreadLocalRng;

impl ThreadLocalRng {
    /// Generates a random number in the given range.
    pub fn gen_range<T, R>(range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        Self::with(|rng| rng.gen_range(range))
    }

    /// Runs `f` with the calling thread's generator.
    pub fn with<T>(f: impl FnOnce(&mut RandomNumberGenerator) -> T) -> T {
        RandomRegistry::global().with_local(f)
    }
}
