//! Random identifier generation.

use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::debug;
use uuid::{Builder, Uuid};

use crate::identifier::Identifier;

/// Default number of identifiers between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Produces random version-4 identifiers.
///
/// Uniqueness is overwhelmingly probable but not checked here; the storage
/// layer's primary key is what enforces it.
///
/// The generator is also an endless [`Iterator`], so identifiers can be
/// streamed into a writer without materialising them first.
#[derive(Debug, Clone)]
pub struct IdentifierGenerator<R = ThreadRng> {
    rng: R,
    progress_interval: usize,
}

impl IdentifierGenerator<ThreadRng> {
    /// Creates a generator backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for IdentifierGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> IdentifierGenerator<R> {
    /// Creates a generator drawing from the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Sets how often `generate` logs progress. Zero disables progress logging.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Draws a single identifier.
    pub fn next_identifier(&mut self) -> Identifier {
        let bytes: [u8; 16] = self.rng.gen();
        let uuid: Uuid = Builder::from_random_bytes(bytes).into_uuid();
        Identifier::from(uuid)
    }

    /// Generates exactly `count` identifiers. `count == 0` yields an empty vector.
    pub fn generate(&mut self, count: usize) -> Vec<Identifier> {
        let mut identifiers = Vec::with_capacity(count);
        for i in 0..count {
            identifiers.push(self.next_identifier());

            let generated = i + 1;
            if self.progress_interval > 0 && generated % self.progress_interval == 0 {
                debug!(generated, total = count, "Generated identifiers");
            }
        }
        identifiers
    }
}

impl<R: Rng> Iterator for IdentifierGenerator<R> {
    type Item = Identifier;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_identifier())
    }
}
