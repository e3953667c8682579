//! # Chunk Pool
//!
//! Recycles chunk allocations. A chunk's block buffer is a `4096` entry heap
//! allocation; streaming worlds load and unload chunks constantly, so
//! released chunks are reset and kept for the next `acquire`.

use crate::chunk::Chunk;

/// Free list of reset chunks.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. The world wraps it in a mutex.
#[derive(Debug)]
pub struct ChunkPool {
    /// Reset chunks ready for reuse.
    free: Vec<Chunk>,
    /// Maximum number of chunks kept.
    capacity: usize,
}

impl ChunkPool {
    /// Creates a pool that keeps at most `capacity` chunks.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Takes a chunk from the pool, allocating a new one if it is empty.
    ///
    /// The returned chunk is uninitialized and all Air.
    pub fn acquire(&mut self) -> Chunk {
        self.free.pop().unwrap_or_else(|| {
            tracing::trace!("chunk pool empty, allocating");
            Chunk::new()
        })
    }

    /// Resets a chunk and returns it to the pool. Dropped if the pool is full.
    pub fn release(&mut self, mut chunk: Chunk) {
        if self.free.len() >= self.capacity {
            return;
        }
        chunk.reset();
        self.free.push(chunk);
    }

    /// Number of chunks ready for reuse.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Maximum number of chunks kept.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ChunkPool {
    fn default() -> Self {
        Self::new(64)
    }
}
