//! Experience replay memory for Q-learning
//!
//! A fixed-capacity ring buffer of transitions. Once full, every push
//! overwrites the oldest slot, and the evicted transition (with the matrices
//! it owns) is handed back to the caller instead of being kept alive.

use burn::tensor::backend::Backend;
use rand::Rng;

use super::matrix::Matrix;

/// One transition observed by the agent
#[derive(Debug, Clone)]
pub struct Experience<B: Backend> {
    /// Encoded board before the action
    pub old_state: Matrix<B>,
    /// Encoded board after the action
    pub new_state: Matrix<B>,
    /// Action index taken
    pub action: usize,
    /// Reward received
    pub reward: f32,
    /// Whether the action ended the episode
    pub done: bool,
}

/// Fixed-capacity circular store of experiences
///
/// # Example
///
/// ```rust
/// use q_snake::rl::{default_device, matrix, Experience, ReplayMemory, TrainingBackend};
///
/// let device = default_device();
/// let mut memory = ReplayMemory::<TrainingBackend>::new(2);
///
/// for reward in [1.0, 2.0, 3.0] {
///     let evicted = memory.push(Experience {
///         old_state: matrix::zeros(4, 4, &device),
///         new_state: matrix::zeros(4, 4, &device),
///         action: 0,
///         reward,
///         done: false,
///     });
///     if reward == 3.0 {
///         assert_eq!(evicted.map(|e| e.reward), Some(1.0));
///     }
/// }
///
/// assert_eq!(memory.len(), 2);
/// assert!(memory.is_full());
/// ```
pub struct ReplayMemory<B: Backend> {
    slots: Vec<Experience<B>>,
    /// Next slot to write once the memory is full
    cursor: usize,
    capacity: usize,
}

impl<B: Backend> ReplayMemory<B> {
    /// Create an empty memory
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay memory capacity must be positive");
        Self {
            slots: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Store a transition, returning the one it overwrote if the memory was full
    pub fn push(&mut self, experience: Experience<B>) -> Option<Experience<B>> {
        let evicted = if self.slots.len() < self.capacity {
            self.slots.push(experience);
            None
        } else {
            Some(std::mem::replace(&mut self.slots[self.cursor], experience))
        };
        self.cursor = (self.cursor + 1) % self.capacity;
        evicted
    }

    /// Pick one stored transition uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Experience<B>> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.slots.len());
        self.slots.get(idx)
    }

    /// Draw `min(len, batch_size)` transitions independently, with replacement
    pub fn sample_batch<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<&Experience<B>> {
        let count = batch_size.min(self.slots.len());
        (0..count).filter_map(|_| self.sample(rng)).collect()
    }

    /// Stored transitions from oldest to newest
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Experience<B>> {
        let split = if self.is_full() { self.cursor } else { 0 };
        self.slots[split..].iter().chain(self.slots[..split].iter())
    }

    /// Get the number of stored transitions
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
