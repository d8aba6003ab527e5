//! Epsilon-greedy action selection

use rand::Rng;

use crate::game::NUM_ACTIONS;

/// Index of the largest Q-value; ties go to the lowest index
///
/// NaN entries never win.
pub fn argmax(q_values: &[f32]) -> usize {
    let mut best = 0;
    for (idx, &q) in q_values.iter().enumerate().skip(1) {
        if q > q_values[best] || q_values[best].is_nan() {
            best = idx;
        }
    }
    best
}

/// Pick an action from Q-values
///
/// `epsilon` is the exploration probability, not the greedy one.
/// With probability `epsilon` a uniformly random action is returned,
/// otherwise the greedy one. `epsilon = 0` is fully greedy and `epsilon = 1`
/// fully random.
pub fn get_action<R: Rng + ?Sized>(q_values: &[f32], epsilon: f64, rng: &mut R) -> usize {
    if epsilon > 0.0 && rng.gen_bool(epsilon.min(1.0)) {
        rng.gen_range(0..NUM_ACTIONS)
    } else {
        argmax(q_values)
    }
}
