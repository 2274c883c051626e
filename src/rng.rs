//! Pluggable randomness source
//!
//! Room codes and nickname selection both reduce to "pick an index in range",
//! so that is the whole interface. Production uses the thread-local rand RNG;
//! tests substitute deterministic pickers.

/// Source of random indices for room codes and nickname selection.
pub trait IndexPicker {
    /// Pick an index in `0..len`. `len` is always non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Default picker backed by `rand::thread_rng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_picker_in_range() {
        let mut rng = ThreadRngPicker;
        for len in [1, 2, 20, 32] {
            for _ in 0..100 {
                assert!(rng.pick_index(len) < len);
            }
        }
    }

    #[test]
    fn test_seq_picker_replays_and_clamps() {
        let mut rng = testing::SeqPicker::new(vec![3, 99]);
        assert_eq!(rng.pick_index(10), 3);
        assert_eq!(rng.pick_index(10), 9); // clamped
        assert_eq!(rng.pick_index(10), 0); // exhausted
    }
}
