//! Helpers over the ordered key sequence
//!
//! The sequence is oldest-first: the front is the next key `take` removes and
//! the back is the next key `pop` removes.

use std::collections::VecDeque;

/// Position of `key` in the sequence, scanning from the oldest entry.
pub fn find_index(keys: &VecDeque<String>, key: &str) -> Option<usize> {
    keys.iter().position(|k| k == key)
}

/// Removes the key at `index`, shifting later keys forward so relative order
/// is kept. Returns `None` when `index` is out of bounds.
pub fn remove_at(keys: &mut VecDeque<String>, index: usize) -> Option<String> {
    match index {
        0 => keys.pop_front(),
        i if i + 1 == keys.len() => keys.pop_back(),
        i => keys.remove(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(keys: &[&str]) -> VecDeque<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_find_index() {
        let keys = sequence(&["a", "b", "c"]);
        assert_eq!(find_index(&keys, "a"), Some(0));
        assert_eq!(find_index(&keys, "c"), Some(2));
        assert_eq!(find_index(&keys, "z"), None);
        assert_eq!(find_index(&VecDeque::new(), "a"), None);
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let mut keys = sequence(&["a", "b", "c", "d"]);

        assert_eq!(remove_at(&mut keys, 1), Some("b".to_string()));
        assert_eq!(keys, sequence(&["a", "c", "d"]));

        assert_eq!(remove_at(&mut keys, 0), Some("a".to_string()));
        assert_eq!(keys, sequence(&["c", "d"]));

        assert_eq!(remove_at(&mut keys, 1), Some("d".to_string()));
        assert_eq!(keys, sequence(&["c"]));
    }

    #[test]
    fn test_remove_at_out_of_bounds() {
        let mut keys = sequence(&["a"]);
        assert_eq!(remove_at(&mut keys, 3), None);
        assert_eq!(keys.len(), 1);

        let mut empty = VecDeque::new();
        assert_eq!(remove_at(&mut empty, 0), None);
    }
}
