//! Stable Sort Key Utilities
//!
//! Deterministic ordering of players by predicted reach step.
//!
//! ## Ordering
//! - Primary: reach step ascending; unevaluated players (`None`) last
//! - Secondary: enumeration order (observation order), never hash order
//!
//! The secondary key comes from `slice::sort_by_key` being stable.

/// Sort key for an optional reach step: evaluated players first.
#[inline]
pub const fn reach_key(step: Option<u32>) -> u32 {
    match step {
        Some(s) => s,
        None => u32::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_sorts_last() {
        assert!(reach_key(Some(100)) < reach_key(None));
        assert!(reach_key(Some(0)) < reach_key(Some(1)));
    }

    #[test]
    fn test_stable_sort_keeps_enumeration_order_on_ties() {
        let mut items = [(0, Some(5)), (1, None), (2, Some(2)), (3, Some(5)), (4, Some(0))];
        items.sort_by_key(|&(_, step)| reach_key(step));
        let order: Vec<usize> = items.iter().map(|&(idx, _)| idx).collect();
        assert_eq!(order, vec![4, 2, 0, 3, 1]);
    }
}
