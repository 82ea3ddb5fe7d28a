//! Property-based tests for the combinatorial engine using proptest.

use std::collections::HashSet;

use combinatoria::{CombinatorialEngine, Dimension};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn engine_for(sizes: &[usize]) -> CombinatorialEngine {
    let dimensions = sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| Dimension::new(format!("D{i}"), (0..size as i64).collect::<Vec<_>>()).unwrap())
        .collect();
    CombinatorialEngine::new(dimensions).unwrap()
}

/// Mixed-radix successor with digit 0 least significant.
fn successor(cursor: &[usize], sizes: &[usize]) -> Option<Vec<usize>> {
    let mut next = cursor.to_vec();
    for (digit, size) in sizes.iter().enumerate() {
        next[digit] += 1;
        if next[digit] < *size {
            return Some(next);
        }
        next[digit] = 0;
    }
    None
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Without filters every combination appears once, in counting order.
    #[test]
    fn unfiltered_enumeration_counts_in_mixed_radix(
        sizes in prop::collection::vec(1usize..5, 1..5),
    ) {
        let mut engine = engine_for(&sizes);
        let mut seen = HashSet::new();
        let mut previous: Option<Vec<usize>> = None;
        while engine.advance() {
            let cursor = engine.cursor().to_vec();
            match &previous {
                None => prop_assert!(cursor.iter().all(|&d| d == 0)),
                Some(prev) => prop_assert_eq!(Some(cursor.clone()), successor(prev, &sizes)),
            }
            prop_assert!(seen.insert(cursor.clone()));
            previous = Some(cursor);
        }
        prop_assert_eq!(seen.len(), sizes.iter().product::<usize>());
        prop_assert!(!engine.advance());
    }

    /// A value filtered on `Y==k` only ever appears alongside position k of Y.
    #[test]
    fn single_filter_is_enforced(
        x_size in 1usize..5,
        y_size in 1usize..5,
        filtered in 0usize..5,
        target in 0usize..5,
    ) {
        let filtered = filtered % x_size;
        let filters: Vec<Option<String>> = (0..x_size)
            .map(|i| (i == filtered).then(|| format!("Y=={target}")))
            .collect();
        let mut engine = CombinatorialEngine::new(vec![
            Dimension::with_filters("X", (0..x_size as i64).collect::<Vec<_>>(), filters).unwrap(),
            Dimension::new("Y", (0..y_size as i64).collect::<Vec<_>>()).unwrap(),
        ])
        .unwrap();

        let mut accepted = 0;
        while engine.advance() {
            let cursor = engine.cursor();
            if cursor[0] == filtered {
                prop_assert_eq!(cursor[1], target);
            }
            accepted += 1;
        }
        let filtered_hits = usize::from(target < y_size);
        prop_assert_eq!(accepted, (x_size - 1) * y_size + filtered_hits);
    }
}
