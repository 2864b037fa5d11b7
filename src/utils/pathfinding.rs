//! # Bounded Search
//!
//! Breadth-first search with a hard cap on expanded nodes, built on the
//! `pathfinding` crate. The cap guarantees termination on state spaces that
//! are large or contain no goal at all.

use pathfinding::prelude::bfs;
use std::hash::Hash;

/// Result of a capped search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedSearch<N> {
    /// Nodes from start to goal (inclusive), if a goal was reached
    pub path: Option<Vec<N>>,
    /// Number of nodes whose successors were generated
    pub expanded: usize,
    /// The cap was hit before the frontier emptied
    pub exhausted: bool,
}

/// Runs BFS from `start`, expanding at most `cap` nodes.
///
/// Nodes are deduplicated by their `Eq + Hash` identity. Once the cap is reached
/// every remaining node yields no successors, so the search drains and ends.
///
/// # Examples
///
/// ```
/// use dice_arena::bounded_bfs;
///
/// let found = bounded_bfs(&0u32, |&n| vec![n + 1, n + 2], |&n| n == 5, 100);
/// assert_eq!(found.path.map(|p| p.len()), Some(4));
///
/// let capped = bounded_bfs(&0u32, |&n| vec![n + 1], |_| false, 50);
/// assert!(capped.path.is_none());
/// assert!(capped.exhausted);
/// ```
pub fn bounded_bfs<N, FN, IN, FS>(start: &N, mut successors: FN, success: FS, cap: usize) -> BoundedSearch<N>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let mut expanded = 0usize;
    let mut exhausted = false;
    let path = bfs(
        start,
        |node: &N| {
            if expanded >= cap {
                exhausted = true;
                return Vec::new();
            }
            expanded += 1;
            successors(node).into_iter().collect::<Vec<N>>()
        },
        success,
    );
    BoundedSearch {
        exhausted: exhausted && path.is_none(),
        path,
        expanded,
    }
}
