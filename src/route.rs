//! Turning selected arcs back into a visiting order.

use std::collections::HashMap;

use crate::error::{PlannerError, Result};

/// Follows `arcs` from `origin` until `destination`.
///
/// Every arc must be consumed exactly once on that walk; a branch, a dead
/// end, a revisit or a leftover arc is an invariant violation.
pub fn reconstruct(day: usize, arcs: &[(usize, usize)], origin: usize, destination: usize) -> Result<Vec<usize>> {
    let invariant = |message: String| PlannerError::ReconstructionInvariant { day, message };

    let mut successor: HashMap<usize, usize> = HashMap::with_capacity(arcs.len());
    for &(from, to) in arcs {
        if from == destination {
            return Err(invariant(format!("arc {from}->{to} leaves the destination")));
        }
        if let Some(previous) = successor.insert(from, to) {
            return Err(invariant(format!(
                "node {from} has two outgoing arcs (to {previous} and {to})"
            )));
        }
    }

    let mut path = Vec::with_capacity(arcs.len() + 1);
    let mut seen = vec![false; destination.max(origin) + 1];
    let mut node = origin;
    path.push(node);

    while node != destination {
        let next = successor
            .remove(&node)
            .ok_or_else(|| invariant(format!("path stops at node {node} before the destination")))?;
        if next >= seen.len() {
            return Err(invariant(format!("arc {node}->{next} points outside the model")));
        }
        if seen[next] || next == origin {
            return Err(invariant(format!("node {next} reached twice")));
        }
        seen[next] = true;
        path.push(next);
        node = next;
    }

    if !successor.is_empty() {
        let mut stray: Vec<_> = successor.into_iter().collect();
        stray.sort_unstable();
        return Err(invariant(format!(
            "arcs {stray:?} are not on the hotel-to-hotel path"
        )));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_hotel_return() {
        assert_eq!(reconstruct(0, &[(0, 1)], 0, 1).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_follows_arcs_in_any_input_order() {
        let arcs = [(2, 4), (0, 3), (3, 2)];
        assert_eq!(reconstruct(0, &arcs, 0, 4).unwrap(), vec![0, 3, 2, 4]);
    }

    #[test]
    fn test_detached_cycle_is_rejected() {
        // 0 -> 1 -> 4 plus a separate 2 <-> 3 loop
        let arcs = [(0, 1), (1, 4), (2, 3), (3, 2)];
        let err = reconstruct(3, &arcs, 0, 4).unwrap_err();
        assert!(matches!(err, PlannerError::ReconstructionInvariant { day: 3, .. }));
    }

    #[test]
    fn test_dead_end_is_rejected() {
        assert!(reconstruct(0, &[(0, 2)], 0, 3).is_err());
        assert!(reconstruct(0, &[], 0, 1).is_err());
    }

    #[test]
    fn test_branch_is_rejected() {
        assert!(reconstruct(0, &[(0, 1), (0, 2), (1, 3), (2, 3)], 0, 3).is_err());
    }

    #[test]
    fn test_loop_back_is_rejected() {
        assert!(reconstruct(0, &[(0, 1), (1, 2), (2, 1)], 0, 3).is_err());
    }
}
