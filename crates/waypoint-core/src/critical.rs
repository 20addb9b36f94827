//! Critical path selection.

use crate::{graph::TaskGraph, schedule::Schedule};

/// Ids of every zero-slack task, in topological order.
///
/// All zero-slack branches are included, so two parallel chains of equal
/// length both appear. For a non-empty graph the result is never empty: the
/// task finishing last always has zero slack.
pub fn critical_path(graph: &TaskGraph, schedule: &Schedule) -> Vec<String> {
    graph
        .order_indices()
        .iter()
        .filter(|&&node| schedule.timing(node).is_some_and(|t| t.is_critical()))
        .map(|&node| graph.ids()[node].clone())
        .collect()
}
