//! Dependency graph over the tasks of one plan.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use log::debug;

use crate::{
    error::{PlanError, Result},
    models::Task,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Directed acyclic graph of task dependencies.
///
/// Nodes are addressed by their position in the task slice the graph was
/// built from, so a `TaskGraph` is only meaningful next to that slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    order: Vec<usize>,
}

impl TaskGraph {
    /// Builds the graph, rejecting duplicate ids, unknown dependencies and
    /// cycles (a task depending on itself is a cycle of length one).
    pub fn build(tasks: &[Task]) -> Result<Self> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.task_id.clone(), i).is_some() {
                return Err(PlanError::DuplicateTask {
                    task: task.task_id.clone(),
                });
            }
        }

        let mut predecessors = vec![Vec::new(); tasks.len()];
        let mut successors = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for dependency in &task.depends_on {
                if *dependency == task.task_id {
                    return Err(PlanError::Cycle {
                        path: vec![task.task_id.clone(), task.task_id.clone()],
                    });
                }
                let Some(&p) = index.get(dependency) else {
                    return Err(PlanError::DanglingReference {
                        task: task.task_id.clone(),
                        dependency: dependency.clone(),
                    });
                };
                if !predecessors[i].contains(&p) {
                    predecessors[i].push(p);
                    successors[p].push(i);
                }
            }
        }

        let mut graph = Self {
            ids: tasks.iter().map(|t| t.task_id.clone()).collect(),
            index,
            predecessors,
            successors,
            order: Vec::new(),
        };

        if let Some(path) = graph.find_cycle() {
            return Err(PlanError::Cycle { path });
        }
        graph.order = graph.stable_topological_order();

        debug!(
            "Built task graph with {} tasks and {} edges",
            graph.len(),
            graph.predecessors.iter().map(Vec::len).sum::<usize>()
        );
        Ok(graph)
    }

    /// Three-colour depth-first search along dependency edges.
    ///
    /// Returns the first cycle found as a list of ids in which each id
    /// depends on the next, starting and ending with the same id.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; self.ids.len()];
        let mut path = Vec::new();
        for start in 0..self.ids.len() {
            if marks[start] == Mark::Unvisited {
                if let Some(cycle) = self.visit(start, &mut marks, &mut path) {
                    return Some(cycle.into_iter().map(|i| self.ids[i].clone()).collect());
                }
            }
        }
        None
    }

    fn visit(&self, node: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> Option<Vec<usize>> {
        marks[node] = Mark::InProgress;
        path.push(node);
        for &next in &self.predecessors[node] {
            match marks[next] {
                Mark::InProgress => {
                    let from = path.iter().position(|&n| n == next).unwrap_or(0);
                    let mut cycle = path[from..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.visit(next, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        path.pop();
        marks[node] = Mark::Done;
        None
    }

    /// Kahn's algorithm, always releasing the ready task that came first in
    /// the input.
    fn stable_topological_order(&self) -> Vec<usize> {
        let mut remaining: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.ids.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &next in &self.successors[node] {
                remaining[next] -= 1;
                if remaining[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }
        order
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.index.contains_key(task_id)
    }

    /// Position of a task in the input slice.
    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.index.get(task_id).copied()
    }

    /// Task ids in input order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Task ids with every task after all of its dependencies. Ties keep
    /// input order.
    pub fn topological_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|&i| self.ids[i].as_str())
    }

    /// Direct dependencies of a task.
    pub fn predecessors(&self, task_id: &str) -> Option<Vec<&str>> {
        self.index_of(task_id).map(|i| self.names(&self.predecessors[i]))
    }

    /// Tasks that directly depend on a task.
    pub fn successors(&self, task_id: &str) -> Option<Vec<&str>> {
        self.index_of(task_id).map(|i| self.names(&self.successors[i]))
    }

    /// Tasks without dependencies, in input order.
    pub fn roots(&self) -> Vec<&str> {
        self.filter_ids(|i| self.predecessors[i].is_empty())
    }

    /// Tasks nothing depends on, in input order.
    pub fn terminals(&self) -> Vec<&str> {
        self.filter_ids(|i| self.successors[i].is_empty())
    }

    pub(crate) fn order_indices(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn predecessor_indices(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }

    pub(crate) fn successor_indices(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    fn names(&self, nodes: &[usize]) -> Vec<&str> {
        nodes.iter().map(|&i| self.ids[i].as_str()).collect()
    }

    fn filter_ids(&self, keep: impl Fn(usize) -> bool) -> Vec<&str> {
        (0..self.ids.len())
            .filter(|&i| keep(i))
            .map(|i| self.ids[i].as_str())
            .collect()
    }
}
