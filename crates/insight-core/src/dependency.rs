//! Dependency graph sanitization and cycle detection.
//!
//! Edges point from a task to each task it depends on. Traversal is an
//! iterative depth-first search, so arbitrarily long dependency chains do
//! not grow the call stack.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::{CandidateTask, ExtractionResult, Task, TaskStatus};

/// Sanitize dependencies, detect cycles, and derive each task's status.
///
/// Dependencies naming an id outside the batch are removed, preserving the
/// order of the rest. Every task that appears in a detected cycle is
/// `blocked`; all others are `ready`. Ids are expected to be unique, as
/// guaranteed by [`crate::validation::shape_filter`].
pub fn sanitize_and_detect(tasks: Vec<CandidateTask>) -> ExtractionResult {
    let ids: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();

    let sanitized: Vec<CandidateTask> = tasks
        .into_iter()
        .map(|mut task| {
            task.dependencies.retain(|dep| ids.contains(dep));
            task
        })
        .collect();

    let cycles = detect_cycles(&sanitized);
    let blocked: HashSet<&str> = cycles.iter().flatten().map(String::as_str).collect();

    let tasks: Vec<Task> = sanitized
        .iter()
        .map(|task| Task {
            id: task.id.clone(),
            description: task.description.clone(),
            priority: task.priority,
            dependencies: task.dependencies.clone(),
            status: if blocked.contains(task.id.as_str()) {
                TaskStatus::Blocked
            } else {
                TaskStatus::Ready
            },
        })
        .collect();

    debug!(
        subsystem = "core",
        component = "dependency",
        op = "sanitize_and_detect",
        task_count = tasks.len(),
        cycle_count = cycles.len(),
        blocked_count = blocked.len(),
        "Dependency graph validated"
    );

    ExtractionResult { tasks, cycles }
}

/// Find cycles by depth-first search from every unvisited task, in input order.
///
/// Neighbors are explored in dependency order. When the search reaches a
/// task already on the current path, the path segment from that task
/// through the repeated task is recorded, so `t1 -> t2 -> t3 -> t1` yields
/// `[t1, t2, t3, t1]` and a self-loop yields `[t1, t1]`. Fully explored
/// tasks are not revisited, which means a cycle reachable from several
/// roots is reported once.
pub fn detect_cycles(tasks: &[CandidateTask]) -> Vec<Vec<String>> {
    let graph: HashMap<&str, &[String]> = tasks
        .iter()
        .map(|t| (t.id.as_str(), t.dependencies.as_slice()))
        .collect();

    let mut cycles = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    // (node, index of the next dependency to explore)
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for task in tasks {
        let root = task.id.as_str();
        if !visited.insert(root) {
            continue;
        }
        on_path.insert(root);
        path.push(root);
        stack.push((root, 0));

        while let Some(&(node, next)) = stack.last() {
            let deps = graph.get(node).copied().unwrap_or_default();

            let Some(dep) = deps.get(next) else {
                stack.pop();
                path.pop();
                on_path.remove(node);
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let dep = dep.as_str();
            if on_path.contains(dep) {
                if let Some(start) = path.iter().position(|n| *n == dep) {
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(dep.to_string());
                    cycles.push(cycle);
                }
            } else if visited.insert(dep) {
                on_path.insert(dep);
                path.push(dep);
                stack.push((dep, 0));
            }
        }
    }

    cycles
}
