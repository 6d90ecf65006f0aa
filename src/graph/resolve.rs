use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use thiserror::Error;

use crate::graph::{scc, DependencyGraph};

#[derive(Debug, Error)]
#[error("{}", render_cycles(.cycles))]
pub struct CyclicDependency<T: fmt::Debug + fmt::Display> {
    pub cycles: Vec<Vec<T>>,
}

fn render_cycles<T: fmt::Display>(cycles: &[Vec<T>]) -> String {
    let mut out = String::from("Graph is cyclic! Cycles:");
    for cycle in cycles {
        out.push_str("\n[");
        for payload in cycle {
            out.push_str(&payload.to_string());
            out.push(' ');
        }
        out.push(']');
    }
    out
}

// Consumes the graph and yields payloads dependency-first: for every
// edge (from, to), `to`'s payload comes out before `from`'s. Among the
// nodes resolvable at any step, the earliest-inserted wins, matching a
// linear rescan for the first node with no unresolved dependency.
//
// On failure nothing partial is returned; every cycle in the original
// graph is collected into the error.
pub fn load_order<T>(mut graph: DependencyGraph<T>) -> Result<Vec<T>, CyclicDependency<T>>
where
    T: fmt::Debug + fmt::Display,
{
    let live = graph.node_count();
    let slot_count = graph.slot_count();

    // Snapshot taken before any mutation; cycle detection on failure
    // must see the whole graph, not the unresolved residue.
    let adjacency = graph.adjacency();

    let mut out_degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); slot_count];
    for (from, outgoing) in adjacency.iter().enumerate() {
        for &to in outgoing {
            dependents[to].push(from);
        }
    }

    // Min-heap on slot index keeps the insertion-order tie-break; a
    // FIFO queue would not, since resolving a node can ready an
    // earlier-inserted one.
    let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (slot, &degree) in out_degree.iter().enumerate() {
        if degree == 0 && graph.slot_is_live(slot) {
            ready.push(Reverse(slot));
        }
    }

    let mut order = Vec::with_capacity(live);
    while let Some(Reverse(slot)) = ready.pop() {
        if let Some(payload) = graph.take_slot(slot) {
            order.push(payload);
        }
        for &dependent in &dependents[slot] {
            out_degree[dependent] -= 1;
            if out_degree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() == live {
        return Ok(order);
    }

    // Nodes that resolved before the stall can't sit on a cycle, so the
    // payloads of every reported cycle are still in the arena.
    let cycles = scc::cycle_slots(&adjacency)
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .filter_map(|slot| graph.take_slot(slot))
                .collect()
        })
        .collect();

    Err(CyclicDependency { cycles })
}
