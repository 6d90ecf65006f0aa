use crate::graph::{DependencyGraph, NodeId};

// Every cycle in `graph`, without resolving it. A cycle is a strongly
// connected component of size > 1, or a single node with an edge to
// itself. Nodes on no cycle never appear in the output.
pub fn find_cycles<T>(graph: &DependencyGraph<T>) -> Vec<Vec<NodeId>> {
    let adjacency = graph.adjacency();
    cycle_slots(&adjacency)
        .into_iter()
        .map(|component| component.into_iter().map(NodeId::from_slot).collect())
        .collect()
}

pub(crate) fn cycle_slots(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    strongly_connected(adjacency)
        .into_iter()
        .filter(|component| component.len() > 1 || has_self_edge(adjacency, component[0]))
        .collect()
}

fn has_self_edge(adjacency: &[Vec<usize>], node: usize) -> bool {
    adjacency[node].iter().any(|&target| target == node)
}

const UNVISITED: usize = usize::MAX;

struct Frame {
    node: usize,
    edge: usize,
}

// Tarjan's algorithm with an explicit DFS stack, so component discovery
// cannot overflow the call stack on deep graphs. Components come out in
// completion order (children before parents).
pub(crate) fn strongly_connected(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let count = adjacency.len();
    let mut index = vec![UNVISITED; count];
    let mut low_link = vec![0usize; count];
    let mut on_stack = vec![false; count];
    let mut stack: Vec<usize> = Vec::new();
    let mut dfs: Vec<Frame> = Vec::new();
    let mut next_index = 0usize;
    let mut components = Vec::new();

    for root in 0..count {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        low_link[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        dfs.push(Frame {
            node: root,
            edge: 0,
        });

        while let Some(frame) = dfs.last_mut() {
            let node = frame.node;
            if frame.edge < adjacency[node].len() {
                let target = adjacency[node][frame.edge];
                frame.edge += 1;
                if index[target] == UNVISITED {
                    index[target] = next_index;
                    low_link[target] = next_index;
                    next_index += 1;
                    stack.push(target);
                    on_stack[target] = true;
                    dfs.push(Frame {
                        node: target,
                        edge: 0,
                    });
                } else if on_stack[target] {
                    low_link[node] = low_link[node].min(index[target]);
                }
                // already-closed components are ignored
            } else {
                dfs.pop();
                if let Some(parent) = dfs.last() {
                    low_link[parent.node] = low_link[parent.node].min(low_link[node]);
                }
                if low_link[node] == index[node] {
                    let mut component = Vec::new();
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        component.push(member);
                        if member == node {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
    }

    components
}
