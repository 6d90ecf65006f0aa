pub mod resolve;
pub mod scc;
pub mod viz;

pub use resolve::{load_order, CyclicDependency};
pub use scc::find_cycles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_slot(slot: usize) -> Self {
        NodeId(slot)
    }
}

#[derive(Debug)]
pub struct DependencyGraph<T> {
    slots: Vec<Option<T>>,
    edges: Vec<Vec<NodeId>>,
    live: usize,
}

impl<T> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            edges: Vec::new(),
            live: 0,
        }
    }
}

impl<T> DependencyGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, payload: T) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(payload));
        self.edges.push(Vec::new());
        self.live += 1;
        id
    }

    // Records "from must load after to". Duplicate edges and self-edges
    // are accepted as-is; handles that were never issued by this graph,
    // or already removed, are a caller bug.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        assert!(
            self.contains(from),
            "edge source is not a live node in this graph"
        );
        assert!(
            self.contains(to),
            "edge target is not a live node in this graph"
        );
        self.edges[from.index()].push(to);
    }

    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.get(id.index()).is_some_and(Option::is_some)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, payload)| payload.as_ref().map(|p| (NodeId(slot), p)))
    }

    pub fn payload(&self, id: NodeId) -> &T {
        self.slots[id.index()]
            .as_ref()
            .expect("node is not live in this graph")
    }

    pub fn edges_of(&self, id: NodeId) -> &[NodeId] {
        assert!(self.contains(id), "node is not live in this graph");
        &self.edges[id.index()]
    }

    // Nothing may still depend on a resolved node, so removal also strips
    // the node from every other live node's outgoing set.
    pub fn remove_node(&mut self, id: NodeId) -> T {
        let payload = self.slots[id.index()]
            .take()
            .expect("node is not live in this graph");
        self.edges[id.index()].clear();
        for outgoing in &mut self.edges {
            outgoing.retain(|target| *target != id);
        }
        self.live -= 1;
        payload
    }

    // Outgoing edges per raw slot index. Dead slots are empty.
    pub(crate) fn adjacency(&self) -> Vec<Vec<usize>> {
        self.edges
            .iter()
            .map(|outgoing| outgoing.iter().map(|id| id.index()).collect())
            .collect()
    }

    pub(crate) fn take_slot(&mut self, slot: usize) -> Option<T> {
        let payload = self.slots[slot].take();
        if payload.is_some() {
            self.live -= 1;
        }
        payload
    }

    pub(crate) fn slot_is_live(&self, slot: usize) -> bool {
        self.slots[slot].is_some()
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
