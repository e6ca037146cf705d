//! Dependency-graph circuit representation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::circuit::{Circuit, MAX_QUBITS};
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::{GateId, QubitId};

/// Directed acyclic multigraph of gate dependencies.
///
/// Nodes own gates; an edge `(u, v)` means `u` must execute before `v`.
/// For every qubit the nodes touching it form a total order, and
/// successive touches are connected by an edge, so a two-qubit gate pair
/// sharing both operands is wired by two parallel edges. A per-qubit
/// cursor tracks the latest node on each wire.
///
/// Node ids are assigned monotonically and never reused within a DAG
/// lifetime, even after removals.
pub struct CircuitDag {
    graph: StableDiGraph<Gate, (), u32>,
    index_of: FxHashMap<GateId, NodeIndex>,
    last_on_qubit: Vec<Option<GateId>>,
    num_qubits: usize,
    next_gate_id: u64,
}

impl CircuitDag {
    /// Create an empty DAG over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> IrResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(IrError::CircuitTooLarge {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            graph: StableDiGraph::default(),
            index_of: FxHashMap::default(),
            last_on_qubit: vec![None; num_qubits],
            num_qubits,
            next_gate_id: 0,
        })
    }

    /// Build a DAG from a circuit. Nodes receive fresh ids in circuit
    /// order; edges are wired through the per-qubit cursor.
    pub fn from_circuit(circuit: &Circuit) -> IrResult<Self> {
        let mut dag = Self::new(circuit.num_qubits())?;
        for gate in circuit {
            dag.add_gate(gate.clone())?;
        }
        Ok(dag)
    }

    /// Append a gate, wiring it behind the latest node on each of its
    /// qubits, and advance the cursors.
    pub fn add_gate(&mut self, mut gate: Gate) -> IrResult<GateId> {
        for &q in gate.qubits() {
            if q.index() >= self.num_qubits {
                return Err(IrError::OutOfRangeQubit {
                    gate: gate.kind().name(),
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }

        let id = GateId(self.next_gate_id);
        self.next_gate_id += 1;
        gate.set_id(id);

        let qubits: Vec<QubitId> = gate.qubits().to_vec();
        let idx = self.graph.add_node(gate);
        self.index_of.insert(id, idx);

        for q in qubits {
            if let Some(prev) = self.last_on_qubit[q.index()] {
                let prev_idx = self.index_of[&prev];
                self.graph.add_edge(prev_idx, idx, ());
            }
            self.last_on_qubit[q.index()] = Some(id);
        }

        Ok(id)
    }

    /// Remove a node, contracting its edges: every predecessor gains
    /// every successor as a direct successor (without duplicating edges
    /// that already exist), and the per-qubit cursors are repaired.
    ///
    /// Returns the removed gate.
    pub fn remove_node(&mut self, id: GateId) -> IrResult<Gate> {
        let idx = self.index(id)?;

        let preds = self.unique_neighbors(idx, Direction::Incoming);
        let succs = self.unique_neighbors(idx, Direction::Outgoing);

        // Repair cursors before the node disappears: the previous toucher
        // of a qubit is always a direct predecessor (wire edges survive
        // contraction), so searching the predecessors is sufficient.
        let qubits: Vec<QubitId> = self.graph[idx].qubits().to_vec();
        for q in &qubits {
            if self.last_on_qubit[q.index()] == Some(id) {
                let new_last = preds
                    .iter()
                    .copied()
                    .find(|p| self.graph[self.index_of[p]].qubits().contains(q));
                self.last_on_qubit[q.index()] = new_last;
            }
        }

        let gate = self
            .graph
            .remove_node(idx)
            .expect("node index resolved from live id map");
        self.index_of.remove(&id);

        for &p in &preds {
            for &s in &succs {
                if !self.has_edge(p, s) {
                    let (pi, si) = (self.index_of[&p], self.index_of[&s]);
                    self.graph.add_edge(pi, si, ());
                }
            }
        }

        Ok(gate)
    }

    /// Get the gate owned by a node.
    pub fn gate(&self, id: GateId) -> IrResult<&Gate> {
        let idx = self.index(id)?;
        Ok(&self.graph[idx])
    }

    /// Replace the angle of a parameterized gate in place.
    pub fn update_angle(&mut self, id: GateId, angle: f64) -> IrResult<()> {
        let idx = self.index(id)?;
        let gate = &mut self.graph[idx];
        if !gate.kind().is_parameterized() {
            return Err(IrError::InvalidGate {
                gate: gate.kind().name(),
                reason: "gate does not take an angle".to_string(),
            });
        }
        gate.set_angle(angle);
        Ok(())
    }

    /// Check if a node exists.
    #[inline]
    pub fn has_node(&self, id: GateId) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Check if a direct edge `from → to` exists.
    pub fn has_edge(&self, from: GateId, to: GateId) -> bool {
        match (self.index_of.get(&from), self.index_of.get(&to)) {
            (Some(&f), Some(&t)) => self.graph.find_edge(f, t).is_some(),
            _ => false,
        }
    }

    /// All node ids, ascending.
    pub fn node_ids(&self) -> Vec<GateId> {
        let mut ids: Vec<GateId> = self.index_of.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of nodes with no predecessors, ascending.
    pub fn sources(&self) -> Vec<GateId> {
        self.degree_filtered(Direction::Incoming)
    }

    /// Ids of nodes with no successors, ascending.
    pub fn sinks(&self) -> Vec<GateId> {
        self.degree_filtered(Direction::Outgoing)
    }

    /// Direct successors of a node, one entry per outgoing edge.
    pub fn successors(&self, id: GateId) -> IrResult<Vec<GateId>> {
        let idx = self.index(id)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| self.graph[e.target()].id().expect("DAG gates carry ids"))
            .collect())
    }

    /// Direct predecessors of a node, one entry per incoming edge.
    pub fn predecessors(&self, id: GateId) -> IrResult<Vec<GateId>> {
        let idx = self.index(id)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| self.graph[e.source()].id().expect("DAG gates carry ids"))
            .collect())
    }

    /// Incoming edge count of a node (parallel edges counted).
    pub fn in_degree(&self, id: GateId) -> IrResult<usize> {
        let idx = self.index(id)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .count())
    }

    /// All edges as `(from, to)` id pairs, sorted.
    pub fn edges(&self) -> Vec<(GateId, GateId)> {
        let mut result = Vec::with_capacity(self.graph.edge_count());
        for edge in self.graph.edge_indices() {
            if let Some((s, t)) = self.graph.edge_endpoints(edge) {
                let from = self.graph[s].id().expect("DAG gates carry ids");
                let to = self.graph[t].id().expect("DAG gates carry ids");
                result.push((from, to));
            }
        }
        result.sort_unstable();
        result
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if the DAG has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Remove every node and reset the cursors. The id counter keeps
    /// running so ids are still never reused.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index_of.clear();
        self.last_on_qubit.fill(None);
    }

    /// Latest node touching `qubit`, or `None` if the wire is empty.
    pub fn last_on_qubit(&self, qubit: QubitId) -> Option<GateId> {
        self.last_on_qubit.get(qubit.index()).copied().flatten()
    }

    /// Nodes in topological order via Kahn's algorithm. When several
    /// nodes are ready, the smallest id goes first, making the order
    /// deterministic for a given DAG.
    pub fn topological_order(&self) -> IrResult<Vec<GateId>> {
        let mut in_degree: FxHashMap<GateId, usize> = FxHashMap::default();
        for (&id, &idx) in &self.index_of {
            in_degree.insert(
                id,
                self.graph.edges_directed(idx, Direction::Incoming).count(),
            );
        }

        let mut ready: BinaryHeap<Reverse<GateId>> = in_degree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut result = Vec::with_capacity(self.node_count());
        while let Some(Reverse(id)) = ready.pop() {
            result.push(id);
            for succ in self.successors(id)? {
                let d = in_degree
                    .get_mut(&succ)
                    .expect("successor is a live node");
                *d -= 1;
                if *d == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if result.len() != self.node_count() {
            return Err(IrError::CycleDetected);
        }
        Ok(result)
    }

    /// Nodes grouped by ASAP layers: layer `k` holds the nodes whose
    /// longest path from a source is `k`. Ids within a layer ascend.
    pub fn layers(&self) -> IrResult<Vec<Vec<GateId>>> {
        if self.is_empty() {
            return Ok(vec![]);
        }

        let mut in_degree: FxHashMap<GateId, usize> = FxHashMap::default();
        for (&id, &idx) in &self.index_of {
            in_degree.insert(
                id,
                self.graph.edges_directed(idx, Direction::Incoming).count(),
            );
        }

        let mut layer: Vec<GateId> = in_degree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&id, _)| id)
            .collect();
        layer.sort_unstable();

        let mut processed = 0usize;
        let mut result = Vec::new();
        while !layer.is_empty() {
            processed += layer.len();
            let mut next = Vec::new();
            for &id in &layer {
                for succ in self.successors(id)? {
                    let d = in_degree
                        .get_mut(&succ)
                        .expect("successor is a live node");
                    *d -= 1;
                    if *d == 0 {
                        next.push(succ);
                    }
                }
            }
            next.sort_unstable();
            next.dedup();
            result.push(std::mem::take(&mut layer));
            layer = next;
        }

        if processed != self.node_count() {
            return Err(IrError::CycleDetected);
        }
        Ok(result)
    }

    /// Circuit depth: the number of ASAP layers.
    pub fn depth(&self) -> IrResult<usize> {
        Ok(self.layers()?.len())
    }

    /// Emit the gates in topological order as a fresh circuit. The
    /// receiving circuit assigns new gate ids.
    pub fn to_circuit(&self) -> IrResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits)?;
        for id in self.topological_order()? {
            circuit.add_gate(self.gate(id)?.clone())?;
        }
        Ok(circuit)
    }

    fn index(&self, id: GateId) -> IrResult<NodeIndex> {
        self.index_of
            .get(&id)
            .copied()
            .ok_or(IrError::NodeNotFound { id })
    }

    /// Neighbor ids in one direction, deduplicated, in edge-iteration
    /// order.
    fn unique_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<GateId> {
        let mut seen = Vec::new();
        for e in self.graph.edges_directed(idx, dir) {
            let other = match dir {
                Direction::Incoming => e.source(),
                Direction::Outgoing => e.target(),
            };
            let id = self.graph[other].id().expect("DAG gates carry ids");
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    fn degree_filtered(&self, dir: Direction) -> Vec<GateId> {
        let mut ids: Vec<GateId> = self
            .index_of
            .iter()
            .filter(|(_, &idx)| self.graph.edges_directed(idx, dir).next().is_none())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Clone for CircuitDag {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            index_of: self.index_of.clone(),
            last_on_qubit: self.last_on_qubit.clone(),
            num_qubits: self.num_qubits,
            next_gate_id: self.next_gate_id,
        }
    }
}

impl std::fmt::Debug for CircuitDag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitDag")
            .field("num_qubits", &self.num_qubits)
            .field("node_count", &self.node_count())
            .field("edges", &self.edges())
            .finish()
    }
}
