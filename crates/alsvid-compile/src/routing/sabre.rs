//! SABRE heuristic routing.
//!
//! Reference: Li, Ding, and Xie, "Tackling the Qubit Mapping Problem for
//! NISQ-Era Quantum Devices", ASPLOS 2019.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use alsvid_ir::{Circuit, CircuitDag, Gate, GateId, QubitId};

use crate::error::CompileResult;
use crate::routing::{
    identity_mapping, validate_route_inputs, Router, RoutingResult, Topology,
};

/// SWAP-insertion router built around the SABRE heuristic.
///
/// Gates whose dependencies are satisfied form the *front layer*.
/// Executable front-layer gates are emitted directly; when the whole
/// layer is blocked on connectivity, candidate SWAPs on edges incident
/// to the blocked gates are scored by the distance they leave the front
/// layer at, plus a decayed lookahead term over upcoming gates, and the
/// best one is inserted. The initial mapping is the identity.
///
/// All tie-breaks are deterministic: candidates are scanned in
/// front-layer order and the first best-scoring SWAP wins.
pub struct SabreRouter {
    lookahead_depth: usize,
    decay_factor: f64,
    extended_set_weight: f64,
}

impl SabreRouter {
    /// Create a router with the default parameters
    /// (lookahead 20, decay 0.5, extended-set weight 0.5).
    pub fn new() -> Self {
        Self {
            lookahead_depth: 20,
            decay_factor: 0.5,
            extended_set_weight: 0.5,
        }
    }

    /// Set how many upcoming gates the lookahead considers.
    #[must_use]
    pub fn with_lookahead_depth(mut self, depth: usize) -> Self {
        self.lookahead_depth = depth;
        self
    }

    /// Set the decay applied to the lookahead term.
    #[must_use]
    pub fn with_decay_factor(mut self, decay: f64) -> Self {
        self.decay_factor = decay;
        self
    }

    /// Set the weight of the extended set in scoring.
    #[must_use]
    pub fn with_extended_set_weight(mut self, weight: f64) -> Self {
        self.extended_set_weight = weight;
        self
    }
}

impl Default for SabreRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for SabreRouter {
    fn name(&self) -> &str {
        "SabreRouter"
    }

    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult> {
        validate_route_inputs(circuit, topology)?;

        if circuit.is_empty() {
            let mapping = identity_mapping(circuit.num_qubits());
            return Ok(RoutingResult {
                routed_circuit: Circuit::new(topology.num_qubits())?,
                initial_mapping: mapping.clone(),
                final_mapping: mapping,
                swaps_inserted: 0,
                original_depth: 0,
                final_depth: 0,
            });
        }

        let original_depth = circuit.depth();
        let num_logical = circuit.num_qubits();
        let num_physical = topology.num_qubits();

        // Identity initial mapping and its inverse.
        let mut phys_of: Vec<u32> = identity_mapping(num_logical);
        let mut log_of: Vec<Option<u32>> = (0..num_physical)
            .map(|p| (p < num_logical).then_some(p as u32))
            .collect();

        let dag = CircuitDag::from_circuit(circuit)?;
        let mut routed = Circuit::new(num_physical)?;
        let mut swaps_inserted = 0usize;

        let mut remaining_deps: FxHashMap<GateId, usize> = FxHashMap::default();
        for id in dag.node_ids() {
            remaining_deps.insert(id, dag.in_degree(id)?);
        }
        let mut executed: FxHashSet<GateId> = FxHashSet::default();

        let mut front: Vec<GateId> = dag.sources();

        while !front.is_empty() {
            let mut next_front: Vec<GateId> = Vec::new();
            let mut executed_this_round: Vec<GateId> = Vec::new();

            for &id in &front {
                let gate = dag.gate(id)?;
                if gate.num_qubits() == 1 {
                    let p = phys_of[gate.qubits()[0].index()];
                    routed.add_gate(gate.on_qubits(vec![QubitId(p)])?)?;
                    executed_this_round.push(id);
                } else {
                    let p0 = phys_of[gate.qubits()[0].index()];
                    let p1 = phys_of[gate.qubits()[1].index()];
                    if topology.connected(p0, p1) {
                        routed.add_gate(gate.on_qubits(vec![QubitId(p0), QubitId(p1)])?)?;
                        executed_this_round.push(id);
                    } else {
                        next_front.push(id);
                    }
                }
            }

            if !executed_this_round.is_empty() {
                for &id in &executed_this_round {
                    executed.insert(id);
                    for succ in dag.successors(id)? {
                        let deps = remaining_deps
                            .get_mut(&succ)
                            .expect("successor is a live node");
                        *deps -= 1;
                        if *deps == 0 {
                            next_front.push(succ);
                        }
                    }
                }
                front = next_front;
                continue;
            }

            // The whole layer is blocked two-qubit gates: spend a SWAP.
            let best = self.select_best_swap(&dag, topology, &phys_of, &log_of, &front, &executed)?;

            match best {
                Some((a, b)) => {
                    insert_swap(a, b, &mut phys_of, &mut log_of, &mut routed)?;
                    swaps_inserted += 1;
                }
                None => {
                    // Unscoreable layer (only possible on pathological
                    // topologies): force one hop along a shortest path,
                    // propagating Disconnected if there is none.
                    let gate = dag.gate(front[0])?;
                    let p0 = phys_of[gate.qubits()[0].index()];
                    let p1 = phys_of[gate.qubits()[1].index()];
                    let path = topology.shortest_path(p0, p1)?;
                    if path.len() >= 2 {
                        insert_swap(path[0], path[1], &mut phys_of, &mut log_of, &mut routed)?;
                        swaps_inserted += 1;
                    }
                }
            }
        }

        debug!(
            swaps = swaps_inserted,
            gates = routed.len(),
            "sabre routing complete"
        );

        Ok(RoutingResult {
            original_depth,
            final_depth: routed.depth(),
            routed_circuit: routed,
            initial_mapping: identity_mapping(num_logical),
            final_mapping: phys_of,
            swaps_inserted,
        })
    }
}

impl SabreRouter {
    /// Score every topology edge incident to a blocked gate's physical
    /// qubits and return the lowest-scoring SWAP. Ties keep the first
    /// candidate discovered.
    fn select_best_swap(
        &self,
        dag: &CircuitDag,
        topology: &Topology,
        phys_of: &[u32],
        log_of: &[Option<u32>],
        front: &[GateId],
        executed: &FxHashSet<GateId>,
    ) -> CompileResult<Option<(u32, u32)>> {
        // Physical qubits holding operands of blocked two-qubit gates,
        // in front-layer order.
        let mut active: Vec<u32> = Vec::new();
        for &id in front {
            let gate = dag.gate(id)?;
            if gate.num_qubits() == 2 {
                for q in gate.qubits() {
                    let p = phys_of[q.index()];
                    if !active.contains(&p) {
                        active.push(p);
                    }
                }
            }
        }

        let extended = self.extended_set(dag, front, executed)?;

        let mut best: Option<(u32, u32)> = None;
        let mut best_score = f64::INFINITY;
        for &p in &active {
            for &neighbor in topology.neighbors(p) {
                let score = self.score_swap(
                    p, neighbor, dag, topology, phys_of, log_of, front, &extended,
                )?;
                trace!(p, neighbor, score, "swap candidate");
                if score < best_score {
                    best_score = score;
                    best = Some((p, neighbor));
                }
            }
        }
        Ok(best)
    }

    /// Breadth-first expansion of front-layer successors, capped at
    /// `lookahead_depth` not-yet-executed nodes, in discovery order.
    fn extended_set(
        &self,
        dag: &CircuitDag,
        front: &[GateId],
        executed: &FxHashSet<GateId>,
    ) -> CompileResult<Vec<GateId>> {
        let mut extended: Vec<GateId> = Vec::new();
        let mut queue: VecDeque<GateId> = front.iter().copied().collect();

        'expand: while let Some(id) = queue.pop_front() {
            if extended.len() >= self.lookahead_depth {
                break;
            }
            for succ in dag.successors(id)? {
                if executed.contains(&succ) || extended.contains(&succ) {
                    continue;
                }
                extended.push(succ);
                queue.push_back(succ);
                if extended.len() >= self.lookahead_depth {
                    break 'expand;
                }
            }
        }
        Ok(extended)
    }

    /// Simulate the candidate SWAP into a scratch mapping and sum the
    /// resulting distances: front layer at full weight, extended set
    /// scaled by decay · extended-set weight. Lower is better.
    #[allow(clippy::too_many_arguments)]
    fn score_swap(
        &self,
        p0: u32,
        p1: u32,
        dag: &CircuitDag,
        topology: &Topology,
        phys_of: &[u32],
        log_of: &[Option<u32>],
        front: &[GateId],
        extended: &[GateId],
    ) -> CompileResult<f64> {
        let mut new_phys = phys_of.to_vec();
        if let Some(l) = log_of[p0 as usize] {
            new_phys[l as usize] = p1;
        }
        if let Some(l) = log_of[p1 as usize] {
            new_phys[l as usize] = p0;
        }

        let mut score = 0.0;
        for &id in front {
            score += pair_distance(dag, topology, &new_phys, id)?;
        }

        let lookahead_weight = self.decay_factor * self.extended_set_weight;
        for &id in extended {
            score += lookahead_weight * pair_distance(dag, topology, &new_phys, id)?;
        }

        Ok(score)
    }
}

/// Distance between the mapped operands of a two-qubit gate; zero for
/// single-qubit gates, infinite when the pair is unreachable.
fn pair_distance(
    dag: &CircuitDag,
    topology: &Topology,
    phys_of: &[u32],
    id: GateId,
) -> CompileResult<f64> {
    let gate = dag.gate(id)?;
    if gate.num_qubits() != 2 {
        return Ok(0.0);
    }
    let a = phys_of[gate.qubits()[0].index()];
    let b = phys_of[gate.qubits()[1].index()];
    Ok(topology
        .distance(a, b)
        .map_or(f64::INFINITY, |d| f64::from(d)))
}

/// Emit a SWAP on `(a, b)` and update both mapping directions.
fn insert_swap(
    a: u32,
    b: u32,
    phys_of: &mut [u32],
    log_of: &mut [Option<u32>],
    routed: &mut Circuit,
) -> CompileResult<()> {
    routed.add_gate(Gate::swap(QubitId(a), QubitId(b))?)?;

    let la = log_of[a as usize];
    let lb = log_of[b as usize];
    if let Some(l) = la {
        phys_of[l as usize] = b;
    }
    if let Some(l) = lb {
        phys_of[l as usize] = a;
    }
    log_of[a as usize] = lb;
    log_of[b as usize] = la;

    debug!(a, b, "inserted swap");
    Ok(())
}
