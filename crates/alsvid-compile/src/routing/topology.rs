//! Device coupling graphs.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{CompileError, CompileResult};

/// Sentinel for unreachable pairs in the distance matrix.
const INFINITE: u32 = u32::MAX;

/// Undirected coupling graph over the physical qubits of a device.
///
/// Nodes are physical qubits; an edge means the pair can carry a
/// two-qubit gate directly. All-pairs shortest-path distances are
/// cached; the cache is built by the factory constructors and
/// invalidated by [`add_edge`](Self::add_edge). While invalidated,
/// [`distance`](Self::distance) falls back to a per-query BFS. Call
/// [`rebuild_caches`](Self::rebuild_caches) after manual edge edits or
/// deserialization to restore O(1) lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    num_qubits: usize,
    /// Edge list, each pair stored as (min, max).
    edges: Vec<(u32, u32)>,
    /// Adjacency lists in insertion order.
    #[serde(skip)]
    adjacency: Vec<Vec<u32>>,
    /// All-pairs distance matrix; empty until built.
    #[serde(skip)]
    dist_matrix: Vec<Vec<u32>>,
}

impl Topology {
    /// Create an edgeless topology over `num_qubits` physical qubits.
    pub fn new(num_qubits: usize) -> CompileResult<Self> {
        if num_qubits == 0 {
            return Err(CompileError::InvalidTopology(
                "topology must have at least 1 qubit".into(),
            ));
        }
        Ok(Self {
            num_qubits,
            edges: vec![],
            adjacency: vec![vec![]; num_qubits],
            dist_matrix: vec![],
        })
    }

    /// Add a bidirectional edge. Duplicates (in either orientation) are
    /// ignored; self-loops and out-of-range indices are rejected. Adding
    /// an edge invalidates the distance cache.
    pub fn add_edge(&mut self, q1: u32, q2: u32) -> CompileResult<()> {
        self.validate_qubit(q1)?;
        self.validate_qubit(q2)?;
        if q1 == q2 {
            return Err(CompileError::InvalidTopology(format!(
                "self-loop edge on qubit {q1}"
            )));
        }
        if !self.connected(q1, q2) {
            self.adjacency[q1 as usize].push(q2);
            self.adjacency[q2 as usize].push(q1);
            self.edges.push((q1.min(q2), q1.max(q2)));
            self.dist_matrix.clear();
        }
        Ok(())
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All edges as (min, max) pairs in insertion order.
    #[inline]
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Check if two qubits are directly connected. A qubit is connected
    /// to itself by convention; out-of-range indices are not connected
    /// to anything.
    pub fn connected(&self, q1: u32, q2: u32) -> bool {
        if q1 as usize >= self.num_qubits || q2 as usize >= self.num_qubits {
            return false;
        }
        if q1 == q2 {
            return true;
        }
        self.adjacency[q1 as usize].contains(&q2)
    }

    /// Neighbors of a qubit in edge-insertion order. Out-of-range
    /// indices have no neighbors.
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        self.adjacency
            .get(qubit as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest-path distance between two qubits, or `None` if they are
    /// unreachable from each other. Uses the cached matrix when built,
    /// a single BFS otherwise.
    pub fn distance(&self, q1: u32, q2: u32) -> Option<u32> {
        if q1 as usize >= self.num_qubits || q2 as usize >= self.num_qubits {
            return None;
        }
        if q1 == q2 {
            return Some(0);
        }
        if !self.dist_matrix.is_empty() {
            let d = self.dist_matrix[q1 as usize][q2 as usize];
            return (d != INFINITE).then_some(d);
        }
        self.distance_bfs(q1, q2)
    }

    /// Minimum-hop path from `from` to `to`, inclusive of both ends.
    ///
    /// Fails with [`CompileError::Disconnected`] when no path exists.
    pub fn shortest_path(&self, from: u32, to: u32) -> CompileResult<Vec<u32>> {
        self.validate_qubit(from)?;
        self.validate_qubit(to)?;
        if from == to {
            return Ok(vec![from]);
        }

        let mut parent = vec![INFINITE; self.num_qubits];
        let mut queue = VecDeque::new();
        parent[from as usize] = from;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            for &neighbor in &self.adjacency[current as usize] {
                if parent[neighbor as usize] == INFINITE {
                    parent[neighbor as usize] = current;
                    queue.push_back(neighbor);
                }
            }
        }

        if parent[to as usize] == INFINITE {
            return Err(CompileError::Disconnected { from, to });
        }

        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = parent[current as usize];
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }

    /// Check if every qubit is reachable from every other.
    pub fn is_connected(&self) -> bool {
        if self.num_qubits <= 1 {
            return true;
        }
        let mut visited = vec![false; self.num_qubits];
        let mut queue = VecDeque::new();
        visited[0] = true;
        queue.push_back(0u32);
        let mut count = 1usize;

        while let Some(current) = queue.pop_front() {
            for &neighbor in &self.adjacency[current as usize] {
                if !visited[neighbor as usize] {
                    visited[neighbor as usize] = true;
                    count += 1;
                    queue.push_back(neighbor);
                }
            }
        }

        count == self.num_qubits
    }

    /// Rebuild the adjacency lists and distance matrix from the edge
    /// list. Required after deserialization; useful after a batch of
    /// manual [`add_edge`](Self::add_edge) calls.
    pub fn rebuild_caches(&mut self) {
        self.adjacency = vec![vec![]; self.num_qubits];
        for &(q1, q2) in &self.edges {
            self.adjacency[q1 as usize].push(q2);
            self.adjacency[q2 as usize].push(q1);
        }
        self.build_distance_matrix();
    }

    /// BFS from every vertex into the cached matrix.
    fn build_distance_matrix(&mut self) {
        let n = self.num_qubits;
        self.dist_matrix = vec![vec![INFINITE; n]; n];

        for start in 0..n {
            self.dist_matrix[start][start] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(start as u32);

            while let Some(current) = queue.pop_front() {
                let base = self.dist_matrix[start][current as usize];
                for i in 0..self.adjacency[current as usize].len() {
                    let neighbor = self.adjacency[current as usize][i];
                    if self.dist_matrix[start][neighbor as usize] == INFINITE {
                        self.dist_matrix[start][neighbor as usize] = base + 1;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    fn distance_bfs(&self, from: u32, to: u32) -> Option<u32> {
        let mut dist = vec![INFINITE; self.num_qubits];
        let mut queue = VecDeque::new();
        dist[from as usize] = 0;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &neighbor in &self.adjacency[current as usize] {
                if dist[neighbor as usize] == INFINITE {
                    dist[neighbor as usize] = dist[current as usize] + 1;
                    if neighbor == to {
                        return Some(dist[neighbor as usize]);
                    }
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }

    fn validate_qubit(&self, q: u32) -> CompileResult<()> {
        if q as usize >= self.num_qubits {
            return Err(CompileError::InvalidTopology(format!(
                "qubit index {q} out of range [0, {})",
                self.num_qubits
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Factories
    // =========================================================================

    /// Linear chain 0–1–2–…–(n−1). Requires `n ≥ 1`.
    pub fn linear(n: usize) -> CompileResult<Self> {
        let mut t = Self::new(n)?;
        for i in 0..n.saturating_sub(1) {
            t.add_edge(i as u32, i as u32 + 1)?;
        }
        t.build_distance_matrix();
        Ok(t)
    }

    /// Ring: a chain closed by an edge from the last qubit to the first.
    /// Requires `n ≥ 2`.
    pub fn ring(n: usize) -> CompileResult<Self> {
        if n < 2 {
            return Err(CompileError::InvalidTopology(
                "ring topology requires at least 2 qubits".into(),
            ));
        }
        let mut t = Self::linear(n)?;
        t.add_edge(0, n as u32 - 1)?;
        t.build_distance_matrix();
        Ok(t)
    }

    /// Rectangular grid with nearest-neighbor connectivity, row-major
    /// indexing (`qubit = row * cols + col`). Requires both dimensions
    /// positive.
    pub fn grid(rows: usize, cols: usize) -> CompileResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(CompileError::InvalidTopology(
                "grid dimensions must be positive".into(),
            ));
        }
        let mut t = Self::new(rows * cols)?;
        for r in 0..rows {
            for c in 0..cols {
                let q = (r * cols + c) as u32;
                if c + 1 < cols {
                    t.add_edge(q, q + 1)?;
                }
                if r + 1 < rows {
                    t.add_edge(q, q + cols as u32)?;
                }
            }
        }
        t.build_distance_matrix();
        Ok(t)
    }

    /// IBM-style heavy-hex approximation. `d = 1` is the 7-qubit wheel
    /// (a 6-ring around a fully connected center). For `d ≥ 2` the
    /// lattice is approximated by a (2d+1)×(2d+1) grid with full
    /// horizontal wiring and vertical edges only where row and column
    /// parity agree.
    pub fn heavy_hex(d: usize) -> CompileResult<Self> {
        if d == 0 {
            return Err(CompileError::InvalidTopology(
                "heavy-hex distance must be positive".into(),
            ));
        }

        if d == 1 {
            let mut t = Self::new(7)?;
            for i in 0..6u32 {
                t.add_edge(i, (i + 1) % 6)?;
                t.add_edge(6, i)?;
            }
            t.build_distance_matrix();
            return Ok(t);
        }

        let side = 2 * d + 1;
        let mut t = Self::new(side * side)?;
        for r in 0..side {
            for c in 0..side {
                let q = (r * side + c) as u32;
                if c + 1 < side {
                    t.add_edge(q, q + 1)?;
                }
                if r + 1 < side && c % 2 == r % 2 {
                    t.add_edge(q, q + side as u32)?;
                }
            }
        }
        t.build_distance_matrix();
        Ok(t)
    }

    /// Fully connected topology. Requires `n ≥ 1`.
    pub fn full(n: usize) -> CompileResult<Self> {
        let mut t = Self::new(n)?;
        for i in 0..n {
            for j in (i + 1)..n {
                t.add_edge(i as u32, j as u32)?;
            }
        }
        t.build_distance_matrix();
        Ok(t)
    }

    /// Star topology: qubit 0 connected to every other. Requires `n ≥ 1`.
    pub fn star(n: usize) -> CompileResult<Self> {
        let mut t = Self::new(n)?;
        for i in 1..n {
            t.add_edge(0, i as u32)?;
        }
        t.build_distance_matrix();
        Ok(t)
    }
}
