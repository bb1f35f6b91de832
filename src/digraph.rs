/*******************************************************************************
 * Copyright (c) 2020 Association Cénotélie (cenotelie.fr)
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Lesser General Public License as
 * published by the Free Software Foundation, either version 3
 * of the License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General
 * Public License along with this program.
 * If not, see <http://www.gnu.org/licenses/>.
 ******************************************************************************/

//! Module for the digraph engine shared by FIRST, FOLLOW and LALR lookaheads
//!
//! Every one of those analyses reduces to the same shape: a set of direct
//! contributions per vertex, a superset-relation graph between vertices, and
//! a traversal that unions the direct contributions of everything reachable.

use std::collections::HashSet;
use std::hash::Hash;

/// A directed graph on `0..n` with no parallel edges
#[derive(Debug, Clone)]
pub struct Digraph {
    adjacency: Vec<Vec<usize>>
}

impl Digraph {
    /// Creates a graph with `n` vertices and no edges
    pub fn new(n: usize) -> Digraph {
        Digraph { adjacency: vec![Vec::new(); n] }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Adds a directed edge `from -> to`, if it is not already present
    pub fn add_edge(&mut self, from: usize, to: usize) {
        if !self.adjacency[from].contains(&to) {
            self.adjacency[from].push(to);
        }
    }

    /// Neighbors of a vertex, i.e. vertices directly reachable from it
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }
}

/// Computes, for every vertex `v`, the union of `init[u]` over every vertex
/// `u` reachable from `v` (including `v` itself).
///
/// Implementation: for each vertex, an iterative depth-first traversal over
/// the graph with a fresh visited bitset, accumulating the direct
/// contribution of each vertex reached. No SCC optimization; one allocation
/// per DFS start, as specified.
pub fn traverse<T>(graph: &Digraph, init: &[HashSet<T>]) -> Vec<HashSet<T>>
where
    T: Eq + Hash + Clone
{
    let n = graph.len();
    let mut result = Vec::with_capacity(n);
    for start in 0..n {
        let mut visited = vec![false; n];
        let mut acc: HashSet<T> = HashSet::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(v) = stack.pop() {
            acc.extend(init[v].iter().cloned());
            for &u in graph.neighbors(v) {
                if !visited[u] {
                    visited[u] = true;
                    stack.push(u);
                }
            }
        }
        result.push(acc);
    }
    result
}
