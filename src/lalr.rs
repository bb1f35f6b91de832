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

//! Module for LALR(1) construction, by two independent methods that must
//! agree: merging the LR(1) canonical collection by kernel-core equality,
//! and the Read/Follow/LA digraph algorithm over the LR(0) automaton.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::digraph::{traverse, Digraph};
use crate::grammar::Grammar;
use crate::lookahead::NullableTable;
use crate::lr0::{Automaton, ItemSet};
use crate::production::{MarkedProduction, ProductionId};
use crate::symbol::{LaSymbol, NonterminalId, Symbol};

/// The LALR(1) automaton obtained by merging LR(1) states with identical
/// kernel cores (§4.5 "LALR(1) by merging").
#[derive(Debug, Clone)]
pub struct LalrAutomaton {
    /// Merged states, in order of first appearance among the LR(1) states
    pub states: Vec<ItemSet<BTreeSet<LaSymbol>>>,
    /// Transitions translated to the merged state indices, deduplicated
    pub transitions: Vec<(usize, Symbol, usize)>,
    /// The start state
    pub start: usize
}

/// Merges an LR(1) canonical collection into its LALR(1) automaton.
///
/// Every LR(1) state is mapped to a block keyed by its kernel core (the
/// marked productions with `dot > 0`, or the initial item); blocks are
/// numbered in order of the first LR(1) state that falls into them, so two
/// grammars that differ only in how the digraph LALR construction is later
/// cross-checked still compare states by core, not by this numbering.
pub fn merge_lr1(grammar: &Grammar, lr1: &Automaton<BTreeSet<LaSymbol>>) -> LalrAutomaton {
    let start_production = grammar.start_production();

    let mut block_of_core: HashMap<Vec<MarkedProduction>, usize> = HashMap::new();
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    for (idx, state) in lr1.states.iter().enumerate() {
        let core = state.kernel(start_production);
        let block = *block_of_core.entry(core).or_insert_with(|| {
            blocks.push(Vec::new());
            blocks.len() - 1
        });
        blocks[block].push(idx);
    }

    let mut old_to_new = vec![0usize; lr1.states.len()];
    let mut states = Vec::with_capacity(blocks.len());
    for (new_idx, members) in blocks.iter().enumerate() {
        let mut merged: ItemSet<BTreeSet<LaSymbol>> = ItemSet::new();
        for &old_idx in members {
            old_to_new[old_idx] = new_idx;
            for (mp, la) in lr1.states[old_idx].items.iter() {
                merged.items.entry(*mp).or_default().extend(la.iter().cloned());
            }
        }
        states.push(merged);
    }

    let mut seen: HashSet<(usize, Symbol, usize)> = HashSet::new();
    let mut transitions = Vec::new();
    for &(s, sy, t) in &lr1.transitions {
        let edge = (old_to_new[s], sy, old_to_new[t]);
        if seen.insert(edge) {
            transitions.push(edge);
        }
    }

    LalrAutomaton { states, transitions, start: old_to_new[lr1.start] }
}

/// `LA(state, production)` values computed by the Read/Follow/LA digraph
/// algorithm (§4.5 "LALR(1) by digraph"), keyed by the LR(0) state the
/// reduce item occurs in and the production it reduces by.
#[derive(Debug, Clone, Default)]
pub struct DigraphLalr {
    pub la: HashMap<(usize, ProductionId), BTreeSet<LaSymbol>>
}

fn goto_chain(start: usize, symbols: &[Symbol], trans: &HashMap<(usize, Symbol), usize>) -> Option<usize> {
    let mut current = start;
    for &sy in symbols {
        current = *trans.get(&(current, sy))?;
    }
    Some(current)
}

/// Every state reachable from `target` by following `body` backwards one
/// symbol at a time, i.e. every `p` with `goto(p, body) = target`.
fn lookback(body: &[Symbol], target: usize, reverse: &HashMap<(usize, Symbol), Vec<usize>>) -> Vec<usize> {
    let mut candidates = vec![target];
    for &sy in body.iter().rev() {
        let mut next: Vec<usize> = Vec::new();
        for c in candidates {
            if let Some(preds) = reverse.get(&(c, sy)) {
                next.extend(preds.iter().copied());
            }
        }
        next.sort_unstable();
        next.dedup();
        if next.is_empty() {
            return Vec::new();
        }
        candidates = next;
    }
    candidates
}

/// Computes LALR(1) lookaheads directly over the LR(0) automaton via DR,
/// Read, Follow and LA, each solved with [`crate::digraph::traverse`]
/// (§4.5 "LALR(1) by digraph").
pub fn lalr_by_digraph(grammar: &Grammar, nullable: &NullableTable, lr0: &Automaton<()>) -> DigraphLalr {
    let trans: HashMap<(usize, Symbol), usize> = lr0.transitions.iter().map(|&(s, sy, t)| ((s, sy), t)).collect();
    let mut reverse: HashMap<(usize, Symbol), Vec<usize>> = HashMap::new();
    for &(s, sy, t) in &lr0.transitions {
        reverse.entry((t, sy)).or_default().push(s);
    }

    // Vertices of the Read/Follow digraphs: every nonterminal transition (p, A).
    let mut vertex_of: HashMap<(usize, NonterminalId), usize> = HashMap::new();
    let mut vertices: Vec<(usize, NonterminalId)> = Vec::new();
    for &(s, sy, _) in &lr0.transitions {
        if let Symbol::Nonterminal(a) = sy {
            let key = (s, a);
            if !vertex_of.contains_key(&key) {
                vertex_of.insert(key, vertices.len());
                vertices.push(key);
            }
        }
    }
    let n = vertices.len();

    let mut dr: Vec<HashSet<LaSymbol>> = vec![HashSet::new(); n];
    let mut reads_graph = Digraph::new(n);
    for (idx, &(p, a)) in vertices.iter().enumerate() {
        // (p, a) was collected from lr0.transitions, so the entry exists.
        let r = trans[&(p, Symbol::Nonterminal(a))];
        for &(s2, sy2, _) in &lr0.transitions {
            if s2 != r {
                continue;
            }
            match sy2 {
                Symbol::Terminal(t) => {
                    dr[idx].insert(LaSymbol::Terminal(t));
                }
                Symbol::Nonterminal(c) if nullable.is_nullable(c) => {
                    if let Some(&v2) = vertex_of.get(&(r, c)) {
                        reads_graph.add_edge(idx, v2);
                    }
                }
                Symbol::Nonterminal(_) | Symbol::Epsilon => {}
                Symbol::Eof => unreachable!("eof is an accept marker; build_automaton never emits a transition over it")
            }
        }
    }
    // Eof never labels a transition (it is an accept marker, §3), so it can
    // never reach DR through an outgoing edge the way an ordinary terminal
    // does. The vertex for the inner start symbol out of the start state is
    // always read right before an eventual accept, regardless of whether
    // the augmented body spells that out with a trailing `Eof` symbol.
    if let Some(&v) = vertex_of.get(&(lr0.start, grammar.inner_start())) {
        dr[v].insert(LaSymbol::Eof);
    }

    let read = traverse(&reads_graph, &dr);

    let mut includes_graph = Digraph::new(n);
    for (idx, production) in grammar.productions.iter().enumerate() {
        let pid = ProductionId(idx);
        if pid == grammar.start_production() {
            continue;
        }
        let body = &production.body;
        for i in 0..body.len() {
            let a = match body[i] {
                Symbol::Nonterminal(a) => a,
                _ => continue
            };
            let gamma = &body[i + 1..];
            if !nullable.is_sequence_nullable(gamma) {
                continue;
            }
            let beta = &body[..i];
            let dot_zero = MarkedProduction::new(pid, 0);
            for (p2, state) in lr0.states.iter().enumerate() {
                if !state.items.contains_key(&dot_zero) {
                    continue;
                }
                if let Some(p1) = goto_chain(p2, beta, &trans) {
                    if let (Some(&v1), Some(&v2)) = (vertex_of.get(&(p1, a)), vertex_of.get(&(p2, production.head))) {
                        includes_graph.add_edge(v1, v2);
                    }
                }
            }
        }
    }

    let follow = traverse(&includes_graph, &read);

    let mut la: HashMap<(usize, ProductionId), BTreeSet<LaSymbol>> = HashMap::new();
    for (q, state) in lr0.states.iter().enumerate() {
        for mp in state.items.keys() {
            if mp.production == grammar.start_production() {
                continue;
            }
            let body = &grammar.production(mp.production).body;
            if !mp.is_reduce(body) {
                continue;
            }
            let head = grammar.production(mp.production).head;
            let mut set = BTreeSet::new();
            for p in lookback(body, q, &reverse) {
                if let Some(&v) = vertex_of.get(&(p, head)) {
                    set.extend(follow[v].iter().cloned());
                }
            }
            la.insert((q, mp.production), set);
        }
    }

    DigraphLalr { la }
}
