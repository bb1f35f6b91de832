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

//! Module for the LR(0)/LR(1) item set construction: closure, GOTO, and the
//! canonical collection of states
//!
//! Both automata are built by the same subset construction, parameterized
//! over an [`AutomatonKind`] that supplies the lookahead representation:
//! `()` for LR(0), a set of lookahead terminals for LR(1).

use std::collections::BTreeMap;

use crate::grammar::Grammar;
use crate::lookahead::{FirstSets, NullableTable};
use crate::production::MarkedProduction;
use crate::symbol::{LaSymbol, Symbol};
use std::collections::BTreeSet;

/// An item set (a state of the automaton under construction): at most one
/// lookahead value per marked production, as required by §3 ("no two items
/// share a marked production").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSet<La> {
    /// The items of this set, keyed by marked production
    pub items: BTreeMap<MarkedProduction, La>
}

impl<La> ItemSet<La> {
    /// An empty item set
    pub fn new() -> ItemSet<La> {
        ItemSet { items: BTreeMap::new() }
    }

    /// The kernel items: those with dot > 0, plus the initial item of the
    /// augmented start production.
    pub fn kernel(&self, start_production: crate::production::ProductionId) -> Vec<MarkedProduction> {
        self.items.keys().filter(|mp| mp.is_kernel(start_production)).copied().collect()
    }
}

impl<La> Default for ItemSet<La> {
    fn default() -> Self {
        ItemSet::new()
    }
}

/// Supplies the lookahead representation and its construction rules for one
/// flavor of LR automaton (LR(0) or LR(1)).
pub trait AutomatonKind {
    /// The lookahead attached to each item: `()` for LR(0), a lookahead set for LR(1)
    type La: Clone + Eq;

    /// The lookahead of the initial item `[S' -> ·S, _]`
    fn start_lookahead() -> Self::La;

    /// Merges `other` into `current`, returning whether `current` grew
    fn merge(current: &mut Self::La, other: &Self::La) -> bool;

    /// Given an item `[A -> α·Bβ, current]`, computes the lookahead for the
    /// closure items `[B -> ·γ, _]` added for each `B -> γ`.
    fn child_lookahead(
        grammar: &Grammar,
        first: &FirstSets,
        nullable: &NullableTable,
        remainder: &[Symbol],
        current: &Self::La
    ) -> Self::La;
}

/// Marker type selecting LR(0) construction (empty lookahead)
#[derive(Debug, Clone, Copy)]
pub struct Lr0;

impl AutomatonKind for Lr0 {
    type La = ();

    fn start_lookahead() {}

    fn merge(_current: &mut (), _other: &()) -> bool {
        false
    }

    fn child_lookahead(_: &Grammar, _: &FirstSets, _: &NullableTable, _: &[Symbol], _: &()) {}
}

/// Marker type selecting LR(1) construction (a set of lookahead terminals per item)
#[derive(Debug, Clone, Copy)]
pub struct Lr1;

impl AutomatonKind for Lr1 {
    type La = BTreeSet<LaSymbol>;

    fn start_lookahead() -> BTreeSet<LaSymbol> {
        [LaSymbol::Eof].into_iter().collect()
    }

    fn merge(current: &mut BTreeSet<LaSymbol>, other: &BTreeSet<LaSymbol>) -> bool {
        let before = current.len();
        current.extend(other.iter().cloned());
        current.len() != before
    }

    fn child_lookahead(
        grammar: &Grammar,
        first: &FirstSets,
        nullable: &NullableTable,
        remainder: &[Symbol],
        current: &BTreeSet<LaSymbol>
    ) -> BTreeSet<LaSymbol> {
        let _ = grammar;
        let mut result = BTreeSet::new();
        for la in current {
            result.extend(first.first_of_extended(remainder, nullable, *la));
        }
        result
    }
}

/// Expands an item set with epsilon moves until no new item is added,
/// merging lookaheads for items that share a marked production (§4.5 CLOSURE).
pub fn closure<K: AutomatonKind>(grammar: &Grammar, first: &FirstSets, nullable: &NullableTable, items: &mut ItemSet<K::La>) {
    let mut worklist: Vec<MarkedProduction> = items.items.keys().copied().collect();
    while let Some(mp) = worklist.pop() {
        let body = &grammar.production(mp.production).body;
        let nt = match mp.dot_symbol(body) {
            Some(Symbol::Nonterminal(n)) => n,
            _ => continue
        };
        let remainder = &body[mp.dot + 1..];
        let current_la = items.items.get(&mp).cloned().expect("mp was taken from items.items");
        let new_la = K::child_lookahead(grammar, first, nullable, remainder, &current_la);

        for &pid in grammar.productions_for(nt) {
            let child = MarkedProduction::new(pid, 0);
            let grew = match items.items.get_mut(&child) {
                Some(existing) => K::merge(existing, &new_la),
                None => {
                    items.items.insert(child, new_la.clone());
                    true
                }
            };
            if grew {
                worklist.push(child);
            }
        }
    }
}

/// `goto(I, X)`: the closure of the items shifted over `X`, or `None` if no
/// item in `I` has `X` as its dot symbol (§4.5 GOTO).
pub fn goto<K: AutomatonKind>(
    grammar: &Grammar,
    first: &FirstSets,
    nullable: &NullableTable,
    state: &ItemSet<K::La>,
    symbol: Symbol
) -> Option<ItemSet<K::La>> {
    let mut kernel = ItemSet::new();
    for (mp, la) in state.items.iter() {
        let body = &grammar.production(mp.production).body;
        if mp.dot_symbol(body) == Some(symbol) {
            let shifted = mp.shifted();
            match kernel.items.get_mut(&shifted) {
                Some(existing) => {
                    K::merge(existing, la);
                }
                None => {
                    kernel.items.insert(shifted, la.clone());
                }
            }
        }
    }
    if kernel.items.is_empty() {
        None
    } else {
        closure::<K>(grammar, first, nullable, &mut kernel);
        Some(kernel)
    }
}

/// The canonical collection: states in discovery order (state 0 is the
/// start state), plus the transition relation `(source, symbol, target)`.
#[derive(Debug, Clone)]
pub struct Automaton<La> {
    /// States of the automaton, in insertion order
    pub states: Vec<ItemSet<La>>,
    /// Transitions `(source_state, symbol, target_state)`
    pub transitions: Vec<(usize, Symbol, usize)>,
    /// The start state, always 0
    pub start: usize
}

/// Builds the canonical collection of LR(0) or LR(1) item sets, depending
/// on `K` (§4.5).
pub fn build_automaton<K: AutomatonKind>(grammar: &Grammar, first: &FirstSets, nullable: &NullableTable) -> Automaton<K::La> {
    let start_mp = MarkedProduction::new(grammar.start_production(), 0);
    let mut start_items = ItemSet::new();
    start_items.items.insert(start_mp, K::start_lookahead());
    closure::<K>(grammar, first, nullable, &mut start_items);

    let mut states = vec![start_items];
    let mut transitions = Vec::new();

    let mut index = 0;
    while index < states.len() {
        let mut symbols: Vec<Symbol> = Vec::new();
        for mp in states[index].items.keys() {
            let body = &grammar.production(mp.production).body;
            if let Some(sy) = mp.dot_symbol(body) {
                // Eof is an accept marker, not a symbol to shift over (§3): the
                // item `S' -> S•Eof` never transitions, it is the accept state.
                if sy != Symbol::Eof && !symbols.contains(&sy) {
                    symbols.push(sy);
                }
            }
        }

        for symbol in symbols {
            if let Some(target_items) = goto::<K>(grammar, first, nullable, &states[index], symbol) {
                let target = match states.iter().position(|s| s.items == target_items.items) {
                    Some(existing) => existing,
                    None => {
                        states.push(target_items);
                        states.len() - 1
                    }
                };
                transitions.push((index, symbol, target));
            }
        }

        index += 1;
    }

    Automaton { states, transitions, start: 0 }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grammar::test::expr_grammar;

    fn analyses(grammar: &Grammar) -> (NullableTable, FirstSets) {
        let nullable = NullableTable::compute(grammar);
        let first = FirstSets::compute_iterative(grammar, &nullable);
        (nullable, first)
    }

    #[test]
    fn closure_is_idempotent() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);

        let mut items: ItemSet<BTreeSet<LaSymbol>> = ItemSet::new();
        items.items.insert(MarkedProduction::new(g.start_production(), 0), Lr1::start_lookahead());
        closure::<Lr1>(&g, &first, &nullable, &mut items);
        let once = items.clone();
        closure::<Lr1>(&g, &first, &nullable, &mut items);
        assert_eq!(once, items);
    }

    #[test]
    fn every_state_is_reachable_from_the_start_state() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);
        let automaton = build_automaton::<Lr1>(&g, &first, &nullable);

        let mut reachable = vec![false; automaton.states.len()];
        reachable[automaton.start] = true;
        let mut worklist = vec![automaton.start];
        while let Some(s) = worklist.pop() {
            for &(from, _, to) in &automaton.transitions {
                if from == s && !reachable[to] {
                    reachable[to] = true;
                    worklist.push(to);
                }
            }
        }
        assert!(reachable.iter().all(|&r| r), "every state must be discovered via some chain of transitions from the start state");
    }

    #[test]
    fn start_state_contains_the_initial_item_with_eof_lookahead() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);
        let automaton = build_automaton::<Lr1>(&g, &first, &nullable);
        let initial = MarkedProduction::new(g.start_production(), 0);
        let la = automaton.states[automaton.start].items.get(&initial).expect("initial item must be in the start state");
        assert!(la.contains(&LaSymbol::Eof));
    }

    #[test]
    fn lr0_canonical_collection_has_fewer_or_equal_states_than_lr1() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);
        let lr0 = build_automaton::<Lr0>(&g, &first, &nullable);
        let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
        assert!(lr0.states.len() <= lr1.states.len());
    }

    #[test]
    fn no_transition_is_ever_labeled_with_eof() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);
        let automaton = build_automaton::<Lr1>(&g, &first, &nullable);
        assert!(
            automaton.transitions.iter().all(|&(_, sy, _)| sy != Symbol::Eof),
            "eof is an accept marker, not a shiftable symbol"
        );
    }

    #[test]
    fn goto_is_deterministic() {
        let g = expr_grammar();
        let (nullable, first) = analyses(&g);
        let automaton = build_automaton::<Lr1>(&g, &first, &nullable);
        let start = &automaton.states[0];
        let a = goto::<Lr1>(&g, &first, &nullable, start, Symbol::Terminal(crate::symbol::TerminalId(4)));
        let b = goto::<Lr1>(&g, &first, &nullable, start, Symbol::Terminal(crate::symbol::TerminalId(4)));
        assert_eq!(a, b);
    }
}
