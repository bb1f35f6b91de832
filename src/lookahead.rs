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

//! Module for the nullable, FIRST and FOLLOW analyzers
//!
//! Each analyzer has two constructors: an iterative (Dragon-book) fixed
//! point, and a digraph traversal built on [`crate::digraph`]. Both must
//! agree on every grammar.

use std::collections::HashSet;

use crate::digraph::{traverse, Digraph};
use crate::grammar::Grammar;
use crate::symbol::{LaSymbol, NonterminalId, Symbol, TerminalId};

/// Which nonterminals can derive the empty string.
#[derive(Debug, Clone)]
pub struct NullableTable(Vec<bool>);

impl NullableTable {
    /// Computes nullability by least fixed point (§4.2)
    pub fn compute(grammar: &Grammar) -> NullableTable {
        let mut nullable = vec![false; grammar.nonterminal_count()];
        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                if nullable[production.head.0] {
                    continue;
                }
                let derives_empty = production
                    .body
                    .iter()
                    .all(|sy| matches!(sy, Symbol::Nonterminal(n) if nullable[n.0]) || matches!(sy, Symbol::Epsilon));
                if derives_empty {
                    nullable[production.head.0] = true;
                    changed = true;
                }
            }
        }
        NullableTable(nullable)
    }

    /// `nullable(A)`, true iff `A ⇒* ε`
    pub fn is_nullable(&self, nt: NonterminalId) -> bool {
        self.0[nt.0]
    }

    /// Extended nullability over any symbol: `nullable(ε) = nullable(eof) = true`,
    /// `nullable(terminal) = false` (§4.2).
    pub fn is_symbol_nullable(&self, sy: Symbol) -> bool {
        match sy {
            Symbol::Nonterminal(n) => self.is_nullable(n),
            Symbol::Epsilon | Symbol::Eof => true,
            Symbol::Terminal(_) => false
        }
    }

    /// Whether every symbol in a sequence is nullable (vacuously true for `[]`)
    pub fn is_sequence_nullable(&self, body: &[Symbol]) -> bool {
        body.iter().all(|sy| self.is_symbol_nullable(*sy))
    }
}

/// `FIRST(A)` for every nonterminal `A`: the set of terminals that can begin
/// a string derived from `A`. Never contains `Eof`: the only production body
/// containing `Eof` is the augmented start, whose head is never referenced
/// from another production's body.
#[derive(Debug, Clone)]
pub struct FirstSets(Vec<HashSet<TerminalId>>);

impl FirstSets {
    /// Computes FIRST by iterating over productions until no set grows (Dragon-book method, §4.3)
    pub fn compute_iterative(grammar: &Grammar, nullable: &NullableTable) -> FirstSets {
        let mut first: Vec<HashSet<TerminalId>> = vec![HashSet::new(); grammar.nonterminal_count()];
        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let mut nullable_prefix = true;
                for sy in &production.body {
                    if !nullable_prefix {
                        break;
                    }
                    match sy {
                        Symbol::Terminal(t) => {
                            changed |= first[production.head.0].insert(*t);
                            nullable_prefix = false;
                        }
                        Symbol::Nonterminal(n) => {
                            let additions: Vec<TerminalId> = first[n.0].iter().cloned().collect();
                            for t in additions {
                                changed |= first[production.head.0].insert(t);
                            }
                            nullable_prefix = nullable.is_nullable(*n);
                        }
                        Symbol::Eof => nullable_prefix = false,
                        Symbol::Epsilon => {}
                    }
                }
            }
        }
        FirstSets(first)
    }

    /// Computes FIRST via the digraph method: direct contributions plus a
    /// superset-relation graph (`A ⊇first B`), solved by [`traverse`] (§4.3)
    pub fn compute_digraph(grammar: &Grammar, nullable: &NullableTable) -> FirstSets {
        let n = grammar.nonterminal_count();
        let mut init_first: Vec<HashSet<TerminalId>> = vec![HashSet::new(); n];
        let mut graph = Digraph::new(n);

        for production in &grammar.productions {
            let mut nullable_prefix = true;
            for sy in &production.body {
                if !nullable_prefix {
                    break;
                }
                match sy {
                    Symbol::Terminal(t) => {
                        init_first[production.head.0].insert(*t);
                        nullable_prefix = false;
                    }
                    Symbol::Nonterminal(b) => {
                        if *b != production.head {
                            graph.add_edge(production.head.0, b.0);
                        }
                        nullable_prefix = nullable.is_nullable(*b);
                    }
                    Symbol::Eof => nullable_prefix = false,
                    Symbol::Epsilon => {}
                }
            }
        }

        FirstSets(traverse(&graph, &init_first))
    }

    /// `FIRST(A)` for a single nonterminal
    pub fn first_of(&self, nt: NonterminalId) -> &HashSet<TerminalId> {
        &self.0[nt.0]
    }

    /// `FIRST` of a single symbol, extended per §4.3: `FIRST(t) = {t}`,
    /// `FIRST(eof) = {eof}`, `FIRST(ε) = ∅`.
    fn first_of_symbol(&self, sy: Symbol) -> HashSet<LaSymbol> {
        match sy {
            Symbol::Terminal(t) => [LaSymbol::Terminal(t)].into_iter().collect(),
            Symbol::Eof => [LaSymbol::Eof].into_iter().collect(),
            Symbol::Epsilon => HashSet::new(),
            Symbol::Nonterminal(n) => self.0[n.0].iter().map(|t| LaSymbol::Terminal(*t)).collect()
        }
    }

    /// `FIRST(X1…Xn)`: union of `FIRST(Xi)` over the longest nullable prefix,
    /// including the first non-nullable symbol's FIRST set.
    pub fn first_of_body(&self, body: &[Symbol], nullable: &NullableTable) -> HashSet<LaSymbol> {
        let mut result = HashSet::new();
        for sy in body {
            result.extend(self.first_of_symbol(*sy));
            if !nullable.is_symbol_nullable(*sy) {
                break;
            }
        }
        result
    }

    /// `FIRST(β · a)` for a single lookahead symbol `a`: `FIRST(β)`, plus `a`
    /// itself if all of `β` is nullable. This is the closure-construction
    /// primitive used throughout §4.5.
    pub fn first_of_extended(&self, body: &[Symbol], nullable: &NullableTable, trailing: LaSymbol) -> HashSet<LaSymbol> {
        let mut result = self.first_of_body(body, nullable);
        if nullable.is_sequence_nullable(body) {
            result.insert(trailing);
        }
        result
    }
}

/// `FOLLOW(A)` for every nonterminal `A`: the terminals (or `Eof`) that can
/// immediately follow `A` in some sentential form derived from the start.
#[derive(Debug, Clone)]
pub struct FollowSets(Vec<HashSet<LaSymbol>>);

impl FollowSets {
    /// Computes FOLLOW by iterating over productions until no set grows (§4.4)
    pub fn compute_iterative(grammar: &Grammar, nullable: &NullableTable, first: &FirstSets) -> FollowSets {
        let n = grammar.nonterminal_count();
        let mut follow: Vec<HashSet<LaSymbol>> = vec![HashSet::new(); n];
        if !grammar.augmented_with_eof {
            follow[grammar.inner_start().0].insert(LaSymbol::Eof);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let body = &production.body;
                for (i, sy) in body.iter().enumerate() {
                    if let Symbol::Nonterminal(a) = sy {
                        let beta = &body[i + 1..];
                        for la in first.first_of_body(beta, nullable) {
                            changed |= follow[a.0].insert(la);
                        }
                        if nullable.is_sequence_nullable(beta) && *a != production.head {
                            let from_head: Vec<LaSymbol> = follow[production.head.0].iter().cloned().collect();
                            for la in from_head {
                                changed |= follow[a.0].insert(la);
                            }
                        }
                    }
                }
            }
        }
        FollowSets(follow)
    }

    /// Computes FOLLOW via the digraph method: direct contributions plus a
    /// superset-relation graph (`A ⊇follow B`), solved by [`traverse`] (§4.4)
    pub fn compute_digraph(grammar: &Grammar, nullable: &NullableTable, first: &FirstSets) -> FollowSets {
        let n = grammar.nonterminal_count();
        let mut init_follow: Vec<HashSet<LaSymbol>> = vec![HashSet::new(); n];
        if !grammar.augmented_with_eof {
            init_follow[grammar.inner_start().0].insert(LaSymbol::Eof);
        }

        let mut graph = Digraph::new(n);
        for production in &grammar.productions {
            let body = &production.body;
            for (i, sy) in body.iter().enumerate() {
                if let Symbol::Nonterminal(a) = sy {
                    let beta = &body[i + 1..];
                    init_follow[a.0].extend(first.first_of_body(beta, nullable));
                    if nullable.is_sequence_nullable(beta) && *a != production.head {
                        graph.add_edge(a.0, production.head.0);
                    }
                }
            }
        }

        FollowSets(traverse(&graph, &init_follow))
    }

    /// `FOLLOW(A)` for a single nonterminal
    pub fn follow_of(&self, nt: NonterminalId) -> &HashSet<LaSymbol> {
        &self.0[nt.0]
    }
}
