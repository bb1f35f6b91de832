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

//! Module for the immutable grammar bundle and its mutable builder

use std::collections::HashMap;

use crate::error::GrammarError;
use crate::production::{Production, ProductionId};
use crate::symbol::{NonterminalId, Symbol, TerminalId};

/// An immutable context-free grammar, augmented with a start production.
///
/// Construction happens exclusively through [`GrammarBuilder::build`], which
/// validates every invariant in one pass and never returns a partially
/// initialized grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminal_names: Vec<String>,
    nonterminal_names: Vec<String>,
    /// All productions, numbered `0..len`; production 0 is the augmented start
    pub productions: Vec<Production>,
    /// The augmented start symbol `S'`, head of production 0
    pub start: NonterminalId,
    /// Whether production 0's body ends with an explicit `Eof` symbol
    pub augmented_with_eof: bool,
    productions_by_head: Vec<Vec<ProductionId>>
}

impl Grammar {
    /// Number of distinct terminals (not counting `Eof`)
    pub fn terminal_count(&self) -> usize {
        self.terminal_names.len()
    }

    /// Number of distinct nonterminals (including the augmented start)
    pub fn nonterminal_count(&self) -> usize {
        self.nonterminal_names.len()
    }

    /// Name of a terminal
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminal_names[id.0]
    }

    /// Name of a nonterminal
    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterminal_names[id.0]
    }

    /// The augmented start production, always production 0
    pub fn start_production(&self) -> ProductionId {
        ProductionId(0)
    }

    /// Gets a production by index
    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.0]
    }

    /// The inner start symbol `S`, referenced in the body of the augmented
    /// start production `S' -> S` or `S' -> S Eof`.
    pub fn inner_start(&self) -> NonterminalId {
        match self.productions[0].body[0] {
            Symbol::Nonterminal(n) => n,
            _ => unreachable!("grammar construction guarantees the augmented body starts with a nonterminal")
        }
    }

    /// Productions having the given nonterminal as head, in source order.
    /// This order drives reduce/reduce conflict resolution (§4.6).
    pub fn productions_for(&self, head: NonterminalId) -> &[ProductionId] {
        &self.productions_by_head[head.0]
    }

    /// Iterates over all nonterminal ids
    pub fn nonterminal_ids(&self) -> impl Iterator<Item = NonterminalId> {
        (0..self.nonterminal_names.len()).map(NonterminalId)
    }

    /// Iterates over all terminal ids
    pub fn terminal_ids(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminal_names.len()).map(TerminalId)
    }
}

/// Mutable collector of terminals, nonterminals and productions. Rejects
/// additions that would violate invariants eagerly is not attempted here
/// (out-of-range symbols are instead caught once, in [`GrammarBuilder::build`]);
/// `build()` consumes the builder and produces the immutable [`Grammar`]
/// with all derived indices precomputed.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    terminal_names: Vec<String>,
    nonterminal_names: Vec<String>,
    nonterminal_index: HashMap<String, NonterminalId>,
    productions: Vec<Production>
}

impl GrammarBuilder {
    /// Creates an empty builder
    pub fn new() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Declares a terminal and returns its dense index. Terminal indices are
    /// assigned sequentially in declaration order.
    pub fn add_terminal(&mut self, name: impl Into<String>) -> TerminalId {
        let id = TerminalId(self.terminal_names.len());
        self.terminal_names.push(name.into());
        id
    }

    /// Declares terminals from a raw, possibly sparse enumeration per the
    /// conventions in §6: negative-valued members (hidden tokens, epsilon
    /// markers) are filtered out, and the remainder must be sequentially
    /// indexed from 0 with exactly one member named `EOF`.
    pub fn add_terminal_kinds<'a>(
        &mut self,
        kinds: impl IntoIterator<Item = (i64, &'a str)>
    ) -> Result<(), GrammarError> {
        let mut present: Vec<(i64, &str)> = kinds.into_iter().filter(|(v, _)| *v >= 0).collect();
        present.sort_by_key(|(v, _)| *v);
        for (expected, (value, _)) in present.iter().enumerate() {
            if *value != expected as i64 {
                return Err(GrammarError::TerminalEnumNotSequential);
            }
        }
        if !present.iter().any(|(_, name)| *name == "EOF") {
            return Err(GrammarError::MissingEofTerminal);
        }
        for (_, name) in present {
            self.add_terminal(name);
        }
        Ok(())
    }

    /// Declares a nonterminal and returns its dense index
    pub fn add_nonterminal(&mut self, name: impl Into<String>) -> NonterminalId {
        let name = name.into();
        let id = NonterminalId(self.nonterminal_names.len());
        self.nonterminal_index.insert(name.clone(), id);
        self.nonterminal_names.push(name);
        id
    }

    /// Looks up a previously declared nonterminal by name
    pub fn nonterminal_by_name(&self, name: &str) -> Option<NonterminalId> {
        self.nonterminal_index.get(name).copied()
    }

    /// Adds a production; the first production added must be the augmented
    /// start production.
    pub fn add_production(&mut self, head: NonterminalId, body: Vec<Symbol>) -> ProductionId {
        let id = ProductionId(self.productions.len());
        self.productions.push(Production::new(head, body));
        id
    }

    /// Validates all invariants and consumes the builder into an immutable [`Grammar`].
    pub fn build(self, start_symbol: NonterminalId) -> Result<Grammar, GrammarError> {
        if self.productions.is_empty() {
            return Err(GrammarError::NoProductions);
        }

        let augmented_head = self.productions[0].head;
        if augmented_head != start_symbol {
            return Err(GrammarError::DuplicateStartProduction);
        }
        if self.productions[1..].iter().any(|p| p.head == start_symbol) {
            return Err(GrammarError::DuplicateStartProduction);
        }

        let augmented_body = &self.productions[0].body;
        if augmented_body.is_empty() || !matches!(augmented_body[0], Symbol::Nonterminal(_)) {
            return Err(GrammarError::MalformedAugmentedProduction);
        }
        let augmented_with_eof = augmented_body.len() == 2 && augmented_body[1] == Symbol::Eof;
        if augmented_body.len() > 1 && !augmented_with_eof {
            return Err(GrammarError::MalformedAugmentedProduction);
        }

        for (idx, production) in self.productions.iter().enumerate() {
            let pid = ProductionId(idx);
            if production.head.0 >= self.nonterminal_names.len() {
                return Err(GrammarError::UndeclaredNonterminal(pid, production.head));
            }
            if production.body.contains(&Symbol::Epsilon) {
                return Err(GrammarError::MalformedEpsilonProduction(pid));
            }
            for sy in &production.body {
                match sy {
                    Symbol::Terminal(t) if t.0 >= self.terminal_names.len() => {
                        return Err(GrammarError::UndeclaredTerminal(pid, *t));
                    }
                    Symbol::Nonterminal(n) if n.0 >= self.nonterminal_names.len() => {
                        return Err(GrammarError::UndeclaredNonterminal(pid, *n));
                    }
                    _ => {}
                }
            }
            if idx > 0 && production.body.iter().any(|sy| *sy == Symbol::Nonterminal(start_symbol)) {
                return Err(GrammarError::StartSymbolOnRhs(start_symbol));
            }
        }

        let mut productions_by_head = vec![Vec::new(); self.nonterminal_names.len()];
        for (idx, production) in self.productions.iter().enumerate() {
            productions_by_head[production.head.0].push(ProductionId(idx));
        }

        check_reduced(&self.productions, &productions_by_head, start_symbol)?;

        Ok(Grammar {
            terminal_names: self.terminal_names,
            nonterminal_names: self.nonterminal_names,
            productions: self.productions,
            start: start_symbol,
            augmented_with_eof,
            productions_by_head
        })
    }
}

/// Checks that every nonterminal is both generating (derives some terminal
/// string) and reachable from the start symbol; a grammar with any useless
/// nonterminal is rejected (§7.1).
fn check_reduced(
    productions: &[Production],
    productions_by_head: &[Vec<ProductionId>],
    start: NonterminalId
) -> Result<(), GrammarError> {
    let n = productions_by_head.len();

    let mut generating = vec![false; n];
    let mut changed = true;
    while changed {
        changed = false;
        for production in productions {
            if generating[production.head.0] {
                continue;
            }
            let all_generating = production.body.iter().all(|sy| match sy {
                Symbol::Nonterminal(nt) => generating[nt.0],
                _ => true
            });
            if all_generating {
                generating[production.head.0] = true;
                changed = true;
            }
        }
    }

    let mut reachable = vec![false; n];
    reachable[start.0] = true;
    let mut worklist = vec![start];
    while let Some(nt) = worklist.pop() {
        for pid in &productions_by_head[nt.0] {
            for sy in &productions[pid.0].body {
                if let Symbol::Nonterminal(child) = sy {
                    if !reachable[child.0] {
                        reachable[child.0] = true;
                        worklist.push(*child);
                    }
                }
            }
        }
    }

    for idx in 0..n {
        if !generating[idx] || !reachable[idx] {
            return Err(GrammarError::UselessSymbol(NonterminalId(idx)));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Builds `E' -> E $; E -> E + T | T; T -> T * F | F; F -> ( E ) | id`
    pub(crate) fn expr_grammar() -> Grammar {
        let mut b = GrammarBuilder::new();
        let plus = b.add_terminal("+");
        let star = b.add_terminal("*");
        let lparen = b.add_terminal("(");
        let rparen = b.add_terminal(")");
        let id = b.add_terminal("id");

        let e = b.add_nonterminal("E");
        let t = b.add_nonterminal("T");
        let f = b.add_nonterminal("F");
        let start = b.add_nonterminal("E'");

        b.add_production(start, vec![Symbol::Nonterminal(e), Symbol::Eof]);
        b.add_production(e, vec![Symbol::Nonterminal(e), Symbol::Terminal(plus), Symbol::Nonterminal(t)]);
        b.add_production(e, vec![Symbol::Nonterminal(t)]);
        b.add_production(t, vec![Symbol::Nonterminal(t), Symbol::Terminal(star), Symbol::Nonterminal(f)]);
        b.add_production(t, vec![Symbol::Nonterminal(f)]);
        b.add_production(f, vec![Symbol::Terminal(lparen), Symbol::Nonterminal(e), Symbol::Terminal(rparen)]);
        b.add_production(f, vec![Symbol::Terminal(id)]);

        b.build(start).unwrap()
    }

    /// The classic grammar that is LR(1) but not LALR(1):
    /// `S -> aAd | bBd | aBe | bAe; A -> c; B -> c`.
    /// Reading `ac` and `bc` reach the same LR(0) state `{A->c•, B->c•}`
    /// with disjoint lookaheads per path; merging the two unions the
    /// lookaheads and creates a reduce/reduce conflict absent from LR(1).
    pub(crate) fn non_lalr_grammar() -> Grammar {
        let mut b = GrammarBuilder::new();
        let a = b.add_terminal("a");
        let bt = b.add_terminal("b");
        let c = b.add_terminal("c");
        let d = b.add_terminal("d");
        let e = b.add_terminal("e");

        let s = b.add_nonterminal("S");
        let an = b.add_nonterminal("A");
        let bn = b.add_nonterminal("B");
        let start = b.add_nonterminal("S'");

        b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
        b.add_production(s, vec![Symbol::Terminal(a), Symbol::Nonterminal(an), Symbol::Terminal(d)]);
        b.add_production(s, vec![Symbol::Terminal(bt), Symbol::Nonterminal(bn), Symbol::Terminal(d)]);
        b.add_production(s, vec![Symbol::Terminal(a), Symbol::Nonterminal(bn), Symbol::Terminal(e)]);
        b.add_production(s, vec![Symbol::Terminal(bt), Symbol::Nonterminal(an), Symbol::Terminal(e)]);
        b.add_production(an, vec![Symbol::Terminal(c)]);
        b.add_production(bn, vec![Symbol::Terminal(c)]);

        b.build(start).unwrap()
    }

    #[test]
    fn builds_a_valid_grammar() {
        let g = expr_grammar();
        assert_eq!(g.terminal_count(), 5);
        assert_eq!(g.productions.len(), 7);
        assert!(g.augmented_with_eof);
    }

    #[test]
    fn rejects_empty_grammar() {
        let b = GrammarBuilder::new();
        let err = b.build(NonterminalId(0)).unwrap_err();
        assert_eq!(err, GrammarError::NoProductions);
    }

    #[test]
    fn rejects_start_symbol_on_rhs() {
        let mut b = GrammarBuilder::new();
        let a = b.add_terminal("a");
        let s = b.add_nonterminal("S");
        let start = b.add_nonterminal("S'");
        b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
        b.add_production(s, vec![Symbol::Terminal(a), Symbol::Nonterminal(s)]);
        let err = b.build(start).unwrap_err();
        assert_eq!(err, GrammarError::StartSymbolOnRhs(start));
    }

    #[test]
    fn rejects_useless_nonterminals() {
        let mut b = GrammarBuilder::new();
        let a = b.add_terminal("a");
        let s = b.add_nonterminal("S");
        let unused = b.add_nonterminal("Unused");
        let start = b.add_nonterminal("S'");
        b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
        b.add_production(s, vec![Symbol::Terminal(a)]);
        // Unused is declared but never produced nor referenced: not reachable.
        b.add_production(unused, vec![Symbol::Terminal(a)]);
        let err = b.build(start).unwrap_err();
        assert_eq!(err, GrammarError::UselessSymbol(unused));
    }

    #[test]
    fn terminal_kinds_filters_negative_and_requires_eof() {
        let mut b = GrammarBuilder::new();
        let result = b.add_terminal_kinds(vec![(0, "PLUS"), (1, "EOF"), (-1, "HIDDEN_WS")]);
        assert!(result.is_ok());
        assert_eq!(b.terminal_names, vec!["PLUS".to_string(), "EOF".to_string()]);
    }

    #[test]
    fn terminal_kinds_rejects_missing_eof() {
        let mut b = GrammarBuilder::new();
        let err = b.add_terminal_kinds(vec![(0, "PLUS")]).unwrap_err();
        assert_eq!(err, GrammarError::MissingEofTerminal);
    }
}
