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

//! Module for the ACTION/GOTO parsing-table builder, generic over the four
//! lookahead selectors (LR(0), SLR(1), LR(1), LALR(1)) and with deterministic
//! conflict resolution (§4.6).

use std::collections::{BTreeSet, HashMap};

use crate::grammar::Grammar;
use crate::lalr::{DigraphLalr, LalrAutomaton};
use crate::lookahead::FollowSets;
use crate::lr0::{Automaton, ItemSet};
use crate::production::{MarkedProduction, ProductionId};
use crate::symbol::{LaSymbol, NonterminalId, Symbol};

/// One cell of the ACTION table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the lookahead and move to the given state
    Shift(usize),
    /// Reduce by the given production
    Reduce(ProductionId),
    /// Accept the input
    Accept
}

fn priority(action: Action) -> u8 {
    match action {
        Action::Accept => 2,
        Action::Shift(_) => 1,
        Action::Reduce(_) => 0
    }
}

/// The ACTION/GOTO parsing table for a shift-reduce driver. `0` is never a
/// valid GOTO target for "no transition" here; absence from the map plays
/// that role instead.
#[derive(Debug, Clone, Default)]
pub struct ParsingTable {
    action: HashMap<(usize, LaSymbol), Action>,
    goto: HashMap<(usize, NonterminalId), usize>
}

impl ParsingTable {
    /// `ACTION[state, la]`, or `None` for a table-defined parse error
    pub fn action(&self, state: usize, la: LaSymbol) -> Option<Action> {
        self.action.get(&(state, la)).copied()
    }

    /// `GOTO[state, nonterminal]`, or `None` if undefined
    pub fn goto(&self, state: usize, nt: NonterminalId) -> Option<usize> {
        self.goto.get(&(state, nt)).copied()
    }
}

/// Conflicts discovered during table construction, keyed by the cell they
/// occurred in. The winning action is in [`ParsingTable`]; this holds the
/// losers, in the order they were displaced.
#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    conflicts: HashMap<(usize, LaSymbol), Vec<Action>>
}

impl ConflictReport {
    /// Whether any cell received more than one candidate action
    pub fn any_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// The losing candidates for a given state and lookahead, if any
    pub fn losers(&self, state: usize, la: LaSymbol) -> &[Action] {
        self.conflicts.get(&(state, la)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All conflicted cells, as `(state, terminal, losing_actions)`
    pub fn entries(&self) -> impl Iterator<Item = (usize, LaSymbol, &[Action])> {
        self.conflicts.iter().map(|(&(state, la), losers)| (state, la, losers.as_slice()))
    }
}

fn record(action: &mut HashMap<(usize, LaSymbol), Action>, conflicts: &mut HashMap<(usize, LaSymbol), Vec<Action>>, state: usize, la: LaSymbol, new: Action) {
    match action.get(&(state, la)).copied() {
        None => {
            action.insert((state, la), new);
        }
        Some(existing) => {
            let (winner, loser) = match (existing, new) {
                (Action::Reduce(p1), Action::Reduce(p2)) => {
                    if p1.0 <= p2.0 {
                        (existing, new)
                    } else {
                        (new, existing)
                    }
                }
                _ if priority(existing) >= priority(new) => (existing, new),
                _ => (new, existing)
            };
            action.insert((state, la), winner);
            conflicts.entry((state, la)).or_default().push(loser);
        }
    }
}

/// Builds the ACTION/GOTO table from a canonical collection and a
/// per-reduce-item lookahead selector (§4.6 procedure). Shared by all four
/// methods; the selector is the only thing that differs between them.
pub fn build_table<La>(
    grammar: &Grammar,
    states: &[ItemSet<La>],
    transitions: &[(usize, Symbol, usize)],
    mut la_of_reduce: impl FnMut(usize, &MarkedProduction) -> BTreeSet<LaSymbol>
) -> (ParsingTable, ConflictReport) {
    let mut action: HashMap<(usize, LaSymbol), Action> = HashMap::new();
    let mut goto: HashMap<(usize, NonterminalId), usize> = HashMap::new();
    let mut conflicts: HashMap<(usize, LaSymbol), Vec<Action>> = HashMap::new();

    for &(s, sy, t) in transitions {
        match sy {
            Symbol::Terminal(term) => {
                action.insert((s, LaSymbol::Terminal(term)), Action::Shift(t));
            }
            Symbol::Nonterminal(nt) => {
                goto.insert((s, nt), t);
            }
            Symbol::Eof => unreachable!("eof is an accept marker; build_automaton never emits a transition over it"),
            Symbol::Epsilon => unreachable!("epsilon never labels a transition")
        }
    }

    let start_production = grammar.start_production();
    let augmented_body = &grammar.production(start_production).body;
    for (s, state) in states.iter().enumerate() {
        let is_accept_state = state.items.keys().any(|mp| mp.is_accept(start_production, augmented_body));
        if is_accept_state {
            action.insert((s, LaSymbol::Eof), Action::Accept);
        }
    }

    for (s, state) in states.iter().enumerate() {
        let reduce_items: Vec<MarkedProduction> = state
            .items
            .keys()
            .filter(|mp| {
                mp.production != start_production && mp.is_reduce(&grammar.production(mp.production).body)
            })
            .copied()
            .collect();
        for mp in reduce_items {
            for la in la_of_reduce(s, &mp) {
                record(&mut action, &mut conflicts, s, la, Action::Reduce(mp.production));
            }
        }
    }

    (ParsingTable { action, goto }, ConflictReport { conflicts })
}

/// LR(0) selector: every reduce item is attempted against every terminal and eof
pub fn build_table_lr0(grammar: &Grammar, automaton: &Automaton<()>) -> (ParsingTable, ConflictReport) {
    let all: BTreeSet<LaSymbol> =
        grammar.terminal_ids().map(LaSymbol::Terminal).chain(std::iter::once(LaSymbol::Eof)).collect();
    build_table(grammar, &automaton.states, &automaton.transitions, move |_, _| all.clone())
}

/// SLR(1) selector: `LA(state, p) = FOLLOW(head(p))`
pub fn build_table_slr1(grammar: &Grammar, automaton: &Automaton<()>, follow: &FollowSets) -> (ParsingTable, ConflictReport) {
    build_table(grammar, &automaton.states, &automaton.transitions, |_, mp| {
        let head = grammar.production(mp.production).head;
        follow.follow_of(head).iter().cloned().collect()
    })
}

/// Canonical LR(1) selector: the lookahead set attached to the item itself
pub fn build_table_lr1(grammar: &Grammar, automaton: &Automaton<BTreeSet<LaSymbol>>) -> (ParsingTable, ConflictReport) {
    build_table(grammar, &automaton.states, &automaton.transitions, |s, mp| {
        automaton.states[s].items.get(mp).cloned().unwrap_or_default()
    })
}

/// LALR(1) selector using the merged LR(1) automaton
pub fn build_table_lalr1_merged(grammar: &Grammar, lalr: &LalrAutomaton) -> (ParsingTable, ConflictReport) {
    build_table(grammar, &lalr.states, &lalr.transitions, |s, mp| lalr.states[s].items.get(mp).cloned().unwrap_or_default())
}

/// LALR(1) selector using `LA` values from the digraph algorithm, over the LR(0) automaton
pub fn build_table_lalr1_digraph(grammar: &Grammar, lr0: &Automaton<()>, digraph: &DigraphLalr) -> (ParsingTable, ConflictReport) {
    build_table(grammar, &lr0.states, &lr0.transitions, |s, mp| {
        digraph.la.get(&(s, mp.production)).cloned().unwrap_or_default()
    })
}
