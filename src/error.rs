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

//! Error types raised at grammar construction and at parse time

use thiserror::Error;

use crate::production::ProductionId;
use crate::symbol::{LaSymbol, NonterminalId, TerminalId};

/// A grammar fails validation before an immutable [`crate::grammar::Grammar`]
/// can be produced. Construction never partially initializes a grammar.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GrammarError {
    /// No productions were supplied
    #[error("grammar has no productions")]
    NoProductions,
    /// More than one production has the same head as the declared start symbol's augmentation
    #[error("grammar has more than one augmented start production")]
    DuplicateStartProduction,
    /// The start symbol appears on the right-hand side of some production
    #[error("start symbol {0} appears on the right-hand side of a production")]
    StartSymbolOnRhs(NonterminalId),
    /// A production body references a nonterminal that was never declared
    #[error("production {0:?} references undeclared nonterminal {1}")]
    UndeclaredNonterminal(ProductionId, NonterminalId),
    /// A production body references a terminal that was never declared
    #[error("production {0:?} references undeclared terminal {1}")]
    UndeclaredTerminal(ProductionId, TerminalId),
    /// The augmented start production's body is not of the form `S` or `S Eof`
    #[error("production 0 must have the form `S' -> S` or `S' -> S Eof`")]
    MalformedAugmentedProduction,
    /// The terminal enumeration was not densely, sequentially indexed
    #[error("terminal enumeration is not sequentially indexed from 0")]
    TerminalEnumNotSequential,
    /// The terminal enumeration has no entry named `EOF`
    #[error("terminal enumeration has no reserved EOF entry")]
    MissingEofTerminal,
    /// The grammar has useless (unreachable or non-generating) symbols
    #[error("grammar contains useless symbol {0}")]
    UselessSymbol(NonterminalId),
    /// A production body contained an explicit `Epsilon` symbol; an
    /// empty-derivation production is instead written with an empty body
    #[error("production {0:?} contains an explicit epsilon symbol in its body")]
    MalformedEpsilonProduction(ProductionId)
}

/// Raised by the parser driver when no action is defined for the current
/// `(state, lookahead)` pair.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// The lookahead symbol has no entry in `ACTION` for the current state
    #[error("unexpected token {0} at state {1}")]
    UnexpectedToken(LaSymbol, usize),
    /// A reduction produced a `GOTO` miss; this indicates a malformed table
    #[error("no GOTO transition from state {0} on nonterminal {1}; the parsing table is inconsistent")]
    MissingGoto(usize, NonterminalId)
}
