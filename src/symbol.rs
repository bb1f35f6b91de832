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

//! Module for the grammar symbol model: terminals, nonterminals, eof and epsilon

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Dense index of a terminal within a grammar's terminal registry
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TerminalId(pub usize);

/// Dense index of a nonterminal within a grammar's nonterminal registry
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct NonterminalId(pub usize);

impl Display for TerminalId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl Display for NonterminalId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A grammar symbol, as it can appear in a production body.
///
/// `Eof` only ever appears in the body of an augmented start production of
/// the form `S' -> S Eof`; `Epsilon` never appears in any production body
/// and is only produced as the "no symbol" result of looking past the end
/// of a production.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Symbol {
    /// A terminal, identified by its dense index
    Terminal(TerminalId),
    /// A nonterminal, identified by its dense index
    Nonterminal(NonterminalId),
    /// The distinguished end-of-input marker
    Eof,
    /// The empty string; never appears in a production body
    Epsilon
}

impl Symbol {
    /// Whether this symbol is a terminal (`Eof` counts as one for lookahead purposes)
    pub fn is_terminal_like(self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::Eof)
    }

    /// Whether this symbol is a nonterminal
    pub fn is_nonterminal(self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

/// A terminal symbol as it appears in a lookahead set: either a named
/// terminal or the distinguished end-of-input marker. Epsilon is never a
/// valid lookahead symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum LaSymbol {
    /// A named terminal
    Terminal(TerminalId),
    /// The end-of-input marker
    Eof
}

impl From<LaSymbol> for Symbol {
    fn from(la: LaSymbol) -> Self {
        match la {
            LaSymbol::Terminal(t) => Symbol::Terminal(t),
            LaSymbol::Eof => Symbol::Eof
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::Nonterminal(n) => write!(f, "{}", n),
            Symbol::Eof => write!(f, "$"),
            Symbol::Epsilon => write!(f, "ε")
        }
    }
}

impl Display for LaSymbol {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LaSymbol::Terminal(t) => write!(f, "{}", t),
            LaSymbol::Eof => write!(f, "$")
        }
    }
}
