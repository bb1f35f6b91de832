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

//! Module for productions and marked productions (LR(0) item cores)

use crate::symbol::{NonterminalId, Symbol};

/// Dense index of a production within a grammar. By convention production 0
/// is the augmented start production.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProductionId(pub usize);

/// A grammar production `head -> body`. An empty body denotes an
/// epsilon-production.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Production {
    /// The nonterminal on the left-hand side
    pub head: NonterminalId,
    /// The sequence of symbols on the right-hand side
    pub body: Vec<Symbol>
}

impl Production {
    /// Creates a new production
    pub fn new(head: NonterminalId, body: Vec<Symbol>) -> Production {
        Production { head, body }
    }

    /// Whether this production is an epsilon-production
    pub fn is_epsilon(&self) -> bool {
        self.body.is_empty()
    }
}

/// A marked production: a production paired with a dot position. Equality
/// and hashing depend only on the production index and the dot position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MarkedProduction {
    /// The production this item is derived from
    pub production: ProductionId,
    /// The dot position, in `0..=body.len()`
    pub dot: usize
}

impl MarkedProduction {
    /// Creates a new marked production
    pub fn new(production: ProductionId, dot: usize) -> MarkedProduction {
        MarkedProduction { production, dot }
    }

    /// A kernel item is one whose dot is not at the left end, plus the
    /// initial item of the augmented start production.
    pub fn is_kernel(&self, start_production: ProductionId) -> bool {
        self.dot > 0 || self.production == start_production
    }

    /// Gets the symbol immediately following the dot, the body of the
    /// referenced production having `len` symbols.
    pub fn dot_symbol(&self, body: &[Symbol]) -> Option<Symbol> {
        body.get(self.dot).copied()
    }

    /// Whether the dot is past the final symbol of the body
    pub fn is_reduce(&self, body: &[Symbol]) -> bool {
        self.dot >= body.len()
    }

    /// Whether this is the accept item of the augmented start production:
    /// the dot sits just before a trailing `Eof` (`S' -> S•Eof`), or at the
    /// end of the body if there is none (`S' -> S•`). `Eof` is an accept
    /// marker here, not a symbol to shift over, so this is the position
    /// that matters for production 0 rather than [`Self::is_reduce`].
    pub fn is_accept(&self, start_production: ProductionId, body: &[Symbol]) -> bool {
        if self.production != start_production {
            return false;
        }
        let accept_dot = if body.last() == Some(&Symbol::Eof) { body.len() - 1 } else { body.len() };
        self.dot == accept_dot
    }

    /// Whether the symbol following the dot is a terminal (or eof)
    pub fn is_shift(&self, body: &[Symbol]) -> bool {
        matches!(self.dot_symbol(body), Some(sy) if sy.is_terminal_like())
    }

    /// Whether the symbol following the dot is a nonterminal
    pub fn is_goto(&self, body: &[Symbol]) -> bool {
        matches!(self.dot_symbol(body), Some(sy) if sy.is_nonterminal())
    }

    /// Produces the marked production with the dot advanced by one
    pub fn shifted(&self) -> MarkedProduction {
        MarkedProduction { production: self.production, dot: self.dot + 1 }
    }
}
