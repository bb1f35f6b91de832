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

//! Module for the shift-reduce parser driver (§4.7)
//!
//! The driver is a stack of state indices interpreting an ACTION/GOTO table.
//! It knows nothing about any particular grammar's semantics: it reports
//! what it did through a consumer-supplied [`ParseEvents`] sink and leaves
//! semantic actions (building a tree, evaluating, recording a trace) to the
//! caller.

use log::trace;

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::production::ProductionId;
use crate::symbol::{LaSymbol, TerminalId};
use crate::table::{Action, ParsingTable};

/// Receives shift/reduce/accept events as the driver consumes a token stream.
pub trait ParseEvents {
    /// A terminal (or eof) was shifted onto the stack
    fn shift(&mut self, terminal: LaSymbol);
    /// The body of a production was popped and replaced by its head
    fn reduce(&mut self, production: ProductionId);
    /// The augmented start production was fully reduced
    fn accept(&mut self);
}

/// A [`ParseEvents`] sink that does nothing; useful for driving the
/// automaton purely for its errors, e.g. a grammar-validation pass.
#[derive(Debug, Default)]
pub struct NullEvents;

impl ParseEvents for NullEvents {
    fn shift(&mut self, _terminal: LaSymbol) {}
    fn reduce(&mut self, _production: ProductionId) {}
    fn accept(&mut self) {}
}

/// Runs the shift-reduce loop of §4.7 over `tokens` against `table`, emitting
/// events to `events`. `tokens` yields terminals only; the driver appends the
/// trailing eof itself.
///
/// ```text
/// push start_state
/// loop:
///     action = ACTION[top(stack), lookahead]
///     Shift(t)   => push t, advance input
///     Reduce(p)  => pop |body(p)| states, goto via GOTO[top(stack), head(p)]
///     Accept     => stop
///     otherwise  => UnexpectedToken
/// ```
pub fn drive<E: ParseEvents>(
    grammar: &Grammar,
    table: &ParsingTable,
    start_state: usize,
    tokens: impl IntoIterator<Item = TerminalId>,
    events: &mut E
) -> Result<(), ParseError> {
    let mut input = tokens.into_iter().map(LaSymbol::Terminal).chain(std::iter::once(LaSymbol::Eof));
    let mut stack = vec![start_state];
    let mut lookahead = input.next().unwrap_or(LaSymbol::Eof);

    loop {
        let top = *stack.last().expect("the stack always holds at least the start state");
        match table.action(top, lookahead) {
            Some(Action::Shift(next)) => {
                trace!("shift {:?} -> state {}", lookahead, next);
                events.shift(lookahead);
                stack.push(next);
                lookahead = input.next().unwrap_or(LaSymbol::Eof);
            }
            Some(Action::Reduce(production)) => {
                let body_len = grammar.production(production).body.len();
                let new_len = stack.len() - body_len;
                stack.truncate(new_len);
                let new_top = *stack.last().expect("a reduce never pops the start state off the stack");
                let head = grammar.production(production).head;
                let next = table.goto(new_top, head).ok_or(ParseError::MissingGoto(new_top, head))?;
                trace!("reduce by {:?}, goto state {}", production, next);
                stack.push(next);
                events.reduce(production);
            }
            Some(Action::Accept) => {
                trace!("accept");
                events.accept();
                return Ok(());
            }
            None => return Err(ParseError::UnexpectedToken(lookahead, top))
        }
    }
}
