//! End-to-end scenarios: build a grammar, construct its LALR(1) table by
//! both methods, and drive it over concrete input.

use lr_core::{
    build_automaton, build_table_lalr1_digraph, build_table_lalr1_merged, build_table_lr0, drive, lalr_by_digraph,
    merge_lr1, Action, FirstSets, Grammar, GrammarBuilder, LaSymbol, Lr0, Lr1, NullableTable, ParseError, ParseEvents,
    ProductionId, Symbol, TerminalId
};
use pretty_assertions::assert_eq;

fn analyses(grammar: &Grammar) -> (NullableTable, FirstSets) {
    let nullable = NullableTable::compute(grammar);
    let first = FirstSets::compute_iterative(grammar, &nullable);
    (nullable, first)
}

#[derive(Default)]
struct Recorder {
    shifts: Vec<LaSymbol>,
    reduces: Vec<ProductionId>,
    accepted: bool
}

impl ParseEvents for Recorder {
    fn shift(&mut self, terminal: LaSymbol) {
        self.shifts.push(terminal);
    }

    fn reduce(&mut self, production: ProductionId) {
        self.reduces.push(production);
    }

    fn accept(&mut self) {
        self.accepted = true;
    }
}

/// S1: the classic expression grammar, parsing `id + id * id`.
#[test]
fn s1_classic_expression_grammar() {
    env_logger::try_init().ok();

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
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
    let lalr = merge_lr1(&g, &lr1);
    let (table, report) = build_table_lalr1_merged(&g, &lalr);
    assert!(!report.any_conflicts());

    let mut events = Recorder::default();
    let tokens = vec![id, plus, id, star, id];
    drive(&g, &table, lalr.start, tokens, &mut events).unwrap();
    assert!(events.accepted);
    assert_eq!(events.shifts.len(), 5);
}

/// S2: a left-recursive list, parsing `a,a,a`.
#[test]
fn s2_left_recursive_list() {
    let mut b = GrammarBuilder::new();
    let a = b.add_terminal("a");
    let comma = b.add_terminal(",");
    let l = b.add_nonterminal("L");
    let start = b.add_nonterminal("L'");
    b.add_production(start, vec![Symbol::Nonterminal(l), Symbol::Eof]);
    b.add_production(l, vec![Symbol::Nonterminal(l), Symbol::Terminal(comma), Symbol::Terminal(a)]);
    b.add_production(l, vec![Symbol::Terminal(a)]);
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
    let lalr = merge_lr1(&g, &lr1);
    let (table, report) = build_table_lalr1_merged(&g, &lalr);
    assert!(!report.any_conflicts());

    let mut events = Recorder::default();
    let tokens = vec![a, comma, a, comma, a];
    drive(&g, &table, lalr.start, tokens, &mut events).unwrap();
    assert!(events.accepted);
    assert_eq!(events.shifts.len(), 5);
    // Two applications of the recursive production, one of the base case.
    assert_eq!(events.reduces.iter().filter(|&&p| p == ProductionId(1)).count(), 2);
    assert_eq!(events.reduces.iter().filter(|&&p| p == ProductionId(2)).count(), 1);
}

/// S3: a nullable middle nonterminal, `S -> a A b; A -> c | epsilon`.
#[test]
fn s3_nullable_middle() {
    let mut b = GrammarBuilder::new();
    let a = b.add_terminal("a");
    let c = b.add_terminal("c");
    let bt = b.add_terminal("b");
    let d = b.add_terminal("d");
    let s = b.add_nonterminal("S");
    let an = b.add_nonterminal("A");
    let start = b.add_nonterminal("S'");
    b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
    b.add_production(s, vec![Symbol::Terminal(a), Symbol::Nonterminal(an), Symbol::Terminal(bt)]);
    b.add_production(an, vec![Symbol::Terminal(c)]);
    b.add_production(an, vec![]);
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
    let lalr = merge_lr1(&g, &lr1);
    let (table, report) = build_table_lalr1_merged(&g, &lalr);
    assert!(!report.any_conflicts());

    let mut accept = |tokens: Vec<TerminalId>| {
        let mut events = Recorder::default();
        drive(&g, &table, lalr.start, tokens, &mut events).map(|()| events.accepted)
    };

    assert_eq!(accept(vec![a, bt]), Ok(true));
    assert_eq!(accept(vec![a, c, bt]), Ok(true));
    assert!(matches!(accept(vec![a, d, bt]), Err(ParseError::UnexpectedToken(_, _))));
}

/// S4: the dangling-else grammar; shift must win on `e` regardless of method.
#[test]
fn s4_dangling_else_prefers_shift() {
    let mut b = GrammarBuilder::new();
    let i = b.add_terminal("i");
    let e = b.add_terminal("e");
    let x = b.add_terminal("x");
    let s = b.add_nonterminal("S");
    let start = b.add_nonterminal("S'");
    b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
    b.add_production(s, vec![Symbol::Terminal(i), Symbol::Nonterminal(s), Symbol::Terminal(e), Symbol::Nonterminal(s)]);
    b.add_production(s, vec![Symbol::Terminal(i), Symbol::Nonterminal(s)]);
    b.add_production(s, vec![Symbol::Terminal(x)]);
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
    let lalr = merge_lr1(&g, &lr1);
    let (table, report) = build_table_lalr1_merged(&g, &lalr);
    assert!(report.any_conflicts(), "dangling else is a genuine shift/reduce conflict");

    // `i x e x`: the inner `S` must bind the dangling `e`, reachable only if shift wins.
    let mut events = Recorder::default();
    let tokens = vec![i, x, e, x];
    drive(&g, &table, lalr.start, tokens, &mut events).unwrap();
    assert!(events.accepted);
}

/// S5: two same-shape productions with different heads; the earlier-declared wins.
#[test]
fn s5_reduce_reduce_prefers_earlier_production() {
    let mut b = GrammarBuilder::new();
    let x = b.add_terminal("x");
    let s = b.add_nonterminal("S");
    let a = b.add_nonterminal("A");
    let bn = b.add_nonterminal("B");
    let start = b.add_nonterminal("S'");
    b.add_production(start, vec![Symbol::Nonterminal(s), Symbol::Eof]);
    b.add_production(s, vec![Symbol::Nonterminal(a)]);
    b.add_production(s, vec![Symbol::Nonterminal(bn)]);
    let a_to_x = b.add_production(a, vec![Symbol::Terminal(x)]);
    let b_to_x = b.add_production(bn, vec![Symbol::Terminal(x)]);
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr0 = build_automaton::<Lr0>(&g, &first, &nullable);
    let (table, report) = build_table_lr0(&g, &lr0);

    let x_la = LaSymbol::Terminal(x);
    let conflicted_state = report.entries().find(|&(_, la, _)| la == x_la).map(|(state, _, _)| state).unwrap();
    assert_eq!(table.action(conflicted_state, x_la), Some(Action::Reduce(a_to_x)));
    assert_eq!(report.losers(conflicted_state, x_la), &[Action::Reduce(b_to_x)]);

    let mut events = Recorder::default();
    drive(&g, &table, lr0.start, vec![x], &mut events).unwrap();
    assert!(events.accepted);
    assert!(events.reduces.contains(&a_to_x));
    assert!(!events.reduces.contains(&b_to_x));
}

/// S6: a grammar that is LR(1) but not LALR(1); merge and digraph methods
/// must still agree on the conflict they introduce.
#[test]
fn s6_non_lalr_grammar_cross_check() {
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
    let a_to_c = b.add_production(an, vec![Symbol::Terminal(c)]);
    let b_to_c = b.add_production(bn, vec![Symbol::Terminal(c)]);
    let g = b.build(start).unwrap();

    let (nullable, first) = analyses(&g);
    let lr0 = build_automaton::<Lr0>(&g, &first, &nullable);
    let lr1 = build_automaton::<Lr1>(&g, &first, &nullable);
    let lalr = merge_lr1(&g, &lr1);
    let digraph = lalr_by_digraph(&g, &nullable, &lr0);

    let (_, merged_report) = build_table_lalr1_merged(&g, &lalr);
    let (_, digraph_report) = build_table_lalr1_digraph(&g, &lr0, &digraph);
    assert!(merged_report.any_conflicts());
    assert!(digraph_report.any_conflicts());

    let c_la = LaSymbol::Terminal(c);
    let merged_conflict_states: Vec<usize> = merged_report.entries().filter(|&(_, la, _)| la == c_la).map(|(s, _, _)| s).collect();
    let digraph_conflict_states: Vec<usize> = digraph_report.entries().filter(|&(_, la, _)| la == c_la).map(|(s, _, _)| s).collect();
    assert_eq!(merged_conflict_states.len(), 1);
    assert_eq!(digraph_conflict_states.len(), 1);

    // Both methods must name the same two productions as the conflicting pair.
    let mut merged_losers = merged_report.losers(merged_conflict_states[0], c_la).to_vec();
    let mut digraph_losers = digraph_report.losers(digraph_conflict_states[0], c_la).to_vec();
    merged_losers.sort_by_key(|a| match a {
        Action::Reduce(p) => p.0,
        _ => usize::MAX
    });
    digraph_losers.sort_by_key(|a| match a {
        Action::Reduce(p) => p.0,
        _ => usize::MAX
    });
    assert_eq!(merged_losers, digraph_losers);
    assert!(merged_losers.contains(&Action::Reduce(b_to_c)) || merged_losers.contains(&Action::Reduce(a_to_c)));
}
