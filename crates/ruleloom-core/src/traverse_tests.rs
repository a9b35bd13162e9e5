use crate::traverse::{Discipline, RuleVisitor, walk_non_terminal};
use crate::{CyclePolicy, Grammar, GraphError, NonTerminal, RuleId, Tracker, Visit};

#[test]
fn active_path_reports_cycles_only_while_active() {
    let a = RuleId::from_raw(3);
    let b = RuleId::from_raw(70);
    let mut tracker = Tracker::active_path(CyclePolicy::Tolerate);

    assert_eq!(tracker.enter(a), Visit::Enter);
    assert_eq!(tracker.enter(b), Visit::Enter);
    assert_eq!(tracker.enter(a), Visit::Cycle);
    assert_eq!(tracker.path(), [a, b]);

    tracker.leave(b);
    tracker.leave(a);

    assert_eq!(tracker.enter(a), Visit::Enter);
    assert!(!tracker.is_done(b));
    assert_eq!(tracker.discipline(), Discipline::ActivePath);
}

#[test]
fn visited_once_reports_seen_after_leave() {
    let a = RuleId::from_raw(1);
    let mut tracker = Tracker::visited_once();

    assert_eq!(tracker.enter(a), Visit::Enter);
    assert_eq!(tracker.enter(a), Visit::Cycle);
    tracker.leave(a);

    assert!(tracker.is_done(a));
    assert!(!tracker.is_active(a));
    assert_eq!(tracker.enter(a), Visit::Seen);
    assert_eq!(tracker.depth(), 0);
}

/// Records non-terminal names in visit order.
struct NameRecorder<'g> {
    grammar: &'g Grammar,
    tracker: Tracker<RuleId>,
    names: Vec<String>,
    cycles: usize,
    seen: usize,
}

impl<'g> NameRecorder<'g> {
    fn new(grammar: &'g Grammar, tracker: Tracker<RuleId>) -> Self {
        Self {
            grammar,
            tracker,
            names: Vec::new(),
            cycles: 0,
            seen: 0,
        }
    }
}

impl<'g> RuleVisitor<'g> for NameRecorder<'g> {
    fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn tracker(&mut self) -> &mut Tracker<RuleId> {
        &mut self.tracker
    }

    fn visit_non_terminal(&mut self, _id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
        self.names.push(nt.name().to_owned());
        walk_non_terminal(self, nt)
    }

    fn visit_cycle(&mut self, _id: RuleId) -> Result<(), GraphError> {
        self.cycles += 1;
        Ok(())
    }

    fn visit_seen(&mut self, _id: RuleId) -> Result<(), GraphError> {
        self.seen += 1;
        Ok(())
    }
}

/// `list = item [list]`, `item = digit / digit`, `digit = "0"`
fn recursive_grammar() -> (Grammar, RuleId) {
    let mut g = Grammar::new();
    let list = g.non_terminal("list");
    let item = g.non_terminal("item");
    let zero = g.literal("0");
    let digit = g.define("digit", zero);
    let either = g.disjunction([digit, digit]);
    g.bind(item, either).unwrap();
    let rest = g.optional(list);
    let body = g.conjunction([item, rest]);
    g.bind(list, body).unwrap();
    (g, list)
}

#[test]
fn tolerant_walk_stops_at_cycles() {
    let (g, list) = recursive_grammar();
    let mut recorder = NameRecorder::new(&g, Tracker::active_path(CyclePolicy::Tolerate));

    recorder.visit_rule(list).unwrap();

    assert_eq!(recorder.names, ["list", "item", "digit", "digit"]);
    assert_eq!(recorder.cycles, 1);
    assert_eq!(recorder.tracker.depth(), 0);
}

#[test]
fn visited_once_walk_expands_each_rule_once() {
    let (g, list) = recursive_grammar();
    let mut recorder = NameRecorder::new(&g, Tracker::visited_once());

    recorder.visit_rule(list).unwrap();

    assert_eq!(recorder.names, ["list", "item", "digit"]);
    assert_eq!(recorder.cycles, 1);
    assert_eq!(recorder.seen, 1);
}

#[test]
fn forbidding_walk_fails_on_cycle() {
    let (g, list) = recursive_grammar();
    let mut recorder = NameRecorder::new(&g, Tracker::active_path(CyclePolicy::Forbid));

    let err = recorder.visit_rule(list).unwrap_err();

    assert_eq!(err, GraphError::CyclicGraph { rule: "list".into() });
    assert_eq!(recorder.cycles, 0);
}
