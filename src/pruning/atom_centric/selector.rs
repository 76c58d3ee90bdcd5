use super::MarkingStore;
use crate::{
    config::ConfigError,
    pruning::{
        find_unsatisfied_condition,
        AtomOperatorIndex,
        StubbornTable,
    },
    task::{
        Atom,
        State,
    },
};
use core::{
    fmt,
    str::FromStr,
};

/// Strategy for selecting one unsatisfied atom out of a goal or a precondition.
///
/// All strategies scan the candidates in variable order and use that order
/// to break ties.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AtomSelectionStrategy {
    /// The unsatisfied atom with the first variable.
    FastDownward,
    /// No atom if the achievers of some unsatisfied atom are already
    /// enqueued, otherwise the unsatisfied atom with the first variable.
    QuickSkip,
    /// The unsatisfied atom with the fewest achievers.
    StaticSmall,
    /// The unsatisfied atom with the fewest achievers that are not yet stubborn.
    DynamicSmall,
}

/// Read-only view on the state of a stubborn set computation used for selection.
#[derive(Debug, Copy, Clone)]
pub struct SelectionContext<'a> {
    pub achievers: &'a AtomOperatorIndex,
    pub marks: &'a MarkingStore,
    pub stubborn: &'a StubbornTable,
}

impl AtomSelectionStrategy {
    /// All strategies in the order of their identifiers in [`Self::NAMES`].
    pub const ALL: [Self; 4] = [
        Self::FastDownward,
        Self::QuickSkip,
        Self::StaticSmall,
        Self::DynamicSmall,
    ];

    /// The textual identifiers of all strategies.
    pub const NAMES: [&'static str; 4] = ["fast_downward", "quick_skip", "static_small", "dynamic_small"];

    /// Returns the textual identifier of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            Self::FastDownward => Self::NAMES[0],
            Self::QuickSkip => Self::NAMES[1],
            Self::StaticSmall => Self::NAMES[2],
            Self::DynamicSmall => Self::NAMES[3],
        }
    }

    /// Selects an unsatisfied atom among the candidates.
    ///
    /// `candidates` must be sorted by variable and contain at least one atom
    /// that does not hold in the state. Returns `None` only if
    /// [`AtomSelectionStrategy::QuickSkip`] finds an unsatisfied atom whose
    /// achievers are already enqueued, meaning nothing has to be done for
    /// these candidates.
    pub fn select(self, candidates: &[Atom], state: &State, context: SelectionContext) -> Option<Atom> {
        debug_assert!(
            candidates.windows(2).all(|pair| pair[0] < pair[1]),
            "candidates must be sorted by variable"
        );
        let selected = match self {
            Self::FastDownward => find_unsatisfied_condition(candidates, state),
            Self::QuickSkip => {
                let mut first = None;
                for &atom in candidates.iter().filter(|&&atom| !state.satisfies(atom)) {
                    if context.marks.is_producer_marked(atom) {
                        return None
                    }
                    first.get_or_insert(atom);
                }
                first
            }
            Self::StaticSmall => {
                select_min_by_key(candidates, state, |atom| context.achievers.count(atom))
            }
            Self::DynamicSmall => {
                select_min_by_key(candidates, state, |atom| {
                    context
                        .achievers
                        .get(atom)
                        .iter()
                        .filter(|&&op| !context.stubborn.is_stubborn(op))
                        .count()
                })
            }
        };
        debug_assert!(
            selected.is_some(),
            "atom selection called without an unsatisfied candidate"
        );
        selected
    }
}

/// Returns the unsatisfied atom with the smallest key, the first one on ties.
fn select_min_by_key<F>(candidates: &[Atom], state: &State, mut key: F) -> Option<Atom>
where
    F: FnMut(Atom) -> usize,
{
    let mut best: Option<(usize, Atom)> = None;
    for &atom in candidates.iter().filter(|&&atom| !state.satisfies(atom)) {
        let count = key(atom);
        if best.map_or(true, |(min_count, _)| count < min_count) {
            best = Some((count, atom));
        }
    }
    best.map(|(_, atom)| atom)
}

impl Default for AtomSelectionStrategy {
    fn default() -> Self {
        Self::QuickSkip
    }
}

impl fmt::Display for AtomSelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AtomSelectionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ConfigError::UnknownAtomSelectionStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pruning::StubbornSetIndices,
        task::{
            OperatorId,
            Task,
            TaskBuilder,
            Variable,
        },
    };

    fn var(index: usize) -> Variable {
        Variable::from_index(index).unwrap()
    }

    /// Three binary variables; (v0,1) has five achievers, (v1,0) has two.
    fn selection_task() -> (Task, Vec<OperatorId>, Vec<OperatorId>) {
        let mut builder = TaskBuilder::default();
        builder.new_variables(vec![2, 2, 2]);
        builder.set_initial_state(vec![0, 1, 1]);
        builder.add_goal(Atom::new(var(0), 1));
        let v0_achievers = (0..5)
            .map(|n| builder.add_operator(format!("a{}", n), 1, vec![], vec![Atom::new(var(0), 1)]))
            .collect();
        let v1_achievers = (0..2)
            .map(|n| builder.add_operator(format!("b{}", n), 1, vec![], vec![Atom::new(var(1), 0)]))
            .collect();
        (builder.finalize().unwrap(), v0_achievers, v1_achievers)
    }

    fn candidates() -> Vec<Atom> {
        vec![Atom::new(var(0), 1), Atom::new(var(1), 0), Atom::new(var(2), 1)]
    }

    struct Fixture {
        task: Task,
        indices: StubbornSetIndices,
        marks: MarkingStore,
        stubborn: StubbornTable,
        v0_achievers: Vec<OperatorId>,
    }

    impl Fixture {
        fn new() -> Self {
            let (task, v0_achievers, _) = selection_task();
            let indices = StubbornSetIndices::new(&task);
            let marks = MarkingStore::new(task.layout(), true);
            let stubborn = StubbornTable::with_len(task.num_operators());
            Self {
                task,
                indices,
                marks,
                stubborn,
                v0_achievers,
            }
        }

        fn select(&self, strategy: AtomSelectionStrategy) -> Option<Atom> {
            let context = SelectionContext {
                achievers: self.indices.achiever_index(),
                marks: &self.marks,
                stubborn: &self.stubborn,
            };
            strategy.select(&candidates(), self.task.initial_state(), context)
        }
    }

    #[test]
    fn fast_downward_picks_first_unsatisfied() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.select(AtomSelectionStrategy::FastDownward),
            Some(Atom::new(var(0), 1))
        );
    }

    #[test]
    fn static_small_picks_fewest_achievers() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.select(AtomSelectionStrategy::StaticSmall),
            Some(Atom::new(var(1), 0))
        );
    }

    #[test]
    fn quick_skip_without_marks_picks_first_unsatisfied() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.select(AtomSelectionStrategy::QuickSkip),
            Some(Atom::new(var(0), 1))
        );
    }

    #[test]
    fn quick_skip_returns_none_if_producers_are_marked() {
        let mut fixture = Fixture::new();
        fixture.marks.enqueue_producers(Atom::new(var(1), 0));
        assert_eq!(fixture.select(AtomSelectionStrategy::QuickSkip), None);
    }

    #[test]
    fn quick_skip_ignores_marks_of_satisfied_atoms() {
        let mut fixture = Fixture::new();
        fixture.marks.enqueue_producers(Atom::new(var(2), 1));
        assert_eq!(
            fixture.select(AtomSelectionStrategy::QuickSkip),
            Some(Atom::new(var(0), 1))
        );
    }

    #[test]
    fn dynamic_small_counts_only_non_stubborn_achievers() {
        let mut fixture = Fixture::new();
        assert_eq!(
            fixture.select(AtomSelectionStrategy::DynamicSmall),
            Some(Atom::new(var(1), 0))
        );
        // Leave one unmarked achiever for (v0,1), fewer than the two of (v1,0).
        let achievers = fixture.v0_achievers.clone();
        for &op in &achievers[..4] {
            fixture.stubborn.mark(op);
        }
        assert_eq!(
            fixture.select(AtomSelectionStrategy::DynamicSmall),
            Some(Atom::new(var(0), 1))
        );
    }

    #[test]
    fn ties_go_to_the_first_variable() {
        let mut fixture = Fixture::new();
        // Three of five (v0,1) achievers stubborn: two remain, as for (v1,0).
        let achievers = fixture.v0_achievers.clone();
        for &op in &achievers[..3] {
            fixture.stubborn.mark(op);
        }
        assert_eq!(
            fixture.select(AtomSelectionStrategy::DynamicSmall),
            Some(Atom::new(var(0), 1))
        );
    }

    #[test]
    fn identifiers_round_trip() {
        for strategy in AtomSelectionStrategy::ALL.iter().copied() {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
        assert_eq!(
            "smallest".parse::<AtomSelectionStrategy>(),
            Err(ConfigError::UnknownAtomSelectionStrategy("smallest".into()))
        );
    }
}
