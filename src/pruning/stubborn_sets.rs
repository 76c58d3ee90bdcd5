use super::{
    AtomOperatorIndex,
    PruningMethod,
    PruningStatistics,
};
use crate::{
    config::{
        ConfigError,
        PruningConfig,
    },
    logging::targets,
    task::{
        Atom,
        AtomLayout,
        OperatorId,
        State,
        Task,
    },
};
use bounded::{
    BoundedArray,
    BoundedBitmap,
};
use std::sync::Arc;

/// Returns the first atom of the sequence that does not hold in the state.
///
/// Sequences are expected in variable order, so this is also the falsified
/// atom with the smallest variable.
#[inline]
pub fn find_unsatisfied_condition(atoms: &[Atom], state: &State) -> Option<Atom> {
    atoms.iter().copied().find(|&atom| !state.satisfies(atom))
}

/// The operators that are part of the stubborn set of one state.
///
/// Within one computation an operator can only be added, never removed.
/// [`StubbornTable::clear`] starts the next computation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StubbornTable {
    flags: BoundedBitmap<OperatorId>,
    num_marked: usize,
}

impl StubbornTable {
    /// Creates a table for the given number of operators, none of them stubborn.
    pub fn with_len(num_operators: usize) -> Self {
        Self {
            flags: BoundedBitmap::with_len(num_operators),
            num_marked: 0,
        }
    }

    /// Returns the number of operators covered by the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if the table covers no operators.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns `true` if the operator is stubborn.
    ///
    /// # Panics
    ///
    /// If the operator is not covered by the table.
    #[inline]
    pub fn is_stubborn(&self, op: OperatorId) -> bool {
        self.flags
            .get(op)
            .unwrap_or_else(|err| panic!("encountered invalid operator {}: {}", op, err))
    }

    /// Marks the operator as stubborn.
    ///
    /// Returns `true` if the operator was not stubborn before.
    ///
    /// # Panics
    ///
    /// If the operator is not covered by the table.
    #[inline]
    pub fn mark(&mut self, op: OperatorId) -> bool {
        let newly_marked = self
            .flags
            .insert(op)
            .unwrap_or_else(|err| panic!("encountered invalid operator {}: {}", op, err));
        if newly_marked {
            self.num_marked += 1;
        }
        newly_marked
    }

    /// Returns how many operators have been marked since the last clear.
    ///
    /// Since operators are never unmarked this always equals the number of
    /// stubborn operators.
    #[inline]
    pub fn num_marked(&self) -> usize {
        self.num_marked
    }

    /// Returns the stubborn operators in ascending order.
    pub fn iter_stubborn(&self) -> impl Iterator<Item = OperatorId> + '_ {
        self.flags.iter_ones()
    }

    /// Makes every operator non-stubborn.
    pub fn clear(&mut self) {
        self.flags.clear();
        self.num_marked = 0;
    }
}

/// Task-derived data shared by all stubborn set computations.
///
/// Built once per task and never mutated afterwards. Instances of a pruning
/// method for the same task share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct StubbornSetIndices {
    layout: AtomLayout,
    achievers: AtomOperatorIndex,
    preconditions: BoundedArray<OperatorId, Vec<Atom>>,
    effects: BoundedArray<OperatorId, Vec<Atom>>,
    goal: Vec<Atom>,
}

impl StubbornSetIndices {
    /// Computes the indices of the given task.
    pub fn new(task: &Task) -> Self {
        let mut goal = task.goal().to_vec();
        goal.sort_unstable();
        Self {
            layout: task.layout().clone(),
            achievers: AtomOperatorIndex::achievers(task),
            preconditions: task
                .operators()
                .map(|(_, operator)| sorted(operator.preconditions()))
                .collect(),
            effects: task
                .operators()
                .map(|(_, operator)| sorted(operator.effects()))
                .collect(),
            goal,
        }
    }

    /// Returns the atom layout of the task.
    #[inline]
    pub fn layout(&self) -> &AtomLayout {
        &self.layout
    }

    /// Returns the number of operators of the task.
    #[inline]
    pub fn num_operators(&self) -> usize {
        self.preconditions.len()
    }

    /// Returns the achiever index of the task.
    #[inline]
    pub fn achiever_index(&self) -> &AtomOperatorIndex {
        &self.achievers
    }

    /// Returns the operators that have the atom as an effect.
    #[inline]
    pub fn achievers(&self, atom: Atom) -> &[OperatorId] {
        self.achievers.get(atom)
    }

    /// Returns the preconditions of the operator in variable order.
    #[inline]
    pub fn preconditions(&self, op: OperatorId) -> &[Atom] {
        &self.preconditions[op]
    }

    /// Returns the effects of the operator in variable order.
    #[inline]
    pub fn effects(&self, op: OperatorId) -> &[Atom] {
        &self.effects[op]
    }

    /// Returns the goal atoms in variable order.
    #[inline]
    pub fn goal(&self) -> &[Atom] {
        &self.goal
    }

    /// Returns the first precondition of the operator that does not hold in the state.
    ///
    /// Returns `None` if the operator is applicable.
    #[inline]
    pub fn find_unsatisfied_precondition(&self, op: OperatorId, state: &State) -> Option<Atom> {
        find_unsatisfied_condition(self.preconditions(op), state)
    }
}

fn sorted(atoms: &[Atom]) -> Vec<Atom> {
    let mut atoms = atoms.to_vec();
    atoms.sort_unstable();
    atoms
}

/// A procedure that fills the stubborn table for a state.
///
/// The surrounding [`StubbornSets`] owns the shared indices and the table and
/// takes care of statistics and of filtering the applicable operators.
pub trait StubbornSetCore {
    /// Human readable name used in log output.
    fn name(&self) -> &'static str;

    /// One-time setup for the given task.
    fn initialize(&mut self, task: &Task, indices: &StubbornSetIndices);

    /// Marks the operators of the stubborn set of the state.
    ///
    /// The table is cleared before the call. The state must not be a goal
    /// state.
    fn compute_stubborn_set(
        &mut self,
        state: &State,
        indices: &StubbornSetIndices,
        stubborn: &mut StubbornTable,
    );
}

/// Stubborn set pruning around an exchangeable [`StubbornSetCore`].
///
/// Cloning an initialized instance shares the task-derived indices and gives
/// the clone its own stubborn table and working buffers, so every search
/// thread can own one.
#[derive(Debug, Clone)]
pub struct StubbornSets<C> {
    core: C,
    config: PruningConfig,
    indices: Option<Arc<StubbornSetIndices>>,
    stubborn: StubbornTable,
    statistics: PruningStatistics,
}

impl<C> StubbornSets<C>
where
    C: StubbornSetCore,
{
    /// Creates the pruning method with the given core.
    ///
    /// # Errors
    ///
    /// If the pruning configuration is invalid.
    pub fn new(core: C, config: PruningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            core,
            config,
            indices: None,
            stubborn: StubbornTable::default(),
            statistics: PruningStatistics::default(),
        })
    }

    /// Returns the core computing the stubborn sets.
    pub fn core(&self) -> &C {
        &self.core
    }

    /// Returns the stubborn table of the last computation.
    pub fn stubborn(&self) -> &StubbornTable {
        &self.stubborn
    }

    /// Returns the shared task-derived indices.
    ///
    /// # Panics
    ///
    /// If the pruning method has not been initialized.
    pub fn indices(&self) -> &Arc<StubbornSetIndices> {
        self.indices
            .as_ref()
            .expect("stubborn sets used before initialization")
    }

    /// Computes the stubborn set of a non-goal state and returns it.
    ///
    /// # Panics
    ///
    /// If the pruning method has not been initialized.
    pub fn compute_stubborn_set(&mut self, state: &State) -> &StubbornTable {
        let indices = Arc::clone(self.indices());
        self.stubborn.clear();
        self.core
            .compute_stubborn_set(state, &indices, &mut self.stubborn);
        &self.stubborn
    }

    /// Disables pruning if the pruning ratio is too low at the scheduled check.
    fn check_pruning_ratio(&mut self) {
        let min_ratio = self.config.min_required_pruning_ratio;
        if min_ratio <= 0.0
            || self.statistics.calls as usize != self.config.expansions_before_checking_pruning_ratio
        {
            return
        }
        let ratio = self.statistics.pruning_ratio();
        log::info!(
            target: targets::PRUNING,
            "pruning ratio after {} calls: {}",
            self.statistics.calls,
            ratio
        );
        if ratio < min_ratio {
            log::info!(
                target: targets::PRUNING,
                "pruning ratio is lower than minimum pruning ratio ({}), switching off pruning",
                min_ratio
            );
            self.statistics.disabled = true;
        }
    }
}

impl<C> PruningMethod for StubbornSets<C>
where
    C: StubbornSetCore,
{
    fn initialize(&mut self, task: &Task) {
        let indices = StubbornSetIndices::new(task);
        self.core.initialize(task, &indices);
        self.stubborn = StubbornTable::with_len(indices.num_operators());
        self.statistics = PruningStatistics::default();
        self.indices = Some(Arc::new(indices));
        log::info!(target: targets::PRUNING, "pruning method: {}", self.core.name());
    }

    fn prune_operators(&mut self, state: &State, operators: &mut Vec<OperatorId>) {
        if !self.statistics.disabled {
            self.check_pruning_ratio();
        }
        self.statistics.successors_before_pruning += operators.len() as u64;
        if !self.statistics.disabled {
            self.statistics.calls += 1;
            let stubborn = self.compute_stubborn_set(state);
            operators.retain(|&op| stubborn.is_stubborn(op));
        }
        self.statistics.successors_after_pruning += operators.len() as u64;
    }

    fn statistics(&self) -> PruningStatistics {
        self.statistics
    }
}
