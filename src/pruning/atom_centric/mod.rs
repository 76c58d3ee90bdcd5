//! Atom-centric computation of strong stubborn sets.
//!
//! Instead of reasoning about operators directly the computation keeps two
//! kinds of obligations on atoms. A producer obligation on an atom requires
//! all of its achievers to be stubborn, a consumer obligation requires all
//! operators with the atom as a precondition to be stubborn. Both kinds are
//! recorded at most once per atom and state, which bounds the work of one
//! computation by the number of atoms plus a constant amount per stubborn
//! operator.

mod consumers;
mod marking;
mod selector;

pub use self::{
    consumers::compute_consumers,
    marking::{
        MarkingStore,
        QueueStats,
        VariableMark,
        Worklist,
    },
    selector::{
        AtomSelectionStrategy,
        SelectionContext,
    },
};
use super::{
    AtomOperatorIndex,
    StubbornSetCore,
    StubbornSetIndices,
    StubbornSets,
    StubbornTable,
};
use crate::{
    config::{
        AtomCentricConfig,
        ConfigError,
        PruningConfig,
    },
    logging::targets,
    task::{
        Atom,
        OperatorId,
        State,
        Task,
    },
};
use std::sync::Arc;

/// Stubborn set pruning with the atom-centric computation.
pub type AtomCentricStubbornSets = StubbornSets<AtomCentric>;

impl StubbornSets<AtomCentric> {
    /// Creates atom-centric stubborn set pruning.
    ///
    /// # Errors
    ///
    /// If the pruning configuration is invalid.
    pub fn atom_centric(config: AtomCentricConfig, pruning: PruningConfig) -> Result<Self, ConfigError> {
        Self::new(AtomCentric::new(config), pruning)
    }
}

/// The atom-centric stubborn set computation.
///
/// Owns the marks and queues of one computation. Clones share the consumer
/// index and get their own marks and queues.
#[derive(Debug, Clone)]
pub struct AtomCentric {
    config: AtomCentricConfig,
    consumers: Arc<AtomOperatorIndex>,
    marks: MarkingStore,
}

impl AtomCentric {
    /// Creates the computation. Buffers are allocated on initialization.
    pub fn new(config: AtomCentricConfig) -> Self {
        Self {
            config,
            consumers: Arc::default(),
            marks: MarkingStore::default(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AtomCentricConfig {
        &self.config
    }

    /// Returns the queue counters of the last computation.
    pub fn queue_stats(&self) -> QueueStats {
        self.marks.stats()
    }

    fn select(
        &self,
        candidates: &[Atom],
        state: &State,
        indices: &StubbornSetIndices,
        stubborn: &StubbornTable,
    ) -> Option<Atom> {
        let context = SelectionContext {
            achievers: indices.achiever_index(),
            marks: &self.marks,
            stubborn,
        };
        self.config
            .atom_selection_strategy
            .select(candidates, state, context)
    }

    /// Makes the operator stubborn and enqueues what it requires.
    fn handle_operator(
        &mut self,
        op: OperatorId,
        state: &State,
        indices: &StubbornSetIndices,
        stubborn: &mut StubbornTable,
    ) {
        if !stubborn.mark(op) {
            return
        }
        if indices.find_unsatisfied_precondition(op, state).is_none() {
            self.enqueue_interferers(op, indices);
        } else {
            self.enqueue_necessary_enabling_set(op, state, indices, stubborn);
        }
    }

    /// Enqueues the operators that interfere with an applicable operator.
    fn enqueue_interferers(&mut self, op: OperatorId, indices: &StubbornSetIndices) {
        for &precondition in indices.preconditions(op) {
            self.marks.enqueue_sibling_producers(precondition);
        }
        for &effect in indices.effects(op) {
            self.marks.enqueue_sibling_producers(effect);
            self.marks.enqueue_sibling_consumers(effect);
        }
    }

    /// Resets the marks and enqueues the achievers of one unsatisfied goal atom.
    fn start(&mut self, state: &State, indices: &StubbornSetIndices, stubborn: &StubbornTable) {
        self.marks.reset();
        // The marks are empty, so not even quick skip can come back empty-handed.
        match self.select(indices.goal(), state, indices, stubborn) {
            Some(atom) => self.marks.enqueue_producers(atom),
            None => debug_assert!(false, "no goal atom selected in state {}", state),
        }
    }

    /// Handles the operators of the next obligation, producers first.
    ///
    /// Returns `false` once both queues are empty.
    fn step(&mut self, state: &State, indices: &StubbornSetIndices, stubborn: &mut StubbornTable) -> bool {
        if let Some(atom) = self.marks.pop_producer() {
            for &op in indices.achievers(atom) {
                self.handle_operator(op, state, indices, stubborn);
            }
        } else if let Some(atom) = self.marks.pop_consumer() {
            let consumers = Arc::clone(&self.consumers);
            for &op in consumers.get(atom) {
                self.handle_operator(op, state, indices, stubborn);
            }
        } else {
            return false
        }
        true
    }

    /// Enqueues the achievers of one unsatisfied precondition of an inapplicable operator.
    fn enqueue_necessary_enabling_set(
        &mut self,
        op: OperatorId,
        state: &State,
        indices: &StubbornSetIndices,
        stubborn: &StubbornTable,
    ) {
        if let Some(atom) = self.select(indices.preconditions(op), state, indices, stubborn) {
            self.marks.enqueue_producers(atom);
        }
    }
}

impl StubbornSetCore for AtomCentric {
    fn name(&self) -> &'static str {
        "atom-centric stubborn sets"
    }

    fn initialize(&mut self, task: &Task, indices: &StubbornSetIndices) {
        self.consumers = Arc::new(compute_consumers(task));
        self.marks = MarkingStore::new(indices.layout(), self.config.use_sibling_shortcut);
        log::info!(
            target: targets::PRUNING,
            "atom selection strategy: {}, sibling shortcut: {}",
            self.config.atom_selection_strategy,
            self.config.use_sibling_shortcut
        );
    }

    fn compute_stubborn_set(
        &mut self,
        state: &State,
        indices: &StubbornSetIndices,
        stubborn: &mut StubbornTable,
    ) {
        self.start(state, indices, stubborn);
        while self.step(state, indices, stubborn) {}
        debug_assert!(self.marks.is_idle());
        if log::log_enabled!(target: targets::PRUNING, log::Level::Trace) {
            let stats = self.marks.stats();
            log::trace!(
                target: targets::PRUNING,
                "stubborn set of {} contains {} operators [{} producer pushes, {} consumer pushes]",
                state,
                stubborn.num_marked(),
                stats.producer_pushes,
                stats.consumer_pushes
            );
        }
    }
}
