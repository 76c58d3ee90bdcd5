use crate::task::{
    Atom,
    AtomIndex,
    AtomLayout,
    Variable,
};
use bounded::{
    BoundedArray,
    BoundedBitmap,
    BoundedStack,
};

/// How far the siblings of a variable have been enqueued in the current round.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VariableMark {
    /// No sibling expansion has happened for the variable.
    Unmarked,
    /// Every value except the given one has been enqueued.
    PendingExcept(u32),
    /// Every value has been enqueued.
    FullyMarked,
}

/// Marks and LIFO queue of one kind of obligation (producers or consumers).
///
/// An atom is pushed at most once per round: its mark is set exactly when it
/// is pushed and stays set until [`Worklist::reset`]. The queue capacity is
/// the number of atoms, which a round can never exceed.
///
/// Every push is also appended to a log of the round, so repeated pushes
/// can be counted independently of the marks.
#[derive(Debug, Default, Clone)]
pub struct Worklist {
    marked: BoundedBitmap<AtomIndex>,
    queue: BoundedStack<Atom>,
    variable_marks: Option<BoundedArray<Variable, VariableMark>>,
    pushed: Vec<Atom>,
}

impl Worklist {
    /// Creates the worklist for the atoms of the layout.
    ///
    /// Variable marks are only allocated if the sibling shortcut is used.
    pub fn new(layout: &AtomLayout, use_sibling_shortcut: bool) -> Self {
        Self {
            marked: BoundedBitmap::with_len(layout.num_atoms()),
            queue: BoundedStack::with_capacity(layout.num_atoms()),
            variable_marks: use_sibling_shortcut.then(|| {
                BoundedArray::with_len(layout.num_variables(), |_| VariableMark::Unmarked)
            }),
            pushed: Vec::with_capacity(layout.num_atoms()),
        }
    }

    /// Clears all marks and the queue.
    pub fn reset(&mut self) {
        self.marked.clear();
        self.queue.clear();
        if let Some(marks) = &mut self.variable_marks {
            marks.fill(VariableMark::Unmarked);
        }
        self.pushed.clear();
    }

    /// Returns `true` if the atom has been pushed in the current round.
    #[inline]
    pub fn is_marked(&self, layout: &AtomLayout, atom: Atom) -> bool {
        self.marked
            .get(layout.index(atom))
            .unwrap_or_else(|err| panic!("encountered invalid atom {}: {}", atom, err))
    }

    /// Marks and pushes the atom unless it has been pushed before in this round.
    #[inline]
    pub fn enqueue(&mut self, layout: &AtomLayout, atom: Atom) {
        let newly_marked = self
            .marked
            .insert(layout.index(atom))
            .unwrap_or_else(|err| panic!("encountered invalid atom {}: {}", atom, err));
        if newly_marked {
            self.push(atom);
        }
    }

    #[inline]
    fn push(&mut self, atom: Atom) {
        self.queue.push(atom);
        self.pushed.push(atom);
    }

    /// Makes sure every other value of the atom's variable gets enqueued.
    ///
    /// With variable marks the first call for a variable enqueues all values
    /// but the given one and remembers it as pending. A later call with a
    /// different value enqueues the pending value and completes the variable.
    /// Any other call is a no-op. Without variable marks all siblings are
    /// enqueued on every call.
    pub fn enqueue_siblings(&mut self, layout: &AtomLayout, atom: Atom) {
        let mark = self
            .variable_marks
            .as_ref()
            .map(|marks| marks[atom.var])
            .unwrap_or(VariableMark::Unmarked);
        match mark {
            VariableMark::Unmarked => {
                for sibling in layout.siblings(atom) {
                    self.enqueue(layout, sibling);
                }
                self.set_variable_mark(atom.var, VariableMark::PendingExcept(atom.value));
            }
            VariableMark::PendingExcept(pending) if pending != atom.value => {
                self.enqueue(layout, Atom::new(atom.var, pending));
                self.set_variable_mark(atom.var, VariableMark::FullyMarked);
            }
            VariableMark::PendingExcept(_) | VariableMark::FullyMarked => (),
        }
    }

    fn set_variable_mark(&mut self, var: Variable, mark: VariableMark) {
        if let Some(marks) = &mut self.variable_marks {
            marks[var] = mark;
        }
    }

    /// Returns the variable mark, or `None` if the shortcut is not used.
    #[cfg(test)]
    pub fn variable_mark(&self, var: Variable) -> Option<VariableMark> {
        self.variable_marks.as_ref().map(|marks| marks[var])
    }

    /// Pops the most recently pushed atom.
    #[inline]
    pub fn pop(&mut self) -> Option<Atom> {
        self.queue.pop()
    }

    /// Returns `true` if no atom is waiting in the queue.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the atoms pushed in the current round in push order.
    #[cfg(test)]
    pub fn pushed(&self) -> &[Atom] {
        &self.pushed
    }

    /// Returns the number of pushes in the current round.
    pub fn pushes(&self) -> usize {
        self.pushed.len()
    }

    /// Returns the number of pushes of atoms that had been pushed before in
    /// the current round.
    pub fn repeated_pushes(&self, layout: &AtomLayout) -> usize {
        let mut seen = BoundedBitmap::<AtomIndex>::with_len(layout.num_atoms());
        self.pushed
            .iter()
            .filter(|&&atom| matches!(seen.insert(layout.index(atom)), Ok(false)))
            .count()
    }

    /// Returns the number of marked atoms in the current round.
    #[cfg(test)]
    pub fn num_marked(&self) -> usize {
        self.marked.count_ones()
    }
}

/// Push counters of the last round, taken from the push logs of both queues.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct QueueStats {
    pub producer_pushes: usize,
    /// Producer pushes of an atom that was already pushed in the round.
    pub producer_repeats: usize,
    pub consumer_pushes: usize,
    /// Consumer pushes of an atom that was already pushed in the round.
    pub consumer_repeats: usize,
}

/// Producer and consumer obligations of one stubborn set computation.
#[derive(Debug, Default, Clone)]
pub struct MarkingStore {
    layout: AtomLayout,
    producers: Worklist,
    consumers: Worklist,
}

impl MarkingStore {
    /// Allocates marks and queues sized by the variable domains of the layout.
    pub fn new(layout: &AtomLayout, use_sibling_shortcut: bool) -> Self {
        Self {
            layout: layout.clone(),
            producers: Worklist::new(layout, use_sibling_shortcut),
            consumers: Worklist::new(layout, use_sibling_shortcut),
        }
    }

    /// Clears all marks and queues for the next round.
    pub fn reset(&mut self) {
        self.producers.reset();
        self.consumers.reset();
    }

    /// Enqueues the achievers of the atom unless already done this round.
    #[inline]
    pub fn enqueue_producers(&mut self, atom: Atom) {
        self.producers.enqueue(&self.layout, atom);
    }

    /// Enqueues the consumers of the atom unless already done this round.
    #[inline]
    pub fn enqueue_consumers(&mut self, atom: Atom) {
        self.consumers.enqueue(&self.layout, atom);
    }

    /// Enqueues the achievers of every other value of the atom's variable.
    #[inline]
    pub fn enqueue_sibling_producers(&mut self, atom: Atom) {
        self.producers.enqueue_siblings(&self.layout, atom);
    }

    /// Enqueues the consumers of every other value of the atom's variable.
    #[inline]
    pub fn enqueue_sibling_consumers(&mut self, atom: Atom) {
        self.consumers.enqueue_siblings(&self.layout, atom);
    }

    /// Returns `true` if the achievers of the atom have been enqueued this round.
    #[inline]
    pub fn is_producer_marked(&self, atom: Atom) -> bool {
        self.producers.is_marked(&self.layout, atom)
    }

    /// Returns `true` if the consumers of the atom have been enqueued this round.
    #[cfg(test)]
    pub fn is_consumer_marked(&self, atom: Atom) -> bool {
        self.consumers.is_marked(&self.layout, atom)
    }

    /// Pops the next producer obligation.
    #[inline]
    pub fn pop_producer(&mut self) -> Option<Atom> {
        self.producers.pop()
    }

    /// Pops the next consumer obligation.
    #[inline]
    pub fn pop_consumer(&mut self) -> Option<Atom> {
        self.consumers.pop()
    }

    /// Returns `true` if both queues are empty.
    pub fn is_idle(&self) -> bool {
        self.producers.is_empty() && self.consumers.is_empty()
    }

    /// Returns the producer worklist.
    #[cfg(test)]
    pub fn producers(&self) -> &Worklist {
        &self.producers
    }

    /// Returns the counters of the current round.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            producer_pushes: self.producers.pushes(),
            producer_repeats: self.producers.repeated_pushes(&self.layout),
            consumer_pushes: self.consumers.pushes(),
            consumer_repeats: self.consumers.repeated_pushes(&self.layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: usize) -> Variable {
        Variable::from_index(index).unwrap()
    }

    fn drain(worklist: &mut Worklist) -> Vec<Atom> {
        let mut atoms = Vec::new();
        while let Some(atom) = worklist.pop() {
            atoms.push(atom);
        }
        atoms.sort();
        atoms
    }

    #[test]
    fn enqueue_is_idempotent() {
        let layout = AtomLayout::new(vec![3]).unwrap();
        let mut store = MarkingStore::new(&layout, true);
        let atom = Atom::new(var(0), 1);
        store.enqueue_producers(atom);
        store.enqueue_producers(atom);
        assert!(store.is_producer_marked(atom));
        assert!(!store.is_consumer_marked(atom));
        assert_eq!(store.pop_producer(), Some(atom));
        assert_eq!(store.pop_producer(), None);
        // Popping does not unmark within the round.
        store.enqueue_producers(atom);
        assert_eq!(store.pop_producer(), None);
        assert!(store.is_idle());
    }

    #[test]
    fn queues_are_lifo() {
        let layout = AtomLayout::new(vec![3]).unwrap();
        let mut store = MarkingStore::new(&layout, false);
        store.enqueue_consumers(Atom::new(var(0), 0));
        store.enqueue_consumers(Atom::new(var(0), 2));
        assert_eq!(store.pop_consumer(), Some(Atom::new(var(0), 2)));
        assert_eq!(store.pop_consumer(), Some(Atom::new(var(0), 0)));
    }

    #[test]
    fn shortcut_walks_through_the_tri_state() {
        let layout = AtomLayout::new(vec![4]).unwrap();
        let mut worklist = Worklist::new(&layout, true);
        let v = var(0);
        assert_eq!(worklist.variable_mark(v), Some(VariableMark::Unmarked));

        worklist.enqueue_siblings(&layout, Atom::new(v, 1));
        assert_eq!(worklist.variable_mark(v), Some(VariableMark::PendingExcept(1)));
        assert_eq!(
            drain(&mut worklist),
            vec![Atom::new(v, 0), Atom::new(v, 2), Atom::new(v, 3)]
        );

        // Same value again: nothing new.
        worklist.enqueue_siblings(&layout, Atom::new(v, 1));
        assert!(worklist.is_empty());
        assert_eq!(worklist.variable_mark(v), Some(VariableMark::PendingExcept(1)));

        // Different value: only the pending one is missing.
        worklist.enqueue_siblings(&layout, Atom::new(v, 3));
        assert_eq!(worklist.variable_mark(v), Some(VariableMark::FullyMarked));
        assert_eq!(drain(&mut worklist), vec![Atom::new(v, 1)]);

        worklist.enqueue_siblings(&layout, Atom::new(v, 0));
        assert!(worklist.is_empty());
        assert_eq!(worklist.pushes(), 4);
        assert_eq!(worklist.num_marked(), 4);
        assert_eq!(worklist.repeated_pushes(&layout), 0);
    }

    #[test]
    fn without_shortcut_siblings_are_enqueued_every_call() {
        let layout = AtomLayout::new(vec![3]).unwrap();
        let mut worklist = Worklist::new(&layout, false);
        let v = var(0);
        assert_eq!(worklist.variable_mark(v), None);
        worklist.enqueue_siblings(&layout, Atom::new(v, 0));
        assert_eq!(drain(&mut worklist), vec![Atom::new(v, 1), Atom::new(v, 2)]);
        worklist.enqueue_siblings(&layout, Atom::new(v, 2));
        // Only the not yet marked value is actually pushed.
        assert_eq!(drain(&mut worklist), vec![Atom::new(v, 0)]);
        assert_eq!(worklist.pushed(), &[Atom::new(v, 1), Atom::new(v, 2), Atom::new(v, 0)]);
        assert_eq!(worklist.repeated_pushes(&layout), 0);
    }

    #[test]
    fn push_log_counts_repeated_pushes() {
        let layout = AtomLayout::new(vec![3, 2]).unwrap();
        let mut worklist = Worklist::new(&layout, false);
        let atom = Atom::new(var(1), 1);
        worklist.enqueue(&layout, atom);
        assert_eq!(worklist.pop(), Some(atom));
        // Bypass the marks to put the popped atom back on the queue.
        worklist.push(atom);
        worklist.push(Atom::new(var(0), 2));
        worklist.push(atom);
        assert_eq!(worklist.pushes(), 4);
        assert_eq!(worklist.repeated_pushes(&layout), 2);
        worklist.reset();
        assert_eq!(worklist.repeated_pushes(&layout), 0);
        assert!(worklist.pushed().is_empty());
    }

    #[test]
    fn both_modes_mark_the_same_atoms() {
        let layout = AtomLayout::new(vec![3, 2, 4]).unwrap();
        let calls = [
            Atom::new(var(0), 1),
            Atom::new(var(2), 3),
            Atom::new(var(0), 1),
            Atom::new(var(2), 0),
            Atom::new(var(1), 1),
        ];
        let mut with_shortcut = Worklist::new(&layout, true);
        let mut without_shortcut = Worklist::new(&layout, false);
        for &atom in &calls {
            with_shortcut.enqueue_siblings(&layout, atom);
            without_shortcut.enqueue_siblings(&layout, atom);
        }
        assert_eq!(drain(&mut with_shortcut), drain(&mut without_shortcut));
    }

    #[test]
    fn reset_clears_marks_and_queues() {
        let layout = AtomLayout::new(vec![2, 2]).unwrap();
        let mut store = MarkingStore::new(&layout, true);
        store.enqueue_sibling_producers(Atom::new(var(0), 0));
        store.enqueue_sibling_consumers(Atom::new(var(1), 1));
        assert_eq!(
            store.stats(),
            QueueStats {
                producer_pushes: 1,
                producer_repeats: 0,
                consumer_pushes: 1,
                consumer_repeats: 0,
            }
        );
        store.reset();
        assert!(store.is_idle());
        assert_eq!(store.stats(), QueueStats::default());
        assert_eq!(
            store.producers().variable_mark(var(0)),
            Some(VariableMark::Unmarked)
        );
        assert!(!store.is_producer_marked(Atom::new(var(0), 1)));
    }
}
