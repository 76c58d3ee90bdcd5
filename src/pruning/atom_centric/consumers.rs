use crate::{
    pruning::AtomOperatorIndex,
    task::Task,
};

/// Builds the index of consumers: for every atom, the operators that have it as a precondition.
///
/// Operators appear in enumeration order.
pub fn compute_consumers(task: &Task) -> AtomOperatorIndex {
    let mut consumers = AtomOperatorIndex::new(task.layout());
    for (id, operator) in task.operators() {
        for &precondition in operator.preconditions() {
            consumers.register(precondition, id);
        }
    }
    consumers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{
        Atom,
        TaskBuilder,
    };

    #[test]
    fn consumers_follow_operator_order() {
        let mut builder = TaskBuilder::default();
        let vars = builder.new_variables(vec![2, 3]);
        builder.set_initial_state(vec![0, 0]);
        builder.add_goal(Atom::new(vars[1], 2));
        let a = builder.add_operator(
            "a",
            1,
            vec![Atom::new(vars[0], 0), Atom::new(vars[1], 0)],
            vec![Atom::new(vars[1], 1)],
        );
        let b = builder.add_operator("b", 1, vec![Atom::new(vars[1], 1)], vec![Atom::new(vars[1], 2)]);
        let c = builder.add_operator("c", 1, vec![Atom::new(vars[0], 0)], vec![Atom::new(vars[0], 1)]);
        let task = builder.finalize().unwrap();
        let consumers = compute_consumers(&task);
        assert_eq!(consumers.get(Atom::new(vars[0], 0)), &[a, c]);
        assert_eq!(consumers.get(Atom::new(vars[1], 0)), &[a]);
        assert_eq!(consumers.get(Atom::new(vars[1], 1)), &[b]);
        assert!(consumers.get(Atom::new(vars[0], 1)).is_empty());
        assert!(consumers.get(Atom::new(vars[1], 2)).is_empty());
    }
}
