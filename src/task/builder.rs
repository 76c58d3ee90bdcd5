use super::{
    Atom,
    AtomLayout,
    Cost,
    Operator,
    OperatorId,
    State,
    Task,
    Variable,
};
use crate::logging::targets;
use core::fmt;

/// Where an invalid atom of a task was found.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AtomContext {
    Precondition(OperatorId),
    Effect(OperatorId),
    Goal,
}

impl fmt::Display for AtomContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition(op) => write!(f, "precondition of {}", op),
            Self::Effect(op) => write!(f, "effect of {}", op),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// Errors that may be encountered when building a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A variable was declared with an empty domain.
    EmptyDomain(Variable),
    /// An atom names an unknown variable or a value outside of its domain.
    AtomOutOfRange { context: AtomContext, atom: Atom },
    /// Two atoms of the same sequence constrain the same variable.
    DuplicateVariable { context: AtomContext, var: Variable },
    /// The task has no initial state.
    MissingInitialState,
    /// The initial state does not assign exactly one value per variable.
    InitialStateLength { expected: usize, found: usize },
    /// The initial state assigns a value outside of the variable domain.
    InitialValueOutOfRange { var: Variable, value: u32 },
    /// The goal has no atoms.
    EmptyGoal,
    /// More variables, atoms or operators than the identifiers can address.
    TooManyEntities,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain(var) => write!(f, "variable {} has an empty domain", var),
            Self::AtomOutOfRange { context, atom } => {
                write!(f, "atom {} of the {} is out of range", atom, context)
            }
            Self::DuplicateVariable { context, var } => {
                write!(f, "variable {} occurs twice in the {}", var, context)
            }
            Self::MissingInitialState => write!(f, "the task has no initial state"),
            Self::InitialStateLength { expected, found } => {
                write!(
                    f,
                    "the initial state has {} values but the task has {} variables",
                    found, expected
                )
            }
            Self::InitialValueOutOfRange { var, value } => {
                write!(f, "initial value {} of variable {} is out of range", value, var)
            }
            Self::EmptyGoal => write!(f, "the goal has no atoms"),
            Self::TooManyEntities => write!(f, "too many variables, atoms or operators"),
        }
    }
}

impl std::error::Error for TaskError {}

/// Collects the parts of a task and validates them in [`TaskBuilder::finalize`].
#[derive(Debug, Default, Clone)]
pub struct TaskBuilder {
    domain_sizes: Vec<u32>,
    operators: Vec<Operator>,
    initial_state: Option<Vec<u32>>,
    goal: Vec<Atom>,
}

impl TaskBuilder {
    /// Registers a new variable with the given domain size and returns it.
    ///
    /// # Panics
    ///
    /// If there are too many variables in use after this operation.
    pub fn new_variable(&mut self, domain_size: u32) -> Variable {
        let var = Variable::from_index(self.domain_sizes.len()).expect("registered too many variables");
        self.domain_sizes.push(domain_size);
        var
    }

    /// Registers one variable per given domain size and returns them in order.
    pub fn new_variables<I>(&mut self, domain_sizes: I) -> Vec<Variable>
    where
        I: IntoIterator<Item = u32>,
    {
        domain_sizes
            .into_iter()
            .map(|size| self.new_variable(size))
            .collect()
    }

    /// Adds an operator and returns its identifier.
    ///
    /// # Panics
    ///
    /// If there are too many operators in use after this operation.
    pub fn add_operator<N>(
        &mut self,
        name: N,
        cost: Cost,
        preconditions: Vec<Atom>,
        effects: Vec<Atom>,
    ) -> OperatorId
    where
        N: Into<String>,
    {
        let id = OperatorId::from_index(self.operators.len()).expect("registered too many operators");
        self.operators
            .push(Operator::new(name, cost, preconditions, effects));
        id
    }

    /// Sets the value of every variable in the initial state.
    pub fn set_initial_state(&mut self, values: Vec<u32>) {
        self.initial_state = Some(values);
    }

    /// Adds an atom to the goal.
    pub fn add_goal(&mut self, atom: Atom) {
        self.goal.push(atom);
    }

    /// Validates the collected parts and returns the task.
    ///
    /// # Errors
    ///
    /// If any part of the task is inconsistent, see [`TaskError`].
    pub fn finalize(self) -> Result<Task, TaskError> {
        if self.domain_sizes.len() > Variable::MAX_LEN {
            return Err(TaskError::TooManyEntities)
        }
        let layout = AtomLayout::new(self.domain_sizes.iter().copied()).ok_or(TaskError::TooManyEntities)?;
        if let Some(var) = layout.variables().find(|&var| layout.domain_size(var) == 0) {
            return Err(TaskError::EmptyDomain(var))
        }
        let initial_state = self.initial_state.ok_or(TaskError::MissingInitialState)?;
        if initial_state.len() != layout.num_variables() {
            return Err(TaskError::InitialStateLength {
                expected: layout.num_variables(),
                found: initial_state.len(),
            })
        }
        for (var, &value) in layout.variables().zip(&initial_state) {
            if value >= layout.domain_size(var) {
                return Err(TaskError::InitialValueOutOfRange { var, value })
            }
        }
        for (n, operator) in self.operators.iter().enumerate() {
            let id = OperatorId::from_index(n).ok_or(TaskError::TooManyEntities)?;
            check_atoms(&layout, operator.preconditions(), AtomContext::Precondition(id))?;
            check_atoms(&layout, operator.effects(), AtomContext::Effect(id))?;
        }
        let mut goal = self.goal;
        if goal.is_empty() {
            return Err(TaskError::EmptyGoal)
        }
        goal.sort_unstable();
        check_atoms(&layout, &goal, AtomContext::Goal)?;
        log::debug!(
            target: targets::TASK,
            "built task with {} variables, {} atoms, {} operators",
            layout.num_variables(),
            layout.num_atoms(),
            self.operators.len(),
        );
        Ok(Task {
            layout,
            operators: self.operators.into_iter().collect(),
            initial_state: State::from(initial_state),
            goal,
        })
    }
}

/// Checks that all atoms of a sorted sequence are in range and name distinct variables.
fn check_atoms(layout: &AtomLayout, atoms: &[Atom], context: AtomContext) -> Result<(), TaskError> {
    if let Some(&atom) = atoms.iter().find(|&&atom| !layout.contains(atom)) {
        return Err(TaskError::AtomOutOfRange { context, atom })
    }
    if let Some(pair) = atoms.windows(2).find(|pair| pair[0].var == pair[1].var) {
        return Err(TaskError::DuplicateVariable {
            context,
            var: pair[0].var,
        })
    }
    Ok(())
}
