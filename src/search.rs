//! Uniform cost search with pluggable pruning of applicable operators.

use crate::{
    config::SearchConfig,
    logging::targets,
    pruning::{
        PruningMethod,
        PruningStatistics,
    },
    task::{
        Cost,
        OperatorId,
        State,
        Task,
    },
};
use core::{
    cmp::Reverse,
    fmt,
};
use std::collections::BinaryHeap;

/// A slightly faster hash map due to usage of `ahash` hasher.
type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

/// A sequence of operators leading from the initial state to a goal state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Plan {
    operators: Vec<OperatorId>,
    cost: Cost,
}

impl Plan {
    /// Returns the operators of the plan in application order.
    pub fn operators(&self) -> &[OperatorId] {
        &self.operators
    }

    /// Returns the number of operators of the plan.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns `true` if the initial state already is a goal state.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Returns the summed cost of all operators.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Returns `true` if the plan is applicable in the initial state and reaches the goal.
    pub fn is_valid_for(&self, task: &Task) -> bool {
        let mut state = task.initial_state().clone();
        for &op in &self.operators {
            let operator = task.operator(op);
            if !state.satisfies_all(operator.preconditions()) {
                return false
            }
            state = state.successor(operator);
        }
        task.is_goal_state(&state)
    }

    /// Returns a displayable version of the plan that shows operator names.
    pub fn display<'a>(&'a self, task: &'a Task) -> PlanDisplay<'a> {
        PlanDisplay { plan: self, task }
    }
}

/// Displays one operator name per line followed by the plan cost.
#[derive(Debug)]
pub struct PlanDisplay<'a> {
    plan: &'a Plan,
    task: &'a Task,
}

impl fmt::Display for PlanDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &op in self.plan.operators() {
            writeln!(f, "{}", self.task.operator(op).name())?;
        }
        write!(f, "; cost = {}", self.plan.cost())
    }
}

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An optimal plan has been found.
    Solved(Plan),
    /// The goal is unreachable.
    Unsolvable,
    /// The expansion limit was hit before the search finished.
    LimitReached,
}

impl SearchOutcome {
    /// Returns the plan if the search found one.
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Self::Solved(plan) => Some(plan),
            Self::Unsolvable | Self::LimitReached => None,
        }
    }
}

/// Counters of a search.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SearchStatistics {
    /// States whose successors have been generated.
    pub expanded: u64,
    /// Successor states generated, including duplicates.
    pub generated: u64,
    /// Distinct states seen.
    pub registered: u64,
    /// Open list entries skipped because a cheaper path had been found since.
    pub stale: u64,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "expanded {} state(s)", self.expanded)?;
        writeln!(f, "generated {} state(s)", self.generated)?;
        writeln!(f, "registered {} state(s)", self.registered)?;
        write!(f, "skipped {} stale open list entries", self.stale)
    }
}

#[derive(Debug)]
struct SearchNode {
    state: State,
    g: Cost,
    parent: Option<(usize, OperatorId)>,
    closed: bool,
}

/// Dijkstra search over the state space of a task.
///
/// The goal test happens when a state is expanded, so the pruning method is
/// only ever asked about non-goal states.
#[derive(Debug)]
pub struct UniformCostSearch<'a, P> {
    task: &'a Task,
    pruning: P,
    config: SearchConfig,
    statistics: SearchStatistics,
}

impl<'a, P> UniformCostSearch<'a, P>
where
    P: PruningMethod,
{
    /// Creates the search and initializes the pruning method for the task.
    pub fn new(task: &'a Task, mut pruning: P, config: SearchConfig) -> Self {
        pruning.initialize(task);
        Self {
            task,
            pruning,
            config,
            statistics: SearchStatistics::default(),
        }
    }

    /// Returns the counters of the last run.
    pub fn statistics(&self) -> SearchStatistics {
        self.statistics
    }

    /// Returns the counters of the pruning method.
    pub fn pruning_statistics(&self) -> PruningStatistics {
        self.pruning.statistics()
    }

    /// Returns the pruning method.
    pub fn pruning(&self) -> &P {
        &self.pruning
    }

    /// Searches for a cheapest plan.
    pub fn run(&mut self) -> SearchOutcome {
        self.statistics = SearchStatistics::default();
        let outcome = self.search();
        match &outcome {
            SearchOutcome::Solved(plan) => {
                log::info!(
                    target: targets::SEARCH,
                    "solution found: {} operator(s), cost {}",
                    plan.len(),
                    plan.cost()
                );
            }
            SearchOutcome::Unsolvable => log::info!(target: targets::SEARCH, "task is unsolvable"),
            SearchOutcome::LimitReached => {
                log::info!(target: targets::SEARCH, "expansion limit reached")
            }
        }
        log::info!(
            target: targets::SEARCH,
            "expanded {} state(s), generated {} state(s)",
            self.statistics.expanded,
            self.statistics.generated
        );
        outcome
    }

    fn search(&mut self) -> SearchOutcome {
        let task = self.task;
        let mut nodes = vec![SearchNode {
            state: task.initial_state().clone(),
            g: 0,
            parent: None,
            closed: false,
        }];
        let mut ids = HashMap::default();
        ids.insert(task.initial_state().clone(), 0);
        self.statistics.registered = 1;
        let mut open = BinaryHeap::new();
        open.push(Reverse((0, 0)));
        let mut applicable = Vec::new();
        let mut last_g = None;

        while let Some(Reverse((g, id))) = open.pop() {
            let node = &mut nodes[id];
            if node.closed || g > node.g {
                self.statistics.stale += 1;
                continue
            }
            node.closed = true;
            if last_g.map_or(true, |last| g > last) {
                log::debug!(
                    target: targets::SEARCH,
                    "g = {} [{} expanded, {} generated]",
                    g,
                    self.statistics.expanded,
                    self.statistics.generated
                );
                last_g = Some(g);
            }
            if task.is_goal_state(&node.state) {
                return SearchOutcome::Solved(extract_plan(&nodes, id, g))
            }
            if let Some(limit) = self.config.max_expansions {
                if self.statistics.expanded as usize >= limit {
                    return SearchOutcome::LimitReached
                }
            }
            self.statistics.expanded += 1;

            let state = node.state.clone();
            task.applicable_operators(&state, &mut applicable);
            self.pruning.prune_operators(&state, &mut applicable);
            for &op in &applicable {
                let operator = task.operator(op);
                let successor = state.successor(operator);
                let successor_g = g + operator.cost();
                self.statistics.generated += 1;
                match ids.get(&successor) {
                    Some(&successor_id) => {
                        let successor_node: &mut SearchNode = &mut nodes[successor_id];
                        if !successor_node.closed && successor_g < successor_node.g {
                            successor_node.g = successor_g;
                            successor_node.parent = Some((id, op));
                            open.push(Reverse((successor_g, successor_id)));
                        }
                    }
                    None => {
                        let successor_id = nodes.len();
                        ids.insert(successor.clone(), successor_id);
                        nodes.push(SearchNode {
                            state: successor,
                            g: successor_g,
                            parent: Some((id, op)),
                            closed: false,
                        });
                        self.statistics.registered += 1;
                        open.push(Reverse((successor_g, successor_id)));
                    }
                }
            }
        }
        SearchOutcome::Unsolvable
    }
}

fn extract_plan(nodes: &[SearchNode], goal: usize, cost: Cost) -> Plan {
    let mut operators = Vec::new();
    let mut current = goal;
    while let Some((parent, op)) = nodes[current].parent {
        operators.push(op);
        current = parent;
    }
    operators.reverse();
    Plan { operators, cost }
}
