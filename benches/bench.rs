use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BatchSize,
    BenchmarkId,
    Criterion,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};
use stubborn_sets::{
    config::{
        AtomCentricConfig,
        PruningConfig,
        SearchConfig,
    },
    pruning::{
        atom_centric::AtomSelectionStrategy,
        AtomCentricStubbornSets,
        NullPruning,
        PruningMethod,
    },
    search::UniformCostSearch,
    task::{
        parser::parse_task,
        State,
        Task,
    },
};

criterion_group!(bench_pruning, bench_compute_stubborn_set, bench_search);
criterion_main!(bench_pruning);

/// Returns the name and the parsed task of all task files found under the given path.
///
/// # Note
///
/// The tasks are returned alphabetically sorted by their file names.
fn collect_tasks_in_path<P>(path: P) -> Vec<(String, Task)>
where
    P: AsRef<Path>,
{
    let mut paths = fs::read_dir(path)
        .unwrap()
        .filter_map(|dir_entry| {
            let dir_entry = dir_entry.ok()?;
            let path = dir_entry.path();
            let is_task = dir_entry.file_type().ok()?.is_file()
                && path.extension().map(|ext| ext == "task").unwrap_or(false);
            is_task.then(|| path)
        })
        .collect::<Vec<PathBuf>>();
    paths.sort_by(|l_path, r_path| l_path.file_name().cmp(&r_path.file_name()));
    paths
        .into_iter()
        .map(|path| {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let task = parse_task(&fs::read_to_string(&path).unwrap()).unwrap();
            (name, task)
        })
        .collect()
}

/// Returns all states reachable from the initial state that are no goal states.
fn reachable_non_goal_states(task: &Task) -> Vec<State> {
    let mut seen = vec![task.initial_state().clone()];
    let mut next = 0;
    let mut applicable = Vec::new();
    while next < seen.len() {
        let state = seen[next].clone();
        next += 1;
        task.applicable_operators(&state, &mut applicable);
        for &op in &applicable {
            let successor = state.successor(task.operator(op));
            if !seen.contains(&successor) {
                seen.push(successor);
            }
        }
    }
    seen.retain(|state| !task.is_goal_state(state));
    seen
}

fn atom_centric(config: AtomCentricConfig) -> AtomCentricStubbornSets {
    AtomCentricStubbornSets::atom_centric(config, PruningConfig::default()).unwrap()
}

fn bench_compute_stubborn_set(c: &mut Criterion) {
    let mut g = c.benchmark_group("compute_stubborn_set");
    for (name, task) in collect_tasks_in_path("tasks/") {
        let states = reachable_non_goal_states(&task);
        for strategy in AtomSelectionStrategy::ALL.iter().copied() {
            for use_sibling_shortcut in [true, false] {
                let mut pruning = atom_centric(AtomCentricConfig {
                    use_sibling_shortcut,
                    atom_selection_strategy: strategy,
                });
                pruning.initialize(&task);
                let id = BenchmarkId::new(
                    &name,
                    format!("{}{}", strategy, if use_sibling_shortcut { "" } else { " (no shortcut)" }),
                );
                g.bench_function(id, |bencher| {
                    bencher.iter(|| {
                        for state in &states {
                            black_box(pruning.compute_stubborn_set(state).num_marked());
                        }
                    })
                });
            }
        }
    }
}

fn bench_search(c: &mut Criterion) {
    let mut g = c.benchmark_group("uniform_cost_search");
    g.sample_size(20);
    for (name, task) in collect_tasks_in_path("tasks/") {
        g.bench_function(BenchmarkId::new(&name, "no pruning"), |bencher| {
            bencher.iter_batched(
                NullPruning::default,
                |pruning| {
                    black_box(UniformCostSearch::new(&task, pruning, SearchConfig::default()).run())
                },
                BatchSize::SmallInput,
            )
        });
        g.bench_function(BenchmarkId::new(&name, "atom-centric"), |bencher| {
            bencher.iter_batched(
                || atom_centric(AtomCentricConfig::default()),
                |pruning| {
                    black_box(UniformCostSearch::new(&task, pruning, SearchConfig::default()).run())
                },
                BatchSize::SmallInput,
            )
        });
    }
}
