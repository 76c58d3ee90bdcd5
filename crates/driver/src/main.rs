use std::{
    error::Error,
    fmt,
    fs,
    path::PathBuf,
    process,
    str::FromStr,
};
use structopt::StructOpt;
use stubborn_sets::{
    config::{
        AtomCentricConfig,
        PruningConfig,
        SearchConfig,
    },
    logging::targets,
    pruning::{
        atom_centric::AtomSelectionStrategy,
        AtomCentricStubbornSets,
        NullPruning,
        PruningMethod,
    },
    search::{
        SearchOutcome,
        UniformCostSearch,
    },
    task::{
        parser::parse_task,
        Task,
    },
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PruningKind {
    None,
    AtomCentric,
}

impl FromStr for PruningKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "atom-centric" => Ok(Self::AtomCentric),
            unknown => Err(format!("unknown pruning method `{}`, expected none or atom-centric", unknown)),
        }
    }
}

impl fmt::Display for PruningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::AtomCentric => write!(f, "atom-centric"),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Finds optimal plans with uniform cost search and optional stubborn set pruning.")]
struct Opt {
    #[structopt(name = "input .task file", parse(from_os_str))]
    input: PathBuf,
    /// Pruning method applied to the applicable operators: none or atom-centric.
    #[structopt(long, default_value = "atom-centric")]
    pruning: PruningKind,
    /// One of fast_downward, quick_skip, static_small or dynamic_small.
    #[structopt(long, default_value = "quick_skip")]
    atom_selection_strategy: AtomSelectionStrategy,
    /// Disables the variable-based marking of sibling atoms.
    #[structopt(long)]
    no_sibling_shortcut: bool,
    /// Switch pruning off if it removes a smaller fraction of operators.
    #[structopt(long, default_value = "0.0")]
    min_required_pruning_ratio: f64,
    /// Number of pruned states after which the pruning ratio is checked.
    #[structopt(long, default_value = "1000")]
    expansions_before_checking_pruning_ratio: usize,
    /// Gives up after expanding this many states.
    #[structopt(long)]
    max_expansions: Option<usize>,
}

impl Opt {
    fn atom_centric_config(&self) -> AtomCentricConfig {
        AtomCentricConfig {
            use_sibling_shortcut: !self.no_sibling_shortcut,
            atom_selection_strategy: self.atom_selection_strategy,
        }
    }

    fn pruning_config(&self) -> PruningConfig {
        PruningConfig {
            min_required_pruning_ratio: self.min_required_pruning_ratio,
            expansions_before_checking_pruning_ratio: self.expansions_before_checking_pruning_ratio,
        }
    }

    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_expansions: self.max_expansions,
        }
    }
}

fn search<P>(task: &Task, pruning: P, config: SearchConfig) -> SearchOutcome
where
    P: PruningMethod,
{
    let mut search = UniformCostSearch::new(task, pruning, config);
    let outcome = search.run();
    println!("{}", search.statistics());
    println!("{}", search.pruning_statistics());
    outcome
}

fn run(opt: &Opt) -> Result<SearchOutcome, Box<dyn Error>> {
    let input = fs::read_to_string(&opt.input)
        .map_err(|err| format!("couldn't read {}: {}", opt.input.display(), err))?;
    let task = parse_task(&input).map_err(stubborn_sets::Error::from)?;
    log::info!(
        target: targets::TASK,
        "{} variables, {} operators, pruning: {}",
        task.layout().num_variables(),
        task.num_operators(),
        opt.pruning
    );
    let outcome = match opt.pruning {
        PruningKind::None => search(&task, NullPruning::default(), opt.search_config()),
        PruningKind::AtomCentric => {
            let pruning = AtomCentricStubbornSets::atom_centric(opt.atom_centric_config(), opt.pruning_config())
                .map_err(stubborn_sets::Error::from)?;
            search(&task, pruning, opt.search_config())
        }
    };
    if let SearchOutcome::Solved(plan) = &outcome {
        println!("{}", plan.display(&task));
    }
    Ok(outcome)
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    match run(&opt) {
        Ok(SearchOutcome::Solved(_)) => println!("solution found"),
        Ok(SearchOutcome::Unsolvable) => println!("task is unsolvable"),
        Ok(SearchOutcome::LimitReached) => {
            println!("expansion limit reached");
            process::exit(2)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1)
        }
    }
}
