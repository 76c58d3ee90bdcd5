//! Parser for the line-based task format.
//!
//! ```text
//! # comment
//! variables 2 2 3
//! init 0 0 1
//! goal 0=1 2=2
//! operator move-a 1
//! pre 0=0
//! eff 0=1
//! end
//! ```
//!
//! `variables` lists the domain size of every variable, `init` one value per
//! variable and `goal` the goal atoms written as `var=value`. Every operator
//! block starts with its name and an optional cost (default 1) and may contain
//! any number of `pre` and `eff` lines.

use super::{
    Atom,
    Cost,
    Task,
    TaskBuilder,
    TaskError,
    Variable,
};
use crate::logging::targets;
use core::{
    fmt,
    str::FromStr,
};

/// The kind of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The line starts with an unknown directive.
    UnknownDirective(String),
    /// A directive is only valid inside or only valid outside of an operator block.
    MisplacedDirective(&'static str),
    /// A required section does not occur in the input.
    MissingSection(&'static str),
    /// A section that may only occur once occurs again.
    DuplicateSection(&'static str),
    /// A token is not a non-negative integer.
    MalformedNumber(String),
    /// A token is not of the form `var=value`.
    MalformedAtom(String),
    /// An operator block lacks its `end` line.
    UnterminatedOperator,
    /// An `operator` line has no name.
    MissingOperatorName,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDirective(directive) => write!(f, "unknown directive `{}`", directive),
            Self::MisplacedDirective(directive) => write!(f, "misplaced directive `{}`", directive),
            Self::MissingSection(section) => write!(f, "missing section `{}`", section),
            Self::DuplicateSection(section) => write!(f, "duplicate section `{}`", section),
            Self::MalformedNumber(token) => write!(f, "malformed number `{}`", token),
            Self::MalformedAtom(token) => {
                write!(f, "malformed atom `{}`, expected `var=value`", token)
            }
            Self::UnterminatedOperator => write!(f, "operator block is not terminated by `end`"),
            Self::MissingOperatorName => write!(f, "operator without a name"),
        }
    }
}

/// Errors that may be encountered when parsing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not well-formed at the given 1-based line.
    Syntax { line: usize, kind: SyntaxErrorKind },
    /// The input is well-formed but does not describe a valid task.
    Task(TaskError),
}

impl From<TaskError> for ParseError {
    fn from(err: TaskError) -> Self {
        Self::Task(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { line, kind } => write!(f, "line {}: {}", line, kind),
            Self::Task(err) => write!(f, "invalid task: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// An operator block that has not seen its `end` line yet.
#[derive(Debug)]
struct OpenOperator {
    line: usize,
    name: String,
    cost: Cost,
    preconditions: Vec<Atom>,
    effects: Vec<Atom>,
}

/// Parser state while going through the input line by line.
#[derive(Debug, Default)]
struct TaskParser {
    builder: TaskBuilder,
    line: usize,
    seen_variables: bool,
    seen_init: bool,
    seen_goal: bool,
    open: Option<OpenOperator>,
}

/// Parses a task from its textual representation.
///
/// # Errors
///
/// - If the input is not well-formed.
/// - If the described task is invalid, see [`TaskError`].
pub fn parse_task(input: &str) -> Result<Task, ParseError> {
    let mut parser = TaskParser::default();
    for (index, line) in input.lines().enumerate() {
        parser.line = index + 1;
        let content = line.split('#').next().unwrap_or("");
        let mut tokens = content.split_whitespace();
        if let Some(directive) = tokens.next() {
            parser.directive(directive, tokens)?;
        }
    }
    parser.finish()
}

impl TaskParser {
    fn error(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::Syntax {
            line: self.line,
            kind,
        }
    }

    fn directive<'a, T>(&mut self, directive: &str, tokens: T) -> Result<(), ParseError>
    where
        T: Iterator<Item = &'a str>,
    {
        match (directive, self.open.is_some()) {
            ("pre", true) => {
                let atoms = self.atoms(tokens)?;
                if let Some(operator) = &mut self.open {
                    operator.preconditions.extend(atoms);
                }
            }
            ("eff", true) => {
                let atoms = self.atoms(tokens)?;
                if let Some(operator) = &mut self.open {
                    operator.effects.extend(atoms);
                }
            }
            ("end", true) => {
                if let Some(operator) = self.open.take() {
                    self.builder.add_operator(
                        operator.name,
                        operator.cost,
                        operator.preconditions,
                        operator.effects,
                    );
                }
            }
            ("operator", true) | ("variables", true) | ("init", true) | ("goal", true) => {
                let line = self.open.as_ref().map_or(self.line, |operator| operator.line);
                return Err(ParseError::Syntax {
                    line,
                    kind: SyntaxErrorKind::UnterminatedOperator,
                })
            }
            ("variables", false) => {
                self.ensure_first("variables", self.seen_variables)?;
                self.seen_variables = true;
                let domain_sizes = self.numbers::<u32, _>(tokens)?;
                self.builder.new_variables(domain_sizes);
            }
            ("init", false) => {
                self.ensure_first("init", self.seen_init)?;
                self.seen_init = true;
                let values = self.numbers::<u32, _>(tokens)?;
                self.builder.set_initial_state(values);
            }
            ("goal", false) => {
                self.ensure_first("goal", self.seen_goal)?;
                self.seen_goal = true;
                for atom in self.atoms(tokens)? {
                    self.builder.add_goal(atom);
                }
            }
            ("operator", false) => self.open_block(tokens)?,
            ("pre", false) => return Err(self.error(SyntaxErrorKind::MisplacedDirective("pre"))),
            ("eff", false) => return Err(self.error(SyntaxErrorKind::MisplacedDirective("eff"))),
            ("end", false) => return Err(self.error(SyntaxErrorKind::MisplacedDirective("end"))),
            (unknown, _) => {
                return Err(self.error(SyntaxErrorKind::UnknownDirective(unknown.to_string())))
            }
        }
        Ok(())
    }

    /// Fails if the section has been seen before.
    fn ensure_first(&self, name: &'static str, seen: bool) -> Result<(), ParseError> {
        if seen {
            return Err(self.error(SyntaxErrorKind::DuplicateSection(name)))
        }
        Ok(())
    }

    fn open_block<'a, T>(&mut self, mut tokens: T) -> Result<(), ParseError>
    where
        T: Iterator<Item = &'a str>,
    {
        let name = tokens
            .next()
            .ok_or_else(|| self.error(SyntaxErrorKind::MissingOperatorName))?;
        let cost = match tokens.next() {
            Some(token) => self.number::<Cost>(token)?,
            None => 1,
        };
        if let Some(extra) = tokens.next() {
            return Err(self.error(SyntaxErrorKind::MalformedNumber(extra.to_string())))
        }
        self.open = Some(OpenOperator {
            line: self.line,
            name: name.to_string(),
            cost,
            preconditions: Vec::new(),
            effects: Vec::new(),
        });
        Ok(())
    }

    fn number<N>(&self, token: &str) -> Result<N, ParseError>
    where
        N: FromStr,
    {
        token
            .parse()
            .map_err(|_| self.error(SyntaxErrorKind::MalformedNumber(token.to_string())))
    }

    fn numbers<'a, N, T>(&self, tokens: T) -> Result<Vec<N>, ParseError>
    where
        N: FromStr,
        T: Iterator<Item = &'a str>,
    {
        tokens.map(|token| self.number(token)).collect()
    }

    fn atom(&self, token: &str) -> Result<Atom, ParseError> {
        let malformed = || self.error(SyntaxErrorKind::MalformedAtom(token.to_string()));
        let (var, value) = token.split_once('=').ok_or_else(malformed)?;
        let var = var
            .parse::<usize>()
            .ok()
            .and_then(Variable::from_index)
            .ok_or_else(malformed)?;
        let value = value.parse::<u32>().map_err(|_| malformed())?;
        Ok(Atom::new(var, value))
    }

    fn atoms<'a, T>(&self, tokens: T) -> Result<Vec<Atom>, ParseError>
    where
        T: Iterator<Item = &'a str>,
    {
        tokens.map(|token| self.atom(token)).collect()
    }

    fn finish(self) -> Result<Task, ParseError> {
        if let Some(operator) = &self.open {
            return Err(ParseError::Syntax {
                line: operator.line,
                kind: SyntaxErrorKind::UnterminatedOperator,
            })
        }
        let missing = [
            ("variables", self.seen_variables),
            ("init", self.seen_init),
            ("goal", self.seen_goal),
        ]
        .iter()
        .find(|(_, seen)| !seen)
        .map(|&(name, _)| name);
        if let Some(section) = missing {
            return Err(self.error(SyntaxErrorKind::MissingSection(section)))
        }
        let task = self.builder.finalize()?;
        log::debug!(
            target: targets::TASK,
            "parsed task with {} variables, {} atoms and {} operators",
            task.layout().num_variables(),
            task.layout().num_atoms(),
            task.num_operators()
        );
        Ok(task)
    }
}
