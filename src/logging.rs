//! Targets for the `log` facade.
//!
//! Filter on them with `RUST_LOG`, e.g. `RUST_LOG=pruning=trace`.

pub mod targets {
    pub const PRUNING: &str = "pruning";
    pub const SEARCH: &str = "search";
    pub const TASK: &str = "task";
}
