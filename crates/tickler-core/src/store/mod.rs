//! Task store: ordered task list and its persistence.

mod persistence;
mod tasks;

pub use persistence::SnapshotRepository;
pub use tasks::TaskStore;
