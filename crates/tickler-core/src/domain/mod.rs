//! Domain model (IDs, task records, snapshot layout, events, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod message;
pub mod snapshot;
pub mod task;

pub use self::errors::{StorageError, TicklerError};
pub use self::events::DomainEvent;
pub use self::ids::{Id, IdMarker, NoticeId, TaskId};
pub use self::message::{FALLBACK_MESSAGE, MessagePool};
pub use self::snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use self::task::{TaskRecord, TaskText};
