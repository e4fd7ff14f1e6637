//! Domain model for the task list.
//!
//! # Responsibility
//! - Define task records, id allocation, the visible-subset filter and the
//!   clock abstraction used to stamp new tasks.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique within its collection.
//! - Filters never reorder or mutate tasks.

pub mod clock;
pub mod filter;
pub mod task;
