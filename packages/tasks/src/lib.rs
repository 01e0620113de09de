// ABOUTME: Task records and the JSON-backed task store
// ABOUTME: Provides CRUD, list filtering and ordering, tag counts, and the month calendar

pub mod calendar;
pub mod query;
pub mod storage;
pub mod types;

pub use calendar::*;
pub use query::*;
pub use storage::*;
pub use types::*;
