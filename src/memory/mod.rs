//! Heap memory for generated code
//!
//! A single backing region carved once and handed out by bumping a
//! word cursor. Nothing is ever freed individually.
pub mod heap;
pub mod region;
pub mod store;

/// Allocation granularity in bytes
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();

/// Size of the process-wide heap (64 MiB)
pub const HEAP_SIZE: usize = 64 * 1024 * 1024;
