//! TutorTrack Scheduler - Weekly lesson allocation
//!
//! This crate provides:
//! - The two-phase weekly allocator (capacity-respecting, then overflow)
//! - Filter predicates (working day, student availability, free seat)
//! - Scoring functions (least assigned)
//! - Post-hoc allocation reports (under-allocation, overbooking)

pub mod filter;
pub mod report;
pub mod scheduler;
pub mod score;
pub mod types;

// Re-export commonly used types
pub use report::{AllocationReport, OverbookedDay, StudentAllocation};
pub use scheduler::{allocate, order_students, Scheduler};
pub use types::{AllocationContext, FilterResult, ScoreResult};
