//! Partnership lifecycle: the state machine and the withdrawal approval pipeline.
//!
//! ```text
//! FORMING --complete--> ACTIVE --approve withdrawal--> DISSOLVED
//!    |                    |
//!    +----close season----+--> EXPIRED
//! ```
//!
//! Withdrawal requests go PENDING -> APPROVED | REJECTED, once.

pub mod engine;
pub mod timeline;

pub use engine::{ApprovalOutcome, LifecycleEngine};
pub use timeline::{Timeline, TimelineEvent, TimelineEventKind};
