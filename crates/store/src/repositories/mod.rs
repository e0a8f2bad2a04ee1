//! In-memory repositories.
//!
//! One repository per aggregate, mirroring the shape a database layer
//! would have. All of them are safe to share across threads; transitions
//! commit via compare-and-swap on the expected prior state.

pub mod audit;
pub mod challenge;
pub mod entity;
pub mod request;
pub mod stats;

pub use audit::AuditLog;
pub use challenge::ChallengeRepository;
pub use entity::EntityRepository;
pub use request::RequestRepository;
pub use stats::StatsRepository;
