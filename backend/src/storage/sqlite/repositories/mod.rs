//! SQLite implementations of the storage traits, one repository per aggregate.

pub mod child_repository;
pub mod content_repository;
pub mod daily_log_repository;
pub mod growth_repository;
pub mod milestone_repository;
pub mod user_repository;

pub use child_repository::ChildRepository;
pub use content_repository::ContentRepository;
pub use daily_log_repository::DailyLogRepository;
pub use growth_repository::GrowthRepository;
pub use milestone_repository::MilestoneRepository;
pub use user_repository::UserRepository;
