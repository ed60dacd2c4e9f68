pub mod child_mapper;
pub mod content_mapper;
pub mod milestone_mapper;
pub mod tracking_mapper;
pub mod user_mapper;

pub use child_mapper::ChildMapper;
pub use content_mapper::ContentMapper;
pub use milestone_mapper::MilestoneMapper;
pub use tracking_mapper::TrackingMapper;
pub use user_mapper::UserMapper;
