pub mod loader;
pub mod schedules;

pub use loader::{ScheduleLoader, ScheduleLoaderError, ScheduleRecord};
