pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::schedule::{ConflictReport, Priority, ScheduleDraft};
pub use services::conflict::check_conflicts;
pub use services::schedule_optimizer::{GeneticConfig, GeneticScheduler};
pub use services::schedule_parser::ScheduleParser;
