pub mod auth;
pub mod curriculum;
pub mod database;
pub mod env;
pub mod error;
pub mod models;
pub mod repository;
pub mod roster;
pub mod telemetry;

#[cfg(test)]
mod test;

pub use auth::TeacherSession;
pub use curriculum::{CurriculumPath, CurriculumStore, LessonPlanDetails};
pub use env::StoreConfig;
pub use error::StoreError;
pub use repository::Repository;
pub use roster::RosterStore;
