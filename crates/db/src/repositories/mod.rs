//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod session_repo;
pub mod song_repo;
pub mod user_repo;
pub mod workflow_step_repo;

pub use category_repo::CategoryRepo;
pub use session_repo::SessionRepo;
pub use song_repo::SongRepo;
pub use user_repo::UserRepo;
pub use workflow_step_repo::WorkflowStepRepo;
