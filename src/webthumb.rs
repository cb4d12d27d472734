//! WebThumb API response shapes

pub mod credits;
pub mod job;
pub mod response;
pub mod status;

pub use credits::Credits;
pub use job::Job;
pub use response::Response;
pub use status::{JobStatus, Status};
