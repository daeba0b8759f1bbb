pub mod course;
pub mod instance;

pub use course::{Course, Id, NewCourseRequest};
pub use instance::{CourseInstance, NewInstanceRequest};
