use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::CourseApi;
use crate::error::AppError;
use crate::models::{Course, Id, NewCourseRequest};
use crate::notify::Notifier;
use crate::state::SharedState;

pub const COURSE_FIELDS_REQUIRED: &str = "All fields are required to add a course";

/// Reads and writes courses against the remote API and mirrors the result
/// into the shared form state.
#[derive(Clone)]
pub struct CourseRegistry {
    api: Arc<dyn CourseApi>,
    state: SharedState,
    notifier: Arc<dyn Notifier>,
}

impl CourseRegistry {
    pub fn new(api: Arc<dyn CourseApi>, state: SharedState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            state,
            notifier,
        }
    }

    /// Replaces the held course list and returns it. A response overtaken by a
    /// newer one is dropped and the newer list is returned instead. On
    /// failure the previous list stays.
    pub async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let token = self.state.write().await.begin_courses_fetch();

        match self.api.list_courses().await {
            Ok(courses) => {
                debug!("fetched {} courses", courses.len());
                let mut state = self.state.write().await;
                if !state.apply_courses(token, courses.clone()) {
                    debug!("dropping stale course list response");
                    return Ok(state.courses().to_vec());
                }
                Ok(courses)
            }
            Err(e) => {
                error!("Error fetching courses: {}", e);
                Err(e)
            }
        }
    }

    /// Submits the course typed into the form, then refreshes and clears it.
    pub async fn create_course(&self) -> Result<(), AppError> {
        let request = {
            let state = self.state.read().await;
            NewCourseRequest {
                title: state.course_title().to_string(),
                code: state.course_code().to_string(),
                description: state.course_description().to_string(),
            }
        };

        if request.title.is_empty() || request.code.is_empty() || request.description.is_empty()
        {
            self.notifier.alert(COURSE_FIELDS_REQUIRED);
            return Err(AppError::Validation(COURSE_FIELDS_REQUIRED.to_string()));
        }

        if let Err(e) = self.api.create_course(&request).await {
            error!("Error adding course: {}", e);
            return Err(e);
        }
        info!(code = %request.code, "course added");

        // a failed refresh is already logged and does not undo the create
        let _ = self.list_courses().await;
        self.state.write().await.clear_course_fields();
        Ok(())
    }

    pub async fn delete_course(&self, id: &Id) -> Result<(), AppError> {
        if let Err(e) = self.api.delete_course(id).await {
            error!("Error deleting course {}: {}", id, e);
            return Err(e);
        }
        info!(id = %id, "course deleted");

        let _ = self.list_courses().await;
        Ok(())
    }
}
