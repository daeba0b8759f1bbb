use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::CourseApi;
use crate::error::AppError;
use crate::models::{CourseInstance, Id, NewInstanceRequest};
use crate::notify::Notifier;
use crate::state::SharedState;

pub const TERM_REQUIRED: &str = "Year and Semester are required to list instances";
pub const INSTANCE_FIELDS_REQUIRED: &str =
    "Year, Semester, and Course selection are required to add an instance";
pub const INVALID_SELECTION: &str = "The selected course could not be read, select it again";

/// Course instances are partitioned by (year, semester) on the server; every
/// call here is scoped to one such term.
#[derive(Clone)]
pub struct InstanceRegistry {
    api: Arc<dyn CourseApi>,
    state: SharedState,
    notifier: Arc<dyn Notifier>,
}

impl InstanceRegistry {
    pub fn new(api: Arc<dyn CourseApi>, state: SharedState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            state,
            notifier,
        }
    }

    /// Returns the list the state holds afterwards; a response overtaken by a
    /// newer one is not returned.
    pub async fn list_instances(
        &self,
        year: &str,
        semester: &str,
    ) -> Result<Vec<CourseInstance>, AppError> {
        if year.is_empty() || semester.is_empty() {
            self.notifier.alert(TERM_REQUIRED);
            return Err(AppError::Validation(TERM_REQUIRED.to_string()));
        }

        let token = self.state.write().await.begin_instances_fetch();

        match self.api.list_instances(year, semester).await {
            Ok(instances) => {
                debug!("fetched {} instances for {}-{}", instances.len(), year, semester);
                let mut state = self.state.write().await;
                if !state.apply_instances(token, instances.clone()) {
                    debug!("dropping stale instance list response");
                    return Ok(state.course_instances().to_vec());
                }
                Ok(instances)
            }
            Err(e) => {
                error!("Error fetching instances: {}", e);
                Err(e)
            }
        }
    }

    /// Lists instances for whatever year and semester the form currently holds.
    pub async fn list_instances_for_form(&self) -> Result<Vec<CourseInstance>, AppError> {
        let (year, semester) = {
            let state = self.state.read().await;
            (state.year().to_string(), state.semester().to_string())
        };
        self.list_instances(&year, &semester).await
    }

    pub async fn create_instance(&self) -> Result<(), AppError> {
        let (year, semester, selection) = {
            let state = self.state.read().await;
            (
                state.year().to_string(),
                state.semester().to_string(),
                state.selected_course().cloned(),
            )
        };

        let selection = match selection {
            Some(selection) if !year.is_empty() && !semester.is_empty() => selection,
            _ => {
                self.notifier.alert(INSTANCE_FIELDS_REQUIRED);
                return Err(AppError::Validation(INSTANCE_FIELDS_REQUIRED.to_string()));
            }
        };

        let course = selection.resolve().inspect_err(|e| {
            error!("Error adding instance: {}", e);
            self.notifier.alert(INVALID_SELECTION);
        })?;

        let request = NewInstanceRequest {
            year,
            semester,
            course,
        };

        if let Err(e) = self.api.create_instance(&request).await {
            error!("Error adding instance: {}", e);
            return Err(e);
        }
        let term = format!("{}-{}", request.year, request.semester);
        info!(code = %request.course.code, term = %term, "instance added");

        let _ = self.list_instances(&request.year, &request.semester).await;
        self.state.write().await.clear_instance_fields();
        Ok(())
    }

    pub async fn delete_instance(&self, year: &str, semester: &str, id: &Id) -> Result<(), AppError> {
        if let Err(e) = self.api.delete_instance(year, semester, id).await {
            error!("Error deleting instance {}: {}", id, e);
            return Err(e);
        }
        info!(id = %id, "instance deleted from {}-{}", year, semester);

        let _ = self.list_instances(year, semester).await;
        Ok(())
    }
}
