pub mod course_registry;
pub mod instance_registry;

use std::sync::Arc;

use crate::client::CourseApi;
use crate::notify::Notifier;
use crate::state::{FormState, SharedState};

pub use course_registry::CourseRegistry;
pub use instance_registry::InstanceRegistry;

/// The admin form as a whole: one shared state and the two registries that
/// write into it.
#[derive(Clone)]
pub struct CourseManagement {
    state: SharedState,
    courses: CourseRegistry,
    instances: InstanceRegistry,
}

impl CourseManagement {
    pub fn new(api: Arc<dyn CourseApi>, notifier: Arc<dyn Notifier>) -> Self {
        let state = FormState::new().shared();
        Self {
            courses: CourseRegistry::new(api.clone(), state.clone(), notifier.clone()),
            instances: InstanceRegistry::new(api, state.clone(), notifier),
            state,
        }
    }

    /// Initial load: the course list is fetched once when the form opens.
    pub async fn initialize(&self) {
        let _ = self.courses.list_courses().await;
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn courses(&self) -> &CourseRegistry {
        &self.courses
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }
}
