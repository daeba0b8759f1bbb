use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Course, CourseInstance};

pub type SharedState = Arc<RwLock<FormState>>;

/// Issued before a list fetch is sent. Only a response carrying a token newer
/// than the last applied one may replace the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchToken(u64);

#[derive(Debug, Default)]
struct FetchSequence {
    issued: u64,
    applied: u64,
}

impl FetchSequence {
    fn next(&mut self) -> FetchToken {
        self.issued += 1;
        FetchToken(self.issued)
    }

    fn accept(&mut self, token: FetchToken) -> bool {
        if token.0 <= self.applied {
            return false;
        }
        self.applied = token.0;
        true
    }
}

/// Value of the course picker: the serialized form of a full course record,
/// turned back into a `Course` when an instance is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSelection(String);

impl CourseSelection {
    pub fn from_course(course: &Course) -> Self {
        // Course holds only strings and JSON numbers, serialization cannot fail
        Self(serde_json::to_string(course).unwrap_or_default())
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolve(&self) -> Result<Course, AppError> {
        serde_json::from_str(&self.0).map_err(AppError::InvalidSelection)
    }
}

/// Everything the admin form shows: input fields plus the two fetched lists.
#[derive(Debug, Default)]
pub struct FormState {
    course_title: String,
    course_code: String,
    course_description: String,
    selected_course: Option<CourseSelection>,
    year: String,
    semester: String,
    courses: Vec<Course>,
    course_instances: Vec<CourseInstance>,
    courses_seq: FetchSequence,
    instances_seq: FetchSequence,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn course_description(&self) -> &str {
        &self.course_description
    }

    pub fn selected_course(&self) -> Option<&CourseSelection> {
        self.selected_course.as_ref()
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course_instances(&self) -> &[CourseInstance] {
        &self.course_instances
    }

    pub fn set_course_title(&mut self, value: impl Into<String>) {
        self.course_title = value.into();
    }

    pub fn set_course_code(&mut self, value: impl Into<String>) {
        self.course_code = value.into();
    }

    pub fn set_course_description(&mut self, value: impl Into<String>) {
        self.course_description = value.into();
    }

    pub fn set_year(&mut self, value: impl Into<String>) {
        self.year = value.into();
    }

    pub fn set_semester(&mut self, value: impl Into<String>) {
        self.semester = value.into();
    }

    pub fn select_course(&mut self, selection: Option<CourseSelection>) {
        self.selected_course = selection.filter(|s| !s.is_empty());
    }

    /// Picks a course out of the currently fetched list by its id.
    pub fn select_course_by_id(&mut self, id: &str) -> bool {
        let found = self
            .courses
            .iter()
            .find(|c| c.id.to_string() == id)
            .map(CourseSelection::from_course);
        let hit = found.is_some();
        if hit {
            self.selected_course = found;
        }
        hit
    }

    pub fn clear_course_fields(&mut self) {
        self.course_title.clear();
        self.course_code.clear();
        self.course_description.clear();
    }

    pub fn clear_instance_fields(&mut self) {
        self.year.clear();
        self.semester.clear();
        self.selected_course = None;
    }

    pub fn begin_courses_fetch(&mut self) -> FetchToken {
        self.courses_seq.next()
    }

    /// Returns false when the response was overtaken by a newer one.
    pub fn apply_courses(&mut self, token: FetchToken, courses: Vec<Course>) -> bool {
        if !self.courses_seq.accept(token) {
            return false;
        }
        self.courses = courses;
        true
    }

    pub fn begin_instances_fetch(&mut self) -> FetchToken {
        self.instances_seq.next()
    }

    pub fn apply_instances(&mut self, token: FetchToken, instances: Vec<CourseInstance>) -> bool {
        if !self.instances_seq.accept(token) {
            return false;
        }
        self.course_instances = instances;
        true
    }
}
