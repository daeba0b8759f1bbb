use serde::{Deserialize, Deserializer, Serialize};

use super::course::{Course, Id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInstance {
    pub id: Id,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(deserialize_with = "string_or_number")]
    pub semester: String,
    pub course: Course,
}

impl CourseInstance {
    /// `year-semester`, as shown in the instance table.
    pub fn term_label(&self) -> String {
        format!("{}-{}", self.year, self.semester)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstanceRequest {
    pub year: String,
    pub semester: String,
    pub course: Course,
}

// year/semester come back as numbers from some servers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
