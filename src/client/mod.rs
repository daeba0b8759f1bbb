use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{Course, CourseInstance, Id, NewCourseRequest, NewInstanceRequest};

/// The six calls the admin form makes against the course API.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn create_course(&self, course: &NewCourseRequest) -> Result<(), AppError>;
    async fn delete_course(&self, id: &Id) -> Result<(), AppError>;
    async fn list_instances(
        &self,
        year: &str,
        semester: &str,
    ) -> Result<Vec<CourseInstance>, AppError>;
    async fn create_instance(&self, instance: &NewInstanceRequest) -> Result<(), AppError>;
    async fn delete_instance(&self, year: &str, semester: &str, id: &Id)
        -> Result<(), AppError>;
}

pub struct HttpCourseApi {
    client: Client,
    base_url: Url,
}

impl HttpCourseApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "base url cannot carry a path: {}",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the configured base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn ensure_success(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Status { status, body })
    }
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let url = self.endpoint(&["courses"])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let courses: Vec<Course> = Self::ensure_success(response).await?.json().await?;
        Ok(courses)
    }

    async fn create_course(&self, course: &NewCourseRequest) -> Result<(), AppError> {
        let url = self.endpoint(&["courses"])?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(course).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_course(&self, id: &Id) -> Result<(), AppError> {
        let id = id.to_string();
        let url = self.endpoint(&["courses", &id])?;
        debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_instances(
        &self,
        year: &str,
        semester: &str,
    ) -> Result<Vec<CourseInstance>, AppError> {
        let url = self.endpoint(&["instances", year, semester])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let instances: Vec<CourseInstance> = Self::ensure_success(response).await?.json().await?;
        Ok(instances)
    }

    async fn create_instance(&self, instance: &NewInstanceRequest) -> Result<(), AppError> {
        let url = self.endpoint(&["instances"])?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(instance).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_instance(
        &self,
        year: &str,
        semester: &str,
        id: &Id,
    ) -> Result<(), AppError> {
        let id = id.to_string();
        let url = self.endpoint(&["instances", year, semester, &id])?;
        debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
