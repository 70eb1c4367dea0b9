//! [`RosterApi`] over HTTP/JSON using `reqwest`.
//!
//! Every call is wrapped in a `roster_api` tracing span that records the
//! endpoint, elapsed time and outcome, mirroring the operation spans used by
//! the rest of the crate.

use std::time::Instant;

use async_trait::async_trait;
use comlab_core::{ApiError, NewTeacher, RosterApi, Teacher, TeacherUpdate};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{info_span, Instrument};

use super::endpoints;
use crate::config::ApiConfig;

/// HTTP client for the roster API.
#[derive(Debug, Clone)]
pub struct HttpRosterApi {
    client: Client,
    base_url: Url,
}

/// Which statuses count as success for a call.
#[derive(Debug, Clone, Copy)]
enum Expect {
    /// Any 2xx.
    Success,
    /// Exactly 200 OK.
    Ok,
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    } else {
        ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

impl HttpRosterApi {
    /// Builds a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry path
    /// segments, or if the TLS backend fails to initialize.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("roster API URL cannot carry paths: {}", config.base_url);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` (already split on `/`) plus optional extra segments to
    /// the base URL. Segments are percent-encoded, so an identifier containing
    /// `/` or `?` stays a single path segment.
    fn url(&self, endpoint: &str, extra: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(endpoint.split('/').filter(|s| !s.is_empty()));
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        url
    }

    /// Sends `request`, checks the status, and records the call on a span.
    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
        expect: Expect,
    ) -> Result<Response, ApiError> {
        let span = info_span!(
            "roster_api",
            endpoint = endpoint,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        async move {
            let start = Instant::now();
            let result = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::Span::current().record("status", status.as_u16());
                    let accepted = match expect {
                        Expect::Success => status.is_success(),
                        Expect::Ok => status == StatusCode::OK,
                    };
                    if accepted {
                        Ok(response)
                    } else {
                        Err(ApiError::Status {
                            endpoint: endpoint.to_string(),
                            status: status.as_u16(),
                        })
                    }
                }
                Err(err) => Err(transport_error(endpoint, &err)),
            };

            #[allow(clippy::cast_possible_truncation)]
            let duration_ms = start.elapsed().as_millis() as u64;
            let outcome = if result.is_ok() { "ok" } else { "error" };
            tracing::Span::current().record("duration_ms", duration_ms);
            tracing::Span::current().record("outcome", outcome);
            tracing::debug!(endpoint, duration_ms, outcome, "roster api call complete");

            result
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        let endpoint = endpoints::LIST_TEACHERS;
        let request = self.client.get(self.url(endpoint, None));
        let response = self.send(endpoint, request, Expect::Success).await?;
        response
            .json::<Vec<Teacher>>()
            .await
            .map_err(|err| transport_error(endpoint, &err))
    }

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<(), ApiError> {
        let endpoint = endpoints::ADD_TEACHER;
        let request = self.client.post(self.url(endpoint, None)).json(teacher);
        self.send(endpoint, request, Expect::Success).await?;
        Ok(())
    }

    async fn update_teacher(&self, update: &TeacherUpdate) -> Result<(), ApiError> {
        let endpoint = endpoints::EDIT_TEACHER;
        let request = self.client.post(self.url(endpoint, None)).json(update);
        self.send(endpoint, request, Expect::Ok).await?;
        Ok(())
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<(), ApiError> {
        let endpoint = endpoints::DELETE_TEACHER;
        let request = self
            .client
            .delete(self.url(endpoint, Some(teacher_id)));
        self.send(endpoint, request, Expect::Success).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api(base: &str) -> HttpRosterApi {
        HttpRosterApi::new(&ApiConfig {
            base_url: base.to_string(),
            request_timeout: Some(Duration::from_secs(2)),
        })
        .unwrap()
    }

    #[test]
    fn endpoint_urls_keep_api_prefix() {
        let api = api("https://comlab-backend.vercel.app/api");
        assert_eq!(
            api.url(endpoints::LIST_TEACHERS, None).as_str(),
            "https://comlab-backend.vercel.app/api/teacher/getTeachers"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let api = api("http://localhost:8080/api/");
        assert_eq!(
            api.url(endpoints::EDIT_TEACHER, None).as_str(),
            "http://localhost:8080/api/teacher/editTeacher"
        );
    }

    #[test]
    fn delete_url_encodes_identifier_as_one_segment() {
        let api = api("http://localhost:8080");
        assert_eq!(
            api.url(endpoints::DELETE_TEACHER, Some("2021/00 1")).as_str(),
            "http://localhost:8080/teacher/deleteTeacher/2021%2F00%201"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpRosterApi::new(&ApiConfig {
            base_url: "mailto:admin@school.edu".to_string(),
            request_timeout: None,
        })
        .is_err());
        assert!(HttpRosterApi::new(&ApiConfig {
            base_url: "not a url".to_string(),
            request_timeout: None,
        })
        .is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let api = api("http://127.0.0.1:9");
        let err = api.list_teachers().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }), "{err:?}");
        assert_eq!(err.endpoint(), "/teacher/getTeachers");
    }
}
