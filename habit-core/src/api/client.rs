use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{CreateHabitRequest, HabitApi, UpdateHabitRequest};
use crate::{ApiError, Habit, HabitId};

const HABITS_PATH: &str = "habits";

/// [`HabitApi`] over HTTP+JSON.
///
/// Responses are decoded into typed records and checked before they reach the
/// caller: a record with a blank name, or an update answered with another id,
/// is rejected as [`ApiError::InvalidResponse`].
#[derive(Debug, Clone)]
pub struct HttpHabitApi {
    client: Client,
    base_url: Url,
}

impl HttpHabitApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        // Url::join only keeps the last path segment of a base without a trailing slash
        let path = format!("{}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_fragment(None);

        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::transport("client setup", e))?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` resolved against the base, keeping the base's query string.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;
        url.set_query(self.base_url.query());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, ApiError> {
        tracing::debug!(call = call_name, "sending habit API request");

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(call_name, e))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ApiError::Unauthorized {
                call: call_name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                call: call_name.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call_name).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(call_name, e))?;

        serde_json::from_slice(&body).map_err(|e| ApiError::parse(call_name, e))
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }
}

fn validate_habit(habit: Habit, call_name: &str) -> Result<Habit, ApiError> {
    if habit.name.trim().is_empty() {
        return Err(ApiError::invalid(
            call_name,
            format!("habit {} has an empty name", habit.id),
        ));
    }
    Ok(habit)
}

#[async_trait]
impl HabitApi for HttpHabitApi {
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        let call_name = "GET /habits";
        let habits: Vec<Habit> = self
            .get_json(self.client.get(self.endpoint(HABITS_PATH)?), call_name)
            .await?;

        habits
            .into_iter()
            .map(|habit| validate_habit(habit, call_name))
            .collect()
    }

    async fn create_habit(&self, request: &CreateHabitRequest) -> Result<Habit, ApiError> {
        let call_name = "POST /habits";
        let habit: Habit = self
            .get_json(
                self.client.post(self.endpoint(HABITS_PATH)?).json(request),
                call_name,
            )
            .await?;

        validate_habit(habit, call_name)
    }

    async fn update_habit(
        &self,
        id: HabitId,
        request: &UpdateHabitRequest,
    ) -> Result<Habit, ApiError> {
        let call_name = "PUT /habits/:id";
        let habit: Habit = self
            .get_json(
                self.client
                    .put(self.endpoint(&format!("{}/{}", HABITS_PATH, id))?)
                    .json(request),
                call_name,
            )
            .await?;

        if habit.id != id {
            return Err(ApiError::invalid(
                call_name,
                format!("expected habit {}, got {}", id, habit.id),
            ));
        }
        validate_habit(habit, call_name)
    }

    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError> {
        self.send_without_body(
            self.client
                .delete(self.endpoint(&format!("{}/{}", HABITS_PATH, id))?),
            "DELETE /habits/:id",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Completion;
    use mockito::Matcher;
    use serde_json::json;

    fn json_body(value: serde_json::Value) -> String {
        value.to_string()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = HttpHabitApi::new("http://localhost:8080/api").unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            api.endpoint("habits/4").unwrap().as_str(),
            "http://localhost:8080/api/habits/4"
        );
    }

    #[test]
    fn base_url_query_stays_out_of_the_path() {
        let api = HttpHabitApi::new("http://localhost:8080/api?key=abc#frag").unwrap();
        assert_eq!(api.base_url().path(), "/api/");
        assert_eq!(api.base_url().fragment(), None);

        let url = api.endpoint("habits").unwrap();
        assert_eq!(url.path(), "/api/habits");
        assert_eq!(url.query(), Some("key=abc"));

        let root = HttpHabitApi::new("http://localhost:8080//").unwrap();
        assert_eq!(
            root.endpoint("habits/1").unwrap().as_str(),
            "http://localhost:8080/habits/1"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            HttpHabitApi::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn list_decodes_habits() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/habits")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json_body(json!([
                { "id": 1, "name": "Joggen", "streakCount": 1 },
                { "id": 2, "name": "Lesen", "streakCount": 3,
                  "completions": [{ "date": "2026-10-19", "completed": true }] }
            ])))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let habits = api.list_habits().await.unwrap();

        mock.assert_async().await;
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[1].streak_count, 3);
        assert_eq!(
            habits[1].completions,
            Some(vec![Completion {
                date: "2026-10-19".to_string(),
                completed: true,
            }])
        );
    }

    #[tokio::test]
    async fn list_maps_server_error_to_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/habits")
            .with_status(500)
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api.list_habits().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn list_maps_forbidden_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/habits")
            .with_status(403)
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api.list_habits().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn list_rejects_wrong_shape() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/habits")
            .with_status(200)
            .with_body(json_body(json!({ "habits": [] })))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api.list_habits().await.unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }

    #[tokio::test]
    async fn list_rejects_blank_names() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/habits")
            .with_status(200)
            .with_body(json_body(json!([{ "id": 1, "name": "  ", "streakCount": 0 }])))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api.list_habits().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn create_posts_name_and_returns_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/habits")
            .match_body(Matcher::Json(json!({ "name": "Meditieren" })))
            .with_status(201)
            .with_body(json_body(
                json!({ "id": 7, "name": "Meditieren", "streakCount": 0 }),
            ))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let habit = api
            .create_habit(&CreateHabitRequest {
                name: "Meditieren".to_string(),
                icon: None,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(habit.id, 7);
    }

    #[tokio::test]
    async fn update_rejects_mismatched_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/habits/3")
            .with_status(200)
            .with_body(json_body(json!({ "id": 4, "name": "Lesen", "streakCount": 0 })))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api
            .update_habit(
                3,
                &UpdateHabitRequest {
                    name: "Lesen".to_string(),
                    icon: None,
                    completions: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn update_sends_completions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/habits/3")
            .match_body(Matcher::Json(json!({
                "name": "Lesen",
                "completions": [{ "date": "2026-10-19", "completed": true }]
            })))
            .with_status(200)
            .with_body(json_body(json!({ "id": 3, "name": "Lesen", "streakCount": 1 })))
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let habit = api
            .update_habit(
                3,
                &UpdateHabitRequest {
                    name: "Lesen".to_string(),
                    icon: None,
                    completions: vec![Completion {
                        date: "2026-10-19".to_string(),
                        completed: true,
                    }],
                },
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(habit.streak_count, 1);
    }

    #[tokio::test]
    async fn delete_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/habits/9")
            .with_status(204)
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        api.delete_habit(9).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_reports_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/habits/9")
            .with_status(404)
            .create_async()
            .await;

        let api = HttpHabitApi::new(&server.url()).unwrap();
        let err = api.delete_habit(9).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }
}
