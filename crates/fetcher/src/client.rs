use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use daily_common::error::AppError;
use daily_common::types::Question;

use crate::QuestionSource;
use crate::graphql::{self, GraphQlResponse, QuestionData, TodayData};
use crate::render;

/// HTTP client for the question service's GraphQL endpoint.
#[derive(Clone)]
pub struct QuestionClient {
    http: reqwest::Client,
    graphql_url: String,
}

impl QuestionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("daily-question-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            graphql_url: format!("{}/graphql", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch and decode today's question in two round trips: first the daily
    /// record, then the question detail for its slug.
    pub async fn fetch_question(&self) -> Result<Question, AppError> {
        let record = self
            .post::<TodayData>(&graphql::today_request())
            .await?
            .into_record()?;
        let slug = record.question.question_title_slug.clone();
        let date = record.parsed_date();

        tracing::debug!(slug = %slug, date = ?date, "Resolved today's question");

        let detail = self
            .post::<QuestionData>(&graphql::question_request(&slug))
            .await?
            .question
            .ok_or_else(|| AppError::Upstream(format!("question {} not found", slug)))?;

        detail.into_question(date)
    }

    async fn post<T: DeserializeOwned>(&self, body: &serde_json::Value) -> Result<T, AppError> {
        let response = self.http.post(&self.graphql_url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "question service returned {}",
                status
            )));
        }

        let envelope: GraphQlResponse<T> = response.json().await?;
        envelope.into_data()
    }
}

#[async_trait]
impl QuestionSource for QuestionClient {
    async fn fetch_today(&self) -> Result<String, AppError> {
        let question = self.fetch_question().await?;

        tracing::info!(
            slug = %question.title_slug,
            frontend_id = %question.frontend_id,
            difficulty = %question.difficulty,
            "Fetched daily question"
        );

        Ok(render::render_question(&question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> QuestionClient {
        QuestionClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    async fn mock_today(server: &mut mockito::Server, slug: &str) -> mockito::Mock {
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(
                json!({"operationName": "questionOfToday"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {
                        "todayRecord": [{
                            "date": "2024-05-01",
                            "question": {
                                "questionFrontendId": "1",
                                "questionTitleSlug": slug,
                                "__typename": "QuestionNode"
                            },
                            "__typename": "DailyQuestionNode"
                        }]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_fetch_today_renders_question() {
        let mut server = mockito::Server::new_async().await;
        let today = mock_today(&mut server, "two-sum").await;
        let detail = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "questionData",
                "variables": {"titleSlug": "two-sum"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {
                        "question": {
                            "questionFrontendId": "1",
                            "title": "Two Sum",
                            "titleSlug": "two-sum",
                            "content": "<p>Given an array.</p>",
                            "translatedTitle": "两数之和",
                            "translatedContent": "<p>给定一个整数数组 <code>nums</code>。</p><p>返回&nbsp;<em>下标</em>。</p>",
                            "isPaidOnly": false,
                            "difficulty": "Easy",
                            "topicTags": []
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client_for(&server).fetch_today().await.unwrap();

        today.assert_async().await;
        detail.assert_async().await;
        assert!(text.contains("两数之和"));
        assert!(text.contains("难度: Easy"));
        assert!(text.contains("给定一个整数数组 nums。\n返回 下标。"));
        assert!(text.contains("https://leetcode.cn/problems/two-sum/"));
        assert!(!text.contains('<'));
        assert!(!text.contains("&nbsp;"));
    }

    #[tokio::test]
    async fn test_fetch_question_keeps_date() {
        let mut server = mockito::Server::new_async().await;
        let _today = mock_today(&mut server, "lru-cache").await;
        let _detail = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(
                json!({"operationName": "questionData"}),
            ))
            .with_status(200)
            .with_body(
                json!({
                    "data": {
                        "question": {
                            "questionFrontendId": "146",
                            "titleSlug": "lru-cache",
                            "translatedTitle": "LRU 缓存",
                            "translatedContent": "<p>设计缓存。</p>",
                            "difficulty": "Medium",
                            "isPaidOnly": false
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let question = client_for(&server).fetch_question().await.unwrap();
        assert_eq!(question.frontend_id, "146");
        assert_eq!(question.title, "LRU 缓存");
        assert_eq!(
            question.date,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[tokio::test]
    async fn test_empty_today_record_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(json!({"data": {"todayRecord": []}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).fetch_today().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_server_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).fetch_today().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_missing_question_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _today = mock_today(&mut server, "gone").await;
        let _detail = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(
                json!({"operationName": "questionData"}),
            ))
            .with_status(200)
            .with_body(json!({"data": {"question": null}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).fetch_today().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("gone")));
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Nothing listens on port 1.
        let client = QuestionClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.fetch_today().await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }
}
