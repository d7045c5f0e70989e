//! GraphQL request bodies and response shapes for the question service.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use daily_common::error::AppError;
use daily_common::types::{Difficulty, Question};

const TODAY_QUERY: &str = "query questionOfToday { todayRecord { date question { questionFrontendId questionTitleSlug __typename } __typename } }";

const QUESTION_QUERY: &str = "query questionData($titleSlug: String!) { question(titleSlug: $titleSlug) { questionId questionFrontendId title titleSlug content translatedTitle translatedContent isPaidOnly difficulty topicTags { name slug translatedName __typename } __typename } }";

pub fn today_request() -> Value {
    json!({
        "operationName": "questionOfToday",
        "variables": {},
        "query": TODAY_QUERY,
    })
}

pub fn question_request(title_slug: &str) -> Value {
    json!({
        "operationName": "questionData",
        "variables": { "titleSlug": title_slug },
        "query": QUESTION_QUERY,
    })
}

/// Standard GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap `data`, turning reported GraphQL errors into an upstream error.
    pub fn into_data(self) -> Result<T, AppError> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(AppError::Upstream(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| AppError::Upstream("response is missing `data`".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayData {
    #[serde(default)]
    pub today_record: Vec<TodayRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TodayRecord {
    pub date: Option<String>,
    pub question: TodayQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayQuestion {
    pub question_frontend_id: Option<String>,
    pub question_title_slug: String,
}

impl TodayData {
    /// The service returns a one-element list; anything else means no daily record.
    pub fn into_record(self) -> Result<TodayRecord, AppError> {
        self.today_record
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("todayRecord is empty".to_string()))
    }
}

impl TodayRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionData {
    pub question: Option<QuestionDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub question_frontend_id: Option<String>,
    pub title: Option<String>,
    pub title_slug: String,
    pub content: Option<String>,
    pub translated_title: Option<String>,
    pub translated_content: Option<String>,
    #[serde(default)]
    pub is_paid_only: bool,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTag {
    pub name: String,
    pub translated_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl QuestionDetail {
    /// Build the domain record, preferring localized fields and falling
    /// back to the English ones.
    pub fn into_question(self, date: Option<NaiveDate>) -> Result<Question, AppError> {
        let slug = self.title_slug;
        let title = non_empty(self.translated_title)
            .or_else(|| non_empty(self.title))
            .ok_or_else(|| AppError::Upstream(format!("question {} has no title", slug)))?;
        let content_html = non_empty(self.translated_content)
            .or_else(|| non_empty(self.content))
            .ok_or_else(|| AppError::Upstream(format!("question {} has no content", slug)))?;

        Ok(Question {
            frontend_id: self.question_frontend_id.unwrap_or_default(),
            title,
            difficulty: self.difficulty.unwrap_or(Difficulty::Unknown),
            content_html,
            date,
            paid_only: self.is_paid_only,
            topic_tags: self
                .topic_tags
                .into_iter()
                .map(|t| non_empty(t.translated_name).unwrap_or(t.name))
                .collect(),
            title_slug: slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_become_upstream_error() {
        let resp: GraphQlResponse<TodayData> = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "rate limited"}, {"message": "try later"}]
        }))
        .unwrap();
        match resp.into_data() {
            Err(AppError::Upstream(msg)) => assert_eq!(msg, "rate limited; try later"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_empty_today_record() {
        let data: TodayData = serde_json::from_value(json!({"todayRecord": []})).unwrap();
        assert!(matches!(data.into_record(), Err(AppError::Upstream(_))));
    }

    #[test]
    fn test_today_record_date() {
        let data: TodayData = serde_json::from_value(json!({
            "todayRecord": [{
                "date": "2024-05-01",
                "question": {"questionFrontendId": "1", "questionTitleSlug": "two-sum"}
            }]
        }))
        .unwrap();
        let record = data.into_record().unwrap();
        assert_eq!(record.question.question_title_slug, "two-sum");
        assert_eq!(record.parsed_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_falls_back_to_english_fields() {
        let detail: QuestionDetail = serde_json::from_value(json!({
            "questionFrontendId": "1",
            "title": "Two Sum",
            "titleSlug": "two-sum",
            "content": "<p>Find two numbers.</p>",
            "translatedTitle": null,
            "translatedContent": "",
            "isPaidOnly": false,
            "difficulty": "Easy",
            "topicTags": [{"name": "Array", "translatedName": "数组"}, {"name": "Hash Table"}]
        }))
        .unwrap();
        let q = detail.into_question(None).unwrap();
        assert_eq!(q.title, "Two Sum");
        assert_eq!(q.content_html, "<p>Find two numbers.</p>");
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.topic_tags, vec!["数组".to_string(), "Hash Table".to_string()]);
    }

    #[test]
    fn test_missing_content_is_an_error() {
        let detail: QuestionDetail = serde_json::from_value(json!({
            "titleSlug": "ghost",
            "title": "Ghost",
        }))
        .unwrap();
        assert!(matches!(
            detail.into_question(None),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn test_question_request_carries_slug() {
        let body = question_request("two-sum");
        assert_eq!(body["operationName"], "questionData");
        assert_eq!(body["variables"]["titleSlug"], "two-sum");
    }
}
