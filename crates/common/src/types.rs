use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical problem page prefix used when rendering links.
pub const PROBLEM_URL_PREFIX: &str = "https://leetcode.cn/problems";

/// Name the plugin reports back to the host with every reply.
pub const PLUGIN_NAME: &str = "LeetCode";

/// Opaque identifier of a chat channel on the host platform.
///
/// Hosts hand out either numeric or string ids; both decode to the same
/// string form, and the id is always written back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ChannelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ChannelId(s),
            RawId::Signed(n) => ChannelId(n.to_string()),
            RawId::Unsigned(n) => ChannelId(n.to_string()),
        })
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Host platform an inbound event originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    /// QQ guild channels (the only platform this plugin answers on)
    QqChannel,
    /// QQ via go-cqhttp
    GoCq,
    Other(String),
}

impl Platform {
    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::QqChannel)
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "qqchan" => Platform::QqChannel,
            "gocq" => Platform::GoCq,
            _ => Platform::Other(tag),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::QqChannel => write!(f, "qqchan"),
            Platform::GoCq => write!(f, "gocq"),
            Platform::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// A chat message delivered to the plugin by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub platform: Platform,
    pub message: String,
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
}

/// Problem difficulty as reported by the question service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Today's question, built fresh on every fetch and dropped after rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub frontend_id: String,
    pub title_slug: String,
    /// Localized title, or the English one when no translation exists
    pub title: String,
    pub difficulty: Difficulty,
    /// Localized HTML statement, or the English one when no translation exists
    pub content_html: String,
    /// Date the service assigned this question as the daily record
    pub date: Option<NaiveDate>,
    pub paid_only: bool,
    pub topic_tags: Vec<String>,
}

impl Question {
    pub fn link(&self) -> String {
        format!("{}/{}/", PROBLEM_URL_PREFIX, self.title_slug)
    }
}

/// What the plugin answers for a handled event.
///
/// `success = false` marks a user-visible failure (e.g. already subscribed),
/// not an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginReply {
    pub success: bool,
    pub message: String,
    pub command: String,
}

impl PluginReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            command: PLUGIN_NAME.to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            command: PLUGIN_NAME.to_string(),
        }
    }
}

/// Metadata shown by the host's plugin help command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub desc: String,
    pub help: String,
    pub version: String,
    pub author: String,
}

/// Result of a subscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

/// A channel the scheduled delivery could not reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub channel_id: ChannelId,
    pub error: String,
}

/// Summary of one scheduled delivery cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub started_at: DateTime<Utc>,
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_accepts_strings_and_integers() {
        let ids: Vec<ChannelId> = serde_json::from_str(r#"["abc", 12345, -7]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                ChannelId::new("abc"),
                ChannelId::new("12345"),
                ChannelId::new("-7")
            ]
        );
        assert_eq!(
            serde_json::to_string(&ids).unwrap(),
            r#"["abc","12345","-7"]"#
        );
    }

    #[test]
    fn test_platform_tags() {
        let event: InboundEvent =
            serde_json::from_str(r#"{"platform": "qqchan", "message": "每日一题"}"#).unwrap();
        assert_eq!(event.platform, Platform::QqChannel);
        assert!(event.platform.is_supported());
        assert!(event.channel_id.is_none());

        assert_eq!(Platform::from("gocq".to_string()), Platform::GoCq);
        assert!(!Platform::GoCq.is_supported());
        let other = Platform::from("discord".to_string());
        assert_eq!(other.to_string(), "discord");
        assert!(!other.is_supported());
    }

    #[test]
    fn test_unknown_difficulty_does_not_fail() {
        let d: Difficulty = serde_json::from_str(r#""Nightmare""#).unwrap();
        assert_eq!(d, Difficulty::Unknown);
        let d: Difficulty = serde_json::from_str(r#""Medium""#).unwrap();
        assert_eq!(d.to_string(), "Medium");
    }

    #[test]
    fn test_question_link() {
        let q = Question {
            frontend_id: "1".into(),
            title_slug: "two-sum".into(),
            title: "两数之和".into(),
            difficulty: Difficulty::Easy,
            content_html: String::new(),
            date: None,
            paid_only: false,
            topic_tags: vec![],
        };
        assert_eq!(q.link(), "https://leetcode.cn/problems/two-sum/");
    }
}
