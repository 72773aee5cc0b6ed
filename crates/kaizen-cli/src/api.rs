//! Kaizen API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Kaizen
pub struct KaizenClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct PlayerResponse {
    pub name: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub title_name: String,
    pub title_emoji: String,
    pub badges: Vec<String>,
    pub quests_completed: u32,
    pub perfect_days: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub premium: bool,
    pub goals: Vec<GoalResponse>,
    pub story_chapters: Vec<StoryChapterResponse>,
}

#[derive(Debug, Deserialize)]
pub struct GoalResponse {
    pub id: Uuid,
    pub label: String,
    pub archived: bool,
    pub themes: Vec<ThemeResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeResponse {
    pub name: String,
    pub quests_completed: u32,
    pub development_level: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryChapterResponse {
    pub level: u32,
    pub title: String,
    pub story: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerResponse {
    pub id: Uuid,
    pub player: PlayerResponse,
}

#[derive(Debug, Deserialize)]
pub struct QuestResponse {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub status: String,
    pub completion_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyQuestsResponse {
    pub quests: Vec<QuestResponse>,
    pub quest_refreshes_used: u32,
}

#[derive(Debug, Deserialize)]
pub struct CelebrationResponse {
    pub kind: String,
    pub quest_title: Option<String>,
    pub xp_gained: Option<u32>,
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub level: Option<u32>,
    pub title_name: Option<String>,
    pub story: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteResponse {
    pub applied: bool,
    pub completion_message: Option<String>,
    pub celebrations: Vec<CelebrationResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UndoResponse {
    pub restored: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntryResponse {
    pub title: String,
    pub date: String,
    pub was_perfect_day: bool,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PresetGoalResponse {
    pub id: String,
    pub label: String,
    pub emoji: String,
}

#[derive(Debug, Serialize)]
struct OnboardingRequest<'a> {
    goal: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AddGoalRequest<'a> {
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AddCustomQuestRequest<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    feedback: &'a str,
}

impl KaizenClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request
            .send()
            .await
            .context("Failed to connect to Kaizen API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    pub async fn list_presets(&self) -> Result<Vec<PresetGoalResponse>> {
        self.request(Method::GET, "/kaizen/presets", None).await
    }

    pub async fn create_player(
        &self,
        goal: &str,
        context: Option<&str>,
    ) -> Result<CreatePlayerResponse> {
        let body = serde_json::to_value(OnboardingRequest { goal, context })?;
        self.request(Method::POST, "/kaizen/players", Some(body))
            .await
    }

    pub async fn get_player(&self, account_id: &str) -> Result<PlayerResponse> {
        self.request(
            Method::GET,
            &format!("/kaizen/players/{}", account_id),
            None,
        )
        .await
    }

    pub async fn add_goal(
        &self,
        account_id: &str,
        label: &str,
        context: Option<&str>,
    ) -> Result<PlayerResponse> {
        let body = serde_json::to_value(AddGoalRequest { label, context })?;
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/goals", account_id),
            Some(body),
        )
        .await
    }

    pub async fn get_quests(&self, account_id: &str) -> Result<DailyQuestsResponse> {
        self.request(
            Method::GET,
            &format!("/kaizen/players/{}/quests", account_id),
            None,
        )
        .await
    }

    pub async fn generate_quests(&self, account_id: &str) -> Result<DailyQuestsResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/generate", account_id),
            None,
        )
        .await
    }

    pub async fn select_quest(&self, account_id: &str, quest_id: Uuid) -> Result<DailyQuestsResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/{}/select", account_id, quest_id),
            None,
        )
        .await
    }

    pub async fn complete_quest(&self, account_id: &str, quest_id: Uuid) -> Result<CompleteResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/{}/complete", account_id, quest_id),
            None,
        )
        .await
    }

    pub async fn undo(&self, account_id: &str) -> Result<UndoResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/undo", account_id),
            None,
        )
        .await
    }

    pub async fn refresh_quest(&self, account_id: &str, quest_id: Uuid) -> Result<DailyQuestsResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/{}/refresh", account_id, quest_id),
            None,
        )
        .await
    }

    pub async fn refresh_all(&self, account_id: &str) -> Result<DailyQuestsResponse> {
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests/refresh-all", account_id),
            None,
        )
        .await
    }

    pub async fn add_custom_quest(
        &self,
        account_id: &str,
        title: &str,
        category: Option<&str>,
    ) -> Result<DailyQuestsResponse> {
        let body = serde_json::to_value(AddCustomQuestRequest { title, category })?;
        self.request(
            Method::POST,
            &format!("/kaizen/players/{}/quests", account_id),
            Some(body),
        )
        .await
    }

    pub async fn set_feedback(&self, account_id: &str, quest_id: Uuid, feedback: &str) -> Result<()> {
        let url = format!(
            "{}/kaizen/players/{}/quests/{}/feedback",
            self.base_url, account_id, quest_id
        );
        let body = serde_json::to_value(FeedbackRequest { feedback })?;
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Failed to connect to Kaizen API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }
        Ok(())
    }

    pub async fn get_history(&self, account_id: &str) -> Result<Vec<HistoryEntryResponse>> {
        self.request(
            Method::GET,
            &format!("/kaizen/players/{}/history", account_id),
            None,
        )
        .await
    }
}
