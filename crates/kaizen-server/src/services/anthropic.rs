//! Anthropic Generator - QuestGenerator over the Anthropic Messages API
//!
//! Builds the generation prompts, strips code fences from the model
//! output and validates the returned JSON shape. Malformed output is an
//! `ExternalService` error; the caller decides what to abort.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use kaizen::{
    DomainError, GeneratedQuest, GeneratedTheme, QuestBatchRequest, QuestGenerator, StoryRequest,
};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Clone)]
pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct QuestsPayload {
    quests: Vec<GeneratedQuest>,
}

#[derive(Deserialize)]
struct ThemesPayload {
    themes: Vec<GeneratedTheme>,
}

impl AnthropicGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, DomainError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        body.content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| DomainError::ExternalService("empty completion".to_string()))
    }

    fn build_goals_block(request: &QuestBatchRequest) -> String {
        request
            .goals
            .iter()
            .map(|goal| {
                let themes = goal
                    .themes
                    .iter()
                    .map(|t| {
                        format!(
                            "{} [goalId=\"{}\", themeId=\"{}\"] ({} qu\u{ea}tes, niveau: {}, difficult\u{e9} sugg\u{e9}r\u{e9}e: {})",
                            t.name,
                            goal.goal_id,
                            t.theme_id,
                            t.quests_completed,
                            t.development_level,
                            t.suggested_difficulty
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n  - ");
                let context = goal
                    .context
                    .as_deref()
                    .map(|c| format!("\n  Contexte: \"{}\"", c))
                    .unwrap_or_default();
                format!(
                    "Objectif \"{}\" [goalId=\"{}\"]:{}\n  - {}",
                    goal.label, goal.goal_id, context, themes
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn build_batch_prompt(request: &QuestBatchRequest) -> String {
        let has_goals = !request.goals.is_empty();
        let avoid = if request.recent_titles.is_empty() {
            "aucune".to_string()
        } else {
            request.recent_titles.join(", ")
        };

        let mixed_difficulty = if request.count <= 3 {
            "1 facile, 1 moyen, 1 difficile."
        } else {
            "2 faciles, 2 moyens, 1 difficile."
        };

        let goal_section = if has_goals {
            format!(
                "{}\n\nR\u{c8}GLE CRUCIALE - Difficult\u{e9} adapt\u{e9}e au niveau:\n\
                 - Th\u{e8}mes \"none\" ou \"low\" (0-3 qu\u{ea}tes) \u{2192} difficult\u{e9} FACILE (d\u{e9}couverte)\n\
                 - Th\u{e8}mes \"medium\" (4-7 qu\u{ea}tes) \u{2192} difficult\u{e9} MOYENNE (progression)\n\
                 - Th\u{e8}mes \"high\" ou \"advanced\" (8+ qu\u{ea}tes) \u{2192} difficult\u{e9} DIFFICILE (challenge)\n\n\
                 Priorit\u{e9} aux th\u{e8}mes peu d\u{e9}velopp\u{e9}s. Varie les th\u{e8}mes.\n\
                 IMPORTANT: Utilise les goalId et themeId EXACTS fournis entre crochets ci-dessus.",
                Self::build_goals_block(request)
            )
        } else {
            format!("Am\u{e9}lioration g\u{e9}n\u{e9}rale, {}", mixed_difficulty)
        };

        let pinned_section = if request.pinned_titles.is_empty() {
            String::new()
        } else {
            format!(
                "\n\nInclure \u{e9}galement, en plus du quota, une qu\u{ea}te pour chacun de ces titres \u{e9}pingl\u{e9}s: {}",
                request.pinned_titles.join(", ")
            )
        };

        let id_fields = if has_goals {
            ", \"goalId\": \"goalId-exact\", \"themeId\": \"themeId-exact\""
        } else {
            ""
        };

        format!(
            "G\u{e9}n\u{e8}re {} qu\u{ea}tes quotidiennes. JSON uniquement.\n\n{}{}\n\n\u{c9}viter: {}\n\n\
             Format:\n{{\"quests\": [{{\"title\": \"Action\", \"category\": \"body|mind|environment|projects|social\", \"difficulty\": \"easy|medium|hard\"{}}}, ...]}}",
            request.count, goal_section, pinned_section, avoid, id_fields
        )
    }
}

/// Strip markdown code fences the model sometimes wraps JSON in
fn strip_code_fences(text: &str) -> String {
    text.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[async_trait]
impl QuestGenerator for AnthropicGenerator {
    async fn generate_quest_batch(
        &self,
        request: &QuestBatchRequest,
    ) -> Result<Vec<GeneratedQuest>, DomainError> {
        let prompt = Self::build_batch_prompt(request);
        let text = self.complete(prompt, 1500).await?;

        let payload: QuestsPayload = serde_json::from_str(&strip_code_fences(&text))
            .map_err(|e| DomainError::ExternalService(format!("unparseable quest batch: {}", e)))?;

        if payload.quests.is_empty() {
            return Err(DomainError::ExternalService(
                "generator returned an empty batch".to_string(),
            ));
        }

        let mut quests = payload.quests;
        for quest in &mut quests {
            quest.is_pinned = request
                .pinned_titles
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&quest.title));
        }
        Ok(quests)
    }

    async fn generate_themes_for_goal(
        &self,
        label: &str,
        context: Option<&str>,
    ) -> Result<Vec<GeneratedTheme>, DomainError> {
        let context_line = context
            .map(|c| format!("\nContexte: \"{}\"", c))
            .unwrap_or_default();
        let prompt = format!(
            "Analyse: \"{}\"{}\n\nIdentifie 2-10 th\u{e8}mes essentiels.\n\nJSON:\n{{\"themes\": [{{\"id\": \"id\", \"name\": \"Nom\"}}]}}",
            label, context_line
        );
        let text = self.complete(prompt, 800).await?;

        let payload: ThemesPayload = serde_json::from_str(&strip_code_fences(&text))
            .map_err(|e| DomainError::ExternalService(format!("unparseable themes: {}", e)))?;

        if payload.themes.is_empty() {
            return Err(DomainError::ExternalService(
                "generator returned no themes".to_string(),
            ));
        }
        Ok(payload.themes)
    }

    async fn generate_level_up_story(
        &self,
        request: &StoryRequest,
    ) -> Result<String, DomainError> {
        let goals = if request.goals_summary.is_empty() {
            "Am\u{e9}lioration"
        } else {
            &request.goals_summary
        };
        let quests = request
            .recent_quest_titles
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        let previous = if request.previous_chapters.is_empty() {
            String::new()
        } else {
            format!(
                "Pr\u{e9}c\u{e9}dents:\n{}",
                request
                    .previous_chapters
                    .iter()
                    .map(|ch| format!("{}: \"{}...\"", ch.level, ch.excerpt))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        };

        let prompt = format!(
            "Niveau {} ({}).\n\nObjectifs: {}\n\nQu\u{ea}tes:\n{}\n\n{}\n\nR\u{e9}cit court (3-5 phrases), ton zen, pas de liste, progression visible.\n\nUniquement le r\u{e9}cit.",
            request.level, request.title_name, goals, quests, previous
        );

        let text = self.complete(prompt, 500).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_completion_message(&self, quest_title: &str) -> Result<String, DomainError> {
        let prompt = format!(
            "Qu\u{ea}te accomplie : \"{}\"\n\nG\u{e9}n\u{e8}re UNE seule phrase courte et motivante sur le b\u{e9}n\u{e9}fice concret de cette action pour le d\u{e9}veloppement personnel. Ton bienveillant et zen. Pas de guillemets. Uniquement la phrase.",
            quest_title
        );
        let text = self.complete(prompt, 100).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaizen::{GoalContext, ThemeContext};
    use kaizen::{DevelopmentLevel, Difficulty};
    use uuid::Uuid;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"quests\": []}\n```"),
            "{\"quests\": []}"
        );
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_batch_prompt_without_goals_mixes_difficulty() {
        let request = QuestBatchRequest {
            count: 3,
            ..Default::default()
        };
        let prompt = AnthropicGenerator::build_batch_prompt(&request);
        assert!(prompt.contains("1 facile, 1 moyen, 1 difficile."));
        assert!(!prompt.contains("goalId-exact"));
    }

    #[test]
    fn test_batch_prompt_with_goals_carries_ids() {
        let goal_id = Uuid::new_v4();
        let request = QuestBatchRequest {
            count: 3,
            goals: vec![GoalContext {
                goal_id,
                label: "Sport".to_string(),
                context: None,
                themes: vec![ThemeContext {
                    theme_id: "cardio".to_string(),
                    name: "Cardio".to_string(),
                    quests_completed: 5,
                    development_level: DevelopmentLevel::Medium,
                    suggested_difficulty: Difficulty::Medium,
                }],
            }],
            ..Default::default()
        };
        let prompt = AnthropicGenerator::build_batch_prompt(&request);
        assert!(prompt.contains(&goal_id.to_string()));
        assert!(prompt.contains("themeId=\"cardio\""));
        assert!(prompt.contains("goalId-exact"));
    }

    #[test]
    fn test_generated_quest_payload_parses() {
        let text = "```json\n{\"quests\": [{\"title\": \"Marcher 20 minutes\", \"category\": \"body\", \"difficulty\": \"easy\"}]}\n```";
        let payload: QuestsPayload = serde_json::from_str(&strip_code_fences(text)).unwrap();
        assert_eq!(payload.quests.len(), 1);
        assert_eq!(payload.quests[0].difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_bad_category_rejected() {
        let text = "{\"quests\": [{\"title\": \"X\", \"category\": \"finance\", \"difficulty\": \"easy\"}]}";
        assert!(serde_json::from_str::<QuestsPayload>(text).is_err());
    }
}
