//! Kaizen CLI - Daily quests from the terminal
//!
//! Thin client over the Kaizen API: onboarding, the daily batch,
//! completions with celebrations, and progression status.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use uuid::Uuid;

use api::{DailyQuestsResponse, KaizenClient};
use config::Config;

#[derive(Parser)]
#[command(name = "kaizen")]
#[command(about = "Kaizen CLI - daily quests from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Create an account and pick a first goal
    Onboard,

    /// Show player status (level, XP, streak, goals)
    Status,

    /// Quest operations
    Quest {
        #[command(subcommand)]
        action: QuestAction,
    },

    /// Add a goal
    Goal {
        /// Goal label
        label: String,
        /// Personal context for generation
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Show completion history
    History {
        /// Max entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum QuestAction {
    /// Show today's quests (generates a batch if empty)
    List,
    /// Regenerate today's batch
    Generate,
    /// Select the quest of the day
    Select {
        /// Quest id
        id: Uuid,
    },
    /// Complete a quest
    Complete {
        /// Quest id
        id: Uuid,
    },
    /// Undo the latest completion (6-second window)
    Undo,
    /// Replace one quest slot (premium)
    Refresh {
        /// Quest id
        id: Uuid,
    },
    /// Regenerate the whole batch
    RefreshAll,
    /// Add a custom quest
    Add {
        /// Quest title
        title: String,
        /// body | mind | environment | projects | social
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Thumbs up/down on a quest
    Feedback {
        /// Quest id
        id: Uuid,
        /// up | down
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Onboard => cmd_onboard().await,
        Commands::Status => cmd_status().await,
        Commands::Quest { action } => cmd_quest(action).await,
        Commands::Goal { label, context } => cmd_goal(label, context).await,
        Commands::History { limit } => cmd_history(limit).await,
        Commands::Config => cmd_config(),
    }
}

fn client(config: &Config) -> Result<KaizenClient> {
    let api_key = config
        .api_key
        .as_ref()
        .context("Not logged in. Run 'kaizen login' first.")?;
    Ok(KaizenClient::new(&config.base_url, api_key))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    let client = KaizenClient::new(&config.base_url, &api_key);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Kaizen API. Check the base URL.");
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "\u{2713}".green(), Config::config_path()?);

    if config.account_id.is_none() {
        println!("\n{}", "Next: create your account:".yellow());
        println!("  kaizen onboard");
    }

    Ok(())
}

async fn cmd_onboard() -> Result<()> {
    let mut config = Config::load()?;
    let client = client(&config)?;

    if config.account_id.is_some() {
        bail!("An account is already configured. Delete it from the config to start over.");
    }

    let presets = client.list_presets().await?;
    let mut choices: Vec<String> = presets
        .iter()
        .map(|p| format!("{} {}", p.emoji, p.label))
        .collect();
    choices.push("Autre chose...".to_string());

    let picked = Select::new()
        .with_prompt("Quel est ton objectif principal ?")
        .items(&choices)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    let goal = if picked < presets.len() {
        presets[picked].id.clone()
    } else {
        Input::new()
            .with_prompt("Ton objectif")
            .interact_text()
            .context("Failed to read input")?
    };

    let context: String = Input::new()
        .with_prompt("Contexte (optionnel)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;
    let context = if context.trim().is_empty() {
        None
    } else {
        Some(context)
    };

    println!("Generating themes...");
    let created = client.create_player(&goal, context.as_deref()).await?;

    config.account_id = Some(created.id.to_string());
    config.save()?;

    println!(
        "{} Account created: {} (level {})",
        "\u{2713}".green(),
        created.id.to_string().dimmed(),
        created.player.level
    );
    println!("\n{}", "Get your first quests:".yellow());
    println!("  kaizen quest list");

    Ok(())
}

async fn cmd_status() -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;
    let player = client.get_player(config.account_id()?).await?;

    println!(
        "{} {} {}",
        player.title_emoji,
        player.name.cyan().bold(),
        format!("(niveau {})", player.level).dimmed()
    );
    println!("  XP: {}/{}", player.xp, player.xp_to_next);
    println!(
        "  Streak: {} {} (best {})",
        "\u{1f525}",
        player.current_streak,
        player.best_streak
    );
    println!(
        "  Quests: {} | Perfect days: {} | Badges: {}",
        player.quests_completed,
        player.perfect_days,
        player.badges.len()
    );
    if player.premium {
        println!("  {}", "Premium".yellow());
    }

    if !player.goals.is_empty() {
        println!("\n{}", "Goals:".bold());
        for goal in &player.goals {
            let marker = if goal.archived {
                " (archived)".dimmed().to_string()
            } else {
                String::new()
            };
            println!("  {}{}", goal.label.cyan(), marker);
            for theme in &goal.themes {
                println!(
                    "    {} {} ({} quests)",
                    theme.development_level.dimmed(),
                    theme.name,
                    theme.quests_completed
                );
            }
        }
    }

    if let Some(chapter) = player.story_chapters.last() {
        println!("\n{}", format!("Chapter {} - {}:", chapter.level, chapter.title).bold());
        println!("  {}", chapter.story.dimmed());
    }

    Ok(())
}

fn print_quests(daily: &DailyQuestsResponse) {
    if daily.quests.is_empty() {
        println!("No quests for today yet. Run 'kaizen quest generate'.");
        return;
    }

    println!("{}", "Today's quests:".bold());
    for quest in &daily.quests {
        let status = match quest.status.as_str() {
            "selected" => "\u{2b50}".to_string(),
            "completed" => "\u{2713}".green().to_string(),
            "bonus" => "+".yellow().to_string(),
            _ => "\u{00b7}".to_string(),
        };
        println!(
            "  {} {} {} [{}/{}]",
            status,
            quest.id.to_string()[..8].dimmed(),
            quest.title,
            quest.category.dimmed(),
            quest.difficulty.dimmed()
        );
        if let Some(message) = &quest.completion_message {
            println!("      {}", message.italic().dimmed());
        }
    }
    println!("  {}", format!("refreshes used: {}", daily.quest_refreshes_used).dimmed());
}

async fn cmd_quest(action: QuestAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;
    let account_id = config.account_id()?;

    match action {
        QuestAction::List => {
            let mut daily = client.get_quests(account_id).await?;
            if daily.quests.is_empty() {
                println!("Generating today's quests...");
                daily = client.generate_quests(account_id).await?;
            }
            print_quests(&daily);
        }

        QuestAction::Generate => {
            println!("Generating today's quests...");
            let daily = client.generate_quests(account_id).await?;
            print_quests(&daily);
        }

        QuestAction::Select { id } => {
            let daily = client.select_quest(account_id, id).await?;
            println!("{} Quest of the day selected", "\u{2713}".green());
            print_quests(&daily);
        }

        QuestAction::Complete { id } => {
            let result = client.complete_quest(account_id, id).await?;
            if !result.applied {
                println!("{}", "Nothing to do (quest not completable).".yellow());
                return Ok(());
            }
            for c in &result.celebrations {
                match c.kind.as_str() {
                    "quest_completed" => println!(
                        "{} {} (+{} XP)",
                        "\u{2713}".green(),
                        c.quest_title.as_deref().unwrap_or(""),
                        c.xp_gained.unwrap_or(0)
                    ),
                    "badge_earned" => println!(
                        "{} Badge: {} {}",
                        "\u{1f3c5}",
                        c.emoji.as_deref().unwrap_or(""),
                        c.name.as_deref().unwrap_or("")
                    ),
                    "level_up" => {
                        println!(
                            "{} Level {} - {}",
                            "\u{1f389}",
                            c.level.unwrap_or(0),
                            c.title_name.as_deref().unwrap_or("")
                        );
                        if let Some(story) = &c.story {
                            println!("  {}", story.italic());
                        }
                    }
                    "perfect_day" => println!("{} Perfect day!", "\u{1f31f}"),
                    _ => {}
                }
            }
            if let Some(message) = &result.completion_message {
                println!("  {}", message.italic().dimmed());
            }
        }

        QuestAction::Undo => {
            let result = client.undo(account_id).await?;
            if result.restored {
                println!("{} Completion undone", "\u{2713}".green());
            } else {
                println!("{}", "Nothing to undo (window expired).".yellow());
            }
        }

        QuestAction::Refresh { id } => {
            let daily = client.refresh_quest(account_id, id).await?;
            print_quests(&daily);
        }

        QuestAction::RefreshAll => {
            println!("Regenerating the batch...");
            let daily = client.refresh_all(account_id).await?;
            print_quests(&daily);
        }

        QuestAction::Add { title, category } => {
            let daily = client
                .add_custom_quest(account_id, &title, category.as_deref())
                .await?;
            println!("{} Custom quest added", "\u{2713}".green());
            print_quests(&daily);
        }

        QuestAction::Feedback { id, value } => {
            client.set_feedback(account_id, id, &value).await?;
            println!("{} Feedback recorded", "\u{2713}".green());
        }
    }

    Ok(())
}

async fn cmd_goal(label: String, context: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    println!("Generating themes...");
    let player = client
        .add_goal(config.account_id()?, &label, context.as_deref())
        .await?;

    println!("{} Goal added:", "\u{2713}".green());
    if let Some(goal) = player.goals.last() {
        println!("  {}", goal.label.cyan());
        for theme in &goal.themes {
            println!("    - {}", theme.name);
        }
    }
    Ok(())
}

async fn cmd_history(limit: usize) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;
    let entries = client.get_history(config.account_id()?).await?;

    if entries.is_empty() {
        println!("No completions yet.");
        return Ok(());
    }

    println!("{}", "History:".bold());
    for entry in entries.iter().take(limit) {
        let perfect = if entry.was_perfect_day {
            " \u{1f31f}"
        } else {
            ""
        };
        println!(
            "  {} {} [{}]{}",
            entry.date[..10].dimmed(),
            entry.title,
            entry.difficulty.as_deref().unwrap_or("-").dimmed(),
            perfect
        );
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Account: {}",
        config.account_id.as_deref().unwrap_or("None").cyan()
    );

    Ok(())
}
