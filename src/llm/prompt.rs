//! Per-mood prompt templates.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// Placeholder replaced by the formatted commit list.
const COMMITS_PLACEHOLDER: &str = "{commits}";

/// Tone of the generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mood {
    #[default]
    Neutral,
    #[value(alias = "roast")]
    Sarcastic,
    #[value(alias = "hero")]
    Heroic,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Sarcastic => "sarcastic",
            Mood::Heroic => "heroic",
        }
    }

    /// Parse a mood name, falling back to [`Mood::Neutral`] for unknown values.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn prompts(&self) -> MoodPrompts {
        prompts_for(*self)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "sarcastic" | "roast" => Ok(Self::Sarcastic),
            "heroic" | "hero" => Ok(Self::Heroic),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

/// System instruction plus the user-message template for one mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodPrompts {
    pub system: &'static str,
    pub user_template: &'static str,
}

impl MoodPrompts {
    /// Fill the template with the formatted commit list.
    pub fn render_user(&self, commits_text: &str) -> String {
        render_user_prompt(self.user_template, commits_text)
    }
}

const NEUTRAL_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes git commits for daily standup meetings.
Given a list of git commits, create a concise and professional bullet-point summary of what was accomplished.
Group related changes together and focus on the high-level tasks completed.";

const NEUTRAL_USER_TEMPLATE: &str = "Summarize these git commits into a clean bullet-point list for a standup meeting:

{commits}

Rules:
- Create 3-7 bullet points maximum
- Group related commits together
- Focus on WHAT was done, not technical details
- Use past tense
- Be concise and professional";

const SARCASTIC_SYSTEM_PROMPT: &str = "You are a sarcastic code reviewer who roasts developers while summarizing their git commits.
Be funny and sarcastic, but not mean. Focus on common developer habits like:
- Vague commit messages
- Late-night commits
- \"Fixed bug\" without details
- TODOs and quick fixes
Make the roast entertaining while still providing useful information.";

const SARCASTIC_USER_TEMPLATE: &str = "Roast these git commits while summarizing them for standup:

{commits}

Rules:
- Create 3-7 sarcastic bullet points
- Make fun of commit messages, timing, or patterns you see
- Still convey what was actually done
- Be funny, not cruel
- Use emojis for extra sass";

const HEROIC_SYSTEM_PROMPT: &str = "You are an epic narrator who transforms mundane git commits into tales of heroic battles.
Developers are heroes, bugs are monsters, and every fix is an epic victory.
Use dramatic language, battle metaphors, and make even simple changes sound legendary.";

const HEROIC_USER_TEMPLATE: &str = "Transform these git commits into an epic tale for standup:

{commits}

Rules:
- Create 3-7 dramatic bullet points
- Use battle/quest metaphors
- Bugs are monsters/enemies that were vanquished
- Features are legendary artifacts forged
- Make it sound EPIC
- Use emojis like ⚔️ 🛡️ 🏆 🔥";

/// Look up the prompt pair for `mood`.
pub fn prompts_for(mood: Mood) -> MoodPrompts {
    match mood {
        Mood::Neutral => MoodPrompts {
            system: NEUTRAL_SYSTEM_PROMPT,
            user_template: NEUTRAL_USER_TEMPLATE,
        },
        Mood::Sarcastic => MoodPrompts {
            system: SARCASTIC_SYSTEM_PROMPT,
            user_template: SARCASTIC_USER_TEMPLATE,
        },
        Mood::Heroic => MoodPrompts {
            system: HEROIC_SYSTEM_PROMPT,
            user_template: HEROIC_USER_TEMPLATE,
        },
    }
}

/// Substitute the commit list into a user template.
pub fn render_user_prompt(template: &str, commits_text: &str) -> String {
    template.replacen(COMMITS_PLACEHOLDER, commits_text, 1)
}
