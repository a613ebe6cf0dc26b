use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{
    history::PromptHistory,
    random::RandomSource,
    theme::{Theme, ThemeMode},
    vocabulary::{Vocabulary, WordPart},
};
use crate::error::Result;

/// Joins subject and action in situational prompts
const SUBJECT_PARTICLE: &str = "が";

/// Tunables for prompt composition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Probability of a situational prompt, the rest are object prompts
    pub situational_weight: f64,
    /// Attempts made to find a prompt that is not in the recent history
    pub retry_limit: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            situational_weight: 0.5,
            retry_limit: 5,
        }
    }
}

/// Composes themes from a validated vocabulary
#[derive(Debug, Clone)]
pub struct PromptGenerator {
    vocabulary: Vocabulary,
    config: GeneratorConfig,
}

impl PromptGenerator {
    /// Fails when any vocabulary list is empty, so `generate` never can.
    pub fn new(vocabulary: Vocabulary, config: GeneratorConfig) -> Result<Self> {
        vocabulary.validate()?;
        Ok(Self { vocabulary, config })
    }

    /// Generate the next theme and record it in `history`.
    ///
    /// Retries while the composed text is already in the history. When every
    /// attempt collides the last one is used anyway.
    pub fn generate(&self, history: &mut PromptHistory, rng: &mut dyn RandomSource) -> Theme {
        let attempts = self.config.retry_limit.max(1);
        let mut theme = self.compose(rng);

        for attempt in 1..attempts {
            if !history.contains(&theme.full_text()) {
                break;
            }
            tracing::debug!(attempt, text = %theme.full_text(), "prompt collided with history");
            theme = self.compose(rng);
        }

        if history.contains(&theme.full_text()) {
            tracing::debug!(text = %theme.full_text(), "accepting repeated prompt");
        }

        history.record(theme.full_text());
        theme
    }

    fn compose(&self, rng: &mut dyn RandomSource) -> Theme {
        if rng.chance(self.config.situational_weight) {
            self.compose_situational(rng)
        } else {
            self.compose_object(rng)
        }
    }

    fn compose_situational(&self, rng: &mut dyn RandomSource) -> Theme {
        let subject = choose(&self.vocabulary.subjects, rng);
        let action = choose(&self.vocabulary.actions, rng);
        let context = choose(&self.vocabulary.contexts, rng);

        let image_prompt = [
            subject.gloss.as_str(),
            action.gloss.as_str(),
            context.gloss.as_str(),
            "photorealistic",
            "detailed",
        ]
        .iter()
        .join(", ");

        Theme::new(
            format!("{}{}{}", subject.text, SUBJECT_PARTICLE, action.text),
            context.text.clone(),
            ThemeMode::Situational,
            image_prompt,
        )
    }

    fn compose_object(&self, rng: &mut dyn RandomSource) -> Theme {
        let modifier = choose(&self.vocabulary.modifiers, rng);
        let object = choose(&self.vocabulary.objects, rng);

        let image_prompt = format!(
            "{} {}, photorealistic, still life",
            modifier.gloss, object.gloss
        );

        Theme::new(
            object.text.clone(),
            modifier.text.clone(),
            ThemeMode::Object,
            image_prompt,
        )
    }
}

fn choose<'a>(parts: &'a [WordPart], rng: &mut dyn RandomSource) -> &'a WordPart {
    &parts[rng.pick(parts.len())]
}
