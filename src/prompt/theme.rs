use serde::Serialize;
use uuid::Uuid;

/// Which template produced a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum ThemeMode {
    /// subject + action, in a context
    Situational,
    /// a modified still object
    Object,
    /// placeholder used by free mode, never generated
    Free,
}

/// A drawing prompt. Created once per round and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub id: String,
    pub main_text: String,
    pub sub_text: String,
    pub mode: ThemeMode,
    /// English description of the scene, composed from the word glosses
    pub image_prompt: String,
}

impl Theme {
    pub fn new(
        main_text: impl Into<String>,
        sub_text: impl Into<String>,
        mode: ThemeMode,
        image_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            main_text: main_text.into(),
            sub_text: sub_text.into(),
            mode,
            image_prompt: image_prompt.into(),
        }
    }

    /// Synthetic theme for free mode
    pub fn free_draw() -> Self {
        Self::new("好きなものを描こう", "自由練習", ThemeMode::Free, "")
    }

    /// The text history compares on: sub text followed by main text
    pub fn full_text(&self) -> String {
        format!("{}{}", self.sub_text, self.main_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_puts_context_first() {
        let theme = Theme::new("猫が走っている", "宇宙で", ThemeMode::Situational, "");
        assert_eq!(theme.full_text(), "宇宙で猫が走っている");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Theme::free_draw();
        let b = Theme::free_draw();
        assert_ne!(a.id, b.id);
        assert_eq!(a.mode, ThemeMode::Free);
    }
}
