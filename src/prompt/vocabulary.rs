use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::error::{PonchieError, Result};

static VOCAB_DIR: Dir = include_dir!("src/vocab");

/// Name of the vocabulary shipped with the binary.
pub const BUILTIN_VOCABULARY: &str = "dojo";

/// One word part: the text shown to the player plus an English gloss
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordPart {
    pub text: String,
    pub gloss: String,
}

impl WordPart {
    pub fn new(text: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            gloss: gloss.into(),
        }
    }
}

/// The fixed word lists prompts are composed from.
///
/// `subjects`, `actions` and `contexts` feed situational prompts,
/// `modifiers` and `objects` feed object prompts.
#[derive(Deserialize, Clone, Debug)]
pub struct Vocabulary {
    pub name: String,
    pub subjects: Vec<WordPart>,
    pub actions: Vec<WordPart>,
    pub contexts: Vec<WordPart>,
    pub modifiers: Vec<WordPart>,
    pub objects: Vec<WordPart>,
}

impl Vocabulary {
    /// Load the vocabulary embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::load(BUILTIN_VOCABULARY)
    }

    /// Load and validate an embedded vocabulary by name
    pub fn load(name: &str) -> Result<Self> {
        let vocabulary = read_vocabulary_from_file(format!("{name}.json"))?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Every list must have at least one entry and no entry may be blank.
    pub fn validate(&self) -> Result<()> {
        for (list, parts) in self.lists() {
            if parts.is_empty() {
                return Err(PonchieError::EmptyVocabulary(list));
            }
            if let Some(index) = parts.iter().position(|p| p.text.trim().is_empty()) {
                return Err(PonchieError::EmptyWordPart { list, index });
            }
        }
        Ok(())
    }

    /// Number of distinct situational prompts
    pub fn situational_combinations(&self) -> usize {
        self.subjects.len() * self.actions.len() * self.contexts.len()
    }

    /// Number of distinct object prompts
    pub fn object_combinations(&self) -> usize {
        self.modifiers.len() * self.objects.len()
    }

    fn lists(&self) -> [(&'static str, &[WordPart]); 5] {
        [
            ("subjects", self.subjects.as_slice()),
            ("actions", self.actions.as_slice()),
            ("contexts", self.contexts.as_slice()),
            ("modifiers", self.modifiers.as_slice()),
            ("objects", self.objects.as_slice()),
        ]
    }
}

fn read_vocabulary_from_file(file_name: String) -> Result<Vocabulary> {
    let file = VOCAB_DIR
        .get_file(&file_name)
        .ok_or_else(|| PonchieError::VocabularyData {
            file: file_name.clone(),
            reason: "not found".to_string(),
        })?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| PonchieError::VocabularyData {
            file: file_name.clone(),
            reason: "not valid utf-8".to_string(),
        })?;

    from_str(file_as_str).map_err(|e| PonchieError::VocabularyData {
        file: file_name,
        reason: e.to_string(),
    })
}
