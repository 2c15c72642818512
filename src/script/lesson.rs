use std::collections::HashSet;

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use thiserror::Error;

static LESSON_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lessons");

/// Bundled lesson scripts
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LessonVariant {
    /// 14 sections with circled-number headings
    Standard,
    /// 15 condensed sections
    Compact,
}

impl LessonVariant {
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }

    pub fn load(&self) -> Result<Lesson, LessonError> {
        read_lesson(&self.file_name())
    }

    /// Parses a variant name as stored in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("lesson file {0} is not bundled")]
    Missing(String),
    #[error("lesson file {0} is not valid UTF-8")]
    Encoding(String),
    #[error("lesson file {file} is malformed: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
    #[error("lesson {0} has no sections")]
    Empty(String),
    #[error("lesson {lesson} repeats section key {key}")]
    DuplicateKey { lesson: String, key: String },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Assets {
    pub background: String,
    pub bell: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Lesson {
    pub name: String,
    pub description: String,
    pub heading: String,
    pub assets: Assets,
    #[serde(default)]
    pub emphasis: Vec<String>,
    pub sections: Vec<Section>,
}

impl Lesson {
    pub fn from_json(file: &str, json: &str) -> Result<Self, LessonError> {
        let lesson: Lesson = serde_json::from_str(json).map_err(|source| LessonError::Parse {
            file: file.to_string(),
            source,
        })?;
        lesson.validate()?;
        Ok(lesson)
    }

    fn validate(&self) -> Result<(), LessonError> {
        if self.sections.is_empty() {
            return Err(LessonError::Empty(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.key.as_str()) {
                return Err(LessonError::DuplicateKey {
                    lesson: self.name.clone(),
                    key: section.key.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}

fn read_lesson(file_name: &str) -> Result<Lesson, LessonError> {
    let file = LESSON_DIR
        .get_file(file_name)
        .ok_or_else(|| LessonError::Missing(file_name.to_string()))?;

    let json = file
        .contents_utf8()
        .ok_or_else(|| LessonError::Encoding(file_name.to_string()))?;

    Lesson::from_json(file_name, json)
}

#[derive(Deserialize)]
struct TopicFile {
    topics: Vec<String>,
}

/// The bundled pool of conversation prompts
pub fn topic_pool() -> Result<Vec<String>, LessonError> {
    const FILE: &str = "topics.json";
    let file = LESSON_DIR
        .get_file(FILE)
        .ok_or_else(|| LessonError::Missing(FILE.to_string()))?;
    let json = file
        .contents_utf8()
        .ok_or_else(|| LessonError::Encoding(FILE.to_string()))?;
    let parsed: TopicFile = serde_json::from_str(json).map_err(|source| LessonError::Parse {
        file: FILE.to_string(),
        source,
    })?;
    Ok(parsed.topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn standard_lesson_has_fourteen_sections() {
        let lesson = LessonVariant::Standard.load().unwrap();

        assert_eq!(lesson.name, "standard");
        assert_eq!(lesson.sections.len(), 14);
        assert_eq!(lesson.sections[0].key, "preparation");
        assert_eq!(lesson.sections[0].title, "準備");
        assert_eq!(lesson.sections[13].key, "impression");
        assert_eq!(lesson.assets.bell, "audio/alarm.mp3");
    }

    #[test]
    fn compact_lesson_has_fifteen_sections() {
        let lesson = LessonVariant::Compact.load().unwrap();

        assert_eq!(lesson.sections.len(), 15);
        assert_eq!(lesson.sections[14].key, "closing");
        assert_eq!(lesson.sections[14].title, "終わりの挨拶");
        assert!(lesson.emphasis.is_empty());
    }

    #[test]
    fn standard_script_carries_the_date_token() {
        let lesson = LessonVariant::Standard.load().unwrap();
        let body = &lesson.section("measurement").unwrap().body;
        assert!(body.contains("__DATETIME__"));
    }

    #[test]
    fn variant_names_round_trip() {
        assert_eq!(LessonVariant::Standard.to_string(), "standard");
        assert_eq!(LessonVariant::Compact.file_name(), "compact.json");
        assert_eq!(LessonVariant::from_name("Compact"), Some(LessonVariant::Compact));
        assert_eq!(LessonVariant::from_name("weekly"), None);
    }

    #[test]
    fn topic_pool_has_twenty_distinct_prompts() {
        let pool = topic_pool().unwrap();
        let distinct: HashSet<_> = pool.iter().collect();
        assert_eq!(pool.len(), 20);
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let json = r#"{
            "name": "broken", "description": "", "heading": "h",
            "assets": {"background": "a.mp3", "bell": "b.mp3"},
            "sections": [
                {"key": "intro", "title": "A", "body": ""},
                {"key": "intro", "title": "B", "body": ""}
            ]
        }"#;

        assert_matches!(
            Lesson::from_json("broken.json", json),
            Err(LessonError::DuplicateKey { key, .. }) if key == "intro"
        );
    }

    #[test]
    fn empty_lessons_are_rejected() {
        let json = r#"{
            "name": "empty", "description": "", "heading": "h",
            "assets": {"background": "a.mp3", "bell": "b.mp3"},
            "sections": []
        }"#;

        assert_matches!(
            Lesson::from_json("empty.json", json),
            Err(LessonError::Empty(_))
        );
    }

    #[test]
    fn unknown_file_is_missing() {
        assert_matches!(read_lesson("nope.json"), Err(LessonError::Missing(_)));
    }
}
