// crates/core/src/session.rs
//! Serde types and loader for the session-log JSON input.
//!
//! A log records one observed exploration session: the origin suggestions
//! shown before the first turn, then one entry per turn with the SQL the
//! user chose (if any) and the follow-up suggestions offered after it.
//! Missing or empty SQL fields are skipped, never errors — a turn where
//! the user only read results still counts as a turn.

use std::path::Path;

use serde::Deserialize;

use crate::error::LogError;

/// One observed query-recommendation session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
    /// Database identifier; used by callers to locate the matching schema.
    #[serde(default)]
    pub db_id: Option<String>,
    /// SQL suggestions shown before the first turn.
    #[serde(default)]
    pub origin_suggestions: Vec<String>,
    /// Turns in chronological order.
    pub turns: Vec<Turn>,
}

/// One turn of the session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// The SQL the user chose to execute this turn, if any.
    #[serde(default)]
    pub sql: Option<String>,
    /// SQL suggestions offered after this turn.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl SessionLog {
    /// Load a session log from a JSON file. An unreadable or malformed
    /// file is the one genuine fatal condition of the engine.
    pub fn load(path: &Path) -> Result<Self, LogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LogError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| LogError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The SQL strings the user actually chose, in turn order. Turns with
    /// a missing or blank SQL field are skipped.
    pub fn chosen_queries(&self) -> Vec<&str> {
        self.turns
            .iter()
            .filter_map(|turn| turn.sql.as_deref())
            .filter(|sql| !sql.trim().is_empty())
            .collect()
    }

    /// Every SQL string offered as a suggestion at any point: the origin
    /// list plus each turn's follow-up list. Blank entries are skipped.
    pub fn recommendation_pool(&self) -> Vec<&str> {
        self.origin_suggestions
            .iter()
            .map(String::as_str)
            .chain(
                self.turns
                    .iter()
                    .flat_map(|turn| turn.suggestions.iter().map(String::as_str)),
            )
            .filter(|sql| !sql.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_LOG: &str = r#"{
        "dbId": "concert_singer",
        "originSuggestions": [
            "SELECT name FROM singer",
            "SELECT COUNT(*) FROM concert"
        ],
        "turns": [
            {
                "sql": "SELECT name FROM singer",
                "suggestions": ["SELECT name, age FROM singer"]
            },
            {
                "suggestions": ["SELECT * FROM stadium"]
            },
            {
                "sql": "  ",
                "suggestions": []
            },
            {
                "sql": "SELECT name, age FROM singer WHERE age > 30"
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_sample() {
        let log: SessionLog = serde_json::from_str(SAMPLE_LOG).unwrap();
        assert_eq!(log.db_id.as_deref(), Some("concert_singer"));
        assert_eq!(log.origin_suggestions.len(), 2);
        assert_eq!(log.turns.len(), 4);
    }

    #[test]
    fn test_chosen_queries_skip_missing_and_blank() {
        let log: SessionLog = serde_json::from_str(SAMPLE_LOG).unwrap();
        assert_eq!(
            log.chosen_queries(),
            vec![
                "SELECT name FROM singer",
                "SELECT name, age FROM singer WHERE age > 30"
            ]
        );
    }

    #[test]
    fn test_recommendation_pool_includes_origin_and_turns() {
        let log: SessionLog = serde_json::from_str(SAMPLE_LOG).unwrap();
        let pool = log.recommendation_pool();
        assert_eq!(pool.len(), 4);
        assert!(pool.contains(&"SELECT COUNT(*) FROM concert"));
        assert!(pool.contains(&"SELECT * FROM stadium"));
    }

    #[test]
    fn test_minimal_log() {
        let log: SessionLog = serde_json::from_str(r#"{"turns": []}"#).unwrap();
        assert!(log.db_id.is_none());
        assert!(log.chosen_queries().is_empty());
        assert!(log.recommendation_pool().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionLog::load(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = SessionLog::load(&path).unwrap_err();
        assert!(matches!(err, LogError::MalformedJson { .. }));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, SAMPLE_LOG).unwrap();
        let log = SessionLog::load(&path).unwrap();
        assert_eq!(log.chosen_queries().len(), 2);
    }
}
