#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("symptoms are required")]
    MissingSymptoms,
    #[error("invalid age: {0}")]
    InvalidAge(String),
    #[error("invalid gender: {0}")]
    InvalidGender(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),
}

impl TriageError {
    /// Whether the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TriageError::MissingSymptoms | TriageError::InvalidAge(_) | TriageError::InvalidGender(_)
        )
    }
}

/// Errors raised while loading or validating a knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid knowledge YAML at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("symptom '{0}' has no phrases")]
    EmptyPhrases(String),
    #[error("symptom '{0}' has an empty phrase")]
    BlankPhrase(String),
    #[error("symptom '{0}' is defined more than once")]
    DuplicateSymptom(String),
    #[error("condition name cannot be empty")]
    EmptyConditionName,
    #[error("condition '{0}' is defined more than once")]
    DuplicateCondition(String),
    #[error("condition '{0}' has no symptoms")]
    EmptyConditionSymptoms(String),
    #[error("condition '{condition}' lists symptom '{symptom}' more than once")]
    RepeatedConditionSymptom { condition: String, symptom: String },
    #[error("condition '{condition}' references unknown symptom '{symptom}'")]
    UnknownSymptom { condition: String, symptom: String },
    #[error("condition '{condition}' has base confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { condition: String, value: f64 },
    #[error("condition '{condition}' has no {list} recommendations")]
    EmptyRecommendations {
        condition: String,
        list: &'static str,
    },
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
