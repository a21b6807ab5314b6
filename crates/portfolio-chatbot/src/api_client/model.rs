use serde::{Deserialize, Serialize};

/// Closed set of question categories the answer function classifies into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionCategory {
    Experience,
    TechnicalSkills,
    Projects,
    Education,
    Languages,
    CareerJourney,
    General,
    Contact,
    OffTopic,
}

/// Structured reply from the answer function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub category: QuestionCategory,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_suggestions: Option<Vec<String>>,
}

/// One unit of the synthesized SSE stream.
///
/// `answer` is a growing whole-word prefix of the final answer; the last
/// frame for a turn carries `isComplete = true` and is followed on the
/// wire by a literal `[DONE]` sentinel frame. Only `isComplete` deviates
/// from snake_case in the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamFrame {
    pub answer: String,
    pub category: QuestionCategory,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_suggestions: Option<Vec<String>>,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl StreamFrame {
    /// Recover the full structured answer from a completed frame.
    pub fn into_response(self) -> AnswerResponse {
        AnswerResponse {
            answer: self.answer,
            category: self.category,
            sources: self.sources,
            urls: self.urls,
            follow_up_suggestions: self.follow_up_suggestions,
        }
    }
}
