//! School Entity Shapes
//!
//! Typed views of the documents stored in the school collections. Stored
//! bodies stay schemaless JSON; these shapes are what a body must decode into
//! before it is accepted, and decoding normalizes it (defaults filled in,
//! unknown fields dropped).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SharedError;

/// Timestamps inside document bodies use a fixed millisecond RFC 3339 form
/// so that string comparison matches chronological order.
pub mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `{id, name}` reference embedded in other documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// Reference where both parts are optional (e.g. a document's subject)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionalRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub email: String,
    /// bcrypt hash; never returned to clients
    pub password: String,
    #[serde(default)]
    pub enrolled_subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub name: String,
    pub email: String,
    /// bcrypt hash; never returned to clients
    pub password: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classrooms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classroom {
    pub name: String,
    #[serde(default)]
    pub students: Vec<String>,
    #[serde(default)]
    pub teachers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub name: String,
    /// Lesson titles
    #[serde(default)]
    pub lessons: Vec<String>,
    #[serde(default)]
    pub teachers: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Exam,
    CourseMaterial,
    Assignment,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub teacher: NamedRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<OptionalRef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    Essay,
    TrueFalse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub points: f64,
    /// Choices for multiple-choice questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Marking guide for essay questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExamTemplate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<OptionalRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes
    pub duration: u32,
    /// Distinguishes reusable templates from scheduled exams
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub teacher: NamedRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub student: NamedRef,
    pub subject: NamedRef,
    pub exam_title: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default = "now", with = "rfc3339_millis")]
    pub date: DateTime<Utc>,
}

/// Shapes that can check their own invariants beyond what decoding enforces
pub trait Validate {
    fn validate(&self) -> Result<(), SharedError>;
}

fn require_text(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), SharedError> {
    require_text("email", value)?;
    if !value.contains('@') {
        return Err(SharedError::validation("email", "must be an email address"));
    }
    Ok(())
}

fn require_ref(field: &str, value: &NamedRef) -> Result<(), SharedError> {
    require_text(&format!("{}.id", field), &value.id)?;
    require_text(&format!("{}.name", field), &value.name)
}

impl Validate for Student {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("password", &self.password)
    }
}

impl Validate for Teacher {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("password", &self.password)
    }
}

impl Validate for Classroom {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)
    }
}

impl Validate for Subject {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)
    }
}

impl Validate for Document {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title)?;
        require_ref("teacher", &self.teacher)
    }
}

impl Validate for ExamTemplate {
    fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title)?;
        require_ref("teacher", &self.teacher)?;
        if self.duration == 0 {
            return Err(SharedError::validation("duration", "must be greater than zero"));
        }
        for (i, q) in self.questions.iter().enumerate() {
            require_text(&format!("questions[{}].question", i), &q.question)?;
            if q.points < 0.0 {
                return Err(SharedError::validation(
                    format!("questions[{}].points", i),
                    "must not be negative",
                ));
            }
            if q.kind == QuestionKind::MultipleChoice && q.options.len() < 2 {
                return Err(SharedError::validation(
                    format!("questions[{}].options", i),
                    "multiple-choice questions need at least two options",
                ));
            }
        }
        Ok(())
    }
}

impl Validate for Grade {
    fn validate(&self) -> Result<(), SharedError> {
        require_ref("student", &self.student)?;
        require_ref("subject", &self.subject)?;
        require_text("examTitle", &self.exam_title)?;
        if !self.score.is_finite() {
            return Err(SharedError::validation("score", "must be a number"));
        }
        Ok(())
    }
}

/// Decode a JSON body into shape `T`, validate it and return the normalized body
pub fn normalize<T>(body: &Value) -> Result<Value, SharedError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let typed: T = serde_json::from_value(body.clone()).map_err(|e| {
        let message = e.to_string();
        match message.strip_prefix("missing field `") {
            Some(rest) => SharedError::missing(rest.split('`').next().unwrap_or(rest)),
            None => SharedError::serialization(message),
        }
    })?;
    typed.validate()?;
    Ok(serde_json::to_value(&typed)?)
}

/// `{id, name, email}` summary of a user shown on dashboards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentClassroom {
    pub id: String,
    pub name: String,
    /// First teacher of the classroom, if any
    pub teacher: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentDashboard {
    pub student: UserSummary,
    pub classrooms: Vec<StudentClassroom>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeacherClassroom {
    pub id: String,
    pub name: String,
    pub students: Vec<UserSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherDashboard {
    pub teacher: UserSummary,
    pub classrooms: Vec<TeacherClassroom>,
    pub messages: Vec<crate::shared::messaging::Message>,
}
