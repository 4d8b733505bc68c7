//! Read Views
//!
//! Dashboards and the filtered listings that join several collections.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;
use crate::backend::store::{Collection, Filter, Record, RecordStore, Sort};
use crate::shared::school::{
    StudentClassroom, StudentDashboard, TeacherClassroom, TeacherDashboard, UserSummary,
};

/// Messages shown on a teacher dashboard
pub const DASHBOARD_MESSAGES: usize = 50;

fn summary(record: &Record) -> UserSummary {
    UserSummary {
        id: record.id.clone(),
        name: record.str_field("name").unwrap_or_default().to_string(),
        email: record.str_field("email").unwrap_or_default().to_string(),
    }
}

fn to_json_list(records: &[Record]) -> Vec<Value> {
    records.iter().map(Record::to_json).collect()
}

/// `GET /api/students/dashboard/{id}`
pub async fn student_dashboard(
    State(records): State<Arc<dyn RecordStore>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudentDashboard>> {
    let student = records
        .get(Collection::Students, &id)
        .await?
        .ok_or_else(|| BackendError::not_found("Student not found"))?;

    let classrooms = records
        .find(
            Collection::Classrooms,
            Filter::contains("students", id.as_str()),
            Sort::oldest_first(),
        )
        .await?;

    let mut entries = Vec::with_capacity(classrooms.len());
    for classroom in &classrooms {
        let teacher = match classroom.str_list("teachers").first() {
            Some(teacher_id) => records
                .get(Collection::Teachers, teacher_id)
                .await?
                .map(|t| summary(&t)),
            None => None,
        };
        entries.push(StudentClassroom {
            id: classroom.id.clone(),
            name: classroom.str_field("name").unwrap_or_default().to_string(),
            teacher,
        });
    }

    Ok(Json(StudentDashboard {
        student: summary(&student),
        classrooms: entries,
    }))
}

/// `GET /api/teachers/dashboard/{id}`
pub async fn teacher_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TeacherDashboard>> {
    let records = state.records.as_ref();
    let teacher = records
        .get(Collection::Teachers, &id)
        .await?
        .ok_or_else(|| BackendError::not_found("Teacher not found"))?;

    let classrooms = records
        .find(
            Collection::Classrooms,
            Filter::contains("teachers", id.as_str()),
            Sort::oldest_first(),
        )
        .await?;

    let mut entries = Vec::with_capacity(classrooms.len());
    for classroom in &classrooms {
        let mut students = Vec::new();
        for student_id in classroom.str_list("students") {
            if let Some(student) = records.get(Collection::Students, &student_id).await? {
                students.push(summary(&student));
            }
        }
        entries.push(TeacherClassroom {
            id: classroom.id.clone(),
            name: classroom.str_field("name").unwrap_or_default().to_string(),
            students,
        });
    }

    let messages = state
        .messaging
        .log()
        .recent_for(&id, DASHBOARD_MESSAGES)
        .await?;

    Ok(Json(TeacherDashboard {
        teacher: summary(&teacher),
        classrooms: entries,
        messages,
    }))
}

/// `GET /api/students/{id}/grades`
pub async fn student_grades(
    State(records): State<Arc<dyn RecordStore>>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    let grades = records
        .find(
            Collection::Grades,
            Filter::eq("student.id", student_id),
            Sort::field_desc("date"),
        )
        .await?;
    Ok(Json(to_json_list(&grades)))
}

/// `GET /api/teachers/classroom/{classroomId}/grades`
pub async fn classroom_grades(
    State(records): State<Arc<dyn RecordStore>>,
    Path(classroom_id): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    let classroom = records
        .get(Collection::Classrooms, &classroom_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Classroom not found"))?;

    let grades = records
        .find(
            Collection::Grades,
            Filter::In("student.id".to_string(), classroom.str_list("students")),
            Sort::field_desc("date"),
        )
        .await?;
    Ok(Json(to_json_list(&grades)))
}

async fn by_teacher(
    records: &dyn RecordStore,
    collection: Collection,
    teacher_id: String,
) -> ApiResult<Json<Vec<Value>>> {
    let found = records
        .find(collection, Filter::eq("teacher.id", teacher_id), Sort::newest_first())
        .await?;
    Ok(Json(to_json_list(&found)))
}

/// `GET /api/documents/teacher/{teacherId}`
pub async fn documents_by_teacher(
    State(records): State<Arc<dyn RecordStore>>,
    Path(teacher_id): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    by_teacher(records.as_ref(), Collection::Documents, teacher_id).await
}

/// `GET /api/exams/teacher/{teacherId}`
pub async fn exams_by_teacher(
    State(records): State<Arc<dyn RecordStore>>,
    Path(teacher_id): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    by_teacher(records.as_ref(), Collection::ExamTemplates, teacher_id).await
}

/// `GET /api/exams/samples`
///
/// Starting points for new templates; not stored.
pub async fn exam_samples() -> Json<Vec<Value>> {
    Json(sample_templates())
}

pub fn sample_templates() -> Vec<Value> {
    vec![
        json!({
            "title": "Mathematics Mid-Term",
            "subject": { "name": "Mathematics" },
            "duration": 60,
            "isTemplate": true,
            "questions": [
                {
                    "type": "multiple-choice",
                    "question": "Solve for x: 2x + 5 = 13",
                    "points": 5,
                    "options": ["x = 4", "x = 6", "x = 8", "x = 3"],
                    "correctAnswer": "x = 4"
                },
                {
                    "type": "true-false",
                    "question": "Every square is a rectangle.",
                    "points": 2,
                    "options": ["true", "false"],
                    "correctAnswer": "true"
                }
            ]
        }),
        json!({
            "title": "English Essay",
            "subject": { "name": "English" },
            "duration": 45,
            "isTemplate": true,
            "questions": [
                {
                    "type": "essay",
                    "question": "Describe a place that matters to you.",
                    "points": 20,
                    "rubric": "Structure, vocabulary, and use of detail"
                }
            ]
        }),
    ]
}
