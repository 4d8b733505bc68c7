//! School records integration tests
//!
//! CRUD, dashboards and grade listings through the HTTP surface.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use schoolhub::backend::store::Collection;
use schoolhub::shared::school::{StudentDashboard, TeacherDashboard};

use crate::common::TestApp;
use crate::{assert_api_error, assert_contains};

#[tokio::test]
async fn test_classroom_crud_round() {
    let app = TestApp::new();

    let created = app
        .server
        .post("/api/classrooms")
        .json(&json!({"name": "7B"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created: Value = created.json();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["students"], json!([]));
    assert!(created["createdAt"].is_string());

    let listed: Vec<Value> = app.server.get("/api/classrooms").await.json();
    assert_eq!(listed.len(), 1);

    let updated: Value = app
        .server
        .put(&format!("/api/classrooms/{}", id))
        .json(&json!({"students": ["s1", "s2"]}))
        .await
        .json();
    assert_eq!(updated["name"], "7B");
    assert_eq!(updated["students"], json!(["s1", "s2"]));

    let deleted = app.server.delete(&format!("/api/classrooms/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let body: Value = deleted.json();
    assert_contains!(body["message"].as_str().unwrap(), "deleted");

    let gone = app.server.get(&format!("/api/classrooms/{}", id)).await;
    assert_api_error!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_creation_validates_and_hides_password() {
    let app = TestApp::new();

    let missing_email = app
        .server
        .post("/api/students")
        .json(&json!({"name": "Sam", "password": "pw"}))
        .await;
    let message = assert_api_error!(missing_email, StatusCode::BAD_REQUEST);
    assert_contains!(message, "email");

    let created = app
        .server
        .post("/api/students")
        .json(&json!({"name": "Sam", "email": "sam@school.test", "password": "pw"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body: Value = created.json();
    assert!(body.get("password").is_none());

    let login = app
        .server
        .post("/api/login")
        .json(&json!({"email": "sam@school.test", "password": "pw"}))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_document_and_exam_validation() {
    let app = TestApp::new();

    let bad_kind = app
        .server
        .post("/api/documents")
        .json(&json!({"title": "Notes", "type": "poster", "teacher": {"id": "t1", "name": "Tess"}}))
        .await;
    assert_api_error!(bad_kind, StatusCode::BAD_REQUEST);

    let bad_question = app
        .server
        .post("/api/exams")
        .json(&json!({
            "title": "Quiz",
            "duration": 20,
            "teacher": {"id": "t1", "name": "Tess"},
            "questions": [{"type": "oral", "question": "Why?", "points": 1}]
        }))
        .await;
    assert_api_error!(bad_question, StatusCode::BAD_REQUEST);

    let exam = app
        .server
        .post("/api/exams")
        .json(&json!({
            "title": "Quiz",
            "duration": 20,
            "teacher": {"id": "t1", "name": "Tess"},
            "questions": [{"type": "essay", "question": "Why?", "points": 10}]
        }))
        .await;
    assert_eq!(exam.status_code(), StatusCode::CREATED);

    let by_teacher: Vec<Value> = app.server.get("/api/exams/teacher/t1").await.json();
    assert_eq!(by_teacher.len(), 1);
    assert_eq!(by_teacher[0]["title"], "Quiz");

    let samples: Vec<Value> = app.server.get("/api/exams/samples").await.json();
    assert!(!samples.is_empty());
}

#[tokio::test]
async fn test_dashboards_join_collections() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;
    app.seed(
        Collection::Classrooms,
        json!({"name": "7B", "students": [sam.id], "teachers": [tess.id]}),
    )
    .await;

    app.server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id, "content": "Homework?"}))
        .await
        .assert_status(StatusCode::CREATED);

    let student: StudentDashboard = app
        .server
        .get(&format!("/api/students/dashboard/{}", sam.id))
        .await
        .json();
    assert_eq!(student.student.name, "Sam");
    assert_eq!(student.classrooms.len(), 1);
    assert_eq!(student.classrooms[0].teacher.as_ref().unwrap().id, tess.id);

    let teacher: TeacherDashboard = app
        .server
        .get(&format!("/api/teachers/dashboard/{}", tess.id))
        .await
        .json();
    assert_eq!(teacher.classrooms[0].students[0].id, sam.id);
    assert_eq!(teacher.messages.len(), 1);
    assert_eq!(teacher.messages[0].content, "Homework?");
}

#[tokio::test]
async fn test_grades_by_student_and_classroom() {
    let app = TestApp::new();
    let classroom = app
        .seed(Collection::Classrooms, json!({"name": "7B", "students": ["s1"]}))
        .await;

    for (student, title, date) in [
        ("s1", "Fractions", "2024-02-01T09:00:00.000Z"),
        ("s1", "Decimals", "2024-03-01T09:00:00.000Z"),
        ("s2", "Fractions", "2024-02-01T09:00:00.000Z"),
    ] {
        app.server
            .post("/api/teachers/grades")
            .json(&json!({
                "student": {"id": student, "name": student},
                "subject": {"id": "math", "name": "Mathematics"},
                "examTitle": title,
                "score": 17.5,
                "date": date
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let own: Vec<Value> = app.server.get("/api/students/s1/grades").await.json();
    let titles: Vec<_> = own.iter().map(|g| g["examTitle"].clone()).collect();
    assert_eq!(titles, vec![json!("Decimals"), json!("Fractions")]);

    let class: Vec<Value> = app
        .server
        .get(&format!("/api/teachers/classroom/{}/grades", classroom.id))
        .await
        .json();
    assert_eq!(class.len(), 2);

    let missing = app.server.get("/api/teachers/classroom/nope/grades").await;
    assert_api_error!(missing, StatusCode::NOT_FOUND);

    let bad_score = app
        .server
        .post("/api/teachers/grades")
        .json(&json!({
            "student": {"id": "s1", "name": "Sam"},
            "subject": {"id": "math", "name": "Mathematics"},
            "examTitle": "Oops",
            "score": "high"
        }))
        .await;
    assert_api_error!(bad_score, StatusCode::BAD_REQUEST);
}
