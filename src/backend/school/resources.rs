//! Resource Descriptors
//!
//! One marker type per collection exposed through the generic CRUD handlers.
//! The descriptor names the collection, the typed shape a body must decode
//! into, and whether the documents are user accounts.

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::store::{Collection, Sort};
use crate::shared::school::{
    Classroom, Document, ExamTemplate, Grade, Student, Subject, Teacher, Validate,
};

/// A collection served under `/api/<path>`
pub trait Resource: Send + Sync + 'static {
    /// Shape every stored body must satisfy
    type Shape: DeserializeOwned + Serialize + Validate;

    const COLLECTION: Collection;

    /// Singular name used in error messages
    const LABEL: &'static str;

    /// User accounts carry a bcrypt `password` and a unique `email`
    const IS_ACCOUNT: bool = false;

    fn list_order() -> Sort {
        Sort::oldest_first()
    }
}

pub struct Students;
pub struct Teachers;
pub struct Classrooms;
pub struct Subjects;
pub struct Documents;
pub struct Exams;
pub struct Grades;

impl Resource for Students {
    type Shape = Student;
    const COLLECTION: Collection = Collection::Students;
    const LABEL: &'static str = "Student";
    const IS_ACCOUNT: bool = true;
}

impl Resource for Teachers {
    type Shape = Teacher;
    const COLLECTION: Collection = Collection::Teachers;
    const LABEL: &'static str = "Teacher";
    const IS_ACCOUNT: bool = true;
}

impl Resource for Classrooms {
    type Shape = Classroom;
    const COLLECTION: Collection = Collection::Classrooms;
    const LABEL: &'static str = "Classroom";
}

impl Resource for Subjects {
    type Shape = Subject;
    const COLLECTION: Collection = Collection::Subjects;
    const LABEL: &'static str = "Subject";
}

impl Resource for Documents {
    type Shape = Document;
    const COLLECTION: Collection = Collection::Documents;
    const LABEL: &'static str = "Document";

    fn list_order() -> Sort {
        Sort::newest_first()
    }
}

impl Resource for Exams {
    type Shape = ExamTemplate;
    const COLLECTION: Collection = Collection::ExamTemplates;
    const LABEL: &'static str = "Exam template";

    fn list_order() -> Sort {
        Sort::newest_first()
    }
}

impl Resource for Grades {
    type Shape = Grade;
    const COLLECTION: Collection = Collection::Grades;
    const LABEL: &'static str = "Grade";

    fn list_order() -> Sort {
        Sort::field_desc("date")
    }
}
