use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teacher {
    pub id: i64,
    pub teacher_name: String,
    pub class_name: String,
    pub subjects: Vec<String>,
    pub access_code: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTeacher {
    pub id: i64,
    pub teacher_name: String,
    pub class_name: String,
    pub subjects: String,
    pub access_code: String,
}

impl From<DbTeacher> for Teacher {
    fn from(db: DbTeacher) -> Self {
        Self {
            id: db.id,
            teacher_name: db.teacher_name,
            class_name: db.class_name,
            // Rows written by older builds may carry an empty subjects column.
            subjects: serde_json::from_str(&db.subjects).unwrap_or_default(),
            access_code: db.access_code,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewTeacher {
    #[validate(length(min = 1, message = "teacher name must not be empty"))]
    pub teacher_name: String,
    #[validate(length(min = 1, message = "class name must not be empty"))]
    pub class_name: String,
    pub subjects: Vec<String>,
    #[validate(length(min = 1, message = "access code must not be empty"))]
    pub access_code: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub email: Option<String>,
    pub enrollment_date: NaiveDate,
}

#[derive(Debug, Clone, Validate)]
pub struct NewStudent {
    #[validate(length(min = 1, message = "first name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name must not be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "class name must not be empty"))]
    pub class_name: String,
    #[validate(email(message = "email address is not valid"))]
    pub email: Option<String>,
    pub enrollment_date: NaiveDate,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewSubject {
    #[validate(length(min = 1, message = "subject name must not be empty"))]
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Strand {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewStrand {
    pub subject_id: i64,
    #[validate(length(min = 1, message = "strand name must not be empty"))]
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct SubStrand {
    pub id: i64,
    pub strand_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewSubStrand {
    pub strand_id: i64,
    #[validate(length(min = 1, message = "sub-strand name must not be empty"))]
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub id: i64,
    pub sub_strand_id: i64,
    pub code: String,
    pub description: String,
    pub exemplars: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewIndicator {
    pub sub_strand_id: i64,
    #[validate(length(min = 1, message = "indicator code must not be empty"))]
    pub code: String,
    pub description: String,
    pub exemplars: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonPlan {
    pub id: i64,
    pub week: String,
    pub subject_id: i64,
    pub strand_id: i64,
    pub sub_strand_id: i64,
    pub indicator_id: i64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbLessonPlan {
    pub id: i64,
    pub week: String,
    pub subject_id: i64,
    pub strand_id: i64,
    pub sub_strand_id: i64,
    pub indicator_id: i64,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

impl From<DbLessonPlan> for LessonPlan {
    fn from(db: DbLessonPlan) -> Self {
        Self {
            id: db.id,
            week: db.week,
            subject_id: db.subject_id,
            strand_id: db.strand_id,
            sub_strand_id: db.sub_strand_id,
            indicator_id: db.indicator_id,
            notes: db.notes,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(db.created_at, Utc),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewLessonPlan {
    #[validate(length(min = 1, message = "week label must not be empty"))]
    pub week: String,
    pub subject_id: i64,
    pub strand_id: i64,
    pub sub_strand_id: i64,
    pub indicator_id: i64,
    pub notes: String,
}
