use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::database;
use crate::database::schema::ROSTER_SCHEMA;
use crate::env::StoreConfig;
use crate::error::StoreError;
use crate::models::{DbTeacher, NewStudent, NewTeacher, Student, Teacher};
use crate::repository::{Repository, ensure_connected, require_key, validate_draft};

/// The teachers/students database. Each entity is reached through its own
/// typed repository; class-scoped compound operations live on the store
/// itself.
#[derive(Debug, Clone)]
pub struct RosterStore {
    pool: SqlitePool,
}

impl RosterStore {
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = database::open_file(&config.roster_path(), ROSTER_SCHEMA).await?;
        Ok(Self { pool })
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = database::open_in_memory(ROSTER_SCHEMA).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn teachers(&self) -> TeacherRepo<'_> {
        TeacherRepo { pool: &self.pool }
    }

    pub fn students(&self) -> StudentRepo<'_> {
        StudentRepo { pool: &self.pool }
    }

    #[instrument(skip(self))]
    pub async fn count_in_class(&self, class_name: &str) -> Result<u64, StoreError> {
        ensure_connected(&self.pool)?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE class_name = ?")
            .bind(class_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    #[instrument(skip(self))]
    pub async fn class_has_any_teacher(&self, class_name: &str) -> Result<bool, StoreError> {
        ensure_connected(&self.pool)?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE class_name = ?")
            .bind(class_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Removes every teacher and every student assigned to the class. Both
    /// sweeps run in one transaction, so a failure leaves the roster
    /// untouched.
    #[instrument(skip(self))]
    pub async fn delete_all_for_class(&self, class_name: &str) -> Result<(), StoreError> {
        ensure_connected(&self.pool)?;
        let mut tx = self.pool.begin().await?;

        let teachers = sqlx::query("DELETE FROM teachers WHERE class_name = ?")
            .bind(class_name)
            .execute(&mut *tx)
            .await?;

        let students = sqlx::query("DELETE FROM students WHERE class_name = ?")
            .bind(class_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            class_name = %class_name,
            teachers = teachers.rows_affected(),
            students = students.rows_affected(),
            "Deleted class data"
        );
        Ok(())
    }
}

pub struct TeacherRepo<'a> {
    pool: &'a SqlitePool,
}

impl TeacherRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_class_name(&self, class_name: &str) -> Result<Vec<Teacher>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, DbTeacher>(
            "SELECT id, teacher_name, class_name, subjects, access_code
             FROM teachers WHERE class_name = ?",
        )
        .bind(class_name)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Teacher::from).collect())
    }

    #[instrument(skip_all)]
    pub async fn get_by_access_code(
        &self,
        access_code: &str,
    ) -> Result<Option<Teacher>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, DbTeacher>(
            "SELECT id, teacher_name, class_name, subjects, access_code
             FROM teachers WHERE access_code = ?",
        )
        .bind(access_code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }
}

impl Repository for TeacherRepo<'_> {
    type Entity = Teacher;
    type Draft = NewTeacher;

    async fn add(&self, draft: &NewTeacher) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;
        let subjects = serde_json::to_string(&draft.subjects)
            .map_err(|e| StoreError::Internal(format!("Failed to encode subjects: {}", e)))?;

        let res = sqlx::query(
            "INSERT INTO teachers (teacher_name, class_name, subjects, access_code)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&draft.teacher_name)
        .bind(&draft.class_name)
        .bind(subjects)
        .bind(&draft.access_code)
        .execute(self.pool)
        .await?;

        info!(teacher_name = %draft.teacher_name, "Added teacher");
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Teacher>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, DbTeacher>(
            "SELECT id, teacher_name, class_name, subjects, access_code
             FROM teachers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn get_all(&self) -> Result<Vec<Teacher>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, DbTeacher>(
            "SELECT id, teacher_name, class_name, subjects, access_code
             FROM teachers ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Teacher::from).collect())
    }

    async fn update(&self, teacher: &Teacher) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(teacher.id, "teacher")?;
        let subjects = serde_json::to_string(&teacher.subjects)
            .map_err(|e| StoreError::Internal(format!("Failed to encode subjects: {}", e)))?;

        sqlx::query(
            "UPDATE teachers
             SET teacher_name = ?, class_name = ?, subjects = ?, access_code = ?
             WHERE id = ?",
        )
        .bind(&teacher.teacher_name)
        .bind(&teacher.class_name)
        .bind(subjects)
        .bind(&teacher.access_code)
        .bind(teacher.id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM teachers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

pub struct StudentRepo<'a> {
    pool: &'a SqlitePool,
}

impl StudentRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_class_name(&self, class_name: &str) -> Result<Vec<Student>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, class_name, email, enrollment_date
             FROM students WHERE class_name = ?",
        )
        .bind(class_name)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

impl Repository for StudentRepo<'_> {
    type Entity = Student;
    type Draft = NewStudent;

    async fn add(&self, draft: &NewStudent) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;

        let res = sqlx::query(
            "INSERT INTO students (first_name, last_name, class_name, email, enrollment_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.class_name)
        .bind(&draft.email)
        .bind(draft.enrollment_date)
        .execute(self.pool)
        .await?;

        info!(class_name = %draft.class_name, "Added student");
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, class_name, email, enrollment_date
             FROM students WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Student>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, class_name, email, enrollment_date
             FROM students ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, student: &Student) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(student.id, "student")?;

        sqlx::query(
            "UPDATE students
             SET first_name = ?, last_name = ?, class_name = ?, email = ?, enrollment_date = ?
             WHERE id = ?",
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.class_name)
        .bind(&student.email)
        .bind(student.enrollment_date)
        .bind(student.id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
