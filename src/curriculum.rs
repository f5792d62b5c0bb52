use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, instrument};

use crate::database;
use crate::database::schema::CURRICULUM_SCHEMA;
use crate::env::StoreConfig;
use crate::error::StoreError;
use crate::models::{
    DbLessonPlan, Indicator, LessonPlan, NewIndicator, NewLessonPlan, NewStrand, NewSubStrand,
    NewSubject, Strand, SubStrand, Subject,
};
use crate::repository::{Repository, ensure_connected, require_key, validate_draft};

/// The four-level Subject > Strand > SubStrand > Indicator hierarchy plus
/// lesson plans. Lesson plans carry denormalized references into all four
/// levels; the store reads them back without checking consistency.
#[derive(Debug, Clone)]
pub struct CurriculumStore {
    pool: SqlitePool,
}

/// A lesson plan's ancestors, resolved from its denormalized references.
/// Every field is absent when the lesson plan itself does not exist.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CurriculumPath {
    pub lesson_plan: Option<LessonPlan>,
    pub subject: Option<Subject>,
    pub strand: Option<Strand>,
    pub sub_strand: Option<SubStrand>,
    pub indicator: Option<Indicator>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct LessonPlanDetails {
    pub lesson_plan: LessonPlan,
    pub subject: Option<Subject>,
    pub strand: Option<Strand>,
    pub sub_strand: Option<SubStrand>,
    pub indicator: Option<Indicator>,
}

impl CurriculumStore {
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = database::open_file(&config.curriculum_path(), CURRICULUM_SCHEMA).await?;
        Ok(Self { pool })
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = database::open_in_memory(CURRICULUM_SCHEMA).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn subjects(&self) -> SubjectRepo<'_> {
        SubjectRepo { pool: &self.pool }
    }

    pub fn strands(&self) -> StrandRepo<'_> {
        StrandRepo { pool: &self.pool }
    }

    pub fn sub_strands(&self) -> SubStrandRepo<'_> {
        SubStrandRepo { pool: &self.pool }
    }

    pub fn indicators(&self) -> IndicatorRepo<'_> {
        IndicatorRepo { pool: &self.pool }
    }

    pub fn lesson_plans(&self) -> LessonPlanRepo<'_> {
        LessonPlanRepo { pool: &self.pool }
    }

    /// Deletes a subject and, child-first, every strand, sub-strand,
    /// indicator and lesson plan under it. The whole cascade runs in one
    /// transaction: a failure anywhere rolls the entire cascade back.
    #[instrument(skip(self))]
    pub async fn delete_subject(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(&self.pool)?;
        let mut tx = self.pool.begin().await?;

        let strand_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM strands WHERE subject_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        for strand_id in strand_ids {
            delete_strand_in(&mut tx, strand_id).await?;
        }

        sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(subject_id = id, "Deleted subject and its descendants");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_strand(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(&self.pool)?;
        let mut tx = self.pool.begin().await?;
        delete_strand_in(&mut tx, id).await?;
        tx.commit().await?;
        info!(strand_id = id, "Deleted strand and its descendants");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_sub_strand(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(&self.pool)?;
        let mut tx = self.pool.begin().await?;
        delete_sub_strand_in(&mut tx, id).await?;
        tx.commit().await?;
        info!(sub_strand_id = id, "Deleted sub-strand and its descendants");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_indicator(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(&self.pool)?;
        let mut tx = self.pool.begin().await?;
        delete_indicator_in(&mut tx, id).await?;
        tx.commit().await?;
        info!(indicator_id = id, "Deleted indicator and its lesson plans");
        Ok(())
    }

    /// Resolves a lesson plan's four denormalized references concurrently.
    /// A missing lesson plan yields an all-absent path, never an error;
    /// dangling references resolve to `None`.
    #[instrument(skip(self))]
    pub async fn get_full_path(&self, lesson_plan_id: i64) -> Result<CurriculumPath, StoreError> {
        ensure_connected(&self.pool)?;
        let Some(plan) = self.lesson_plans().get_by_id(lesson_plan_id).await? else {
            return Ok(CurriculumPath::default());
        };

        let (subjects, strands, sub_strands, indicators) = (
            self.subjects(),
            self.strands(),
            self.sub_strands(),
            self.indicators(),
        );
        let (subject, strand, sub_strand, indicator) = tokio::try_join!(
            subjects.get_by_id(plan.subject_id),
            strands.get_by_id(plan.strand_id),
            sub_strands.get_by_id(plan.sub_strand_id),
            indicators.get_by_id(plan.indicator_id),
        )?;

        Ok(CurriculumPath {
            lesson_plan: Some(plan),
            subject,
            strand,
            sub_strand,
            indicator,
        })
    }

    /// Pages over the lesson-plan collection and resolves each plan's
    /// related records. The page is 1-based; out of range means empty.
    #[instrument(skip(self))]
    pub async fn get_page_with_details(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<LessonPlanDetails>, StoreError> {
        ensure_connected(&self.pool)?;
        let plans = self.lesson_plans().paginate(page, page_size).await?;

        let (subjects, strands, sub_strands, indicators) = (
            self.subjects(),
            self.strands(),
            self.sub_strands(),
            self.indicators(),
        );
        let mut details = Vec::with_capacity(plans.len());
        for plan in plans {
            let (subject, strand, sub_strand, indicator) = tokio::try_join!(
                subjects.get_by_id(plan.subject_id),
                strands.get_by_id(plan.strand_id),
                sub_strands.get_by_id(plan.sub_strand_id),
                indicators.get_by_id(plan.indicator_id),
            )?;
            details.push(LessonPlanDetails {
                lesson_plan: plan,
                subject,
                strand,
                sub_strand,
                indicator,
            });
        }

        Ok(details)
    }
}

// Cascade steps share the caller's transaction. Recursion depth is bounded
// by the fixed four-level hierarchy; deleting rows a concurrent caller
// already removed is a no-op.

async fn delete_strand_in(conn: &mut SqliteConnection, id: i64) -> Result<(), StoreError> {
    let sub_strand_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM sub_strands WHERE strand_id = ?")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
    for sub_strand_id in sub_strand_ids {
        delete_sub_strand_in(&mut *conn, sub_strand_id).await?;
    }

    sqlx::query("DELETE FROM strands WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn delete_sub_strand_in(conn: &mut SqliteConnection, id: i64) -> Result<(), StoreError> {
    let indicator_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM indicators WHERE sub_strand_id = ?")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
    for indicator_id in indicator_ids {
        delete_indicator_in(&mut *conn, indicator_id).await?;
    }

    sqlx::query("DELETE FROM sub_strands WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn delete_indicator_in(conn: &mut SqliteConnection, id: i64) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM lesson_plans WHERE indicator_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM indicators WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub struct SubjectRepo<'a> {
    pool: &'a SqlitePool,
}

impl SubjectRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Subject>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }
}

impl Repository for SubjectRepo<'_> {
    type Entity = Subject;
    type Draft = NewSubject;

    async fn add(&self, draft: &NewSubject) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;
        let res = sqlx::query("INSERT INTO subjects (name) VALUES (?)")
            .bind(&draft.name)
            .execute(self.pool)
            .await?;
        info!(name = %draft.name, "Added subject");
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subject>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Subject>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, subject: &Subject) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(subject.id, "subject")?;
        sqlx::query("UPDATE subjects SET name = ? WHERE id = ?")
            .bind(&subject.name)
            .bind(subject.id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

pub struct StrandRepo<'a> {
    pool: &'a SqlitePool,
}

impl StrandRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_subject_id(&self, subject_id: i64) -> Result<Vec<Strand>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Strand>(
            "SELECT id, subject_id, name FROM strands WHERE subject_id = ?",
        )
        .bind(subject_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

impl Repository for StrandRepo<'_> {
    type Entity = Strand;
    type Draft = NewStrand;

    async fn add(&self, draft: &NewStrand) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;
        let res = sqlx::query("INSERT INTO strands (subject_id, name) VALUES (?, ?)")
            .bind(draft.subject_id)
            .bind(&draft.name)
            .execute(self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Strand>, StoreError> {
        ensure_connected(self.pool)?;
        let row =
            sqlx::query_as::<_, Strand>("SELECT id, subject_id, name FROM strands WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Strand>, StoreError> {
        ensure_connected(self.pool)?;
        let rows =
            sqlx::query_as::<_, Strand>("SELECT id, subject_id, name FROM strands ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(rows)
    }

    async fn update(&self, strand: &Strand) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(strand.id, "strand")?;
        sqlx::query("UPDATE strands SET subject_id = ?, name = ? WHERE id = ?")
            .bind(strand.subject_id)
            .bind(&strand.name)
            .bind(strand.id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM strands WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

pub struct SubStrandRepo<'a> {
    pool: &'a SqlitePool,
}

impl SubStrandRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_strand_id(&self, strand_id: i64) -> Result<Vec<SubStrand>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, SubStrand>(
            "SELECT id, strand_id, name FROM sub_strands WHERE strand_id = ?",
        )
        .bind(strand_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

impl Repository for SubStrandRepo<'_> {
    type Entity = SubStrand;
    type Draft = NewSubStrand;

    async fn add(&self, draft: &NewSubStrand) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;
        let res = sqlx::query("INSERT INTO sub_strands (strand_id, name) VALUES (?, ?)")
            .bind(draft.strand_id)
            .bind(&draft.name)
            .execute(self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SubStrand>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, SubStrand>(
            "SELECT id, strand_id, name FROM sub_strands WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<SubStrand>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, SubStrand>(
            "SELECT id, strand_id, name FROM sub_strands ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, sub_strand: &SubStrand) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(sub_strand.id, "sub-strand")?;
        sqlx::query("UPDATE sub_strands SET strand_id = ?, name = ? WHERE id = ?")
            .bind(sub_strand.strand_id)
            .bind(&sub_strand.name)
            .bind(sub_strand.id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM sub_strands WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

pub struct IndicatorRepo<'a> {
    pool: &'a SqlitePool,
}

impl IndicatorRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_sub_strand_id(
        &self,
        sub_strand_id: i64,
    ) -> Result<Vec<Indicator>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Indicator>(
            "SELECT id, sub_strand_id, code, description, exemplars
             FROM indicators WHERE sub_strand_id = ?",
        )
        .bind(sub_strand_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Indicator>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, Indicator>(
            "SELECT id, sub_strand_id, code, description, exemplars
             FROM indicators WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }
}

impl Repository for IndicatorRepo<'_> {
    type Entity = Indicator;
    type Draft = NewIndicator;

    async fn add(&self, draft: &NewIndicator) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;
        let res = sqlx::query(
            "INSERT INTO indicators (sub_strand_id, code, description, exemplars)
             VALUES (?, ?, ?, ?)",
        )
        .bind(draft.sub_strand_id)
        .bind(&draft.code)
        .bind(&draft.description)
        .bind(&draft.exemplars)
        .execute(self.pool)
        .await?;
        info!(code = %draft.code, "Added indicator");
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Indicator>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, Indicator>(
            "SELECT id, sub_strand_id, code, description, exemplars
             FROM indicators WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Indicator>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, Indicator>(
            "SELECT id, sub_strand_id, code, description, exemplars
             FROM indicators ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, indicator: &Indicator) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(indicator.id, "indicator")?;
        sqlx::query(
            "UPDATE indicators
             SET sub_strand_id = ?, code = ?, description = ?, exemplars = ?
             WHERE id = ?",
        )
        .bind(indicator.sub_strand_id)
        .bind(&indicator.code)
        .bind(&indicator.description)
        .bind(&indicator.exemplars)
        .bind(indicator.id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM indicators WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

pub struct LessonPlanRepo<'a> {
    pool: &'a SqlitePool,
}

const LESSON_PLAN_COLUMNS: &str =
    "id, week, subject_id, strand_id, sub_strand_id, indicator_id, notes, created_at";

impl LessonPlanRepo<'_> {
    #[instrument(skip(self))]
    pub async fn get_by_week(&self, week: &str) -> Result<Vec<LessonPlan>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, DbLessonPlan>(&format!(
            "SELECT {LESSON_PLAN_COLUMNS} FROM lesson_plans WHERE week = ?"
        ))
        .bind(week)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(LessonPlan::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_by_subject_id(&self, subject_id: i64) -> Result<Vec<LessonPlan>, StoreError> {
        self.get_by_reference("subject_id", subject_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_strand_id(&self, strand_id: i64) -> Result<Vec<LessonPlan>, StoreError> {
        self.get_by_reference("strand_id", strand_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_sub_strand_id(
        &self,
        sub_strand_id: i64,
    ) -> Result<Vec<LessonPlan>, StoreError> {
        self.get_by_reference("sub_strand_id", sub_strand_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_indicator_id(
        &self,
        indicator_id: i64,
    ) -> Result<Vec<LessonPlan>, StoreError> {
        self.get_by_reference("indicator_id", indicator_id).await
    }

    async fn get_by_reference(&self, column: &str, id: i64) -> Result<Vec<LessonPlan>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, DbLessonPlan>(&format!(
            "SELECT {LESSON_PLAN_COLUMNS} FROM lesson_plans WHERE {column} = ?"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(LessonPlan::from).collect())
    }
}

impl Repository for LessonPlanRepo<'_> {
    type Entity = LessonPlan;
    type Draft = NewLessonPlan;

    async fn add(&self, draft: &NewLessonPlan) -> Result<i64, StoreError> {
        ensure_connected(self.pool)?;
        validate_draft(draft)?;

        // created_at is stamped here, once; update never touches it.
        let created_at = Utc::now().naive_utc();
        let res = sqlx::query(
            "INSERT INTO lesson_plans
             (week, subject_id, strand_id, sub_strand_id, indicator_id, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.week)
        .bind(draft.subject_id)
        .bind(draft.strand_id)
        .bind(draft.sub_strand_id)
        .bind(draft.indicator_id)
        .bind(&draft.notes)
        .bind(created_at)
        .execute(self.pool)
        .await?;

        info!(week = %draft.week, "Added lesson plan");
        Ok(res.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<LessonPlan>, StoreError> {
        ensure_connected(self.pool)?;
        let row = sqlx::query_as::<_, DbLessonPlan>(&format!(
            "SELECT {LESSON_PLAN_COLUMNS} FROM lesson_plans WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(LessonPlan::from))
    }

    async fn get_all(&self) -> Result<Vec<LessonPlan>, StoreError> {
        ensure_connected(self.pool)?;
        let rows = sqlx::query_as::<_, DbLessonPlan>(&format!(
            "SELECT {LESSON_PLAN_COLUMNS} FROM lesson_plans ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(LessonPlan::from).collect())
    }

    async fn update(&self, plan: &LessonPlan) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        require_key(plan.id, "lesson plan")?;
        sqlx::query(
            "UPDATE lesson_plans
             SET week = ?, subject_id = ?, strand_id = ?, sub_strand_id = ?,
                 indicator_id = ?, notes = ?
             WHERE id = ?",
        )
        .bind(&plan.week)
        .bind(plan.subject_id)
        .bind(plan.strand_id)
        .bind(plan.sub_strand_id)
        .bind(plan.indicator_id)
        .bind(&plan.notes)
        .bind(plan.id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        ensure_connected(self.pool)?;
        sqlx::query("DELETE FROM lesson_plans WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
