use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Teacher;
use crate::roster::RosterStore;

const ACCESS_CODE_PREFIX: &str = "MEC-TAC-";

/// The active session. Views receive this explicitly instead of inferring
/// "the current teacher" from storage scan order.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherSession {
    pub token: String,
    pub teacher: Teacher,
    pub started_at: DateTime<Utc>,
}

/// Authenticates a teacher by access code (unique-index point lookup).
#[instrument(skip_all)]
pub async fn login_with_access_code(
    store: &RosterStore,
    access_code: &str,
) -> Result<TeacherSession, StoreError> {
    let teacher = store
        .teachers()
        .get_by_access_code(access_code)
        .await?
        .ok_or_else(|| {
            let err = StoreError::Authentication(
                "No teacher matches the supplied access code".to_string(),
            );
            err.log("login_with_access_code");
            err
        })?;

    info!(
        teacher_name = %teacher.teacher_name,
        class_name = %teacher.class_name,
        "Teacher authenticated via access code"
    );

    Ok(TeacherSession {
        token: Uuid::new_v4().to_string(),
        teacher,
        started_at: Utc::now(),
    })
}

/// Generates a fresh access code in the portal's `MEC-TAC-nnnnnn` format.
/// Uniqueness is enforced by the roster store's unique index at insert time.
pub fn generate_access_code() -> String {
    let digits = rand::rng().random_range(100_000..1_000_000);
    format!("{ACCESS_CODE_PREFIX}{digits}")
}
