//! # PostgreSQL Store
//!
//! `intake_submissions`-backed implementation of [`SubmissionStore`]. Queries
//! are runtime-checked (`sqlx::query_as` with explicit binds) so builds do not
//! require a live database; JSONB columns round-trip through
//! [`sqlx::types::Json`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, StoreResult, SubmissionStore};
use crate::models::{
    ErrorDetail, FolderOutput, NewSubmission, StepOutputs, Submission, SubmissionPayload,
    TaskOutput,
};
use crate::state_machine::SubmissionState;

const SELECT_COLUMNS: &str = "submission_id, payload, status, outputs, error_detail, \
     created_at, completed_at, last_modified";

/// PostgreSQL-backed submission store.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; JSONB columns decode into their typed forms.
#[derive(Debug, FromRow)]
struct SubmissionRow {
    submission_id: Uuid,
    payload: Json<SubmissionPayload>,
    status: String,
    outputs: Json<StepOutputs>,
    error_detail: Option<Json<ErrorDetail>>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StoreError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let status: SubmissionState =
            row.status.parse().map_err(|reason| StoreError::Corrupt {
                id: row.submission_id,
                reason,
            })?;
        Ok(Submission {
            submission_id: row.submission_id,
            payload: row.payload.0,
            status,
            outputs: row.outputs.0,
            error_detail: row.error_detail.map(|detail| detail.0),
            created_at: row.created_at,
            completed_at: row.completed_at,
            last_modified: row.last_modified,
        })
    }
}

impl PgSubmissionStore {
    /// Map an UPDATE result, surfacing a missing row as `NotFound`.
    fn require_row(
        submission_id: Uuid,
        result: sqlx::postgres::PgQueryResult,
    ) -> StoreResult<()> {
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(submission_id));
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn create(&self, new_submission: NewSubmission) -> StoreResult<Submission> {
        let submission_id = Uuid::new_v4();
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "INSERT INTO intake_submissions (submission_id, payload, status, outputs) \
             VALUES ($1, $2, $3, '{{}}'::jsonb) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(submission_id)
        .bind(Json(&new_submission.payload))
        .bind(SubmissionState::default().to_string())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, submission_id: Uuid) -> StoreResult<Option<Submission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM intake_submissions WHERE submission_id = $1"
        ))
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Submission::try_from).transpose()
    }

    async fn set_folder_output(
        &self,
        submission_id: Uuid,
        output: &FolderOutput,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE intake_submissions \
             SET outputs = jsonb_set(outputs, '{folder}', $2), last_modified = NOW() \
             WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(Json(output))
        .execute(&self.pool)
        .await?;

        Self::require_row(submission_id, result)
    }

    async fn set_task_output(&self, submission_id: Uuid, output: &TaskOutput) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE intake_submissions \
             SET outputs = jsonb_set(outputs, '{task}', $2), last_modified = NOW() \
             WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(Json(output))
        .execute(&self.pool)
        .await?;

        Self::require_row(submission_id, result)
    }

    async fn mark_error(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE intake_submissions \
             SET status = 'error', error_detail = $2, last_modified = NOW() \
             WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(Json(detail))
        .execute(&self.pool)
        .await?;

        Self::require_row(submission_id, result)
    }

    async fn mark_retrying(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE intake_submissions \
             SET status = 'processing', error_detail = $2, last_modified = NOW() \
             WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(Json(detail))
        .execute(&self.pool)
        .await?;

        Self::require_row(submission_id, result)
    }

    async fn mark_complete(
        &self,
        submission_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE intake_submissions \
             SET status = 'complete', error_detail = NULL, completed_at = $2, \
                 last_modified = NOW() \
             WHERE submission_id = $1",
        )
        .bind(submission_id)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;

        Self::require_row(submission_id, result)
    }
}
