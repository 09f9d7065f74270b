use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use schoolbook_core::AppError;
use schoolbook_models::ids::TermId;

use crate::modules::terms::model::TermWithSession;

const TERM_WITH_SESSION: &str = r#"
    SELECT t.id, t.name, t.start_date, t.end_date, t.is_current,
           t.academic_session_id, s.name AS session_name
    FROM terms t
    JOIN academic_sessions s ON s.id = t.academic_session_id
"#;

pub struct TermService;

impl TermService {
    #[instrument(skip(db))]
    pub async fn get_current_term(db: &PgPool) -> Result<Option<TermWithSession>, AppError> {
        let term = sqlx::query_as::<_, TermWithSession>(&format!(
            "{TERM_WITH_SESSION} WHERE t.is_current"
        ))
        .fetch_optional(db)
        .await?;

        Ok(term)
    }

    #[instrument(skip(db))]
    pub async fn get_term(db: &PgPool, term_id: TermId) -> Result<TermWithSession, AppError> {
        Self::find_term(db, term_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Term not found")))
    }

    pub(crate) async fn find_term<'e, E>(
        db: E,
        term_id: TermId,
    ) -> Result<Option<TermWithSession>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let term = sqlx::query_as::<_, TermWithSession>(&format!(
            "{TERM_WITH_SESSION} WHERE t.id = $1"
        ))
        .bind(term_id)
        .fetch_optional(db)
        .await?;

        Ok(term)
    }

    /// The requested term, or the current one when none is given.
    #[instrument(skip(db))]
    pub async fn resolve_term(
        db: &PgPool,
        term_id: Option<TermId>,
    ) -> Result<TermWithSession, AppError> {
        match term_id {
            Some(id) => Self::get_term(db, id).await,
            None => Self::get_current_term(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No current term found"))),
        }
    }
}
