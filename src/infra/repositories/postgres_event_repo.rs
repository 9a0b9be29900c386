use crate::domain::{
    models::event::{Event, EventFields, NewEvent},
    ports::EventRepository,
    services::{admission::effective_capacity, event_service::apply_changes},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::debug;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                title, description, date, time, location, max_attendees, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(event.max_attendees)
            .bind(&event.status)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC, time ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i64, fields: &EventFields) -> Result<Option<Event>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let Some(mut event) = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)? else {
            return Ok(None);
        };
        apply_changes(&mut event, fields.clone())?;

        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM attendees WHERE event_id = $1")
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("count");
        if count > effective_capacity(event.max_attendees) as i64 {
            return Err(AppError::validation(format!(
                "Max attendees cannot be lower than the current attendee count ({})",
                count
            )));
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, date=$3, time=$4, location=$5,
                max_attendees=$6, status=$7, updated_at=$8
               WHERE id=$9 RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(event.max_attendees)
            .bind(&event.status)
            .bind(Utc::now())
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists = sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if exists.is_none() {
            return Ok(false);
        }

        let removed = sqlx::query("DELETE FROM attendees WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        sqlx::query("DELETE FROM join_counters WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let remaining: i64 = sqlx::query("SELECT COUNT(*) as count FROM attendees WHERE event_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("count");
        if remaining != 0 {
            return Err(AppError::InternalWithMsg(format!(
                "{} attendees still reference deleted event {}",
                remaining, id
            )));
        }

        tx.commit().await.map_err(AppError::Database)?;
        debug!("Deleted event {} with {} attendees", id, removed.rows_affected());
        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
}
