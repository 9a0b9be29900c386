use crate::domain::{
    models::{attendee::{Attendee, Candidate}, event::Event},
    ports::AttendeeRepository,
    services::admission,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Row};

pub struct PostgresAttendeeRepo {
    pool: PgPool,
}

impl PostgresAttendeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_event(conn: &mut PgConnection, event_id: i64) -> Result<Option<Event>, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(event_id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::Database)
}

async fn roster(conn: &mut PgConnection, event_id: i64) -> Result<Vec<Attendee>, AppError> {
    sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = $1 ORDER BY join_order ASC")
        .bind(event_id)
        .fetch_all(conn)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl AttendeeRepository for PostgresAttendeeRepo {
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        roster(&mut conn, event_id).await
    }

    async fn list_all(&self) -> Result<Vec<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees ORDER BY event_id ASC, join_order ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn admit(&self, event_id: i64, candidate: &Candidate, now: DateTime<Utc>) -> Result<Attendee, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let event = lock_event(&mut tx, event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
        let current = roster(&mut tx, event_id).await?;
        let high_water: Option<i32> = sqlx::query_scalar("SELECT last_join_order FROM join_counters WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let admitted = admission::admit(&event, &current, high_water.unwrap_or(0), candidate, now)?;

        let created = sqlx::query_as::<_, Attendee>(
            "INSERT INTO attendees (event_id, name, team, phone, role, joined_at, join_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(admitted.event_id).bind(&admitted.name).bind(&admitted.team).bind(&admitted.phone)
            .bind(&admitted.role).bind(admitted.joined_at).bind(admitted.join_order)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO join_counters (event_id, last_join_order) VALUES ($1, $2)
             ON CONFLICT (event_id) DO UPDATE SET last_join_order = EXCLUDED.last_join_order"
        )
            .bind(event_id).bind(created.join_order)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn remove(&self, event_id: i64, key: &str) -> Result<Option<Attendee>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        lock_event(&mut tx, event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
        let current = roster(&mut tx, event_id).await?;

        let Some(target) = admission::find_removal_target(&current, key).cloned() else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(target.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(target))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM attendees")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn find_orphans(&self) -> Result<Vec<i64>, AppError> {
        sqlx::query_scalar(
            "SELECT a.id FROM attendees a LEFT JOIN events e ON a.event_id = e.id WHERE e.id IS NULL ORDER BY a.id"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
