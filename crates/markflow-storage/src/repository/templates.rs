//! Email template repository

use sqlx::PgPool;

use crate::models::{EmailTemplate, UpdateTemplate};

/// Email template repository
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    /// Create a new template repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a template record
    pub async fn insert(&self, template: &EmailTemplate) -> Result<EmailTemplate, sqlx::Error> {
        sqlx::query_as::<_, EmailTemplate>(
            r#"
            INSERT INTO email_templates (
                id, client_id, title, subject, content, status,
                scheduled_for, tags, metrics, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&template.id)
        .bind(&template.client_id)
        .bind(&template.title)
        .bind(&template.subject)
        .bind(&template.content)
        .bind(&template.status)
        .bind(template.scheduled_for)
        .bind(&template.tags)
        .bind(&template.metrics)
        .bind(template.created_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a template by id and client
    pub async fn get(
        &self,
        client_id: &str,
        id: &str,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        sqlx::query_as::<_, EmailTemplate>(
            "SELECT * FROM email_templates WHERE id = $1 AND client_id = $2",
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List templates for a client, most recent first
    pub async fn list_by_client(
        &self,
        client_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        sqlx::query_as::<_, EmailTemplate>(
            r#"
            SELECT * FROM email_templates
            WHERE client_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Update a template; returns the updated row, or None if it does not exist
    pub async fn update(
        &self,
        client_id: &str,
        id: &str,
        input: &UpdateTemplate,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let current = match self.get(client_id, id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let tags = match &input.tags {
            Some(tags) => serde_json::json!(tags),
            None => current.tags.clone(),
        };
        let status = input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| current.status.clone());
        // scheduled_for is cleared when the status leaves "scheduled"
        let scheduled_for = match (input.scheduled_for, status.as_str()) {
            (Some(at), "scheduled") => Some(at),
            (None, "scheduled") => current.scheduled_for,
            _ => None,
        };

        sqlx::query_as::<_, EmailTemplate>(
            r#"
            UPDATE email_templates
            SET title = $3, subject = $4, content = $5, status = $6,
                scheduled_for = $7, tags = $8
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(input.title.as_ref().unwrap_or(&current.title))
        .bind(input.subject.as_ref().unwrap_or(&current.subject))
        .bind(input.content.as_ref().unwrap_or(&current.content))
        .bind(&status)
        .bind(scheduled_for)
        .bind(&tags)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a template; returns true when a row was removed
    pub async fn delete(&self, client_id: &str, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1 AND client_id = $2")
            .bind(id)
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count templates for a client
    pub async fn count_by_client(&self, client_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM email_templates WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }
}
