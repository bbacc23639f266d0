mod embedded;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use embedded::migrations;
use tokio_postgres::{Client, NoTls, Row};
use uuid::Uuid;

use crate::{
    error::NoteError,
    models::{NewNote, Note, NoteChanges, NoteId},
};

/// Persistence operations over the `notes` collection.
///
/// `None`/`false` results mean the note does not exist; the caller decides
/// how to report that.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Note>, NoteError>;

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError>;

    async fn create(&self, fields: NewNote) -> Result<Note, NoteError>;

    async fn update_by_id(
        &self,
        id: NoteId,
        changes: NoteChanges,
    ) -> Result<Option<Note>, NoteError>;

    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError>;
}

pub struct Repository {
    client: Client,
}

impl Repository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: NoteId::from(row.get::<_, Uuid>("id")),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteStore for Repository {
    async fn list_all(&self) -> Result<Vec<Note>, NoteError> {
        let rows = self
            .client
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes ORDER BY created_at, id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[id.as_uuid()],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn create(&self, fields: NewNote) -> Result<Note, NoteError> {
        let id = NoteId::generate();

        // Both timestamps default to now(), which is fixed for the statement
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (id, title, content) VALUES ($1, $2, $3) \
                 RETURNING id, title, content, created_at, updated_at",
                &[id.as_uuid(), &fields.title, &fields.content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        changes: NoteChanges,
    ) -> Result<Option<Note>, NoteError> {
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET title = COALESCE($2, title), content = COALESCE($3, content), \
                 updated_at = GREATEST(now(), created_at) WHERE id = $1 \
                 RETURNING id, title, content, created_at, updated_at",
                &[id.as_uuid(), &changes.title, &changes.content],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[id.as_uuid()])
            .await?;

        Ok(rows == 1)
    }
}
