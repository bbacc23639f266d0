use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    error::NoteError,
    models::{NewNote, NoteChanges, NoteId},
    repository::NoteStore,
};

use std::sync::Arc;

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

fn validate_title(title: String) -> Result<String, NoteError> {
    if title.trim().is_empty() {
        return Err(NoteError::bad_request("title must not be empty"));
    }
    Ok(title)
}

impl CreateNoteRequest {
    fn validate(self) -> Result<NewNote, NoteError> {
        let title = self
            .title
            .ok_or_else(|| NoteError::bad_request("title is required"))?;
        let content = self
            .content
            .ok_or_else(|| NoteError::bad_request("content is required"))?;

        Ok(NewNote {
            title: validate_title(title)?,
            content,
        })
    }
}

impl UpdateNoteRequest {
    fn validate(self) -> Result<NoteChanges, NoteError> {
        Ok(NoteChanges {
            title: self.title.map(validate_title).transpose()?,
            content: self.content,
        })
    }
}

impl NoteService {
    pub const fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create_note(&self, request: CreateNoteRequest) -> Result<NoteResponse, NoteError> {
        let fields = request.validate()?;
        let note = self.store.create(fields).await?;

        tracing::debug!("created note {}", note.id);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: &str,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, NoteError> {
        let id = NoteId::parse(id)?;
        let changes = request.validate()?;

        self.store
            .update_by_id(id, changes)
            .await?
            .map(Into::into)
            .ok_or(NoteError::NotFound)
    }

    pub async fn delete_note(&self, id: &str) -> Result<NoteId, NoteError> {
        let id = NoteId::parse(id)?;

        if self.store.delete_by_id(id).await? {
            tracing::debug!("deleted note {}", id);
            Ok(id)
        } else {
            Err(NoteError::NotFound)
        }
    }

    pub async fn get_one_note(&self, id: &str) -> Result<NoteResponse, NoteError> {
        let id = NoteId::parse(id)?;

        self.store
            .get_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(NoteError::NotFound)
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, NoteError> {
        let notes = self.store.list_all().await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryStore;

    fn service() -> (NoteService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (NoteService::new(store.clone()), store)
    }

    fn create_request(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_note() {
        let (service, _) = service();

        let created = service.create_note(create_request("A", "B")).await.unwrap();
        let fetched = service.get_one_note(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "A");
        assert_eq!(fetched.content, "B");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn create_requires_title_and_content() {
        let (service, store) = service();

        let missing_title = CreateNoteRequest {
            title: None,
            content: Some("body".into()),
        };
        let err = service.create_note(missing_title).await.unwrap_err();
        assert!(matches!(err, NoteError::BadRequest(ref msg) if msg == "title is required"));

        let missing_content = CreateNoteRequest {
            title: Some("t".into()),
            content: None,
        };
        let err = service.create_note(missing_content).await.unwrap_err();
        assert!(matches!(err, NoteError::BadRequest(ref msg) if msg == "content is required"));

        let err = service
            .create_note(create_request("   ", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteError::BadRequest(_)));

        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let (service, _) = service();
        let created = service.create_note(create_request("A", "B")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = service
            .update_note(
                &created.id.to_string(),
                UpdateNoteRequest {
                    title: None,
                    content: Some("C".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "A");
        assert_eq!(updated.content, "C");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[tokio::test]
    async fn update_rejects_blank_title() {
        let (service, _) = service();
        let created = service.create_note(create_request("A", "B")).await.unwrap();

        let err = service
            .update_note(
                &created.id.to_string(),
                UpdateNoteRequest {
                    title: Some(String::new()),
                    content: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, NoteError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_notes_are_not_found() {
        let (service, _) = service();
        let id = NoteId::generate().to_string();

        assert!(matches!(
            service.get_one_note(&id).await,
            Err(NoteError::NotFound)
        ));
        assert!(matches!(
            service.update_note(&id, UpdateNoteRequest::default()).await,
            Err(NoteError::NotFound)
        ));
        assert!(matches!(
            service.delete_note(&id).await,
            Err(NoteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request_before_store_access() {
        let (service, store) = service();
        store.set_unavailable(true);

        assert!(matches!(
            service.get_one_note("abc").await,
            Err(NoteError::BadRequest(_))
        ));
        assert!(matches!(
            service.delete_note("abc").await,
            Err(NoteError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let (service, _) = service();
        let created = service.create_note(create_request("A", "B")).await.unwrap();
        let id = created.id.to_string();

        assert_eq!(service.delete_note(&id).await.unwrap().to_string(), id);
        assert!(matches!(
            service.delete_note(&id).await,
            Err(NoteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn store_outage_propagates() {
        let (service, store) = service();
        store.set_unavailable(true);

        assert!(matches!(
            service.get_all_notes().await,
            Err(NoteError::StoreUnavailable(_))
        ));
    }
}
