//! Runs [`Effect`]s as background tasks that report back as [`TuiEvent`]s.

use crate::events::TuiEvent;
use crate::source::{HierarchySource, RecordSource};
use crate::state::{App, Effect};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Carry out one effect and produce the event describing its outcome.
///
/// `source` is the record source of the effect's resource; it is unused for
/// [`Effect::LoadHierarchy`].
pub async fn execute(
    effect: Effect,
    source: Option<Arc<dyn RecordSource>>,
    hierarchy: &HierarchySource,
) -> Option<TuiEvent> {
    match effect {
        Effect::LoadHierarchy => {
            let result = hierarchy.load().await.map_err(|err| {
                tracing::error!(error = %err, "Hierarchy request failed");
                err.to_string()
            });
            Some(TuiEvent::HierarchyLoaded(result))
        }
        Effect::Fetch {
            resource,
            seq,
            page_index,
            page_size,
            query,
        } => {
            let source = source?;
            let result = source
                .fetch_page(page_index, page_size, &query)
                .await
                .map_err(|err| {
                    tracing::error!(resource = %resource, error = %err, "Page request failed");
                    err.to_string()
                });
            Some(TuiEvent::PageLoaded {
                resource,
                seq,
                result,
            })
        }
        Effect::Save { resource, intent } => {
            let source = source?;
            let is_editing = intent.is_editing;
            let result = source
                .save(intent.draft, is_editing)
                .await
                .map_err(|err| {
                    tracing::error!(resource = %resource, error = %err, "Save request failed");
                    err.to_string()
                });
            Some(TuiEvent::Saved {
                resource,
                is_editing,
                result,
            })
        }
        Effect::Delete { resource, id } => {
            let source = source?;
            let result = source.delete(&id).await.map_err(|err| {
                tracing::error!(resource = %resource, id = %id, error = %err, "Delete request failed");
                err.to_string()
            });
            Some(TuiEvent::Deleted {
                resource,
                id,
                result,
            })
        }
    }
}

fn resource_of(effect: &Effect) -> Option<&str> {
    match effect {
        Effect::Fetch { resource, .. }
        | Effect::Save { resource, .. }
        | Effect::Delete { resource, .. } => Some(resource),
        Effect::LoadHierarchy => None,
    }
}

/// Spawn every effect on the runtime. Results arrive on `sender`.
pub fn spawn_all(
    app: &App,
    effects: Vec<Effect>,
    hierarchy: &HierarchySource,
    sender: &mpsc::Sender<TuiEvent>,
) {
    for effect in effects {
        let source = match resource_of(&effect) {
            Some(key) => match app.source_for(key) {
                Some(source) => Some(source),
                None => {
                    tracing::warn!(resource = %key, "Effect for unknown resource dropped");
                    continue;
                }
            },
            None => None,
        };
        let hierarchy = hierarchy.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            if let Some(event) = execute(effect, source, &hierarchy).await {
                let _ = sender.send(event).await;
            }
        });
    }
}
