//! Record sources: where a resource's pages come from and where edits go.

use crate::api_client::{ApiClientError, RestClient};
use crate::config::{AdminConfig, HierarchyConfig};
use adminboard_core::{
    CrudTable, HierarchyNode, Identifier, PagedResultSet, Record, SchemaRegistry, TableMode,
    TableQuery,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error("Failed to read fixture {path}: {source}")]
    FixtureIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse fixture {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Record has no value in id field {id_field}")]
    MissingId { id_field: String },
    #[error("No record with id {id}")]
    NotFound { id: Identifier },
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_page(
        &self,
        page_index: usize,
        page_size: usize,
        query: &TableQuery,
    ) -> Result<PagedResultSet, SourceError>;

    async fn save(&self, draft: Record, is_editing: bool) -> Result<(), SourceError>;

    async fn delete(&self, id: &Identifier) -> Result<(), SourceError>;
}

// ============================================================================
// REST
// ============================================================================

/// Spring-style paged endpoint.
pub struct RestSource {
    client: RestClient,
    path: String,
    id_field: String,
}

impl RestSource {
    pub fn new(client: RestClient, path: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            id_field: id_field.into(),
        }
    }
}

/// Query string for a page request: `page`, `size`, then `sort=col,dir` and
/// `search` when set.
pub fn page_params(page_index: usize, page_size: usize, query: &TableQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page_index.to_string()),
        ("size", page_size.to_string()),
    ];
    if let Some(sort) = &query.sort {
        params.push(("sort", format!("{},{}", sort.column, sort.direction.as_str())));
    }
    if !query.filter.is_empty() {
        params.push(("search", query.filter.clone()));
    }
    params
}

#[async_trait]
impl RecordSource for RestSource {
    async fn fetch_page(
        &self,
        page_index: usize,
        page_size: usize,
        query: &TableQuery,
    ) -> Result<PagedResultSet, SourceError> {
        let url = self.client.url(&self.path, None)?;
        let params = page_params(page_index, page_size, query);
        let page: PagedResultSet = self.client.get_json(url, Some(&params)).await?;
        if let Err(err) = page.check() {
            tracing::warn!(path = %self.path, error = %err, "Inconsistent page envelope");
        }
        Ok(page)
    }

    async fn save(&self, draft: Record, is_editing: bool) -> Result<(), SourceError> {
        if is_editing {
            let id = draft.id(&self.id_field).ok_or_else(|| SourceError::MissingId {
                id_field: self.id_field.clone(),
            })?;
            let url = self.client.url(&self.path, Some(&id.to_string()))?;
            self.client.send_json(Method::PUT, url, Some(&draft)).await?;
        } else {
            let url = self.client.url(&self.path, None)?;
            self.client.send_json(Method::POST, url, Some(&draft)).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: &Identifier) -> Result<(), SourceError> {
        let url = self.client.url(&self.path, Some(&id.to_string()))?;
        self.client
            .send_json::<()>(Method::DELETE, url, None)
            .await?;
        Ok(())
    }
}

// ============================================================================
// FIXTURE
// ============================================================================

#[derive(Debug, Deserialize)]
struct FixtureFile {
    columns: SchemaRegistry,
    #[serde(default)]
    records: Vec<Record>,
}

/// In-memory records loaded from a JSON file, served like a paged endpoint.
pub struct FixtureSource {
    columns: SchemaRegistry,
    id_field: String,
    records: Mutex<Vec<Record>>,
}

impl FixtureSource {
    pub fn new(columns: SchemaRegistry, records: Vec<Record>, id_field: impl Into<String>) -> Self {
        Self {
            columns,
            id_field: id_field.into(),
            records: Mutex::new(records),
        }
    }

    /// Load `{ "columns": [...], "records": [...] }`.
    pub fn from_path(path: &Path, id_field: impl Into<String>) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FixtureFile =
            serde_json::from_str(&contents).map_err(|source| SourceError::FixtureParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file.columns, file.records, id_field))
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    fn next_id(&self, records: &[Record]) -> i64 {
        records
            .iter()
            .filter_map(|r| match r.id(&self.id_field) {
                Some(Identifier::Int(n)) => Some(n),
                _ => None,
            })
            .max()
            .map_or(1, |max| max + 1)
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn fetch_page(
        &self,
        page_index: usize,
        page_size: usize,
        query: &TableQuery,
    ) -> Result<PagedResultSet, SourceError> {
        let records = self.records.lock().await;

        // Same filter and sort as the table applies locally.
        let all = PagedResultSet::from_slice(self.columns.clone(), &records, 0, records.len().max(1));
        let mut table = CrudTable::new(all, self.id_field.clone(), TableMode::Local);
        table.set_filter(query.filter.clone());
        table.set_sort(query.sort.clone());
        let matching: Vec<Record> = table.visible_records().cloned().collect();

        let pages = adminboard_core::page_count(matching.len() as u64, page_size) as usize;
        let page_index = page_index.min(pages.saturating_sub(1));
        Ok(PagedResultSet::from_slice(
            self.columns.clone(),
            &matching,
            page_index,
            page_size,
        ))
    }

    async fn save(&self, mut draft: Record, is_editing: bool) -> Result<(), SourceError> {
        let mut records = self.records.lock().await;
        if is_editing {
            let id = draft.id(&self.id_field).ok_or_else(|| SourceError::MissingId {
                id_field: self.id_field.clone(),
            })?;
            let slot = records
                .iter_mut()
                .find(|r| r.id(&self.id_field).as_ref() == Some(&id))
                .ok_or(SourceError::NotFound { id })?;
            *slot = draft;
        } else {
            let id = self.next_id(&records);
            draft.set(self.id_field.clone(), id);
            records.push(draft);
        }
        Ok(())
    }

    async fn delete(&self, id: &Identifier) -> Result<(), SourceError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id(&self.id_field).as_ref() != Some(id));
        if records.len() == before {
            return Err(SourceError::NotFound { id: id.clone() });
        }
        Ok(())
    }
}

// ============================================================================
// HIERARCHY
// ============================================================================

/// Where the picker's tree is loaded from.
#[derive(Clone)]
pub enum HierarchySource {
    Rest { client: RestClient, path: String },
    Fixture(PathBuf),
    Empty,
}

impl HierarchySource {
    pub async fn load(&self) -> Result<Vec<HierarchyNode>, SourceError> {
        match self {
            HierarchySource::Rest { client, path } => {
                let url = client.url(path, None)?;
                Ok(client.get_json::<_, ()>(url, None).await?)
            }
            HierarchySource::Fixture(path) => {
                let contents =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| SourceError::FixtureIo {
                            path: path.clone(),
                            source,
                        })?;
                serde_json::from_str(&contents).map_err(|source| SourceError::FixtureParse {
                    path: path.clone(),
                    source,
                })
            }
            HierarchySource::Empty => Ok(Vec::new()),
        }
    }
}

impl HierarchySource {
    pub fn from_config(config: &HierarchyConfig, client: &RestClient) -> Self {
        match (&config.path, &config.fixture) {
            (Some(path), _) => HierarchySource::Rest {
                client: client.clone(),
                path: path.clone(),
            },
            (None, Some(fixture)) => HierarchySource::Fixture(fixture.clone()),
            (None, None) => HierarchySource::Empty,
        }
    }
}

/// One source per configured resource, keyed by resource key.
pub fn build_sources(
    config: &AdminConfig,
    client: &RestClient,
) -> Result<Vec<(String, Arc<dyn RecordSource>)>, SourceError> {
    config
        .resources
        .iter()
        .map(|resource| {
            let source: Arc<dyn RecordSource> = match (&resource.path, &resource.fixture) {
                (Some(path), _) => Arc::new(RestSource::new(
                    client.clone(),
                    path.clone(),
                    resource.id_field.clone(),
                )),
                (None, Some(fixture)) => Arc::new(FixtureSource::from_path(
                    fixture,
                    resource.id_field.clone(),
                )?),
                (None, None) => Arc::new(FixtureSource::new(
                    SchemaRegistry::default(),
                    Vec::new(),
                    resource.id_field.clone(),
                )),
            };
            tracing::info!(resource = %resource.key, mode = ?resource.mode, "Source ready");
            Ok((resource.key.clone(), source))
        })
        .collect()
}
