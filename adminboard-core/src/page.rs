//! Paginated response envelope.

use crate::error::PageError;
use crate::record::Record;
use crate::schema::SchemaRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    /// Zero-based.
    pub page_number: usize,
    pub page_size: usize,
}

/// One page of records together with the schema that describes them.
///
/// Extra envelope fields sent by the server (`first`, `last`, `size`, ...)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResultSet {
    #[serde(default)]
    pub columns: SchemaRegistry,
    #[serde(default)]
    pub content: Vec<Record>,
    pub pageable: Pageable,
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
}

/// `ceil(total_elements / page_size)`, zero for a zero page size.
pub fn page_count(total_elements: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(page_size as u64)
}

/// "first-last of total" for the page at `page_index`.
pub fn range_label(page_index: usize, page_size: usize, total_elements: u64) -> String {
    if total_elements == 0 || page_size == 0 {
        return format!("0-0 of {}", total_elements);
    }
    let size = page_size as u64;
    let index = page_index as u64;
    let first = index.saturating_mul(size).saturating_add(1).min(total_elements);
    let last = index.saturating_add(1).saturating_mul(size).min(total_elements);
    format!("{}-{} of {}", first, last, total_elements)
}

impl PagedResultSet {
    /// Envelope with no records.
    pub fn empty(columns: SchemaRegistry, page_size: usize) -> Self {
        Self {
            columns,
            content: Vec::new(),
            pageable: Pageable {
                page_number: 0,
                page_size,
            },
            total_elements: 0,
            total_pages: 0,
        }
    }

    /// Cut page `page_index` out of a full record list.
    pub fn from_slice(
        columns: SchemaRegistry,
        all: &[Record],
        page_index: usize,
        page_size: usize,
    ) -> Self {
        let start = page_index.saturating_mul(page_size).min(all.len());
        let end = start.saturating_add(page_size).min(all.len());
        let total_elements = all.len() as u64;
        Self {
            columns,
            content: all[start..end].to_vec(),
            pageable: Pageable {
                page_number: page_index,
                page_size,
            },
            total_elements,
            total_pages: page_count(total_elements, page_size),
        }
    }

    /// Page count derived from the element total, not the reported field.
    pub fn page_count(&self) -> u64 {
        page_count(self.total_elements, self.pageable.page_size)
    }

    pub fn is_last(&self) -> bool {
        (self.pageable.page_number as u64).saturating_add(1) >= self.page_count()
    }

    /// Check the envelope invariants.
    pub fn check(&self) -> Result<(), PageError> {
        let page_size = self.pageable.page_size;
        if page_size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        if self.content.len() > page_size {
            return Err(PageError::Overfull {
                len: self.content.len(),
                page_size,
            });
        }
        let expected = self.page_count();
        if self.total_pages != expected {
            return Err(PageError::TotalPagesMismatch {
                reported: self.total_pages,
                expected,
                total_elements: self.total_elements,
                page_size,
            });
        }
        if self.total_elements > 0 && self.pageable.page_number as u64 >= expected {
            return Err(PageError::PageOutOfRange {
                page_number: self.pageable.page_number,
                total_pages: expected,
            });
        }
        if let Some(name) = self.columns.duplicate_name() {
            return Err(PageError::DuplicateColumn {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Check what a caller needs before showing this page.
    ///
    /// Looser than [`check`](Self::check): a reported `totalPages` that
    /// disagrees is tolerated because the count is always derived, and an
    /// empty page past the end is accepted so the caller can step back from
    /// it. Rows must fit the page, sit inside the page range and carry
    /// unique ids.
    pub fn check_usable(&self, id_field: &str) -> Result<(), PageError> {
        let page_size = self.pageable.page_size;
        if page_size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        if self.content.len() > page_size {
            return Err(PageError::Overfull {
                len: self.content.len(),
                page_size,
            });
        }
        let pages = self.page_count();
        if !self.content.is_empty() && self.pageable.page_number as u64 >= pages {
            return Err(PageError::PageOutOfRange {
                page_number: self.pageable.page_number,
                total_pages: pages,
            });
        }
        if let Some(name) = self.columns.duplicate_name() {
            return Err(PageError::DuplicateColumn {
                name: name.to_string(),
            });
        }
        self.check_ids(id_field)
    }

    /// Check that `id_field` is unique across the loaded records.
    pub fn check_ids(&self, id_field: &str) -> Result<(), PageError> {
        let mut seen = HashSet::new();
        for record in &self.content {
            if let Some(id) = record.id(id_field) {
                if !seen.insert(id.clone()) {
                    return Err(PageError::DuplicateId {
                        id_field: id_field.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDescriptor;

    fn people(count: i64) -> Vec<Record> {
        (1..=count)
            .map(|i| Record::new().with("ID", i).with("Nom", format!("n{}", i)))
            .collect()
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 3), 0);
        assert_eq!(page_count(1, 3), 1);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(10, 3), 4);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_from_slice_cuts_requested_page() {
        let all = people(10);
        let page = PagedResultSet::from_slice(SchemaRegistry::default(), &all, 3, 3);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].value("ID"), &crate::Scalar::Int(10));
        assert_eq!(page.total_pages, 4);
        assert!(page.is_last());
        assert!(page.check().is_ok());
    }

    #[test]
    fn test_from_slice_past_end_is_empty() {
        let all = people(2);
        let page = PagedResultSet::from_slice(SchemaRegistry::default(), &all, 5, 3);
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 2);
    }

    #[test]
    fn test_range_label() {
        assert_eq!(range_label(0, 3, 10), "1-3 of 10");
        assert_eq!(range_label(3, 3, 10), "10-10 of 10");
        assert_eq!(range_label(0, 3, 0), "0-0 of 0");
    }

    #[test]
    fn test_check_flags_inconsistent_total_pages() {
        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 0, 3);
        page.total_pages = 3;
        assert_eq!(
            page.check(),
            Err(PageError::TotalPagesMismatch {
                reported: 3,
                expected: 4,
                total_elements: 10,
                page_size: 3,
            })
        );
    }

    #[test]
    fn test_check_flags_overfull_and_out_of_range() {
        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 0, 3);
        page.content = people(4);
        assert!(matches!(page.check(), Err(PageError::Overfull { len: 4, page_size: 3 })));

        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 0, 3);
        page.pageable.page_number = 4;
        assert!(matches!(page.check(), Err(PageError::PageOutOfRange { .. })));
    }

    #[test]
    fn test_check_ids_detects_duplicates() {
        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(3), 0, 3);
        assert!(page.check_ids("ID").is_ok());
        page.content[2].set("ID", 1i64);
        assert!(matches!(page.check_ids("ID"), Err(PageError::DuplicateId { .. })));
    }

    #[test]
    fn test_range_label_saturates_on_huge_page_number() {
        assert_eq!(range_label(usize::MAX, 3, 10), "10-10 of 10");
    }

    #[test]
    fn test_check_usable_tolerates_total_pages_and_empty_past_end() {
        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 0, 3);
        page.total_pages = 0;
        assert!(page.check_usable("ID").is_ok());

        let past_end = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 6, 3);
        assert!(past_end.check().is_err());
        assert!(past_end.check_usable("ID").is_ok());
    }

    #[test]
    fn test_check_usable_rejects_rows_outside_range_and_duplicate_ids() {
        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(10), 0, 3);
        page.pageable.page_number = usize::MAX;
        assert!(matches!(page.check_usable("ID"), Err(PageError::PageOutOfRange { .. })));
        assert!(page.is_last());

        let mut page = PagedResultSet::from_slice(SchemaRegistry::default(), &people(3), 0, 3);
        page.content[1].set("ID", 1i64);
        assert!(matches!(page.check_usable("ID"), Err(PageError::DuplicateId { .. })));
    }

    #[test]
    fn test_deserializes_spring_style_envelope() {
        let json = r#"{
            "columns": [{"name": "ID", "type": "Number", "required": true}],
            "content": [{"ID": 1}],
            "pageable": {"pageNumber": 0, "pageSize": 3},
            "totalElements": 1,
            "totalPages": 1,
            "last": true,
            "first": true,
            "empty": false
        }"#;
        let page: PagedResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(page.columns.len(), 1);
        assert_eq!(page.columns.iter().next(), Some(&ColumnDescriptor::number("ID").required()));
        assert!(page.check().is_ok());
    }
}
