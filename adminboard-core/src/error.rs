//! Error types for adminboard core operations

use thiserror::Error;

/// Violations of the paged result set envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page size must be > 0")]
    ZeroPageSize,

    #[error("Page holds {len} records but page size is {page_size}")]
    Overfull { len: usize, page_size: usize },

    #[error(
        "totalPages is {reported} but {total_elements} elements at {page_size} per page make {expected}"
    )]
    TotalPagesMismatch {
        reported: u64,
        expected: u64,
        total_elements: u64,
        page_size: usize,
    },

    #[error("Page number {page_number} out of range for {total_pages} pages")]
    PageOutOfRange { page_number: usize, total_pages: u64 },

    #[error("Duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("Duplicate value {id} in id field {id_field}")]
    DuplicateId { id_field: String, id: String },
}
