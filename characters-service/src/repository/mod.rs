//! Repository traits for document store access
//!
//! - [`Repository`]: list/get/insert/update/delete for one entity type
//! - [`Pagination`]: optional skip/limit bounds for scans
//! - [`RepositoryError`]: store failures with operation and entity context

mod error;
mod pagination;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::Pagination;
pub use traits::{Repository, RepositoryResult};
