//! Demonstration data for a fresh database.

use crate::domain::{Author, NewAuthor};

use super::{LibraryStore, RepositoryError};

/// Names inserted by [`seed_demo_authors`], in insertion order.
pub const DEMO_AUTHOR_NAMES: [&str; 2] = ["Example 1", "Example 2"];

/// Inserts the demo authors and returns every stored author.
///
/// Both names are written in a single unit of work, so a failure leaves no
/// demo author behind. Running the seed twice stores the names twice; names
/// carry no uniqueness constraint.
///
/// # Errors
///
/// Returns the first store failure.
pub async fn seed_demo_authors(store: &dyn LibraryStore) -> Result<Vec<Author>, RepositoryError> {
    let authors = DEMO_AUTHOR_NAMES.into_iter().map(NewAuthor::new).collect();
    for author in store.insert_authors(authors).await? {
        tracing::debug!(author_id = %author.author_id, name = %author.name, "Seeded author");
    }
    store.list_authors().await
}
