//! The Book record and its copy-count transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ReturnPolicy;
use crate::error::{LedgerError, NotFoundReason, Result};
use crate::store::{Record, RecordId};

/// Store-assigned book identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(RecordId);

impl BookId {
    pub const fn new(id: RecordId) -> Self {
        BookId(id)
    }

    pub const fn get(self) -> RecordId {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for BookId {
    fn from(id: RecordId) -> Self {
        BookId(id)
    }
}

/// A lendable title with its copy counts.
///
/// Fields are read-only from outside the crate; counts change through
/// `BookLedger` so that `0 <= available_copies <= copies` is checked on
/// every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    copies: i32,
    available_copies: i32,
}

impl Book {
    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn copies(&self) -> i32 {
        self.copies
    }

    pub fn available_copies(&self) -> i32 {
        self.available_copies
    }

    /// Copies currently out on loan.
    pub fn lent_copies(&self) -> i32 {
        self.copies - self.available_copies
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LedgerError::Validation("title must not be empty".into()));
        }
        if self.author.trim().is_empty() {
            return Err(LedgerError::Validation("author must not be empty".into()));
        }
        if self.copies < 0 {
            return Err(LedgerError::Validation(format!(
                "copies must be >= 0, got {}",
                self.copies
            )));
        }
        if self.available_copies < 0 || self.available_copies > self.copies {
            return Err(LedgerError::Validation(format!(
                "available copies must be within 0..={}, got {}",
                self.copies, self.available_copies
            )));
        }
        Ok(())
    }

    /// `n -> n - 1`, only when `n > 0`.
    pub(crate) fn lend(&mut self) -> Result<()> {
        if self.available_copies <= 0 {
            return Err(LedgerError::NotFound {
                id: self.id,
                reason: NotFoundReason::NoCopiesAvailable,
            });
        }
        self.available_copies -= 1;
        Ok(())
    }

    /// `n -> n + 1`. Under `ReturnPolicy::Unchecked` the count may pass `copies`.
    pub(crate) fn return_copy(&mut self, policy: ReturnPolicy) -> Result<()> {
        if policy == ReturnPolicy::Reject && self.available_copies >= self.copies {
            return Err(LedgerError::AllCopiesReturned { id: self.id });
        }
        self.available_copies = self.available_copies.checked_add(1).ok_or_else(|| {
            LedgerError::Validation(format!("available copies of book {} overflow", self.id))
        })?;
        Ok(())
    }
}

impl Record for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> RecordId {
        self.id.get()
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = BookId::new(id);
    }
}

/// Input to `BookLedger::add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub copies: i32,
    /// Defaults to `copies` when unset.
    #[serde(default)]
    pub available_copies: Option<i32>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, copies: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            copies,
            available_copies: None,
        }
    }

    pub fn with_available_copies(mut self, available_copies: i32) -> Self {
        self.available_copies = Some(available_copies);
        self
    }

    /// Validated, id-less book ready for insert.
    pub(crate) fn into_book(self) -> Result<Book> {
        let book = Book {
            id: BookId::default(),
            available_copies: self.available_copies.unwrap_or(self.copies),
            title: self.title,
            author: self.author,
            copies: self.copies,
        };
        book.validate()?;
        Ok(book)
    }
}

/// Field edits for `BookLedger::update`. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub copies: Option<i32>,
    pub available_copies: Option<i32>,
}

impl BookChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn copies(mut self, copies: i32) -> Self {
        self.copies = Some(copies);
        self
    }

    pub fn available_copies(mut self, available_copies: i32) -> Self {
        self.available_copies = Some(available_copies);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The edited copy of `book`, rejected if it breaks the copy-count invariant.
    /// Validation covers the result, so edits to a record already out of
    /// bounds fail unless they also repair the counts.
    pub(crate) fn apply_to(&self, book: &Book) -> Result<Book> {
        let mut edited = book.clone();
        if let Some(title) = &self.title {
            edited.title = title.clone();
        }
        if let Some(author) = &self.author {
            edited.author = author.clone();
        }
        if let Some(copies) = self.copies {
            edited.copies = copies;
        }
        if let Some(available_copies) = self.available_copies {
            edited.available_copies = available_copies;
        }
        edited.validate()?;
        Ok(edited)
    }
}
