use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One book from the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier (the CSV `book_id`)
    pub id: String,
    /// Book title
    pub title: String,
    /// Free-text summary
    pub body: String,
    /// Original column values kept alongside the record
    #[serde(default)]
    pub raw_metadata: BTreeMap<String, String>,
}

impl Record {
    /// Create a record whose metadata carries the title and id
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let title = title.into();
        let mut raw_metadata = BTreeMap::new();
        raw_metadata.insert("book_id".to_string(), id.clone());
        raw_metadata.insert("book_name".to_string(), title.clone());
        Self {
            id,
            title,
            body: body.into(),
            raw_metadata,
        }
    }

    /// Text handed to the extraction and embedding models
    ///
    /// Title and id lead the summary so the model always sees which book it
    /// is reading.
    pub fn document_text(&self) -> String {
        format!(
            "BOOK TITLE: {}\nSOURCE ID: {}\nSUMMARY:\n{}",
            self.title, self.id, self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_layout() {
        let record = Record::new("42", "Dune", "Spice and sand.");
        assert_eq!(
            record.document_text(),
            "BOOK TITLE: Dune\nSOURCE ID: 42\nSUMMARY:\nSpice and sand."
        );
    }

    #[test]
    fn test_metadata_mirrors_columns() {
        let record = Record::new("7", "Emma", "");
        assert_eq!(record.raw_metadata.get("book_id").map(String::as_str), Some("7"));
        assert_eq!(record.raw_metadata.get("book_name").map(String::as_str), Some("Emma"));
    }
}
