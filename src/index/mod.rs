//! Keyword index over run artifacts
//!
//! Every non-marker line of an artifact becomes one document carrying the
//! URL of the block it sits in. Documents are searchable by content and
//! retrievable by exact URL.

pub mod query;
pub mod schema;

use crate::error::{IndexError, QueryError};
use crate::parsers::text::ArtifactReader;
use rusqlite::{Connection, OpenFlags, params};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One indexed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// URL of the nearest preceding marker; empty before the first marker
    pub url: String,
    pub content: String,
}

/// Ranked hits for a query, best first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub hits: Vec<IndexDocument>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Hits grouped by URL, URLs in the order of their best hit
    pub fn by_url(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for hit in &self.hits {
            let url = hit.url.as_str();
            let content = hit.content.as_str();
            match groups.iter_mut().find(|(seen, _)| *seen == url) {
                Some((_, contents)) => contents.push(content),
                None => groups.push((url, vec![content])),
            }
        }
        groups
    }
}

/// Result of indexing one artifact
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Number of documents added, or why the file was rolled back
    pub result: Result<usize, IndexError>,
}

/// Handle on an index directory
pub struct SearchIndex {
    conn: Connection,
}

impl SearchIndex {
    /// Open the index in `dir`, creating the directory and schema if needed
    ///
    /// An existing index is opened as-is.
    pub fn create_or_open(dir: &Path) -> Result<Self, IndexError> {
        fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(schema::DATABASE_FILE))?;
        if !schema::is_initialized(&conn)? {
            ::log::info!("Creating new index in {}", dir.display());
            schema::initialize_schema(&conn)?;
        }
        Ok(Self { conn })
    }

    /// Open an index that already exists
    pub fn open(dir: &Path) -> Result<Self, IndexError> {
        let path = dir.join(schema::DATABASE_FILE);
        if !path.is_file() {
            return Err(IndexError::NotInitialized(dir.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        if !schema::is_initialized(&conn)? {
            return Err(IndexError::NotInitialized(dir.to_path_buf()));
        }
        Ok(Self { conn })
    }

    /// Add every document of one artifact in a single transaction
    ///
    /// Nothing from the file is kept if reading or inserting fails partway.
    pub fn add_file(&mut self, file: &Path) -> Result<usize, IndexError> {
        let reader = BufReader::new(File::open(file)?);

        let tx = self.conn.transaction()?;
        let mut added = 0;
        {
            let mut insert =
                tx.prepare("INSERT INTO documents (url, content) VALUES (?1, ?2)")?;
            for entry in ArtifactReader::new(reader) {
                let entry = entry?;
                insert.execute(params![entry.url, entry.content])?;
                added += 1;
            }
        }
        tx.commit()?;

        ::log::info!("Indexed {} documents from {}", added, file.display());
        Ok(added)
    }

    /// Ranked full-text search over document content
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResults, QueryError> {
        let expression = query::to_match_expression(query).ok_or(QueryError::Empty)?;
        ::log::debug!("Searching for {}", expression);

        let mut stmt = self.conn.prepare(
            "SELECT url, content FROM documents WHERE documents MATCH ?1 ORDER BY rank LIMIT ?2",
        )?;
        let hits = stmt
            .query_map(params![expression, limit as i64], |row| {
                Ok(IndexDocument {
                    url: row.get(0)?,
                    content: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResults { hits })
    }

    /// Documents stored under exactly `url`, in insertion order
    pub fn documents_for_url(&self, url: &str) -> Result<Vec<IndexDocument>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, content FROM documents WHERE url = ?1 ORDER BY rowid")?;
        let documents = stmt
            .query_map([url], |row| {
                Ok(IndexDocument {
                    url: row.get(0)?,
                    content: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    pub fn document_count(&self) -> Result<usize, IndexError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Index one artifact into the index at `index_dir`, creating it if absent
pub fn add_data_to_index(index_dir: &Path, file: &Path) -> Result<usize, IndexError> {
    let mut index = SearchIndex::create_or_open(index_dir)?;
    index.add_file(file)
}

/// Index several artifacts, one transaction each
///
/// A file that fails is logged and rolled back; the remaining files are
/// still indexed.
pub fn index_files(index_dir: &Path, files: &[PathBuf]) -> Vec<FileOutcome> {
    files
        .iter()
        .map(|path| {
            let result = add_data_to_index(index_dir, path);
            if let Err(e) = &result {
                ::log::error!("Failed to index {}: {}", path.display(), e);
            }
            FileOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = "\nURL: siteA.com\nOak Chair\nLamp\n\nURL: siteB.com\nVelvet Sofa\n";

    fn write_artifact(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn all_documents(index: &SearchIndex) -> Vec<(String, String)> {
        let mut stmt = index
            .conn
            .prepare("SELECT url, content FROM documents ORDER BY url, content")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_same_artifact_gives_same_documents_in_fresh_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_artifact(dir.path(), "stores_output.txt", ARTIFACT);
        let first_dir = dir.path().join("first");
        let second_dir = dir.path().join("second");

        add_data_to_index(&first_dir, &file).unwrap();
        add_data_to_index(&second_dir, &file).unwrap();

        let first = all_documents(&SearchIndex::open(&first_dir).unwrap());
        let second = all_documents(&SearchIndex::open(&second_dir).unwrap());
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                ("siteA.com".to_string(), "Lamp".to_string()),
                ("siteA.com".to_string(), "Oak Chair".to_string()),
                ("siteB.com".to_string(), "Velvet Sofa".to_string()),
            ]
        );
    }

    #[test]
    fn test_index_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let file = write_artifact(dir.path(), "stores_output.txt", ARTIFACT);

        assert_eq!(add_data_to_index(&index_dir, &file).unwrap(), 3);

        let index = SearchIndex::open(&index_dir).unwrap();
        assert_eq!(index.document_count().unwrap(), 3);
        assert_eq!(
            index.documents_for_url("siteA.com").unwrap(),
            vec![
                IndexDocument {
                    url: "siteA.com".to_string(),
                    content: "Oak Chair".to_string()
                },
                IndexDocument {
                    url: "siteA.com".to_string(),
                    content: "Lamp".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_search_finds_content_under_its_url() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let file = write_artifact(
            dir.path(),
            "stores_output.txt",
            "\nURL: siteA.com\nOak Chair\nLamp\n",
        );
        add_data_to_index(&index_dir, &file).unwrap();

        let index = SearchIndex::open(&index_dir).unwrap();
        let results = index.search("chair", 50).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.by_url(), vec![("siteA.com", vec!["Oak Chair"])]);

        // Case-insensitive
        assert_eq!(index.search("CHAIR", 50).unwrap().len(), 1);
        assert!(index.search("sofa", 50).unwrap().is_empty());
    }

    #[test]
    fn test_search_requires_all_terms() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let file = write_artifact(
            dir.path(),
            "stores_output.txt",
            "\nURL: a.com\nOak Chair\nOak Table\n\nURL: b.com\nChair Oak Finish\n",
        );
        add_data_to_index(&index_dir, &file).unwrap();
        let index = SearchIndex::open(&index_dir).unwrap();

        assert_eq!(index.search("oak chair", 50).unwrap().len(), 2);
        let phrase = index.search(r#""oak chair""#, 50).unwrap();
        assert_eq!(phrase.by_url(), vec![("a.com", vec!["Oak Chair"])]);
        assert_eq!(index.search("oak", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_operators_are_searched_literally() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let file = write_artifact(dir.path(), "stores_output.txt", ARTIFACT);
        add_data_to_index(&index_dir, &file).unwrap();
        let index = SearchIndex::open(&index_dir).unwrap();

        assert!(index.search("NOT", 50).unwrap().is_empty());
        assert!(index.search("url:siteA", 50).unwrap().is_empty());
    }

    #[test]
    fn test_blank_query_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = SearchIndex::create_or_open(dir.path()).unwrap();
        assert!(matches!(index.search("   ", 50), Err(QueryError::Empty)));
    }

    #[test]
    fn test_content_before_first_marker_has_empty_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_artifact(dir.path(), "a_output.txt", "Stray Stool\n\nURL: a.com\nLamp\n");
        add_data_to_index(&dir.path().join("idx"), &file).unwrap();

        let index = SearchIndex::open(&dir.path().join("idx")).unwrap();
        let stray = index.documents_for_url("").unwrap();
        assert_eq!(stray.len(), 1);
        assert_eq!(stray[0].content, "Stray Stool");
    }

    #[test]
    fn test_missing_file_does_not_stop_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let good = write_artifact(dir.path(), "good_output.txt", ARTIFACT);
        let missing = dir.path().join("missing_output.txt");

        let outcomes = index_files(&index_dir, &[missing.clone(), good.clone()]);
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].result, Err(IndexError::Io(_))));
        assert_eq!(outcomes[1].result.as_ref().unwrap(), &3);

        let index = SearchIndex::open(&index_dir).unwrap();
        assert_eq!(index.document_count().unwrap(), 3);
    }

    #[test]
    fn test_unreadable_file_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let path = dir.path().join("broken_output.txt");
        let mut bytes = b"\nURL: a.com\nLamp\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        fs::write(&path, bytes).unwrap();

        assert!(add_data_to_index(&index_dir, &path).is_err());
        let index = SearchIndex::open(&index_dir).unwrap();
        assert_eq!(index.document_count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("indexdir");
        let file = write_artifact(dir.path(), "stores_output.txt", ARTIFACT);
        add_data_to_index(&index_dir, &file).unwrap();

        let index = SearchIndex::create_or_open(&index_dir).unwrap();
        assert_eq!(index.document_count().unwrap(), 3);
    }

    #[test]
    fn test_open_requires_existing_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SearchIndex::open(&dir.path().join("nowhere")),
            Err(IndexError::NotInitialized(_))
        ));
    }
}
