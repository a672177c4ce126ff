//! Reader for the labeled sparse-vector format.
//!
//! Each line holds one document:
//!
//! ```text
//! <label><fff><doc_id><fff><index>:<weight> <index>:<weight> ...
//! ```
//!
//! Indices are 0-based term positions in the vocabulary. Unlisted indices are 0.0.
//!
//! Weights are stored as `f32`. A weight written with more precision (e.g. a
//! 17-digit `f64` repr) is rounded to the nearest `f32`, so it round-trips to
//! about 7 significant digits, not bit-for-bit.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::document::Document;
use crate::error::{Error, Result};

/// Field separator between label, document id, and the sparse vector.
pub const FIELD_DELIMITER: &str = "<fff>";

/// Count the terms in a vocabulary sidecar (one term per line).
pub fn read_vocab_size(path: impl AsRef<Path>) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut n = 0;
    for line in reader.lines() {
        line?;
        n += 1;
    }
    Ok(n)
}

/// Read every document from `reader`, expanding each to `vocab_size` dimensions.
///
/// Blank lines at the end of the input are ignored; a blank line followed by
/// another record is malformed. Any malformed line aborts the whole load.
pub fn read_documents<R: BufRead>(reader: R, vocab_size: usize) -> Result<Vec<Document>> {
    if vocab_size == 0 {
        return Err(Error::InvalidParameter {
            name: "vocab_size",
            message: "must be at least 1",
        });
    }

    let mut documents = Vec::new();
    let mut first_blank: Option<usize> = None;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            first_blank.get_or_insert(i + 1);
            continue;
        }
        if let Some(blank) = first_blank {
            return Err(Error::Parse {
                line: blank,
                message: "blank line before the end of the dataset".to_string(),
            });
        }
        documents.push(parse_line(&line, i + 1, vocab_size)?);
    }
    Ok(documents)
}

/// Parse one `label<fff>doc_id<fff>sparse_vector` record.
///
/// `line_no` is only used for error reporting.
pub fn parse_line(line: &str, line_no: usize, vocab_size: usize) -> Result<Document> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let &[label, doc_id, sparse] = fields.as_slice() else {
        return Err(Error::Parse {
            line: line_no,
            message: format!(
                "expected 3 fields separated by {FIELD_DELIMITER}, found {}",
                fields.len()
            ),
        });
    };

    let label: u32 = label.trim().parse().map_err(|_| Error::Parse {
        line: line_no,
        message: format!("invalid label {:?}", label.trim()),
    })?;
    let doc_id: u64 = doc_id.trim().parse().map_err(|_| Error::Parse {
        line: line_no,
        message: format!("invalid doc id {:?}", doc_id.trim()),
    })?;
    let vector = sparse_to_dense(sparse, line_no, vocab_size)?;

    Ok(Document::new(vector, label, doc_id))
}

/// Expand space-separated `index:weight` tokens into a dense vector.
pub fn sparse_to_dense(sparse: &str, line_no: usize, vocab_size: usize) -> Result<Vec<f32>> {
    let mut dense = vec![0.0f32; vocab_size];

    for token in sparse.split_whitespace() {
        let Some((index, weight)) = token.split_once(':') else {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected index:weight, found {token:?}"),
            });
        };

        let index: usize = index.parse().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("invalid index in {token:?}"),
        })?;
        let weight: f32 = weight.parse().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("invalid weight in {token:?}"),
        })?;
        if !weight.is_finite() {
            return Err(Error::Parse {
                line: line_no,
                message: format!("non-finite weight in {token:?}"),
            });
        }

        if index >= vocab_size {
            return Err(Error::IndexOutOfRange {
                line: line_no,
                index,
                vocab_size,
            });
        }
        dense[index] = weight;
    }

    Ok(dense)
}
