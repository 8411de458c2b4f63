use camino::Utf8Path;
use confguard_domain::{Document, Store};
use confguard_types::RepoPath;
use rayon::prelude::*;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}")]
    Read {
        path: RepoPath,
        #[source]
        source: std::io::Error,
    },

    #[error("decode {path}: {reason}")]
    Decode { path: RepoPath, reason: String },

    #[error("unsupported file type: {path} (expected .json, .jsonl, .ndjson or .toml)")]
    UnsupportedFormat { path: RepoPath },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
    Toml,
}

impl Format {
    fn of(path: &RepoPath) -> Option<Self> {
        let ext = Utf8Path::new(path.as_str()).extension()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "jsonl" | "ndjson" => Some(Format::JsonLines),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Whether `path` has an extension [`decode`] understands.
pub fn supported(path: &RepoPath) -> bool {
    Format::of(path).is_some()
}

/// Decode `text` according to the extension of `path`.
///
/// JSON and TOML files hold one document. JSON Lines files hold one document per
/// non-empty line.
pub fn decode(path: &RepoPath, text: &str) -> Result<Vec<Value>, LoadError> {
    let format = Format::of(path).ok_or_else(|| LoadError::UnsupportedFormat { path: path.clone() })?;
    let decode_err = |reason: String| LoadError::Decode {
        path: path.clone(),
        reason,
    };

    match format {
        Format::Json => serde_json::from_str(text)
            .map(|v| vec![v])
            .map_err(|e| decode_err(e.to_string())),
        Format::Toml => toml::from_str::<Value>(text)
            .map(|v| vec![v])
            .map_err(|e| decode_err(e.to_string())),
        Format::JsonLines => text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).map_err(|e| decode_err(format!("line {}: {e}", n + 1)))
            })
            .collect(),
    }
}

fn read_and_decode(root: &Utf8Path, path: &RepoPath) -> Result<Vec<Value>, LoadError> {
    let abs = root.join(path.as_str());
    let text = std::fs::read_to_string(&abs).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    decode(path, &text)
}

/// Read and decode every file, in parallel, keeping input order.
///
/// Documents are numbered globally: the second document of the second file follows the
/// last document of the first.
pub fn load_documents(root: &Utf8Path, paths: &[RepoPath]) -> Result<Vec<Document>, LoadError> {
    let decoded: Vec<Vec<Value>> = paths
        .par_iter()
        .map(|path| read_and_decode(root, path))
        .collect::<Result<_, _>>()?;

    let mut documents = Vec::new();
    for (path, values) in paths.iter().zip(decoded) {
        for content in values {
            let index = documents.len() as u32;
            documents.push(Document::new(index, Some(path.clone()), content));
        }
    }

    tracing::debug!(files = paths.len(), documents = documents.len(), "loaded documents");
    Ok(documents)
}

/// Load data files into a [`Store`] keyed by file stem.
///
/// A file holding several documents is stored as an array. A later file with the same
/// stem replaces the earlier one.
pub fn load_store(root: &Utf8Path, paths: &[RepoPath]) -> Result<Store, LoadError> {
    let mut store = Store::new();
    for path in paths {
        let mut values = read_and_decode(root, path)?;
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };
        let key = Utf8Path::new(path.as_str())
            .file_stem()
            .unwrap_or(path.as_str())
            .to_string();
        if store.insert(key.clone(), value).is_some() {
            tracing::warn!(key = %key, path = %path, "data file replaces an earlier one with the same name");
        }
    }
    Ok(store)
}
