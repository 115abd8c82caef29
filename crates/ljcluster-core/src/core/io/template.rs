use nalgebra::Vector3;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const TEMPLATE_EXTENSION: &str = "txt";

/// Errors raised while loading or parsing a cluster template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error("No cluster template found for id '{id}'")]
    NotFound { id: String },

    #[error("Template '{id}' provides {available} coordinate line(s), but {required} are required")]
    InsufficientTemplateData {
        id: String,
        required: usize,
        available: usize,
    },

    #[error("Malformed coordinate on entry {entry} of template '{id}': '{line}' ({reason})")]
    MalformedCoordinate {
        id: String,
        entry: usize,
        line: String,
        reason: CoordinateErrorKind,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateErrorKind {
    #[error("expected 3 tokens, found {0}")]
    WrongTokenCount(usize),
    #[error("'{0}' is not a valid floating-point number")]
    InvalidFloat(String),
    #[error("'{0}' is not a finite number")]
    NonFinite(String),
}

/// A read-only source of cluster templates, addressed by a string id.
///
/// By convention the id of a template is the number of particles it describes,
/// so a cluster of 75 particles is built from the template `"75"`.
pub trait TemplateStore {
    /// Returns the raw text of the template identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the store has no such template, or
    /// [`TemplateError::Io`] if reading it failed.
    fn load(&self, id: &str) -> Result<String, TemplateError>;
}

/// Loads templates from text files in a directory (`<root>/<id>.txt` or `<root>/<id>`).
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    root: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let with_extension = self.root.join(format!("{id}.{TEMPLATE_EXTENSION}"));
        if with_extension.is_file() {
            return Some(with_extension);
        }
        let bare = self.root.join(id);
        bare.is_file().then_some(bare)
    }
}

impl TemplateStore for DirectoryTemplateStore {
    fn load(&self, id: &str) -> Result<String, TemplateError> {
        let path = self
            .resolve(id)
            .ok_or_else(|| TemplateError::NotFound { id: id.to_string() })?;
        debug!("Reading cluster template '{}' from {:?}", id, path);
        fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Keeps templates in memory. Useful for embedding small clusters and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: HashMap<String, String>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.templates.insert(id.into(), text.into());
        self
    }

    pub fn with_template(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn load(&self, id: &str) -> Result<String, TemplateError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound { id: id.to_string() })
    }
}

/// Parses the first `count` coordinate entries of a template.
///
/// Lines are separated by `\r` or `\n`; blank lines are skipped and do not count
/// towards `count`. Each used entry must hold exactly three whitespace-separated
/// floats. Entries beyond `count` are never inspected.
///
/// # Errors
///
/// Returns [`TemplateError::InsufficientTemplateData`] if fewer than `count` usable
/// lines exist, and [`TemplateError::MalformedCoordinate`] for the first entry that
/// does not parse.
pub fn parse_coordinates(
    id: &str,
    text: &str,
    count: usize,
) -> Result<Vec<Vector3<f64>>, TemplateError> {
    let lines: Vec<&str> = text
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < count {
        return Err(TemplateError::InsufficientTemplateData {
            id: id.to_string(),
            required: count,
            available: lines.len(),
        });
    }

    lines
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, line)| {
            parse_coordinate_line(line).map_err(|reason| TemplateError::MalformedCoordinate {
                id: id.to_string(),
                entry: idx + 1,
                line: line.to_string(),
                reason,
            })
        })
        .collect()
}

fn parse_coordinate_line(line: &str) -> Result<Vector3<f64>, CoordinateErrorKind> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(CoordinateErrorKind::WrongTokenCount(tokens.len()));
    }

    let mut coords = [0.0; 3];
    for (slot, token) in coords.iter_mut().zip(&tokens) {
        let value: f64 = token
            .parse()
            .map_err(|_| CoordinateErrorKind::InvalidFloat(token.to_string()))?;
        if !value.is_finite() {
            return Err(CoordinateErrorKind::NonFinite(token.to_string()));
        }
        *slot = value;
    }
    Ok(Vector3::from(coords))
}
