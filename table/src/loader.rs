//! Reading and writing table documents on disk.
//!
//! The format follows the file extension: `.json` is JSON, `.yml` and
//! `.yaml` are YAML.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use command_dispatch_core::DispatchConfig;

use crate::document::TableDocument;
use crate::error::{Result, TableError};

/// On-disk encoding of a [`TableDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// `.json`
    Json,
    /// `.yml` / `.yaml`
    Yaml,
}

impl TableFormat {
    /// Picks the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_table::TableFormat;
    ///
    /// assert_eq!(TableFormat::from_path("cli.yaml").unwrap(), TableFormat::Yaml);
    /// assert_eq!(TableFormat::from_path("cli.JSON").unwrap(), TableFormat::Json);
    /// assert!(TableFormat::from_path("cli.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            _ => Err(TableError::UnknownFormat(path.display().to_string())),
        }
    }
}

impl TableDocument {
    /// Loads a document, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFormat`](TableError::UnknownFormat) for an
    /// unrecognized extension, [`IoError`](TableError::IoError) if the file
    /// cannot be read, or a parse error for the chosen format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);

        let doc = match format {
            TableFormat::Json => serde_json::from_reader(reader)?,
            TableFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(doc)
    }

    /// Saves the document, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFormat`](TableError::UnknownFormat),
    /// [`IoError`](TableError::IoError), or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let mut writer = BufWriter::new(std::fs::File::create(path)?);

        match format {
            TableFormat::Json => serde_json::to_writer_pretty(&mut writer, self)?,
            TableFormat::Yaml => serde_yaml::to_writer(&mut writer, self)?,
        }
        writer.flush()?;
        Ok(())
    }
}

/// Loads a document and converts it into a checked [`DispatchConfig`].
///
/// # Errors
///
/// Any error from [`TableDocument::load`] or [`TableDocument::into_config`].
///
/// # Examples
///
/// ```no_run
/// use command_dispatch_table::load_config;
///
/// let config = load_config("commands.yaml").unwrap();
/// assert!(config.validate().is_empty());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DispatchConfig> {
    TableDocument::load(path)?.into_config()
}
