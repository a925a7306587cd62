use std::{
    fmt,
    io::Error,
    path::{Path, PathBuf},
    time::SystemTime,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::config;

#[derive(Debug)]
pub enum StoreError {
    IoError(Error),
    SerdeError(serde_json::Error),
    CsvError(csv::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "I/O error: {e}"),
            StoreError::SerdeError(e) => write!(f, "JSON error: {e}"),
            StoreError::CsvError(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::CsvError(err)
    }
}

/// Reads and writes the JSON and CSV files exchanged with the front-end.
///
/// All file names are relative to the store's root directory, which is
/// created on first write.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the configured `DATA_DIR`.
    pub fn from_config() -> Self {
        Self::new(config::data_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn exists(&self, file: &str) -> bool {
        self.path(file).is_file()
    }

    pub async fn write_json<T>(&self, file: &str, value: &T) -> Result<PathBuf, StoreError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string_pretty(value)?;
        self.write(file, json.into_bytes()).await
    }

    pub async fn read_json<T>(&self, file: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        read_json_file(&self.path(file)).await
    }

    /// Writes one CSV row per item, with a header derived from the field names.
    pub async fn write_csv<T>(&self, file: &str, rows: &[T]) -> Result<PathBuf, StoreError>
    where
        T: Serialize,
    {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row)?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        self.write(file, bytes).await
    }

    /// Files in the root whose names start with `prefix` and end with `suffix`,
    /// sorted by name.
    pub async fn list(&self, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>, StoreError> {
        list_files(&self.root, |name| {
            name.starts_with(prefix) && name.ends_with(suffix)
        })
        .await
    }

    /// Most recently modified file matching `prefix` and `suffix`.
    pub async fn latest(&self, prefix: &str, suffix: &str) -> Result<Option<PathBuf>, StoreError> {
        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for path in self.list(prefix, suffix).await? {
            let modified = async_fs::metadata(&path).await?.modified()?;
            if latest.as_ref().is_none_or(|(t, _)| modified > *t) {
                latest = Some((modified, path));
            }
        }
        Ok(latest.map(|(_, path)| path))
    }

    async fn write(&self, file: &str, bytes: Vec<u8>) -> Result<PathBuf, StoreError> {
        let path = self.path(file);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&path, bytes).await?;
        Ok(path)
    }
}

pub async fn read_json_file<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    let content = async_fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Regular files in `dir` whose file name satisfies `keep`, sorted by name.
///
/// A directory that does not exist yet has no files.
pub async fn list_files<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, StoreError>
where
    F: Fn(&str) -> bool,
{
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(&keep) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

#[derive(Debug, Default, PartialEq)]
pub struct RenameReport {
    pub renamed: usize,
    /// `(old, new, error)` for renames that did not happen. Those files keep
    /// their old name unless they are also listed in `stranded`.
    pub failed: Vec<(String, String, String)>,
    /// Temporary files that could not be moved back, with the name they had.
    pub stranded: Vec<(PathBuf, String)>,
}

/// Renames files in `dir` as `(old, new)` pairs.
///
/// Every file is first moved to a temporary name, so one file's new name may
/// be another file's old name. A file whose final rename fails is moved back
/// to its old name.
pub async fn rename_files(dir: &Path, renames: &[(String, String)]) -> RenameReport {
    let mut report = RenameReport::default();
    let mut staged = Vec::new();

    for (i, (old, new)) in renames.iter().enumerate() {
        if old == new {
            continue;
        }
        let tmp = dir.join(format!(".rename_{i}.tmp"));
        match async_fs::rename(dir.join(old), &tmp).await {
            Ok(()) => staged.push((old, tmp, new)),
            Err(e) => report
                .failed
                .push((old.clone(), new.clone(), e.to_string())),
        }
    }

    for (old, tmp, new) in staged {
        match async_fs::rename(&tmp, dir.join(new)).await {
            Ok(()) => report.renamed += 1,
            Err(e) => {
                report
                    .failed
                    .push((old.clone(), new.clone(), e.to_string()));
                if async_fs::rename(&tmp, dir.join(old)).await.is_err() {
                    report.stranded.push((tmp, old.clone()));
                }
            }
        }
    }

    report
}
