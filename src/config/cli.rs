use crate::domain::ports::Storage;
use crate::utils::error::{ReportError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(&full_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ReportError::DocumentNotFound {
                    path: full_path.display().to_string(),
                }
            } else {
                ReportError::IoError(source)
            }
        })?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ReportError::Write {
                    path: full_path.display().to_string(),
                    source,
                })?;
            }
        }

        fs::write(&full_path, data).map_err(|source| ReportError::Write {
            path: full_path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}
