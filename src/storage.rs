use crate::models::AppData;
use crate::repository::RepositoryError;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn read_data(path: &Path) -> Result<AppData, RepositoryError> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn load_data(path: &Path) -> AppData {
    match read_data(path).await {
        Ok(data) => data,
        Err(RepositoryError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            AppData::default()
        }
        Err(err) => {
            error!("failed to load data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), RepositoryError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
