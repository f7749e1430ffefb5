//! Image store
//!
//! Streams remote lead images to a local folder. Files are named after the
//! last path segment of the image URL, so two different URLs with the same
//! base name overwrite each other; the last download wins.

use crate::config::ImageConfig;
use crate::crawler::{get_checked, FetchError};
use crate::url::file_name;
use crate::UrlError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Failure to download and store an image
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid image URL '{url}': {source}")]
    InvalidUrl { url: String, source: UrlError },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Downloads images into a local folder
#[derive(Debug, Clone)]
pub struct ImageStore {
    client: Client,
    root: PathBuf,
    chunk_size: usize,
}

impl ImageStore {
    /// Creates an image store writing under `config.folder`
    pub fn new(client: Client, config: &ImageConfig) -> Self {
        Self {
            client,
            root: PathBuf::from(&config.folder),
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Downloads `image_url` and returns the local path it was written to
    ///
    /// The body is streamed through a write buffer of `chunk_size` bytes so
    /// that large images never sit in memory whole. Bytes land in a `.part`
    /// file that is renamed over the final name only once fully written, so a
    /// failed transfer never touches an image already stored under that name.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the stored file
    /// * `Err(DownloadError)` - Bad URL, non-2xx status, transport or write failure
    pub async fn download(&self, image_url: &str) -> Result<PathBuf, DownloadError> {
        let url = Url::parse(image_url).map_err(|e| DownloadError::InvalidUrl {
            url: image_url.to_string(),
            source: UrlError::Parse(e.to_string()),
        })?;

        let name = file_name(&url).map_err(|source| DownloadError::InvalidUrl {
            url: image_url.to_string(),
            source,
        })?;

        let path = self.root.join(&name);
        let partial = self.root.join(format!("{}.part", name));

        let response = get_checked(&self.client, url.as_str()).await?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| DownloadError::Io {
                path: self.root.clone(),
                source,
            })?;

        if let Err(e) = self.stream_to_file(response, image_url, &partial).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!("Could not remove partial image {}: {}", partial.display(), cleanup);
            }
            return Err(e);
        }

        if let Err(source) = tokio::fs::rename(&partial, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!("Could not remove partial image {}: {}", partial.display(), cleanup);
            }
            return Err(DownloadError::Io { path, source });
        }

        tracing::info!("Downloaded image: {} -> {}", image_url, path.display());
        Ok(path)
    }

    async fn stream_to_file(
        &self,
        mut response: reqwest::Response,
        image_url: &str,
        path: &Path,
    ) -> Result<(), DownloadError> {
        let io_error = |source: std::io::Error| DownloadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).await.map_err(io_error)?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(image_url, e))?
        {
            writer.write_all(&chunk).await.map_err(io_error)?;
        }

        writer.flush().await.map_err(io_error)?;
        Ok(())
    }
}
