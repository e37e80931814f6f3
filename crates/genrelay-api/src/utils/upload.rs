//! Multipart ingestion and request-scoped upload spooling.
//!
//! Binary uploads are staged to a temp file for the lifetime of the request
//! and explicitly released on every exit path. A failed cleanup is logged at
//! warn and never surfaces to the caller.

use std::collections::HashMap;
use std::io::Write;

use axum::extract::Multipart;
use bytes::Bytes;
use genrelay_core::AppError;
use tempfile::NamedTempFile;

/// Everything pulled out of a multipart request: at most one file part plus
/// any plain text fields.
#[derive(Debug, Default)]
pub struct ParsedMultipart {
    pub file: Option<(String, Bytes)>,
    pub fields: HashMap<String, String>,
}

/// Drain a multipart body, keeping the part named `file_field` as the upload.
pub async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<ParsedMultipart, AppError> {
    let mut parsed = ParsedMultipart::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == file_field {
            let filename = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "upload".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
            parsed.file = Some((filename, data));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read field: {}", e)))?;
            parsed.fields.insert(name, value);
        }
    }

    Ok(parsed)
}

/// An upload staged to a request-scoped temp file.
///
/// The bytes stay available in memory for the adapter call; the spool file
/// mirrors them on disk and must be released with [`StagedUpload::discard`]
/// before the response is returned.
#[derive(Debug)]
pub struct StagedUpload {
    pub filename: String,
    pub data: Bytes,
    spool: Option<NamedTempFile>,
}

impl StagedUpload {
    pub async fn stage(
        spool_dir: Option<&str>,
        filename: String,
        data: Bytes,
    ) -> Result<Self, AppError> {
        let dir = spool_dir.map(str::to_string);
        let spool_data = data.clone();

        let spool = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut builder = tempfile::Builder::new();
            builder.prefix("genrelay-upload-");
            let mut file = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&spool_data)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Spool task failed: {}", e)))??;

        tracing::debug!(
            filename = %filename,
            size_bytes = data.len(),
            spool_path = %spool.path().display(),
            "Staged upload"
        );

        Ok(Self {
            filename,
            data,
            spool: Some(spool),
        })
    }

    /// Delete the spool file. Cleanup failures are logged, never propagated.
    pub fn discard(mut self) {
        if let Some(spool) = self.spool.take() {
            let path = spool.path().display().to_string();
            if let Err(err) = spool.close() {
                tracing::warn!(
                    error = %err,
                    spool_path = %path,
                    "Failed to remove spooled upload"
                );
            }
        }
    }
}
