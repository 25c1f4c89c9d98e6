//! PDF text engine backed by the poppler command line tools.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use super::extraction::{ExtractError, PdfTextEngine};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// pdftotext separates pages with a form feed.
const PAGE_SEPARATOR: char = '\u{c}';

/// Extracts the text layer of a PDF by shelling out to `pdftotext`.
pub struct PopplerEngine;

impl PopplerEngine {
    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("deckgen-{}.pdf", Uuid::new_v4()))
    }
}

#[async_trait]
impl PdfTextEngine for PopplerEngine {
    async fn check(&self) -> Result<(), ExtractError> {
        let probe = Command::new("pdftotext")
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match tokio::time::timeout(CHECK_TIMEOUT, probe).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractError::DependencyUnavailable(
                    "pdftotext is not installed or not in PATH".to_string(),
                ))
            }
            Ok(Err(e)) => Err(ExtractError::DependencyUnavailable(format!(
                "pdftotext is not functioning properly: {}",
                e
            ))),
            Err(_) => Err(ExtractError::DependencyUnavailable(
                "pdftotext version check timed out".to_string(),
            )),
        }
    }

    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let path = Self::temp_path();
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            ExtractError::DependencyUnavailable(format!(
                "failed to stage PDF for extraction: {}",
                e
            ))
        })?;

        let output = Command::new("pdftotext").arg(&path).arg("-").output().await;
        let _ = tokio::fs::remove_file(&path).await;

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::DependencyUnavailable(
                    "pdftotext is not installed or not in PATH".to_string(),
                )
            } else {
                ExtractError::DependencyUnavailable(format!("failed to run pdftotext: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::CorruptInput(format!(
                "pdftotext failed: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.split(PAGE_SEPARATOR).map(str::to_string).collect())
    }
}
