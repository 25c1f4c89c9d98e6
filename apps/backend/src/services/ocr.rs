//! OCR engine backed by the tesseract command line tool.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::extraction::{ExtractError, OcrEngine};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed configuration tuned for block text: OCR engine mode 3, page
/// segmentation mode 6.
const TESSERACT_ARGS: [&str; 6] = ["stdin", "stdout", "--oem", "3", "--psm", "6"];

/// Recognizes text in images by shelling out to `tesseract`.
pub struct TesseractEngine;

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn check(&self) -> Result<(), ExtractError> {
        let probe = Command::new("tesseract")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match tokio::time::timeout(CHECK_TIMEOUT, probe).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(_)) => Err(ExtractError::DependencyUnavailable(
                "tesseract is installed but not functioning properly".to_string(),
            )),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractError::DependencyUnavailable(
                    "tesseract OCR is not installed or not in PATH".to_string(),
                ))
            }
            Ok(Err(e)) => Err(ExtractError::DependencyUnavailable(format!(
                "failed to verify tesseract installation: {}",
                e
            ))),
            Err(_) => Err(ExtractError::DependencyUnavailable(
                "tesseract version check timed out".to_string(),
            )),
        }
    }

    async fn recognize(&self, png: &[u8]) -> Result<String, ExtractError> {
        let mut child = Command::new("tesseract")
            .args(TESSERACT_ARGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractError::DependencyUnavailable(
                        "tesseract OCR is not installed or not in PATH".to_string(),
                    )
                } else {
                    ExtractError::DependencyUnavailable(format!(
                        "failed to start tesseract: {}",
                        e
                    ))
                }
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            ExtractError::DependencyUnavailable("failed to open tesseract stdin".to_string())
        })?;
        stdin.write_all(png).await.map_err(|e| {
            ExtractError::DependencyUnavailable(format!("failed to feed image to tesseract: {}", e))
        })?;
        drop(stdin);

        let output = child.wait_with_output().await.map_err(|e| {
            ExtractError::DependencyUnavailable(format!("tesseract did not complete: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::CorruptInput(format!(
                "OCR failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
