// ── Administration ──
//
// Field agent accounts and printable QR batches. The backend only serves
// these to SUPER_ADMIN sessions; a forbidden response surfaces as
// `CoreError::AuthenticationFailed` like any other call.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qrgate_api::types::{AgentResponse, QrBatchItem, QrBatchResponse};
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

/// Origin tag the backend records on codes minted from the admin tools.
pub const BATCH_SOURCE: &str = "ADM";

/// Batch size offered when none is given.
pub const DEFAULT_BATCH_COUNT: u32 = 50;

// ── Agents ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agent {
    pub id: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl From<AgentResponse> for Agent {
    fn from(a: AgentResponse) -> Self {
        Self {
            id: a.id,
            name: a.name,
            phone_number: a.phone_number,
            email: a.email,
        }
    }
}

/// Agent phone numbers are always Indian mobiles: keep the first ten digits
/// and prefix `+91`. Input without digits yields an empty string.
pub fn normalize_agent_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(10).collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("+91{digits}")
    }
}

// ── Batches ──────────────────────────────────────────────────────────

/// A freshly minted batch of codes with their rendered images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrBatch {
    pub month: String,
    pub number: u32,
    pub codes: Vec<BatchCode>,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct BatchCode {
    pub id: String,
    pub code: String,
    pub sequence: Option<u32>,
    /// Decoded PNG bytes.
    #[serde(skip)]
    pub png: Vec<u8>,
}

impl fmt::Debug for BatchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCode")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("sequence", &self.sequence)
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl QrBatch {
    /// Human label, e.g. `Batch 2026-10-007`.
    pub fn label(&self) -> String {
        format!("Batch {}-{:03}", self.month, self.number)
    }

    /// Write every image as `{code}.png` under `dir`, creating it if needed.
    ///
    /// Returns the written paths in batch order.
    pub fn write_images(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.codes.len());
        for item in &self.codes {
            let dest = dir.join(format!("{}.png", file_stem(&item.code)));
            std::fs::write(&dest, &item.png)?;
            written.push(dest);
        }
        debug!(count = written.len(), dir = %dir.display(), "batch images written");
        Ok(written)
    }
}

/// Codes are server-minted, but never let one escape the output directory.
fn file_stem(code: &str) -> String {
    code.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect::<String>()
        .trim_start_matches('.')
        .to_owned()
}

/// Payload bytes of a base64 `data:` URL (everything after the comma).
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, CoreError> {
    let Some((header, payload)) = data_url.split_once(',') else {
        return Err(CoreError::Remote {
            message: "Batch image is not a data URL".into(),
            status: None,
        });
    };
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(CoreError::Remote {
            message: format!("Unsupported batch image encoding: {header}"),
            status: None,
        });
    }
    STANDARD.decode(payload.trim()).map_err(|e| CoreError::Remote {
        message: format!("Batch image is not valid base64: {e}"),
        status: None,
    })
}

impl TryFrom<QrBatchItem> for BatchCode {
    type Error = CoreError;

    fn try_from(item: QrBatchItem) -> Result<Self, Self::Error> {
        let png = decode_data_url(&item.data_url)?;
        Ok(Self {
            id: item.qr_code.id,
            code: item.qr_code.code,
            sequence: item.qr_code.batch_sequence,
            png,
        })
    }
}

impl TryFrom<QrBatchResponse> for QrBatch {
    type Error = CoreError;

    fn try_from(batch: QrBatchResponse) -> Result<Self, Self::Error> {
        let codes = batch
            .items
            .into_iter()
            .map(BatchCode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            month: batch.batch_month,
            number: batch.batch_number,
            codes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn agent_phone_keeps_ten_digits() {
        assert_eq!(normalize_agent_phone("98765 43210"), "+919876543210");
        assert_eq!(normalize_agent_phone("987654321099"), "+919876543210");
        assert_eq!(normalize_agent_phone("  "), "");
    }

    #[test]
    fn data_url_payload_is_decoded() {
        assert_eq!(decode_data_url("data:image/png;base64,iVBORw==").unwrap(), b"\x89PNG");
    }

    #[test]
    fn data_url_must_be_base64() {
        assert!(decode_data_url("iVBORw==").is_err());
        assert!(decode_data_url("data:image/png,raw").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn label_pads_batch_number() {
        let batch = QrBatch {
            month: "2026-10".into(),
            number: 7,
            codes: Vec::new(),
        };
        assert_eq!(batch.label(), "Batch 2026-10-007");
    }

    #[test]
    fn file_stem_stays_inside_directory() {
        assert_eq!(file_stem("ADM0001"), "ADM0001");
        assert_eq!(file_stem("../etc/x"), "_etc_x");
    }

    #[test]
    fn write_images_names_files_by_code() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("batch");
        let batch = QrBatch {
            month: "2026-10".into(),
            number: 1,
            codes: vec![BatchCode {
                id: "q-1".into(),
                code: "ADM0001".into(),
                sequence: Some(1),
                png: b"\x89PNG".to_vec(),
            }],
        };
        let written = batch.write_images(&out).unwrap();
        assert_eq!(written, vec![out.join("ADM0001.png")]);
        assert_eq!(std::fs::read(&written[0]).unwrap(), b"\x89PNG");
    }
}
