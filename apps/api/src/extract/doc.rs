//! Legacy .doc backend. There is no maintained crate for the binary Word
//! format, so this salvages readable text: a .doc that is secretly a zip
//! (renamed .docx) goes through the DOCX path, otherwise printable runs are
//! pulled out of the OLE container. Output quality is best-effort; total
//! failure degrades to the placeholder like the other backends.

use std::path::Path;

use tracing::error;

pub const DOC_READ_ERROR: &str = "Error reading DOC file";

/// Runs shorter than this are OLE noise, not prose.
const MIN_RUN_LEN: usize = 4;

pub(super) async fn extract(path: &Path) -> String {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error extracting DOC text: {e}");
            return DOC_READ_ERROR.to_string();
        }
    };

    // Word sometimes saves OOXML content under a .doc name.
    if bytes.starts_with(b"PK") {
        return super::docx::extract(path).await;
    }

    let text = salvage_printable_runs(&bytes);
    if text.is_empty() {
        error!("no printable text recovered from DOC file");
        DOC_READ_ERROR.to_string()
    } else {
        text
    }
}

/// Scans the raw bytes for runs of printable characters, skipping the OLE
/// directory structures and binary records around them.
fn salvage_printable_runs(bytes: &[u8]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for &byte in bytes {
        let ch = byte as char;
        if ch.is_ascii_graphic() || ch == ' ' {
            current.push(ch);
        } else {
            if current.trim().len() >= MIN_RUN_LEN {
                runs.push(current.trim().to_string());
            }
            current.clear();
        }
    }
    if current.trim().len() >= MIN_RUN_LEN {
        runs.push(current.trim().to_string());
    }

    runs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salvage_skips_binary_noise() {
        let mut bytes = vec![0xd0, 0xcf, 0x11, 0xe0, 0x01, 0x02];
        bytes.extend_from_slice(b"Jane Doe, Senior Engineer");
        bytes.extend_from_slice(&[0x00, 0x00, 0x05]);
        bytes.extend_from_slice(b"Skills: Rust, SQL");
        let text = salvage_printable_runs(&bytes);
        assert_eq!(text, "Jane Doe, Senior Engineer\nSkills: Rust, SQL");
    }

    #[test]
    fn test_salvage_drops_short_runs() {
        let bytes = [0x00, b'a', b'b', 0x00, 0x01, 0x02];
        assert!(salvage_printable_runs(&bytes).is_empty());
    }
}
