//! DOCX backend. A .docx file is a zip archive; the text lives in
//! `word/document.xml`. Reading it directly with quick-xml avoids pulling a
//! full document model in just to recover raw text.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::error;

pub const DOCX_READ_ERROR: &str = "Error reading DOCX file";

pub(super) async fn extract(path: &Path) -> String {
    let path = path.to_owned();
    let result = tokio::task::spawn_blocking(move || extract_sync(&path)).await;

    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Error extracting DOCX text: {e:#}");
            DOCX_READ_ERROR.to_string()
        }
        Err(e) => {
            error!("DOCX extraction task panicked: {e}");
            DOCX_READ_ERROR.to_string()
        }
    }
}

fn extract_sync(path: &Path) -> anyhow::Result<String> {
    let file = std::fs::File::open(path).context("failed to open docx")?;
    let mut archive = zip::ZipArchive::new(file).context("not a zip archive")?;
    let mut entry = archive
        .by_name("word/document.xml")
        .context("word/document.xml missing")?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .context("document.xml is not valid UTF-8")?;

    document_xml_to_text(&xml)
}

/// Collects the text runs of `word/document.xml`, inserting newlines at
/// paragraph boundaries and explicit breaks, tabs at `<w:tab/>`.
fn document_xml_to_text(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();

    loop {
        match reader.read_event().context("malformed document.xml")? {
            Event::Text(t) => text.push_str(&t.unescape().context("bad entity")?),
            Event::End(e) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => text.push('\t'),
            Event::Empty(e) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t>Senior Engineer</w:t></w:r><w:r><w:tab/><w:t>8 years</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_document_xml_paragraphs_become_lines() {
        let text = document_xml_to_text(DOCUMENT_XML).unwrap();
        assert_eq!(text, "Jane Doe\nSenior Engineer\t8 years");
    }

    #[test]
    fn test_document_xml_unescapes_entities() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>C&amp;C skills</w:t></w:r></w:p></w:body></w:document>"#;
        let text = document_xml_to_text(xml).unwrap();
        assert_eq!(text, "C&C skills");
    }
}
