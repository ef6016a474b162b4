use lab_reporting::core::export_pipeline::compose_print_document;
use lab_reporting::print::fonts;
use lab_reporting::print::render::{count_pages, PdfRenderer};
use lab_reporting::print::style::PrintStyle;
use lab_reporting::{ExportConfig, ExportEngine, GuideExportPipeline, LocalStorage, ReportError};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

const GUIDE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Odoo 19 Boekhouding Gids</title></head>
<body>
  <div class="hero"><h1>Boekhouding Gids</h1><p>Voor FID Finance</p></div>
  <nav class="nav-tabs"><ul><li>Start</li><li>Operations</li><li>Referentie</li></ul></nav>
  <div class="tab-content" id="tab-start">
    <div class="section"><h2>Dagelijkse taken</h2>
      <p>Controleer de bankafschriften en verwerk openstaande boekingen.</p>
      <ul><li>Afletteren van betalingen</li><li>Inkoopfacturen boeken</li></ul>
    </div>
  </div>
  <div class="tab-content" id="tab-operations">
    <h2>Operations</h2>
    <p>De maandelijkse cyclus: BTW controle, afschrijvingen en rapportage.</p>
  </div>
  <div class="tab-content" id="tab-reference">
    <h2>Referentie</h2>
    <p>Rekeningschema en veelgebruikte dagboeken.</p>
  </div>
</body>
</html>"#;

fn fonts_or_skip(test_name: &str) -> bool {
    if fonts::fonts_available() {
        return true;
    }
    eprintln!(
        "Skipping {}: guide fonts missing. Install them under assets/fonts or set {}.",
        test_name,
        fonts::FONTS_DIR_ENV
    );
    false
}

/// Drops the PDF segments that legitimately differ between two renders of
/// the same input (timestamps, document ids).
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

fn job_for(dir: &TempDir) -> ExportConfig {
    let input = dir.path().join("gids.html");
    let output = dir.path().join("gids.pdf");
    std::fs::write(&input, GUIDE_HTML).unwrap();
    ExportConfig::from_toml_str(&format!(
        r#"
[input]
html_path = "{}"

[output]
pdf_path = "{}"
"#,
        input.display(),
        output.display()
    ))
    .unwrap()
}

#[tokio::test]
async fn export_writes_a_nonempty_pdf() {
    if !fonts_or_skip("export_writes_a_nonempty_pdf") {
        return;
    }

    let dir = TempDir::new().unwrap();
    let config = job_for(&dir);
    let output_path = config.output.pdf_path.clone();

    let pipeline = GuideExportPipeline::new(LocalStorage::new(String::new()), config);
    let receipt = ExportEngine::new(pipeline).run().await.unwrap();

    assert_eq!(receipt.output_path, output_path);
    assert!(receipt.pages >= 3, "two forced page breaks -> >= 3 pages");

    let bytes = std::fs::read(&output_path).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(count_pages(&bytes).unwrap(), receipt.pages);
}

#[tokio::test]
async fn rerunning_the_export_overwrites_deterministically() {
    if !fonts_or_skip("rerunning_the_export_overwrites_deterministically") {
        return;
    }

    let dir = TempDir::new().unwrap();
    let config = job_for(&dir);
    let output_path = config.output.pdf_path.clone();

    let pipeline = GuideExportPipeline::new(LocalStorage::new(String::new()), config.clone());
    let first = ExportEngine::new(pipeline).run().await.unwrap();
    let first_bytes = std::fs::read(&output_path).unwrap();

    let pipeline = GuideExportPipeline::new(LocalStorage::new(String::new()), config);
    let second = ExportEngine::new(pipeline).run().await.unwrap();
    let second_bytes = std::fs::read(&output_path).unwrap();

    assert_eq!(first.pages, second.pages);
    assert_eq!(first_bytes.len(), second_bytes.len());
    assert_eq!(normalized_hash(&first_bytes), normalized_hash(&second_bytes));
}

#[tokio::test]
async fn missing_input_fails_before_any_write() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bestaat-niet.html");
    let output = dir.path().join("gids.pdf");
    let config = ExportConfig::from_toml_str(&format!(
        r#"
[input]
html_path = "{}"

[output]
pdf_path = "{}"
"#,
        input.display(),
        output.display()
    ))
    .unwrap();

    let pipeline = GuideExportPipeline::new(LocalStorage::new(String::new()), config);
    let err = ExportEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ReportError::DocumentNotFound { .. }));
    assert!(
        !output.exists(),
        "no partial output may exist after a missing-input failure"
    );
}

#[tokio::test]
async fn malformed_input_fails_before_any_write() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("geen-html.html");
    let output = dir.path().join("gids.pdf");
    std::fs::write(&input, "dit is geen html document").unwrap();
    let config = ExportConfig::from_toml_str(&format!(
        r#"
[input]
html_path = "{}"

[output]
pdf_path = "{}"
"#,
        input.display(),
        output.display()
    ))
    .unwrap();

    let pipeline = GuideExportPipeline::new(LocalStorage::new(String::new()), config);
    let err = ExportEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ReportError::Render { .. }));
    assert!(!output.exists());
}

#[test]
fn forced_page_breaks_are_respected_by_the_renderer() {
    if !fonts_or_skip("forced_page_breaks_are_respected_by_the_renderer") {
        return;
    }

    let document = compose_print_document(GUIDE_HTML, &PrintStyle::guide()).unwrap();
    let rendered = PdfRenderer::new(PrintStyle::guide()).render(&document).unwrap();

    // tab-start content, then breaks before tab-operations and tab-reference.
    assert!(rendered.pages >= 3);
    assert_eq!(count_pages(&rendered.bytes).unwrap(), rendered.pages);
}
