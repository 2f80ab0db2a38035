//! HTML pages for the upload → extract → clean workflow.

use crate::{Error, ocr::OcrSummary};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Base HTML layout.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - OCR Scribe</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
        textarea {{ width: 100%; min-height: 12rem; font-family: monospace; }}
        pre {{ white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }}
        .error {{ border: 1px solid #c33; background: #fee; padding: 1rem; }}
        .meta {{ color: #555; }}
    </style>
</head>
<body>
    <header><a href="/">OCR Scribe</a></header>
    <main>
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        content = content
    )
}

pub fn index_page() -> String {
    let content = r#"
        <section>
            <h2>Upload an image</h2>
            <form action="/upload" method="post" enctype="multipart/form-data">
                <input type="file" name="file" accept="image/*" required>
                <label>Language <input type="text" name="lang" placeholder="eng" size="6"></label>
                <button type="submit">Extract text</button>
            </form>
        </section>
        <section>
            <h2>Or paste OCR text</h2>
            <form action="/process" method="post">
                <textarea name="raw_text" required></textarea>
                <button type="submit">Clean text</button>
            </form>
        </section>"#;

    base_template("Upload", content)
}

/// Raw text next to the model's cleaned version.
pub fn cleaned_page(raw: &str, cleaned: &str) -> String {
    let content = format!(
        r#"
        <h2>Original</h2>
        <pre id="raw">{}</pre>
        <h2>Cleaned</h2>
        <pre id="cleaned">{}</pre>"#,
        html_escape(raw),
        html_escape(cleaned)
    );

    base_template("Cleaned text", &content)
}

/// OCR output with its quality summary and a form to send it to `/clean`.
pub fn ocr_page(filename: &str, text: &str, summary: &OcrSummary) -> String {
    let confidence = summary
        .average_confidence
        .map(|c| format!("{c:.1}"))
        .unwrap_or_else(|| "n/a".to_string());
    let degraded = if summary.degraded {
        r#" <em>(estimated, detailed OCR data unavailable)</em>"#
    } else {
        ""
    };

    let content = format!(
        r#"
        <p class="meta">File: {filename}</p>
        <p class="meta">Words: <span id="word-count">{words}</span>
            &middot; Average confidence: <span id="confidence">{confidence}</span>{degraded}</p>
        <h2>Extracted text</h2>
        <pre id="extracted">{text}</pre>
        <form action="/clean" method="post">
            <textarea name="extracted_text">{text}</textarea>
            <button type="submit">Clean &amp; summarize</button>
        </form>"#,
        filename = html_escape(filename),
        words = summary.word_count,
        confidence = confidence,
        degraded = degraded,
        text = html_escape(text)
    );

    base_template("Extracted text", &content)
}

/// Extracted text and the model's structured answer, shown verbatim.
pub fn structured_page(extracted: &str, response: &str) -> String {
    let content = format!(
        r#"
        <h2>Model response</h2>
        <pre id="structured">{}</pre>
        <details>
            <summary>Extracted text</summary>
            <pre id="extracted">{}</pre>
        </details>"#,
        html_escape(response),
        html_escape(extracted)
    );

    base_template("Structured result", &content)
}

/// Inline error block; `input` is echoed back so the user does not lose it.
pub fn error_page(title: &str, err: &Error, input: Option<&str>) -> String {
    let echo = input
        .map(|text| format!(r#"<h2>Your input</h2><pre id="input">{}</pre>"#, html_escape(text)))
        .unwrap_or_default();

    let content = format!(
        r#"
        <div class="error">
            <strong>{}</strong>
            <p>{}</p>
        </div>
        {}
        <p><a href="/">Back</a></p>"#,
        html_escape(err.kind()),
        html_escape(&err.to_string()),
        echo
    );

    base_template(title, &content)
}
