//! Article text preparation: flatten fetched article XML into plain text and
//! cut the body off at the References section.

use anyhow::{Result, anyhow};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Concatenate every text node of an article XML document into one
/// plain-text string, pieces joined by single spaces.
pub fn flatten_article_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pieces: Vec<String> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| anyhow!("Malformed article XML: {e}"))?;
                if !text.is_empty() {
                    pieces.push(text.into_owned());
                }
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8_lossy(&data).trim().to_string();
                if !text.is_empty() {
                    pieces.push(text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(anyhow!("Malformed article XML: {e}")),
        }
    }
    Ok(pieces.join(" "))
}

/// Article text up to the References section, so citation lists cannot
/// contribute mentions. Unchanged when no marker is present.
pub fn body_without_references(text: &str) -> &str {
    match text.to_ascii_lowercase().find("references") {
        Some(position) => &text[..position],
        None => text,
    }
}
