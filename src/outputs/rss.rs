//! RSS 2.0 rendering.
//!
//! # Document Shape
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
//!   <channel>
//!     <title>{author} - Yahoo!ニュース個人 (非公式RSS)</title>
//!     <link/> <description/> <language>ja</language> <lastBuildDate/>
//!     <item>
//!       <title/> <link/> <description/> <dc:creator/> <pubDate/> <guid/>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! Optional entry fields are left out instead of written empty. The output is
//! a pure function of the input: `lastBuildDate` is the newest entry date,
//! never the wall clock.

use crate::assemble::channel_title;
use crate::error::{Error, Result};
use crate::models::{Entry, FeedData};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt::Display;

const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const LANGUAGE: &str = "ja";

/// Render `data` as a UTF-8 RSS 2.0 document.
///
/// # Errors
///
/// [`Error::MissingAuthor`] when the feed has no (or an empty) author, since
/// the author is the channel owner.
pub fn render(data: &FeedData) -> Result<Vec<u8>> {
    let author = data
        .author
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or(Error::MissingAuthor)?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:dc", DC_NAMESPACE));
    writer.write_event(Event::Start(rss)).map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(xml_error)?;

    write_text_element(&mut writer, "title", &channel_title(author))?;
    write_text_element(&mut writer, "link", data.url.as_deref().unwrap_or_default())?;
    write_text_element(
        &mut writer,
        "description",
        data.description.as_deref().unwrap_or_default(),
    )?;
    write_text_element(&mut writer, "language", LANGUAGE)?;
    if let Some(latest) = data.latest_pubdate() {
        write_text_element(&mut writer, "lastBuildDate", &latest.to_rfc2822())?;
    }

    for entry in &data.entries {
        write_item(&mut writer, entry, author)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(xml_error)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_item(writer: &mut Writer<Vec<u8>>, entry: &Entry, author: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .map_err(xml_error)?;
    if let Some(title) = &entry.title {
        write_text_element(writer, "title", title)?;
    }
    if let Some(url) = &entry.url {
        write_text_element(writer, "link", url)?;
    }
    if let Some(summary) = &entry.summary {
        write_text_element(writer, "description", summary)?;
    }
    write_text_element(writer, "dc:creator", author)?;
    if let Some(pubdate) = &entry.pubdate {
        write_text_element(writer, "pubDate", &pubdate.to_rfc2822())?;
    }
    if let Some(url) = &entry.url {
        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid)).map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::new(url)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("guid")))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .map_err(xml_error)?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn xml_error<E: Display>(e: E) -> Error {
    Error::Xml(e.to_string())
}
