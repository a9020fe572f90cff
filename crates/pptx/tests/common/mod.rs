//! Helpers for reading produced decks back.

#![allow(dead_code)]

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// An opened PPTX package.
pub struct Deck {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Deck {
    pub fn open(bytes: Vec<u8>) -> Self {
        let archive = ZipArchive::new(Cursor::new(bytes)).expect("output is a zip archive");
        Self { archive }
    }

    pub fn has_part(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }

    pub fn part(&mut self, name: &str) -> String {
        let mut file = self
            .archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("missing part {}", name));
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    /// Slide part paths in presentation order.
    pub fn slide_paths(&mut self) -> Vec<String> {
        let rels = self.part("ppt/_rels/presentation.xml.rels");
        let targets: HashMap<String, String> = relationships(&rels)
            .into_iter()
            .map(|(id, target)| (id, format!("ppt/{}", target)))
            .collect();

        let presentation = self.part("ppt/presentation.xml");
        let mut reader = Reader::from_str(&presentation);
        reader.trim_text(true);

        let mut paths = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"p:sldId" => {
                    let rel = attribute(e, b"r:id").expect("sldId has r:id");
                    paths.push(targets[&rel].clone());
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("bad presentation.xml: {}", e),
                _ => {}
            }
        }
        paths
    }

    /// All text runs of a part, one string per paragraph.
    pub fn paragraphs(&mut self, name: &str) -> Vec<String> {
        let xml = self.part(name);
        let mut reader = Reader::from_str(&xml);

        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut in_text = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"a:t" => in_text = true,
                Ok(Event::End(ref e)) if e.name().as_ref() == b"a:t" => in_text = false,
                Ok(Event::Text(ref e)) if in_text => {
                    current.push_str(&e.unescape().unwrap());
                }
                Ok(Event::End(ref e)) if e.name().as_ref() == b"a:p" => {
                    if !current.is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("bad XML in {}: {}", name, e),
                _ => {}
            }
        }
        paragraphs
    }
}

/// `(Id, Target)` pairs of a relationships part.
pub fn relationships(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"Relationship" => {
                let id = attribute(e, b"Id").unwrap_or_default();
                let target = attribute(e, b"Target").unwrap_or_default();
                rels.push((id, target));
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("bad relationships part: {}", e),
            _ => {}
        }
    }
    rels
}

fn attribute(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
