//! Info dictionary stamping for newly created documents.

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Producer and creator written into the Info dictionary of every document
/// the capability creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Value of `/Producer`.
    pub producer: String,
    /// Value of `/Creator`.
    pub creator: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            producer: crate::NAME.to_string(),
            creator: crate::NAME.to_string(),
        }
    }
}

impl DocumentInfo {
    /// Create info with the same producer and creator.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            producer: name.clone(),
            creator: name,
        }
    }

    /// Write the Info dictionary into `doc`, dated `now`.
    ///
    /// An existing Info dictionary is reused; other entries in it are kept.
    pub(crate) fn stamp(&self, doc: &mut Document, now: DateTime<Utc>) {
        let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
            Ok(id) if doc.get_dictionary(id).is_ok() => id,
            _ => {
                let id = doc.add_object(Dictionary::new());
                doc.trailer.set("Info", id);
                id
            }
        };

        let date = pdf_date(now);
        if let Ok(info) = doc.get_dictionary_mut(info_id) {
            info.set("Producer", literal(&self.producer));
            info.set("Creator", literal(&self.creator));
            info.set("CreationDate", literal(&date));
            info.set("ModDate", literal(&date));
        }
    }
}

fn literal(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
pub(crate) fn pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
