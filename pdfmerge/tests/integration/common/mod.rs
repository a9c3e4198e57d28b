//! Shared helpers for the integration tests.
//!
//! Test PDFs are generated on the fly: every page draws a single text label
//! so tests can check which pages ended up where.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Stream,
    StringFormat, dictionary,
};
use pdfmerge::{FileHandle, PDF_MIME_TYPE};
use std::path::{Path, PathBuf};

/// Build a PDF whose pages show `"{label}-{n}"`, `n` counting from 1.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    save(pdf_document(label, pages))
}

/// Same pages as [`pdf_bytes`], encrypted with the standard security
/// handler. An empty `user_password` opens without a password.
pub fn encrypted_pdf_bytes(label: &str, pages: usize, user_password: &str) -> Vec<u8> {
    let mut doc = pdf_document(label, pages);
    doc.trailer.set(
        "ID",
        vec![
            Object::String((1u8..=16).collect(), StringFormat::Literal),
            Object::String((1u8..=16).rev().collect(), StringFormat::Literal),
        ],
    );

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("encryption state");
    doc.encrypt(&state).expect("encrypt test pdf");
    save(doc)
}

/// A parseable PDF whose trailer has no `/Root`.
pub fn rootless_pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = pdf_document(label, pages);
    doc.trailer.remove(b"Root");
    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save test pdf");
    bytes
}

fn pdf_document(label: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("{label}-{n}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// In-memory PDF handle.
pub fn pdf_handle(name: &str, label: &str, pages: usize) -> FileHandle {
    FileHandle::from_bytes(name, PDF_MIME_TYPE, pdf_bytes(label, pages))
}

/// Write a generated PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(label, pages)).expect("write test pdf");
    path
}

/// Labels drawn on each page of `bytes`, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("load merged pdf");
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    pages
        .into_iter()
        .map(|page_id| {
            let raw = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&raw).expect("decode content");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(text, _)) => Some(String::from_utf8_lossy(text).into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Expected labels for a file with `pages` pages.
pub fn labels(label: &str, pages: usize) -> Vec<String> {
    (1..=pages).map(|n| format!("{label}-{n}")).collect()
}

/// Create a temporary output path for test results.
pub fn temp_output_path() -> tempfile::TempPath {
    tempfile::NamedTempFile::new()
        .expect("Failed to create temp file")
        .into_temp_path()
}
