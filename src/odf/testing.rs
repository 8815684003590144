//! In-memory ODS and XLSX fixtures for unit tests.

use crate::common::xml::escape_text;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Wrap spreadsheet body markup (`table:table` elements) into a full
/// `content.xml`.
pub(crate) fn content_xml(tables: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<office:document-content",
            " xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\"",
            " xmlns:table=\"urn:oasis:names:tc:opendocument:xmlns:table:1.0\"",
            " xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\"",
            " xmlns:dc=\"http://purl.org/dc/elements/1.1/\"",
            " xmlns:calcext=\"urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0\"",
            " office:version=\"1.3\">",
            "<office:automatic-styles/>",
            "<office:body><office:spreadsheet>{}</office:spreadsheet></office:body>",
            "</office:document-content>"
        ),
        tables
    )
}

/// A one-sheet document without directives or expressions.
pub(crate) const SIMPLE_CONTENT: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
    "<office:document-content office:version=\"1.3\"><office:body><office:spreadsheet>",
    "<table:table table:name=\"Sheet1\"><table:table-row>",
    "<table:table-cell office:value-type=\"string\"><text:p>Hello</text:p></table:table-cell>",
    "<table:table-cell office:value-type=\"float\" office:value=\"3\"><text:p>3</text:p></table:table-cell>",
    "</table:table-row></table:table>",
    "</office:spreadsheet></office:body></office:document-content>"
);

const MANIFEST: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
    "<manifest:manifest xmlns:manifest=\"urn:oasis:names:tc:opendocument:xmlns:manifest:1.0\" manifest:version=\"1.3\">",
    "<manifest:file-entry manifest:full-path=\"/\" manifest:media-type=\"application/vnd.oasis.opendocument.spreadsheet\"/>",
    "<manifest:file-entry manifest:full-path=\"content.xml\" manifest:media-type=\"text/xml\"/>",
    "<manifest:file-entry manifest:full-path=\"styles.xml\" manifest:media-type=\"text/xml\"/>",
    "</manifest:manifest>"
);

const ODS: &str = "application/vnd.oasis.opendocument.spreadsheet";
const OTS: &str = "application/vnd.oasis.opendocument.spreadsheet-template";

fn zip_entries(entries: &[(String, Vec<u8>, zip::CompressionMethod)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes, method) in entries {
        let options = SimpleFileOptions::default().compression_method(*method);
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn build_odf(mimetype: &str, content: &str) -> Vec<u8> {
    use zip::CompressionMethod::{Deflated, Stored};
    let manifest = MANIFEST.replace(ODS, mimetype);
    zip_entries(&[
        ("mimetype".to_string(), mimetype.as_bytes().to_vec(), Stored),
        ("content.xml".to_string(), content.as_bytes().to_vec(), Deflated),
        ("styles.xml".to_string(), b"<office:document-styles/>".to_vec(), Deflated),
        ("Thumbnails/thumbnail.png".to_string(), vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3], Stored),
        ("META-INF/manifest.xml".to_string(), manifest.into_bytes(), Deflated),
    ])
}

/// Build an `.ods` container around `content`.
pub(crate) fn build_ods(content: &str) -> Vec<u8> {
    build_odf(ODS, content)
}

/// Write an `.ods` container to `dir/name`.
pub(crate) fn write_ods(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_ods(content)).unwrap();
    path
}

/// Write an `.ots` template container to `dir/name`.
pub(crate) fn write_ots(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_odf(OTS, content)).unwrap();
    path
}

const SML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A workbook assembled from sheet data markup.
#[derive(Default)]
pub(crate) struct XlsxFixture {
    /// (sheet name, `sheetData` children)
    pub sheets: Vec<(String, String)>,
    /// (sheet index, cell reference, comment text); comments are authored
    /// by `Ann` and start with her name line
    pub comments: Vec<(usize, String, String)>,
    pub shared_strings: Vec<String>,
    /// Write a template (`.xltx`) main part content type
    pub template: bool,
}

impl XlsxFixture {
    pub(crate) fn sheet(mut self, name: &str, rows: &str) -> Self {
        self.sheets.push((name.to_string(), rows.to_string()));
        self
    }

    pub(crate) fn comment(mut self, sheet: usize, cell_ref: &str, text: &str) -> Self {
        self.comments.push((sheet, cell_ref.to_string(), text.to_string()));
        self
    }

    pub(crate) fn shared_string(mut self, text: &str) -> Self {
        self.shared_strings.push(text.to_string());
        self
    }

    pub(crate) fn as_template(mut self) -> Self {
        self.template = true;
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        use zip::CompressionMethod::Deflated;
        let mut entries = Vec::new();
        let mut push = |name: String, xml: String| entries.push((name, xml.into_bytes(), Deflated));

        let main = if self.template {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml"
        } else {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"
        };
        let mut types = format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
                "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
                "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
                "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
                "<Override PartName=\"/xl/workbook.xml\" ContentType=\"{}\"/>",
            ),
            main
        );
        for i in 1..=self.sheets.len() {
            types.push_str(&format!(
                "<Override PartName=\"/xl/worksheets/sheet{i}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
            ));
        }
        types.push_str("</Types>");
        push("[Content_Types].xml".to_string(), types);

        push(
            "_rels/.rels".to_string(),
            format!(
                "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"{REL_BASE}/officeDocument\" Target=\"xl/workbook.xml\"/></Relationships>"
            ),
        );

        let mut sheets = String::new();
        let mut rels = String::new();
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            sheets.push_str(&format!("<sheet name=\"{}\" sheetId=\"{n}\" r:id=\"rId{n}\"/>", escape_text(name)));
            rels.push_str(&format!(
                "<Relationship Id=\"rId{n}\" Type=\"{REL_BASE}/worksheet\" Target=\"worksheets/sheet{n}.xml\"/>"
            ));
        }
        rels.push_str(&format!(
            "<Relationship Id=\"rId100\" Type=\"{REL_BASE}/sharedStrings\" Target=\"sharedStrings.xml\"/>"
        ));
        push(
            "xl/workbook.xml".to_string(),
            format!(
                "<workbook xmlns=\"{SML_NS}\" xmlns:r=\"{REL_BASE}\"><workbookPr/><sheets>{sheets}</sheets><calcPr calcId=\"191029\"/></workbook>"
            ),
        );
        push(
            "xl/_rels/workbook.xml.rels".to_string(),
            format!("<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{rels}</Relationships>"),
        );

        let items: String = self
            .shared_strings
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", escape_text(s)))
            .collect();
        push(
            "xl/sharedStrings.xml".to_string(),
            format!("<sst xmlns=\"{SML_NS}\" count=\"{0}\" uniqueCount=\"{0}\">{items}</sst>", self.shared_strings.len()),
        );
        push("xl/styles.xml".to_string(), format!("<styleSheet xmlns=\"{SML_NS}\"/>"));

        for (i, (_, rows)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            push(
                format!("xl/worksheets/sheet{n}.xml"),
                format!("<worksheet xmlns=\"{SML_NS}\" xmlns:r=\"{REL_BASE}\"><sheetData>{rows}</sheetData></worksheet>"),
            );

            let comments: String = self
                .comments
                .iter()
                .filter(|(sheet, _, _)| *sheet == i)
                .map(|(_, cell_ref, text)| {
                    format!(
                        concat!(
                            "<comment ref=\"{}\" authorId=\"0\"><text>",
                            "<r><rPr><b/></rPr><t>Ann:</t></r>",
                            "<r><t xml:space=\"preserve\">\n{}</t></r>",
                            "</text></comment>"
                        ),
                        cell_ref,
                        escape_text(text)
                    )
                })
                .collect();
            if comments.is_empty() {
                continue;
            }
            push(
                format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                format!(
                    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"{REL_BASE}/comments\" Target=\"../comments{n}.xml\"/></Relationships>"
                ),
            );
            push(
                format!("xl/comments{n}.xml"),
                format!("<comments xmlns=\"{SML_NS}\"><authors><author>Ann</author></authors><commentList>{comments}</commentList></comments>"),
            );
        }

        zip_entries(&entries)
    }

    /// Write the workbook to `dir/name`.
    pub(crate) fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}
