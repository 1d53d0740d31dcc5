//! Minimal XLSX writer. The workbook is a zip archive of four XML parts plus
//! the content-type manifest, built entirely from string templates; every
//! cell is an inline string. The zip container itself is written by hand:
//! local file headers, deflate streams, central directory, end record.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use quick_xml::escape::escape;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Primers" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

// 1980-01-01 in DOS date encoding; entry mtimes carry no information here,
// and a fixed stamp keeps repeated exports byte-identical.
const DOS_EPOCH_DATE: u16 = 0x0021;

/// Write a one-sheet workbook with `headers` in row 1 and `rows` in rows
/// 2..N+1, in the given order. Returns the absolute path written.
pub fn write_xlsx_table(headers: &[&str], rows: &[Vec<String>], path: &Path) -> Result<PathBuf> {
    let mut archive = ZipArchive::new();
    archive.add_entry("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes())?;
    archive.add_entry("_rels/.rels", ROOT_RELS_XML.as_bytes())?;
    archive.add_entry("xl/workbook.xml", WORKBOOK_XML.as_bytes())?;
    archive.add_entry("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes())?;
    archive.add_entry("xl/worksheets/sheet1.xml", sheet_xml(headers, rows).as_bytes())?;

    let absolute = std::path::absolute(path)
        .map_err(|e| anyhow!("Could not resolve output path '{}': {e}", path.display()))?;
    fs::write(&absolute, archive.finish())
        .map_err(|e| anyhow!("Could not write spreadsheet '{}': {e}", absolute.display()))?;
    Ok(absolute)
}

fn sheet_xml(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    sheet.push_str(&row_xml(1, headers));
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        sheet.push_str(&row_xml(index + 2, &cells));
    }
    sheet.push_str("</sheetData></worksheet>");
    sheet
}

/// Render one row of inline string cells, 1-based row number.
fn row_xml(row_number: usize, values: &[&str]) -> String {
    let mut cells = String::new();
    for (column, value) in values.iter().enumerate() {
        let reference = format!("{}{row_number}", column_name(column));
        cells.push_str(&format!(
            r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
            escape(*value)
        ));
    }
    format!(r#"<row r="{row_number}">{cells}</row>"#)
}

/// Zero-based column index to spreadsheet letters (0→A, 25→Z, 26→AA).
/// Each division step shifts by one because the letter "digits" have no zero.
fn column_name(column: usize) -> String {
    let mut name = String::new();
    let mut index = column;
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    name
}

/// In-memory zip builder: entries are deflated as they are added, the
/// central directory is kept alongside and appended by `finish`.
struct ZipArchive {
    bytes: Vec<u8>,
    central_directory: Vec<u8>,
    entry_count: u16,
}

impl ZipArchive {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            central_directory: Vec::new(),
            entry_count: 0,
        }
    }

    fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let mut crc = Crc::new();
        crc.update(data);
        let checksum = crc.sum();
        let compressed = deflate(name, data)?;
        let local_header_offset = self.bytes.len() as u32;

        // Local file header.
        push_u32(&mut self.bytes, 0x0403_4b50);
        push_u16(&mut self.bytes, 20); // version needed to extract
        push_u16(&mut self.bytes, 0); // general purpose flags
        push_u16(&mut self.bytes, 8); // deflate
        push_u16(&mut self.bytes, 0); // modification time
        push_u16(&mut self.bytes, DOS_EPOCH_DATE);
        push_u32(&mut self.bytes, checksum);
        push_u32(&mut self.bytes, compressed.len() as u32);
        push_u32(&mut self.bytes, data.len() as u32);
        push_u16(&mut self.bytes, name.len() as u16);
        push_u16(&mut self.bytes, 0); // extra field length
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.extend_from_slice(&compressed);

        // Matching central directory entry.
        push_u32(&mut self.central_directory, 0x0201_4b50);
        push_u16(&mut self.central_directory, 20); // version made by
        push_u16(&mut self.central_directory, 20); // version needed
        push_u16(&mut self.central_directory, 0); // flags
        push_u16(&mut self.central_directory, 8); // deflate
        push_u16(&mut self.central_directory, 0); // modification time
        push_u16(&mut self.central_directory, DOS_EPOCH_DATE);
        push_u32(&mut self.central_directory, checksum);
        push_u32(&mut self.central_directory, compressed.len() as u32);
        push_u32(&mut self.central_directory, data.len() as u32);
        push_u16(&mut self.central_directory, name.len() as u16);
        push_u16(&mut self.central_directory, 0); // extra field length
        push_u16(&mut self.central_directory, 0); // comment length
        push_u16(&mut self.central_directory, 0); // disk number start
        push_u16(&mut self.central_directory, 0); // internal attributes
        push_u32(&mut self.central_directory, 0); // external attributes
        push_u32(&mut self.central_directory, local_header_offset);
        self.central_directory.extend_from_slice(name.as_bytes());

        self.entry_count += 1;
        Ok(())
    }

    fn finish(mut self) -> Vec<u8> {
        let directory_offset = self.bytes.len() as u32;
        let directory_size = self.central_directory.len() as u32;
        self.bytes.extend_from_slice(&self.central_directory);

        // End of central directory record.
        push_u32(&mut self.bytes, 0x0605_4b50);
        push_u16(&mut self.bytes, 0); // this disk
        push_u16(&mut self.bytes, 0); // directory start disk
        push_u16(&mut self.bytes, self.entry_count);
        push_u16(&mut self.bytes, self.entry_count);
        push_u32(&mut self.bytes, directory_size);
        push_u32(&mut self.bytes, directory_offset);
        push_u16(&mut self.bytes, 0); // comment length
        self.bytes
    }
}

fn deflate(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| anyhow!("Could not compress part '{name}': {e}"))
}

#[inline(always)]
fn push_u16(buffer: &mut Vec<u8>, value: u16) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

#[inline(always)]
fn push_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}
