/*!
 * In-memory ZIP package of a `.docx` file.
 *
 * Every entry is kept with its compression method, timestamp and mode so the
 * package can be written back with only the replaced parts changing.
 */

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;

pub struct DocxPackage {
    entries: Vec<DocxEntry>,
}

pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
    pub last_modified: zip::DateTime,
    pub unix_mode: Option<u32>,
    pub is_dir: bool,
}

impl DocxPackage {
    /// Read every entry of the archive
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocumentError::Parse(format!("not a ZIP container: {}", e)))?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| DocumentError::Parse(format!("read entry {}: {}", file.name(), e)))?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                last_modified: file.last_modified().unwrap_or_default(),
                unix_mode: file.unix_mode(),
                is_dir: file.is_dir(),
            });
        }
        Ok(Self { entries })
    }

    /// Data of the entry with the given name
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Write the archive, swapping in the given parts by name
    pub fn to_bytes_with_replacements(
        &self,
        replacements: &HashMap<String, Vec<u8>>,
    ) -> Result<Vec<u8>, DocumentError> {
        let mut zout = ZipWriter::new(Cursor::new(Vec::new()));
        for ent in &self.entries {
            let data = replacements.get(&ent.name).unwrap_or(&ent.data);
            let mut opts = SimpleFileOptions::default()
                .compression_method(ent.compression)
                .last_modified_time(ent.last_modified);
            if let Some(mode) = ent.unix_mode {
                opts = opts.unix_permissions(mode);
            }
            if ent.is_dir || ent.name.ends_with('/') {
                zout.add_directory(ent.name.as_str(), opts)
                    .map_err(|e| serialization_error(&ent.name, e))?;
            } else {
                zout.start_file(ent.name.as_str(), opts)
                    .map_err(|e| serialization_error(&ent.name, e))?;
                zout.write_all(data)
                    .map_err(|e| serialization_error(&ent.name, e))?;
            }
        }
        let cursor = zout
            .finish()
            .map_err(|e| DocumentError::Serialization(format!("finish archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

fn serialization_error(name: &str, error: impl std::fmt::Display) -> DocumentError {
    DocumentError::Serialization(format!("{}: {}", name, error))
}
