//! On-disk cache of a frozen InfoBase.
//!
//! Layout (little-endian, varints as in [`crate::util::varint`]):
//!
//! ```text
//! magic u32 "INFB" | version u32 | rows varint
//! columns varint  { name string | type u8 }*
//! selectors varint { feature varint | value string | nlist delta-u32s }*
//! crc32 u32
//! ```
//!
//! Selectors are written in ID order, so re-registering them on load
//! reproduces the same IDs.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::dataset::{Column, ColumnType};
use crate::error::{InfoBaseError, Result};
use crate::index::dictionary::SelectorDictionary;
use crate::index::info_base::InfoBase;
use crate::index::nlist::{NList, NListStore};
use crate::storage::{StructReader, StructWriter};

/// "INFB"
const MAGIC: u32 = 0x4246_4E49;
const VERSION: u32 = 1;

impl InfoBase {
    /// Save to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let bytes = self.write_to(BufWriter::new(file))?;
        debug!("Saved InfoBase to {} ({} bytes)", path.display(), bytes);
        Ok(())
    }

    /// Load from a file written by [`InfoBase::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading InfoBase from {}", path.display());
        let file = File::open(path)?;
        InfoBase::read_from(BufReader::new(file))
    }

    /// Serialize to `writer`; returns the payload size in bytes.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64> {
        let mut writer = StructWriter::new(writer);

        writer.write_u32(MAGIC)?;
        writer.write_u32(VERSION)?;
        writer.write_varint(self.row_count() as u64)?;

        writer.write_varint(self.columns().len() as u64)?;
        for column in self.columns() {
            writer.write_string(&column.name)?;
            writer.write_u8(column.column_type.as_u8())?;
        }

        writer.write_varint(self.selector_count() as u64)?;
        for selector in self.dictionary().iter() {
            writer.write_varint(selector.feature as u64)?;
            writer.write_string(&selector.value)?;
            writer.write_delta_compressed_u32s(self.nlists().get(selector.id)?.rows())?;
        }

        let size = writer.position();
        writer.close()?;
        Ok(size)
    }

    /// Deserialize from `reader`, verifying the format and the nlist
    /// invariants.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let mut reader = StructReader::new(reader);

        if reader.read_u32()? != MAGIC {
            return Err(InfoBaseError::storage("Invalid InfoBase file format"));
        }
        let version = reader.read_u32()?;
        if version != VERSION {
            return Err(InfoBaseError::storage(format!(
                "Unsupported InfoBase version: {version}"
            )));
        }

        let row_count = reader.read_len()?;

        let column_count = reader.read_len()?;
        let mut columns = Vec::new();
        for _ in 0..column_count {
            let name = reader.read_string()?;
            let tag = reader.read_u8()?;
            let column_type = ColumnType::from_u8(tag)
                .ok_or_else(|| InfoBaseError::storage(format!("Unknown column type {tag}")))?;
            columns.push(Column { name, column_type });
        }

        let selector_count = reader.read_len()?;
        let mut dictionary = SelectorDictionary::with_features(column_count);
        let mut nlists = NListStore::new();

        for expected in 0..selector_count {
            let feature = reader.read_len()?;
            if feature >= column_count {
                return Err(InfoBaseError::storage(format!(
                    "Selector {expected} refers to column {feature} of {column_count}"
                )));
            }
            let value = reader.read_string()?;
            let id = dictionary.register(feature, &value)?;
            if id as usize != expected {
                return Err(InfoBaseError::storage(format!(
                    "Duplicate selector ({feature}, {value:?})"
                )));
            }

            let nlist = NList::from_sorted(reader.read_delta_compressed_u32s()?)
                .map_err(|e| InfoBaseError::storage(format!("Corrupt nlist {id}: {e}")))?;
            if nlist.rows().last().is_some_and(|&row| row as usize >= row_count) {
                return Err(InfoBaseError::storage(format!(
                    "Nlist {id} refers to a row beyond {row_count}"
                )));
            }
            nlists.register(id);
            nlists.extend(id, nlist.rows())?;
        }

        if !reader.verify_checksum()? {
            return Err(InfoBaseError::storage("Checksum mismatch"));
        }

        Ok(InfoBase::from_parts(columns, row_count, dictionary, nlists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::index::builder::InfoBaseBuilder;
    use std::io::Cursor;

    fn sample() -> InfoBase {
        let dataset = Dataset::from_strs(
            &["age", "color"],
            "class",
            &[&["31", "red"], &["45", "blue"], &["31", "blue"]],
            &["x", "y", "x"],
        )
        .unwrap();
        InfoBaseBuilder::default().build(&dataset).unwrap()
    }

    #[test]
    fn test_write_read() {
        let original = sample();
        let mut bytes = Vec::new();
        original.write_to(&mut bytes).unwrap();

        let loaded = InfoBase::read_from(Cursor::new(bytes)).unwrap();
        assert_eq!(loaded.columns(), original.columns());
        assert_eq!(loaded.row_count(), 3);
        assert_eq!(loaded.class_ids(), original.class_ids());
        for selector in original.dictionary().iter() {
            assert_eq!(loaded.selector(selector.id).unwrap(), selector);
            assert_eq!(
                loaded.nlist(selector.id).unwrap(),
                original.nlist(selector.id).unwrap()
            );
        }
        assert_eq!(loaded.id_records(), original.id_records());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[0] ^= 0xFF;

        let err = InfoBase::read_from(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, InfoBaseError::Storage(_)));
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        let err = InfoBase::read_from(Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("Checksum"));
    }

    #[test]
    fn test_truncated_file() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes.truncate(bytes.len() / 2);

        assert!(InfoBase::read_from(Cursor::new(bytes)).is_err());
    }
}
