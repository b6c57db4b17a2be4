use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};

use crate::dedup::{Conflict, Store};
use crate::error::{MergeError, MergeResult};
use crate::record::{Input, Origin, Record};

/// Cell value of the row that opens each conflict pair in the output.
pub const CONFLICT_MARKER: &str = "CONFLICT";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// First row of an export, byte for byte. The csv reader drops a leading
/// byte-order mark, so its presence is tracked separately and written back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Header {
    bom: bool,
    fields: Vec<Vec<u8>>,
}

impl Header {
    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }
}

/// Streaming reader over one credential export. The header row is consumed
/// on construction.
pub struct ExportReader<R: Read> {
    reader: csv::Reader<BufReader<R>>,
    input: Input,
    header: Header,
}

impl ExportReader<File> {
    pub fn open(path: &Path, input: Input) -> MergeResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, input)
    }
}

impl<R: Read> ExportReader<R> {
    pub fn from_reader(rdr: R, input: Input) -> MergeResult<Self> {
        let mut rdr = BufReader::new(rdr);
        let bom = rdr.fill_buf()?.starts_with(UTF8_BOM);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);

        let mut first = ByteRecord::new();
        if !reader.read_byte_record(&mut first)? {
            return Err(MergeError::MissingHeader { input });
        }

        let mut fields: Vec<Vec<u8>> = first.iter().map(<[u8]>::to_vec).collect();
        if bom && fields.first().is_some_and(|cell| cell.starts_with(UTF8_BOM)) {
            fields[0] = fields[0][UTF8_BOM.len()..].to_vec();
        }

        Ok(Self {
            reader,
            input,
            header: Header { bom, fields },
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Remaining rows as records, read one at a time. Cells are not
    /// required to be UTF-8.
    pub fn into_records(self) -> impl Iterator<Item = MergeResult<Record>> {
        let input = self.input;
        self.reader.into_byte_records().map(move |row| {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            Record::from_fields(
                Origin::new(input, line),
                row.iter().map(<[u8]>::to_vec).collect(),
            )
        })
    }
}

/// Write the merged export: header, retained rows in store order, then a
/// sentinel row plus the incoming and existing rows for every conflict.
pub fn write_merged<W: Write>(
    mut out: W,
    header: &Header,
    store: &Store,
    conflicts: &[Conflict],
) -> MergeResult<()> {
    if header.has_bom() {
        out.write_all(UTF8_BOM)?;
    }
    let mut writer = WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record(header.fields())?;
    for record in store.records() {
        writer.write_record(record.raw())?;
    }

    if !conflicts.is_empty() {
        let sentinel = vec![CONFLICT_MARKER; header.fields().len()];
        for conflict in conflicts {
            writer.write_record(&sentinel)?;
            writer.write_record(conflict.incoming.raw())?;
            writer.write_record(conflict.existing.raw())?;
        }
    }

    writer.flush()?;
    Ok(())
}
