//! TrueType collection (`ttcf`) packing.

use read_fonts::FontRef;

use crate::{Error, Result};

const TTC_HEADER_LEN: usize = 12;
const TABLE_DIRECTORY_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

struct Table<'a> {
    tag: [u8; 4],
    checksum: u32,
    data: &'a [u8],
}

struct Member<'a> {
    sfnt_version: u32,
    tables: Vec<Table<'a>>,
}

/// Pack single fonts into a version 1.0 TrueType collection.
///
/// Table data is not shared between members; each member gets its own
/// table directory pointing at its own copy of every table.
pub fn build_collection(fonts: &[&[u8]]) -> Result<Vec<u8>> {
    if fonts.is_empty() {
        return Err(Error::NoFonts);
    }

    let members = fonts.iter().map(|data| read_member(data)).collect::<Result<Vec<_>>>()?;

    let directories_len: usize = members
        .iter()
        .map(|m| TABLE_DIRECTORY_HEADER_LEN + TABLE_RECORD_LEN * m.tables.len())
        .sum();
    let header_len = TTC_HEADER_LEN + 4 * members.len();

    let mut directory_offsets = Vec::with_capacity(members.len());
    let mut offset = header_len;
    for member in &members {
        directory_offsets.push(offset);
        offset += TABLE_DIRECTORY_HEADER_LEN + TABLE_RECORD_LEN * member.tables.len();
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    push_u32(&mut out, members.len())?;
    for directory_offset in &directory_offsets {
        push_u32(&mut out, *directory_offset)?;
    }

    // Table data follows all directories, 4-byte aligned.
    let mut data_offset = header_len + directories_len;
    let mut table_data = Vec::new();
    for member in &members {
        let num_tables = member.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = search_params(num_tables);

        out.extend_from_slice(&member.sfnt_version.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        for table in &member.tables {
            out.extend_from_slice(&table.tag);
            out.extend_from_slice(&table.checksum.to_be_bytes());
            push_u32(&mut out, data_offset)?;
            push_u32(&mut out, table.data.len())?;

            table_data.extend_from_slice(table.data);
            let padded = table.data.len().next_multiple_of(4);
            table_data.resize(table_data.len() + padded - table.data.len(), 0);
            data_offset += padded;
        }
    }

    out.extend_from_slice(&table_data);
    Ok(out)
}

fn read_member(data: &[u8]) -> Result<Member<'_>> {
    let font = FontRef::new(data)?;
    let tables = font
        .table_directory
        .table_records()
        .iter()
        .filter_map(|record| {
            let tag = record.tag();
            font.table_data(tag).map(|table| Table {
                tag: tag.to_be_bytes(),
                checksum: record.checksum(),
                data: table.as_bytes(),
            })
        })
        .collect();

    Ok(Member { sfnt_version: font.table_directory.sfnt_version(), tables })
}

/// `searchRange`, `entrySelector` and `rangeShift` for a table directory.
fn search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1 << entry_selector) * TABLE_RECORD_LEN as u16;
    (search_range, entry_selector, num_tables * TABLE_RECORD_LEN as u16 - search_range)
}

fn push_u32(out: &mut Vec<u8>, value: usize) -> Result<()> {
    let value = u32::try_from(value).map_err(|_| Error::CollectionTooLarge)?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}
