use bincode::{deserialize_from, serialize};
use crc::crc32;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::fmt;
use std::io::Read;

use crate::error::GptError;

/// The only supported sector size, in bytes.
pub const SECTOR_SIZE: usize = 512;
/// Number of sectors occupied by one entry table.
pub const GPT_ENTRIES_SECTORS: u64 = 32;
/// Size of one entry table in bytes (128 entries of 128 bytes).
pub const TOTAL_ENTRIES_SIZE: usize = 16384;
/// Size of a single partition entry in bytes.
pub const SIZE_OF_ENTRY: usize = 128;
/// Smallest accepted `number_of_entries`.
pub const MIN_NUMBER_OF_ENTRIES: u32 = 16;
/// Largest accepted `number_of_entries`.
pub const MAX_NUMBER_OF_ENTRIES: u32 = 128;
/// Smallest accepted header `size`.
pub const MIN_SIZE_OF_HEADER: u32 = 92;
/// Largest accepted header `size` (one full sector).
pub const MAX_SIZE_OF_HEADER: u32 = 512;
/// The standard GPT header signature.
pub const GPT_HEADER_SIGNATURE: [u8; 8] = *b"EFI PART";
/// The legacy signature written to hide a GPT from non-ChromeOS firmware.
pub const GPT_HEADER_SIGNATURE2: [u8; 8] = *b"CHROMEOS";
/// The only supported header revision.
pub const GPT_HEADER_REVISION: u32 = 0x0001_0000;

/// No copy.
pub const MASK_NONE: u32 = 0;
/// The primary copy.
pub const MASK_PRIMARY: u32 = 1;
/// The secondary copy.
pub const MASK_SECONDARY: u32 = 2;
/// Both copies.
pub const MASK_BOTH: u32 = 3;

/// The primary header sector needs to be rewritten.
pub const MODIFIED_HEADER1: u32 = 0x01;
/// The secondary header sector needs to be rewritten.
pub const MODIFIED_HEADER2: u32 = 0x02;
/// The primary entry table sectors need to be rewritten.
pub const MODIFIED_ENTRIES1: u32 = 0x04;
/// The secondary entry table sectors need to be rewritten.
pub const MODIFIED_ENTRIES2: u32 = 0x08;

/// One GPT header as laid out on disk (92 bytes, little-endian), without the
/// sector padding that follows it.
#[derive(Debug, Deserialize, Serialize, Copy, Clone)]
pub struct GptHeader {
    /// Either `"EFI PART"` or `"CHROMEOS"`.
    pub signature: [u8; 8],
    /// Header revision, `0x00010000`.
    pub revision: u32,
    /// Number of bytes covered by `header_crc32`.
    pub size: u32,
    /// CRC32 of the first `size` bytes, computed with this field zeroed.
    pub header_crc32: u32,
    /// Must be zero.
    pub reserved_zero: u32,
    /// LBA of the sector holding this header.
    pub my_lba: u64,
    /// LBA of the opposite copy's header.
    pub alternate_lba: u64,
    /// First LBA usable for partition payload.
    pub first_usable_lba: u64,
    /// Last LBA usable for partition payload, inclusive.
    pub last_usable_lba: u64,
    /// Identifies the disk as a whole.
    pub disk_uuid: [u8; 16],
    /// LBA of the first sector of this copy's entry table.
    pub entries_lba: u64,
    /// Number of entries in the table.
    pub number_of_entries: u32,
    /// Size of one entry in bytes.
    pub size_of_entry: u32,
    /// CRC32 of `number_of_entries * size_of_entry` bytes of entry table.
    pub entries_crc32: u32,
}

impl GptHeader {
    /// Reads a header from the start of a header sector.
    pub fn read_from<R: ?Sized>(mut reader: &mut R) -> bincode::Result<GptHeader>
    where
        R: Read,
    {
        deserialize_from(&mut reader)
    }

    /// Writes the 92 header bytes to the start of a header sector, leaving
    /// the sector padding as it is.
    pub fn write_into(&self, sector: &mut [u8]) {
        let data = serialize(self).expect("could not serialize");
        sector[..data.len()].copy_from_slice(&data);
    }
}

/// CRC32 of the first `size` bytes of a header sector, with the
/// `header_crc32` field counted as zero.
///
/// The sector itself is left untouched; the checksum runs on a stack copy.
/// `size` must already have been validated against [`MAX_SIZE_OF_HEADER`].
pub fn header_crc(sector: &[u8; SECTOR_SIZE], size: u32) -> u32 {
    debug_assert!(size as usize <= SECTOR_SIZE);
    let mut copy = *sector;
    copy[16..20].copy_from_slice(&[0; 4]);
    crc32::checksum_ieee(&copy[..size as usize])
}

/// Serializes `h` into its sector and refreshes the recorded CRC, updating
/// both the buffer and `h.header_crc32`.
fn sync_header(sector: &mut [u8; SECTOR_SIZE], h: &mut GptHeader) {
    h.write_into(&mut sector[..]);
    h.header_crc32 = header_crc(sector, h.size);
    sector[16..20].copy_from_slice(&h.header_crc32.to_le_bytes());
}

/// A partition name: 36 raw UTF-16LE code units, preserved byte-exactly.
///
/// The core never interprets names; decoding only happens on `Display`,
/// lossily, for human consumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionName([u16; 36]);

impl Default for PartitionName {
    fn default() -> PartitionName {
        PartitionName([0; 36])
    }
}

impl From<&str> for PartitionName {
    fn from(value: &str) -> PartitionName {
        let mut units = [0; 36];
        for (unit, x) in units.iter_mut().zip(value.encode_utf16()) {
            *unit = x;
        }

        PartitionName(units)
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let end = self.0.iter().position(|&x| x == 0).unwrap_or(36);
        write!(f, "{}", String::from_utf16_lossy(&self.0[..end]))
    }
}

struct UTF16LEVisitor;

impl<'de> Visitor<'de> for UTF16LEVisitor {
    type Value = PartitionName;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("36 UTF-16LE code units (72 bytes)")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<PartitionName, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut units = [0; 36];
        for unit in units.iter_mut() {
            match seq.next_element()? {
                Some(x) => *unit = x,
                None => break,
            }
        }

        Ok(PartitionName(units))
    }
}

impl<'de> Deserialize<'de> for PartitionName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_tuple(36, UTF16LEVisitor)
    }
}

impl Serialize for PartitionName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_tuple(36)?;
        for x in self.0.iter() {
            seq.serialize_element(x)?;
        }
        seq.end()
    }
}

/// One partition entry as laid out on disk (128 bytes, little-endian).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GptEntry {
    /// Partition type GUID; all-zero marks the slot unused.
    pub partition_type_guid: [u8; 16],
    /// Unique per-partition GUID.
    pub unique_partition_guid: [u8; 16],
    /// First LBA of the partition.
    pub starting_lba: u64,
    /// Last LBA of the partition, inclusive.
    pub ending_lba: u64,
    /// Attribute word; see the accessors for the Chromium OS fields.
    pub attribute_bits: u64,
    /// Partition name, not interpreted.
    pub partition_name: PartitionName,
}

impl GptEntry {
    /// An unused slot.
    pub fn empty() -> GptEntry {
        GptEntry {
            partition_type_guid: [0; 16],
            unique_partition_guid: [0; 16],
            starting_lba: 0,
            ending_lba: 0,
            attribute_bits: 0,
            partition_name: PartitionName::default(),
        }
    }

    /// Reads one entry from a reader positioned at its first byte.
    pub fn read_from<R: ?Sized>(mut reader: &mut R) -> bincode::Result<GptEntry>
    where
        R: Read,
    {
        deserialize_from(&mut reader)
    }

    /// Whether this slot holds no partition (all-zero type GUID).
    pub fn is_unused(&self) -> bool {
        self.partition_type_guid == [0; 16]
    }

    /// Whether this slot holds a partition.
    pub fn is_used(&self) -> bool {
        !self.is_unused()
    }
}

/// Validates one header sector against its role and the drive size.
///
/// Returns the parsed header on success so callers never need to parse a
/// sector they have already validated. The checks run in a fixed cascade;
/// in particular the CRC is verified before any geometry field is trusted.
pub fn check_header(
    sector: &[u8; SECTOR_SIZE],
    is_secondary: bool,
    drive_sectors: u64,
) -> Option<GptHeader> {
    let h = match GptHeader::read_from(&mut &sector[..]) {
        Ok(h) => h,
        Err(_) => return None,
    };

    if h.signature != GPT_HEADER_SIGNATURE && h.signature != GPT_HEADER_SIGNATURE2 {
        return None;
    }
    if h.revision != GPT_HEADER_REVISION {
        return None;
    }
    if h.size < MIN_SIZE_OF_HEADER || h.size > MAX_SIZE_OF_HEADER {
        return None;
    }

    if header_crc(sector, h.size) != h.header_crc32 {
        return None;
    }

    if h.reserved_zero != 0 {
        return None;
    }

    // Sector padding past `size` bytes is not checked.

    if h.size_of_entry as usize != SIZE_OF_ENTRY {
        return None;
    }
    if h.number_of_entries < MIN_NUMBER_OF_ENTRIES
        || h.number_of_entries > MAX_NUMBER_OF_ENTRIES
        || h.number_of_entries as usize * h.size_of_entry as usize != TOTAL_ENTRIES_SIZE
    {
        return None;
    }

    // The primary immediately follows the PMBR and is followed by its
    // entries; the secondary sits at the end of the drive, preceded by its
    // entries.
    if is_secondary {
        if h.my_lba != drive_sectors - 1 {
            return None;
        }
        if h.entries_lba != h.my_lba - GPT_ENTRIES_SECTORS {
            return None;
        }
    } else {
        if h.my_lba != 1 {
            return None;
        }
        if h.entries_lba != h.my_lba + 1 {
            return None;
        }
    }

    // The usable region must fall strictly between the two entry tables.
    if h.first_usable_lba < 2 + GPT_ENTRIES_SECTORS {
        return None;
    }
    if h.last_usable_lba >= drive_sectors - 1 - GPT_ENTRIES_SECTORS {
        return None;
    }
    if h.first_usable_lba > h.last_usable_lba {
        return None;
    }

    Some(h)
}

/// Validates an entry table against a header that has already passed
/// [`check_header`].
///
/// Beyond the CRC, every used entry must lie inside the usable region, must
/// not overlap any other used entry, and must carry a distinct unique GUID.
/// The scan order and the precedence of the three pairwise checks determine
/// which error is reported for a given broken table.
pub fn check_entries(entries: &[u8; TOTAL_ENTRIES_SIZE], h: &GptHeader) -> Result<(), GptError> {
    let len = h.size_of_entry as usize * h.number_of_entries as usize;
    if crc32::checksum_ieee(&entries[..len]) != h.entries_crc32 {
        return Err(GptError::CrcCorrupted);
    }

    for i in 0..h.number_of_entries {
        let entry = entry_at(entries, h, i)?;
        if entry.is_unused() {
            continue;
        }

        if entry.starting_lba < h.first_usable_lba
            || entry.ending_lba > h.last_usable_lba
            || entry.ending_lba < entry.starting_lba
        {
            return Err(GptError::OutOfRegion);
        }

        for i2 in 0..h.number_of_entries {
            if i2 == i {
                continue;
            }
            let e2 = entry_at(entries, h, i2)?;
            if e2.is_unused() {
                continue;
            }

            if entry.starting_lba >= e2.starting_lba && entry.starting_lba <= e2.ending_lba {
                return Err(GptError::StartLbaOverlap);
            }
            if entry.ending_lba >= e2.starting_lba && entry.ending_lba <= e2.ending_lba {
                return Err(GptError::EndLbaOverlap);
            }
            if entry.unique_partition_guid == e2.unique_partition_guid {
                return Err(GptError::DupGuid);
            }
        }
    }

    Ok(())
}

fn entry_at(entries: &[u8], h: &GptHeader, index: u32) -> Result<GptEntry, GptError> {
    let offset = index as usize * h.size_of_entry as usize;
    GptEntry::read_from(&mut &entries[offset..]).map_err(|_| GptError::InvalidEntries)
}

fn header_fields_same(h1: &GptHeader, h2: &GptHeader) -> bool {
    // my_lba, alternate_lba, entries_lba and header_crc32 legitimately
    // differ between the two copies and are not compared.
    h1.signature == h2.signature
        && h1.revision == h2.revision
        && h1.size == h2.size
        && h1.reserved_zero == h2.reserved_zero
        && h1.first_usable_lba == h2.first_usable_lba
        && h1.last_usable_lba == h2.last_usable_lba
        && h1.disk_uuid == h2.disk_uuid
        && h1.number_of_entries == h2.number_of_entries
        && h1.size_of_entry == h2.size_of_entry
        && h1.entries_crc32 == h2.entries_crc32
}

/// The working set for one drive: both header sectors, both entry tables,
/// and the bookkeeping masks.
///
/// The four buffers are borrowed from the caller, which loads them from disk
/// beforehand and persists whichever sectors [`modified`](GptData::modified)
/// flags afterwards. Validation never changes the buffers; repair does.
#[derive(Debug)]
pub struct GptData<'a> {
    /// Sector size of the drive in bytes; only 512 is supported.
    pub sector_bytes: u32,
    /// Total number of sectors on the drive.
    pub drive_sectors: u64,
    /// Sector 1 of the drive.
    pub primary_header: &'a mut [u8; SECTOR_SIZE],
    /// Sector `drive_sectors - 1` of the drive.
    pub secondary_header: &'a mut [u8; SECTOR_SIZE],
    /// Sectors 2..34 of the drive.
    pub primary_entries: &'a mut [u8; TOTAL_ENTRIES_SIZE],
    /// Sectors `drive_sectors - 33..drive_sectors - 1` of the drive.
    pub secondary_entries: &'a mut [u8; TOTAL_ENTRIES_SIZE],
    /// Which headers passed validation; written by
    /// [`sanity_check`](GptData::sanity_check).
    pub valid_headers: u32,
    /// Which entry tables passed validation; written by
    /// [`sanity_check`](GptData::sanity_check).
    pub valid_entries: u32,
    /// Which sectors need to be persisted. Repair only ever sets bits here;
    /// the caller clears them once the writes are on disk.
    pub modified: u32,
    /// Index of the kernel entry selected by the caller. Only read by
    /// [`current_kernel_unique_guid`](GptData::current_kernel_unique_guid).
    pub current_kernel: u32,
}

impl<'a> GptData<'a> {
    /// Wraps the caller's buffers. The buffer sizes are enforced by the
    /// array types; everything else is checked by
    /// [`sanity_check`](GptData::sanity_check).
    pub fn new(
        sector_bytes: u32,
        drive_sectors: u64,
        primary_header: &'a mut [u8; SECTOR_SIZE],
        secondary_header: &'a mut [u8; SECTOR_SIZE],
        primary_entries: &'a mut [u8; TOTAL_ENTRIES_SIZE],
        secondary_entries: &'a mut [u8; TOTAL_ENTRIES_SIZE],
    ) -> GptData<'a> {
        GptData {
            sector_bytes,
            drive_sectors,
            primary_header,
            secondary_header,
            primary_entries,
            secondary_entries,
            valid_headers: MASK_NONE,
            valid_entries: MASK_NONE,
            modified: 0,
            current_kernel: 0,
        }
    }

    fn check_parameters(&self) -> Result<(), GptError> {
        if self.sector_bytes != SECTOR_SIZE as u32 {
            return Err(GptError::InvalidSectorSize);
        }

        // The drive must at least fit the PMBR plus two headers and two
        // entry tables for the sector count to be plausible.
        if self.drive_sectors < 1 + 2 * (1 + GPT_ENTRIES_SECTORS) {
            return Err(GptError::InvalidSectorNumber);
        }

        Ok(())
    }

    /// Validates all four structures and fills in `valid_headers` and
    /// `valid_entries`.
    ///
    /// Both entry tables are checked against a single header (primary
    /// preferred) so that two individually consistent but diverging copies
    /// are caught. If both headers are good but neither table matches the
    /// primary's CRC, the tables are retried against the secondary header;
    /// a hit there invalidates the primary header instead. Finally, two
    /// valid headers must agree on every field that is not derived from
    /// their position, or the secondary is marked for rebuild.
    pub fn sanity_check(&mut self) -> Result<(), GptError> {
        self.valid_headers = MASK_NONE;
        self.valid_entries = MASK_NONE;

        self.check_parameters()?;

        let header1 = check_header(self.primary_header, false, self.drive_sectors);
        let header2 = check_header(self.secondary_header, true, self.drive_sectors);
        if header1.is_some() {
            self.valid_headers |= MASK_PRIMARY;
        }
        if header2.is_some() {
            self.valid_headers |= MASK_SECONDARY;
        }

        let goodhdr = match (&header1, &header2) {
            (Some(h), _) => h,
            (None, Some(h)) => h,
            (None, None) => return Err(GptError::InvalidHeaders),
        };

        if check_entries(self.primary_entries, goodhdr).is_ok() {
            self.valid_entries |= MASK_PRIMARY;
        }
        if check_entries(self.secondary_entries, goodhdr).is_ok() {
            self.valid_entries |= MASK_SECONDARY;
        }

        if self.valid_headers == MASK_BOTH && self.valid_entries == MASK_NONE {
            if let Some(h2) = &header2 {
                if check_entries(self.primary_entries, h2).is_ok() {
                    self.valid_entries |= MASK_PRIMARY;
                }
                if check_entries(self.secondary_entries, h2).is_ok() {
                    self.valid_entries |= MASK_SECONDARY;
                }
                if self.valid_entries != MASK_NONE {
                    // The secondary header carried the good entries CRC
                    // after all; force a rewrite of the primary.
                    self.valid_headers &= !MASK_PRIMARY;
                }
            }
        }

        if self.valid_entries == MASK_NONE {
            return Err(GptError::InvalidEntries);
        }

        if self.valid_headers == MASK_BOTH {
            if let (Some(h1), Some(h2)) = (&header1, &header2) {
                if !header_fields_same(h1, h2) {
                    self.valid_headers &= !MASK_SECONDARY;
                }
            }
        }

        Ok(())
    }

    /// Adapts the surviving header to `drive_sectors`, for images that were
    /// moved onto a larger drive.
    ///
    /// On any doubt after the rewrite (the updated copy no longer validates,
    /// or the opposite copy unexpectedly does) the header is restored from a
    /// backup and `InvalidHeaders` is returned with the buffers unchanged.
    fn recompute_size(&mut self) -> Result<(), GptError> {
        let alt_lba = self.drive_sectors - 1;
        let alt_entries_lba = alt_lba - GPT_ENTRIES_SECTORS;
        let last_usable_lba = alt_entries_lba - 1;

        let was_valid;
        let backup;
        if self.valid_headers & MASK_PRIMARY != 0 {
            let mut h = match GptHeader::read_from(&mut &self.primary_header[..]) {
                Ok(h) => h,
                Err(_) => return Err(GptError::InvalidHeaders),
            };
            if h.alternate_lba == alt_lba && h.last_usable_lba == last_usable_lba {
                return Ok(());
            }

            backup = *self.primary_header;
            h.alternate_lba = alt_lba;
            h.last_usable_lba = last_usable_lba;
            sync_header(self.primary_header, &mut h);
            was_valid = MASK_PRIMARY;
        } else if self.valid_headers & MASK_SECONDARY != 0 {
            let mut h = match GptHeader::read_from(&mut &self.secondary_header[..]) {
                Ok(h) => h,
                Err(_) => return Err(GptError::InvalidHeaders),
            };
            if h.my_lba == alt_lba
                && h.entries_lba == alt_entries_lba
                && h.last_usable_lba == last_usable_lba
            {
                return Ok(());
            }

            backup = *self.secondary_header;
            h.my_lba = alt_lba;
            h.entries_lba = alt_entries_lba;
            h.last_usable_lba = last_usable_lba;
            sync_header(self.secondary_header, &mut h);
            was_valid = MASK_SECONDARY;
        } else {
            return Err(GptError::InvalidHeaders);
        }

        // The rewrite must leave exactly the copy we touched valid; anything
        // else means the image and the drive size disagree in a way we
        // cannot resolve, so undo and report.
        if self.sanity_check().is_err() || self.valid_headers != was_valid {
            if was_valid == MASK_PRIMARY {
                *self.primary_header = backup;
            } else {
                *self.secondary_header = backup;
            }
            let _ = self.sanity_check();
            return Err(GptError::InvalidHeaders);
        }

        // The secondary's location changed with the drive size, so it has to
        // be rewritten no matter which copy was adapted.
        self.modified |= MODIFIED_HEADER2 | MODIFIED_ENTRIES2;
        if was_valid == MASK_PRIMARY {
            self.modified |= MODIFIED_HEADER1;
        }

        Ok(())
    }

    /// Reconstructs the damaged copies from the intact ones.
    ///
    /// Needs at least one valid header and one valid entry table per the
    /// masks filled in by [`sanity_check`](GptData::sanity_check); otherwise
    /// nothing is touched. On return the caller persists the sectors flagged
    /// in [`modified`](GptData::modified).
    pub fn repair(&mut self) {
        if self.valid_headers == MASK_NONE || self.valid_entries == MASK_NONE {
            return;
        }

        if self.recompute_size().is_err() {
            return;
        }

        if self.valid_headers == MASK_PRIMARY {
            *self.secondary_header = *self.primary_header;
            let mut h2 = match GptHeader::read_from(&mut &self.secondary_header[..]) {
                Ok(h) => h,
                Err(_) => return,
            };
            h2.my_lba = self.drive_sectors - 1;
            h2.alternate_lba = 1;
            h2.entries_lba = h2.my_lba - GPT_ENTRIES_SECTORS;
            sync_header(self.secondary_header, &mut h2);
            self.modified |= MODIFIED_HEADER2;
        } else if self.valid_headers == MASK_SECONDARY {
            *self.primary_header = *self.secondary_header;
            let mut h1 = match GptHeader::read_from(&mut &self.primary_header[..]) {
                Ok(h) => h,
                Err(_) => return,
            };
            h1.my_lba = 1;
            h1.alternate_lba = self.drive_sectors - 1;
            h1.entries_lba = h1.my_lba + 1;
            sync_header(self.primary_header, &mut h1);
            self.modified |= MODIFIED_HEADER1;
        }
        self.valid_headers = MASK_BOTH;

        let h1 = match GptHeader::read_from(&mut &self.primary_header[..]) {
            Ok(h) => h,
            Err(_) => return,
        };
        let entries_size = h1.size_of_entry as usize * h1.number_of_entries as usize;
        if self.valid_entries == MASK_PRIMARY {
            self.secondary_entries[..entries_size]
                .copy_from_slice(&self.primary_entries[..entries_size]);
            self.modified |= MODIFIED_ENTRIES2;
        } else if self.valid_entries == MASK_SECONDARY {
            self.primary_entries[..entries_size]
                .copy_from_slice(&self.secondary_entries[..entries_size]);
            self.modified |= MODIFIED_ENTRIES1;
        }
        self.valid_entries = MASK_BOTH;
    }

    /// Tells the core that the caller changed the primary entry table.
    ///
    /// Recomputes the primary CRCs, then reuses [`repair`](GptData::repair)
    /// to propagate the change. Edits always flow primary to secondary.
    pub fn gpt_modified(&mut self) {
        let mut h = match GptHeader::read_from(&mut &self.primary_header[..]) {
            Ok(h) => h,
            Err(_) => return,
        };
        let entries_size = h.size_of_entry as usize * h.number_of_entries as usize;
        h.entries_crc32 = crc32::checksum_ieee(&self.primary_entries[..entries_size]);
        sync_header(self.primary_header, &mut h);
        self.modified |= MODIFIED_HEADER1 | MODIFIED_ENTRIES1;

        self.valid_headers = MASK_PRIMARY;
        self.valid_entries = MASK_PRIMARY;
        self.repair();
    }

    /// Parses one entry of the primary table.
    pub fn entry(&self, index: u32) -> bincode::Result<GptEntry> {
        let offset = index as usize * SIZE_OF_ENTRY;
        GptEntry::read_from(&mut &self.primary_entries[offset..offset + SIZE_OF_ENTRY])
    }

    /// Writes one entry of the primary table. Call
    /// [`gpt_modified`](GptData::gpt_modified) once all edits are done so
    /// the CRCs and the secondary copy catch up.
    pub fn set_entry(&mut self, index: u32, entry: &GptEntry) {
        let data = serialize(entry).expect("could not serialize");
        let offset = index as usize * SIZE_OF_ENTRY;
        self.primary_entries[offset..offset + data.len()].copy_from_slice(&data);
    }

    /// The unique GUID of the entry selected by `current_kernel`.
    ///
    /// The caller guarantees `current_kernel` indexes a real entry; an
    /// out-of-range index panics.
    pub fn current_kernel_unique_guid(&self) -> [u8; 16] {
        let offset = self.current_kernel as usize * SIZE_OF_ENTRY + 16;
        let mut unique = [0; 16];
        unique.copy_from_slice(&self.primary_entries[offset..offset + 16]);
        unique
    }
}
