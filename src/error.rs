use std::error;
use std::fmt;

/// Everything that can go wrong while validating or repairing a GPT.
///
/// The numeric values are a stable contract shared with the firmware side;
/// [`code`](GptError::code) exposes them and [`error_text`] maps any code
/// back to its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GptError {
    /// No bootable kernel partition was found.
    NoValidKernel = 1,
    /// Neither the primary nor the secondary header is usable.
    InvalidHeaders = 2,
    /// Neither entry table matches the surviving header.
    InvalidEntries = 3,
    /// The drive does not use 512-byte sectors.
    InvalidSectorSize = 4,
    /// The drive is too small to hold a GPT at all.
    InvalidSectorNumber = 5,
    /// An unrecognized kernel-entry update was requested.
    InvalidUpdateType = 6,
    /// The entry table does not match the CRC recorded in the header.
    CrcCorrupted = 7,
    /// An entry lies outside the usable region of the drive.
    OutOfRegion = 8,
    /// An entry's starting LBA falls inside another entry.
    StartLbaOverlap = 9,
    /// An entry's ending LBA falls inside another entry.
    EndLbaOverlap = 10,
    /// Two used entries share the same unique GUID.
    DupGuid = 11,
    /// The flash geometry does not fit the partition layout.
    InvalidFlashGeometry = 12,
    /// The requested entry does not exist.
    NoSuchEntry = 13,
}

impl GptError {
    /// The stable numeric code for this error. `0` is reserved for success.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for GptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(error_text(self.code()))
    }
}

impl error::Error for GptError {}

/// Maps a numeric result code to its message.
///
/// Total over all of `u32`: `0` maps to `"none"`, unassigned codes map to
/// `"Unknown"`.
pub fn error_text(code: u32) -> &'static str {
    match code {
        0 => "none",
        1 => "Invalid kernel",
        2 => "Invalid headers",
        3 => "Invalid entries",
        4 => "Invalid sector size",
        5 => "Invalid sector number",
        6 => "Invalid update type",
        7 => "Entries' crc corrupted",
        8 => "Entry outside of valid region",
        9 => "Starting LBA overlaps",
        10 => "Ending LBA overlaps",
        11 => "Duplicated GUID",
        12 => "Invalid flash geometry",
        13 => "No entry found",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GptError::NoValidKernel.code(), 1);
        assert_eq!(GptError::InvalidHeaders.code(), 2);
        assert_eq!(GptError::InvalidEntries.code(), 3);
        assert_eq!(GptError::InvalidSectorSize.code(), 4);
        assert_eq!(GptError::InvalidSectorNumber.code(), 5);
        assert_eq!(GptError::InvalidUpdateType.code(), 6);
        assert_eq!(GptError::CrcCorrupted.code(), 7);
        assert_eq!(GptError::OutOfRegion.code(), 8);
        assert_eq!(GptError::StartLbaOverlap.code(), 9);
        assert_eq!(GptError::EndLbaOverlap.code(), 10);
        assert_eq!(GptError::DupGuid.code(), 11);
        assert_eq!(GptError::InvalidFlashGeometry.code(), 12);
        assert_eq!(GptError::NoSuchEntry.code(), 13);
    }

    #[test]
    fn text_is_total() {
        assert_eq!(error_text(0), "none");
        assert_eq!(error_text(1), "Invalid kernel");
        assert_eq!(error_text(2), "Invalid headers");
        assert_eq!(error_text(3), "Invalid entries");
        assert_eq!(error_text(4), "Invalid sector size");
        assert_eq!(error_text(5), "Invalid sector number");
        assert_eq!(error_text(6), "Invalid update type");
        assert_eq!(error_text(7), "Entries' crc corrupted");
        assert_eq!(error_text(8), "Entry outside of valid region");
        assert_eq!(error_text(9), "Starting LBA overlaps");
        assert_eq!(error_text(10), "Ending LBA overlaps");
        assert_eq!(error_text(11), "Duplicated GUID");
        assert_eq!(error_text(12), "Invalid flash geometry");
        assert_eq!(error_text(13), "No entry found");
        assert_eq!(error_text(14), "Unknown");
        assert_eq!(error_text(u32::max_value()), "Unknown");
    }

    #[test]
    fn display_matches_text() {
        assert_eq!(format!("{}", GptError::DupGuid), "Duplicated GUID");
        assert_eq!(format!("{}", GptError::CrcCorrupted), "Entries' crc corrupted");
        assert_eq!(format!("{}", GptError::EndLbaOverlap), "Ending LBA overlaps");
    }
}
