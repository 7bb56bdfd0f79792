//! Validation and repair of GUID partition tables.
//!
//! This crate works on the in-memory image of a drive's primary and
//! secondary GPT: it decides which copies are valid, rebuilds a damaged
//! copy from its intact twin, adapts the header geometry when an image
//! lands on a larger drive, and exposes the Chromium OS A/B boot attributes
//! carried in each entry's attribute word.
//!
//! All I/O stays with the caller: it loads the two header sectors and the
//! two entry tables, wraps them in a [`GptData`], runs
//! [`sanity_check`](GptData::sanity_check) and possibly
//! [`repair`](GptData::repair), and afterwards persists exactly the sectors
//! flagged in [`GptData::modified`].

#![deny(missing_docs)]

extern crate bincode;
extern crate crc;
extern crate serde;
#[macro_use]
extern crate serde_derive;

mod attribute_bits;
mod error;
mod gpt;

pub use self::attribute_bits::GPT_ENT_TYPE_CHROMEOS_KERNEL;
pub use self::error::{error_text, GptError};
pub use self::gpt::{
    check_entries, check_header, header_crc, GptData, GptEntry, GptHeader, PartitionName,
    GPT_ENTRIES_SECTORS, GPT_HEADER_REVISION, GPT_HEADER_SIGNATURE, GPT_HEADER_SIGNATURE2,
    MASK_BOTH, MASK_NONE, MASK_PRIMARY, MASK_SECONDARY, MAX_NUMBER_OF_ENTRIES,
    MAX_SIZE_OF_HEADER, MIN_NUMBER_OF_ENTRIES, MIN_SIZE_OF_HEADER, MODIFIED_ENTRIES1,
    MODIFIED_ENTRIES2, MODIFIED_HEADER1, MODIFIED_HEADER2, SECTOR_SIZE, SIZE_OF_ENTRY,
    TOTAL_ENTRIES_SIZE,
};
