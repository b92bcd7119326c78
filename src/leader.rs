//! MARC record leader for exported archival records.
//!
//! The MARC leader is a 24-byte fixed-length field at the start of every MARC record.
//! Exported archival records start from a fixed template and only position 7
//! (bibliographic level) varies with the described material.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type (p = mixed materials)
//! - Position 7: Bibliographic level (c = collection, m = item)
//! - Position 8: Type of control (a = archival)
//! - Position 9: Character coding (a = UTF-8)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Reserved (usually "4500")

use std::fmt;

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};

/// Leader template used for every exported resource.
pub const ARCHIVAL_LEADER_TEMPLATE: &str = "00000npcaa2200000la 4500";

/// MARC Leader - 24 bytes at the start of every MARC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding: char,
    /// Indicator count (1 digit) - position 10 (usually 2)
    pub indicator_count: u8,
    /// Subfield code count (1 digit) - position 11 (usually 2)
    pub subfield_code_count: u8,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: u32,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Reserved (4 chars) - positions 20-23
    pub reserved: String,
}

impl Default for Leader {
    fn default() -> Self {
        Self::archival()
    }
}

impl Leader {
    /// The archival leader template with bibliographic level `c` (collection).
    #[must_use]
    pub fn archival() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'p',
            bibliographic_level: 'c',
            control_record_type: 'a',
            character_coding: 'a',
            indicator_count: 2,
            subfield_code_count: 2,
            data_base_address: 0,
            encoding_level: 'l',
            cataloging_form: 'a',
            multipart_level: ' ',
            reserved: "4500".to_string(),
        }
    }

    /// The archival leader with position 7 chosen from the object's level.
    ///
    /// `item` level material is described as a monograph/item (`m`), everything
    /// else as a collection (`c`).
    #[must_use]
    pub fn for_level(level: Option<&str>) -> Self {
        let mut leader = Self::archival();
        leader.bibliographic_level = bibliographic_level_for(level);
        leader
    }

    /// Parse a leader from 24 bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are invalid or too short.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 24 {
            return Err(ExportError::InvalidLeader(format!(
                "Leader must be at least 24 bytes, got {}",
                bytes.len()
            )));
        }

        let indicator_count = parse_count(bytes[10], 10)?;
        let subfield_code_count = parse_count(bytes[11], 11)?;

        Ok(Leader {
            record_length: parse_digits(&bytes[0..5])?,
            record_status: bytes[5] as char,
            record_type: bytes[6] as char,
            bibliographic_level: bytes[7] as char,
            control_record_type: bytes[8] as char,
            character_coding: bytes[9] as char,
            indicator_count,
            subfield_code_count,
            data_base_address: parse_digits(&bytes[12..17])?,
            encoding_level: bytes[17] as char,
            cataloging_form: bytes[18] as char,
            multipart_level: bytes[19] as char,
            reserved: String::from_utf8_lossy(&bytes[20..24]).to_string(),
        })
    }

    /// Serialize leader to 24-byte array
    ///
    /// # Errors
    ///
    /// Returns an error if the leader values are invalid for serialization.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        if self.record_length > 99_999 || self.data_base_address > 99_999 {
            return Err(ExportError::InvalidLeader(
                "Numeric leader fields are limited to 5 digits".to_string(),
            ));
        }
        if self.indicator_count > 9 || self.subfield_code_count > 9 {
            return Err(ExportError::InvalidLeader(
                "Indicator and subfield code counts must be single digits".to_string(),
            ));
        }

        let mut bytes = Vec::with_capacity(24);

        bytes.extend_from_slice(format!("{:05}", self.record_length).as_bytes());
        for c in [
            self.record_status,
            self.record_type,
            self.bibliographic_level,
            self.control_record_type,
            self.character_coding,
        ] {
            push_ascii(&mut bytes, c)?;
        }
        bytes.push(b'0' + self.indicator_count);
        bytes.push(b'0' + self.subfield_code_count);

        bytes.extend_from_slice(format!("{:05}", self.data_base_address).as_bytes());
        for c in [
            self.encoding_level,
            self.cataloging_form,
            self.multipart_level,
        ] {
            push_ascii(&mut bytes, c)?;
        }

        let reserved_bytes = self.reserved.as_bytes();
        if reserved_bytes.len() != 4 {
            return Err(ExportError::InvalidLeader(format!(
                "Reserved field must be 4 characters, got {}",
                reserved_bytes.len()
            )));
        }
        bytes.extend_from_slice(reserved_bytes);

        Ok(bytes)
    }

    /// Render the leader as its 24-character string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the leader values are invalid for serialization.
    pub fn to_leader_string(&self) -> Result<String> {
        let bytes = self.as_bytes()?;
        String::from_utf8(bytes).map_err(|e| ExportError::InvalidLeader(e.to_string()))
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_leader_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Leader position 7 for an archival object level.
#[must_use]
pub fn bibliographic_level_for(level: Option<&str>) -> char {
    if level == Some("item") {
        'm'
    } else {
        'c'
    }
}

fn push_ascii(bytes: &mut Vec<u8>, c: char) -> Result<()> {
    if c.is_ascii() {
        bytes.push(c as u8);
        Ok(())
    } else {
        Err(ExportError::InvalidLeader(format!(
            "Leader positions must be ASCII, got '{c}'"
        )))
    }
}

fn parse_count(byte: u8, position: usize) -> Result<u8> {
    (byte as char)
        .to_digit(10)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| {
            ExportError::InvalidLeader(format!(
                "Invalid count at position {position}: {}",
                byte as char
            ))
        })
}

/// Parse 5-digit ASCII number from bytes
fn parse_digits(bytes: &[u8]) -> Result<u32> {
    let s = String::from_utf8_lossy(bytes);
    s.parse::<u32>()
        .map_err(|_| ExportError::InvalidLeader(format!("Invalid numeric field: '{s}'")))
}
