//! MSCSB file header (64 bytes).
//!
//! Layout:
//! - 0-15: magic
//! - 16-47: eight u32 fields (code end, entry point, script count, unknown,
//!   string record size, string count, two reserved zeros)
//! - 48-63: zero padding
//!
//! All offsets stored in the file are relative to [`FILE_BASE`], so the first
//! instruction sits at offset [`CODE_START`].

use super::{CODE_START, FILE_BASE, HEADER_SIZE, HEADER_UNKNOWN, MAGIC, SECTION_ALIGN, align_up};

/// Byte order of the header fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn read_u32(self, bytes: &[u8], at: usize) -> u32 {
        let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
        match self {
            Endian::Little => u32::from_le_bytes(raw),
            Endian::Big => u32::from_be_bytes(raw),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 16],
    /// Offset just past the last instruction (`CODE_START` + code size).
    pub code_end: u32,
    /// Offset of the entry script (`main`), or `CODE_START` without one.
    pub entry_point: u32,
    pub script_count: u32,
    /// Always written as 0x16; meaning unknown.
    pub unknown: u32,
    /// Fixed width of every string record.
    pub string_size: u32,
    pub string_count: u32,
    pub _reserved: [u32; 2],
}

const _: () = assert!(16 + 8 * 4 + 16 == HEADER_SIZE);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            code_end: CODE_START,
            entry_point: CODE_START,
            script_count: 0,
            unknown: HEADER_UNKNOWN,
            string_size: 0,
            string_count: 0,
            _reserved: [0; 2],
        }
    }
}

impl Header {
    /// Decode the header from the first 64 bytes.
    pub fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        assert!(bytes.len() >= HEADER_SIZE, "header too short");

        let mut magic = [0u8; 16];
        magic.copy_from_slice(&bytes[0..16]);
        let field = |i: usize| endian.read_u32(bytes, 16 + i * 4);

        Self {
            magic,
            code_end: field(0),
            entry_point: field(1),
            script_count: field(2),
            unknown: field(3),
            string_size: field(4),
            string_count: field(5),
            _reserved: [field(6), field(7)],
        }
    }

    /// Encode the header to 64 bytes.
    pub fn to_bytes(&self, endian: Endian) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..16].copy_from_slice(&self.magic);
        let fields = [
            self.code_end,
            self.entry_point,
            self.script_count,
            self.unknown,
            self.string_size,
            self.string_count,
            self._reserved[0],
            self._reserved[1],
        ];
        for (i, value) in fields.into_iter().enumerate() {
            let at = 16 + i * 4;
            bytes[at..at + 4].copy_from_slice(&endian.u32_bytes(value));
        }
        bytes
    }

    /// File position of the script offset table.
    pub fn offset_table_pos(&self) -> usize {
        align_up(self.code_end as usize + FILE_BASE as usize, SECTION_ALIGN)
    }

    /// File position of the first string record.
    pub fn strings_pos(&self) -> usize {
        align_up(
            self.offset_table_pos() + self.script_count as usize * 4,
            SECTION_ALIGN,
        )
    }

    /// File position just past the last string record.
    pub fn strings_end(&self) -> usize {
        self.strings_pos() + self.string_size as usize * self.string_count as usize
    }

    /// Whether every section described by this header fits in `file_len` bytes.
    pub fn fits(&self, file_len: usize) -> bool {
        let align = |n: u64| n.div_ceil(SECTION_ALIGN as u64) * SECTION_ALIGN as u64;
        let code_end = self.code_end as u64 + FILE_BASE as u64;
        let table_end = align(code_end) + self.script_count as u64 * 4;
        let strings_end =
            align(table_end) + self.string_size as u64 * self.string_count as u64;
        self.code_end >= CODE_START && strings_end <= file_len as u64
    }
}
