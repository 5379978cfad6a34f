//! Whole-program model and the MSCSB container reader/writer.
//!
//! Section order: Header → Code → (pad 16) → Script offsets → (pad 16) → Strings.

use super::header::{Endian, Header};
use super::instructions::Instruction;
use super::{CODE_START, FILE_BASE, HEADER_SIZE, MAGIC, SECTION_ALIGN, align_up};

/// Errors from reading an MSCSB container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("file too small: {0} bytes (minimum 64)")]
    FileTooSmall(usize),

    #[error("invalid magic: not an MSCSB file")]
    InvalidMagic,

    #[error("truncated {section}: need {needed} bytes, file has {actual}")]
    Truncated {
        section: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("string {0} is not valid UTF-8")]
    InvalidString(usize),

    #[error("script offset {0:#x} lies outside the code section")]
    InvalidScriptOffset(u32),
}

/// An instruction at its absolute code offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placed {
    pub offset: u32,
    pub instruction: Instruction,
    /// Disassembly annotation (debug string or call target name).
    pub comment: Option<String>,
}

/// One function's instruction stream and its `[start, end)` code bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub instructions: Vec<Placed>,
}

impl Script {
    /// Lay out `instructions` contiguously from `start`.
    pub fn new(
        name: impl Into<String>,
        start: u32,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Self {
        let mut offset = start;
        let instructions = instructions
            .into_iter()
            .map(|instruction| {
                let placed = Placed {
                    offset,
                    instruction,
                    comment: None,
                };
                offset += placed.instruction.size() as u32;
                placed
            })
            .collect();
        Self {
            name: name.into(),
            start,
            end: offset,
            instructions,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.instructions.iter().map(|p| p.instruction.size()).sum()
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn instruction_at(&self, offset: u32) -> Option<&Placed> {
        self.instructions
            .binary_search_by_key(&offset, |p| p.offset)
            .ok()
            .map(|i| &self.instructions[i])
    }
}

/// A complete MSC program: scripts in declaration order plus the string table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub scripts: Vec<Script>,
    pub strings: Vec<String>,
    /// Absolute offset of the entry script.
    pub entry_point: u32,
}

impl Program {
    /// Index of the script that starts at the entry point.
    pub fn entry_script(&self) -> Option<usize> {
        self.scripts
            .iter()
            .position(|s| s.start == self.entry_point)
    }

    /// Index of the script whose bounds contain `offset`.
    pub fn script_at(&self, offset: u32) -> Option<usize> {
        self.scripts.iter().position(|s| s.contains(offset))
    }

    /// Fixed string record width: longest string rounded up to 16 bytes.
    pub fn string_size(&self) -> usize {
        let longest = self.strings.iter().map(String::len).max().unwrap_or(0);
        align_up(longest, SECTION_ALIGN)
    }

    pub fn header(&self) -> Header {
        let code_size: usize = self.scripts.iter().map(Script::size).sum();
        Header {
            code_end: CODE_START + code_size as u32,
            entry_point: self.entry_point,
            script_count: self.scripts.len() as u32,
            string_size: self.string_size() as u32,
            string_count: self.strings.len() as u32,
            ..Header::default()
        }
    }

    /// Serialize to MSCSB bytes.
    ///
    /// Scripts are laid out contiguously in vector order starting at
    /// [`CODE_START`]; the offset table is derived from that layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(header.strings_end());
        out.extend_from_slice(&header.to_bytes(Endian::Little));

        let mut starts = Vec::with_capacity(self.scripts.len());
        let mut pos = CODE_START;
        for script in &self.scripts {
            starts.push(pos);
            for placed in &script.instructions {
                placed.instruction.write_to(&mut out);
            }
            pos += script.size() as u32;
        }

        pad_to_section(&mut out);
        for start in starts {
            out.extend_from_slice(&start.to_le_bytes());
        }
        pad_to_section(&mut out);

        let record = header.string_size as usize;
        for s in &self.strings {
            out.extend_from_slice(s.as_bytes());
            out.resize(out.len() + record - s.len(), 0);
        }

        out
    }

    /// Parse MSCSB bytes.
    ///
    /// Header fields are read little-endian; if that interpretation does not
    /// fit the file, big-endian is tried before giving up.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ContainerError::FileTooSmall(bytes.len()));
        }
        if bytes[0..16] != MAGIC {
            return Err(ContainerError::InvalidMagic);
        }

        let (header, endian) = read_header(bytes);
        tracing::debug!(
            scripts = header.script_count,
            strings = header.string_count,
            ?endian,
            "decoding container"
        );

        let code_end = header.code_end;
        let code_end_pos = code_end as usize + FILE_BASE as usize;
        ensure_len("code", code_end_pos, bytes.len())?;

        let table_pos = header.offset_table_pos();
        let table_end = table_pos + header.script_count as usize * 4;
        ensure_len("script offset table", table_end, bytes.len())?;
        let offsets: Vec<u32> = (0..header.script_count as usize)
            .map(|i| endian.read_u32(bytes, table_pos + i * 4))
            .collect();

        if let Some(&bad) = offsets.iter().find(|&&o| o < CODE_START || o > code_end) {
            return Err(ContainerError::InvalidScriptOffset(bad));
        }

        let strings = read_strings(bytes, &header)?;

        let mut sorted = offsets.clone();
        sorted.sort_unstable();

        let mut scripts = Vec::with_capacity(offsets.len());
        for (index, &start) in offsets.iter().enumerate() {
            let end = sorted
                .iter()
                .copied()
                .find(|&o| o > start)
                .unwrap_or(code_end);
            let range = (start + FILE_BASE) as usize..(end + FILE_BASE) as usize;
            let instructions = Instruction::decode_all(&bytes[range], start)
                .into_iter()
                .map(|(offset, instruction)| Placed {
                    offset,
                    instruction,
                    comment: None,
                })
                .collect();
            scripts.push(Script {
                name: format!("script_{index}"),
                start,
                end,
                instructions,
            });
        }

        Ok(Self {
            scripts,
            strings,
            entry_point: header.entry_point,
        })
    }
}

fn read_header(bytes: &[u8]) -> (Header, Endian) {
    let little = Header::from_bytes(bytes, Endian::Little);
    if little.fits(bytes.len()) {
        return (little, Endian::Little);
    }
    let big = Header::from_bytes(bytes, Endian::Big);
    if big.fits(bytes.len()) {
        tracing::debug!("little-endian header does not fit, using big-endian");
        return (big, Endian::Big);
    }
    (little, Endian::Little)
}

fn read_strings(bytes: &[u8], header: &Header) -> Result<Vec<String>, ContainerError> {
    let record = header.string_size as usize;
    let start = header.strings_pos();
    ensure_len("string table", header.strings_end(), bytes.len())?;

    (0..header.string_count as usize)
        .map(|i| {
            let at = start + i * record;
            let raw: Vec<u8> = bytes[at..at + record]
                .iter()
                .copied()
                .filter(|&b| b != 0)
                .collect();
            String::from_utf8(raw).map_err(|_| ContainerError::InvalidString(i))
        })
        .collect()
}

fn ensure_len(section: &'static str, needed: usize, actual: usize) -> Result<(), ContainerError> {
    if needed > actual {
        return Err(ContainerError::Truncated {
            section,
            needed,
            actual,
        });
    }
    Ok(())
}

/// Pad buffer to the next section boundary.
fn pad_to_section(buf: &mut Vec<u8>) {
    let rem = buf.len() % SECTION_ALIGN;
    if rem != 0 {
        buf.resize(buf.len() + (SECTION_ALIGN - rem), 0);
    }
}
