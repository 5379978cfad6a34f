//! Syscall registry and the optional syscall metadata table.
//!
//! The built-in registry maps `sys_0` … `sys_4D` to ids 0 … 77. A metadata
//! table, when supplied, adds named syscalls and the methods reachable through
//! `object.method(...)` call syntax.

use indexmap::IndexMap;
use serde::Deserialize;

/// Number of built-in `sys_<hex>` entries.
const BUILTIN_COUNT: u32 = 0x4E;

/// Syscall ids whose result is a float.
pub const FLOAT_RETURN_SYSCALLS: &[u32] = &[
    0x08, 0x0A, 0x0F, 0x11, 0x13, 0x15, 0x17, 0x1B, 0x25, 0x28, 0x2B, 0x2C, 0x2F, 0x32, 0x34, 0x35,
    0x3D, 0x3F, 0x40, 0x45,
];

pub fn returns_float(id: u32) -> bool {
    FLOAT_RETURN_SYSCALLS.contains(&id)
}

/// Syscall metadata table, read from JSON:
///
/// ```json
/// { "syscalls": [ { "name": "fighter", "id": 16, "methods": [ { "name": "get_pos", "id": 3 } ] } ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SyscallTable {
    #[serde(default)]
    pub syscalls: Vec<SyscallInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SyscallInfo {
    pub name: String,
    pub id: u32,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub id: u32,
}

impl SyscallTable {
    pub fn syscall(&self, name: &str) -> Option<&SyscallInfo> {
        self.syscalls.iter().find(|s| s.name == name)
    }
}

impl SyscallInfo {
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Everything the compiler knows about syscalls.
#[derive(Clone, Debug)]
pub struct Syscalls {
    by_name: IndexMap<String, u32>,
    table: SyscallTable,
}

impl Default for Syscalls {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Syscalls {
    /// The `sys_<hex>` registry without metadata.
    pub fn builtin() -> Self {
        let by_name = (0..BUILTIN_COUNT)
            .map(|id| (format!("sys_{id:X}"), id))
            .collect();
        Self {
            by_name,
            table: SyscallTable::default(),
        }
    }

    /// Built-in registry extended with the names from `table`.
    pub fn with_table(table: SyscallTable) -> Self {
        let mut syscalls = Self::builtin();
        for info in &table.syscalls {
            syscalls.by_name.insert(info.name.clone(), info.id);
        }
        tracing::debug!(
            syscalls = table.syscalls.len(),
            "loaded syscall metadata"
        );
        syscalls.table = table;
        syscalls
    }

    /// Id of a syscall invoked by name.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn table(&self) -> &SyscallTable {
        &self.table
    }
}
