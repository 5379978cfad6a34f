//! Compilation context: symbol tables shared by every function of one program.

use std::f32::consts;

use indexmap::IndexMap;

use crate::CompileOptions;
use crate::ast::{Item, TranslationUnit, Type};
use crate::error::CompileError;
use crate::ir::Label;
use crate::string_table::StringTable;
use crate::syscalls::Syscalls;

/// Structural type of a lowered value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    /// Result of a syscall with no known return type.
    Unknown,
}

impl ValueType {
    pub fn is_float(self) -> bool {
        self == ValueType::Float
    }
}

impl From<Type> for ValueType {
    fn from(ty: Type) -> Self {
        if ty.is_float() {
            ValueType::Float
        } else {
            ValueType::Int
        }
    }
}

/// Variable storage class, encoded as the first `pushVar`/store parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Local = 0,
    Global = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Variable {
    pub scope: Scope,
    pub slot: u32,
    pub ty: Type,
}

impl Variable {
    pub fn params(&self) -> [u32; 2] {
        [self.scope as u32, self.slot]
    }
}

/// Built-in integer constants.
const INT_CONSTANTS: &[(&str, u32)] = &[
    ("NULL", 0),
    ("false", 0),
    ("true", 1),
    ("NULL_FUNC_PTR", 0xFFFF_FFFF),
];

/// Built-in float constants (math.h names).
const FLOAT_CONSTANTS: &[(&str, f32)] = &[
    ("M_E", consts::E),
    ("M_LOG2E", consts::LOG2_E),
    ("M_LOG10E", consts::LOG10_E),
    ("M_LN2", consts::LN_2),
    ("M_LN10", consts::LN_10),
    ("M_PI", consts::PI),
    ("M_PI_2", consts::FRAC_PI_2),
    ("M_PI_4", consts::FRAC_PI_4),
    ("M_1_PI", consts::FRAC_1_PI),
    ("M_2_PI", consts::FRAC_2_PI),
    ("M_2_SQRTPI", consts::FRAC_2_SQRT_PI),
    ("M_SQRT2", consts::SQRT_2),
    ("M_SQRT1_2", consts::FRAC_1_SQRT_2),
];

/// Value and type of a built-in constant; floats are returned as their bits.
pub fn constant(name: &str) -> Option<(u32, ValueType)> {
    if let Some(&(_, v)) = INT_CONSTANTS.iter().find(|(n, _)| *n == name) {
        return Some((v, ValueType::Int));
    }
    FLOAT_CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, v)| (v.to_bits(), ValueType::Float))
}

/// State owned by one `compile` call and threaded through lowering.
pub struct CompilationContext<'a> {
    pub options: &'a CompileOptions,
    pub syscalls: &'a Syscalls,
    /// Global variables; slot = insertion index.
    pub globals: IndexMap<String, Type>,
    /// Functions in declaration order with their return types.
    pub functions: IndexMap<String, Type>,
    pub strings: StringTable,
    next_label: u32,
}

impl<'a> CompilationContext<'a> {
    pub fn new(options: &'a CompileOptions, syscalls: &'a Syscalls) -> Self {
        Self {
            options,
            syscalls,
            globals: IndexMap::new(),
            functions: IndexMap::new(),
            strings: StringTable::new(),
            next_label: 0,
        }
    }

    /// Register every global and function before any body is lowered.
    pub fn scan(&mut self, unit: &TranslationUnit) -> Result<(), CompileError> {
        for item in &unit.items {
            match item {
                Item::Global(g) => {
                    if g.init.is_some() {
                        return Err(CompileError::GlobalInitializer {
                            name: g.name.clone(),
                            coord: g.coord,
                        });
                    }
                    if self.globals.insert(g.name.clone(), g.ty).is_some() {
                        return Err(CompileError::GlobalRedeclared {
                            name: g.name.clone(),
                            coord: g.coord,
                        });
                    }
                }
                Item::Function(f) => {
                    if self.functions.insert(f.name.clone(), f.ret).is_some() {
                        return Err(CompileError::FunctionRedeclared {
                            name: f.name.clone(),
                            coord: f.coord,
                        });
                    }
                }
            }
        }
        tracing::debug!(
            globals = self.globals.len(),
            functions = self.functions.len(),
            "scanned top-level declarations"
        );
        Ok(())
    }

    pub fn global(&self, name: &str) -> Option<Variable> {
        self.globals.get_full(name).map(|(slot, _, &ty)| Variable {
            scope: Scope::Global,
            slot: slot as u32,
            ty,
        })
    }

    pub fn function(&self, name: &str) -> Option<Type> {
        self.functions.get(name).copied()
    }

    pub fn fresh_label(&mut self) -> Label {
        let l = Label(self.next_label);
        self.next_label += 1;
        l
    }
}

/// Local variables of one function. Slots are never reused and nested blocks
/// share the function's namespace.
#[derive(Clone, Debug, Default)]
pub struct Locals {
    vars: IndexMap<String, Type>,
}

impl Locals {
    /// Variable for `name`, allocating the next slot on first sight. A
    /// redeclaration keeps the original slot and type.
    pub fn declare(&mut self, name: &str, ty: Type) -> Variable {
        let entry = self.vars.entry(name.to_string());
        let slot = entry.index() as u32;
        let ty = *entry.or_insert(ty);
        Variable {
            scope: Scope::Local,
            slot,
            ty,
        }
    }

    pub fn get(&self, name: &str) -> Option<Variable> {
        self.vars.get_full(name).map(|(slot, _, &ty)| Variable {
            scope: Scope::Local,
            slot: slot as u32,
            ty,
        })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
