//! The closed MSC opcode table.
//!
//! Every opcode has a fixed-width, big-endian parameter block. The table below
//! drives encoding, decoding, stack-effect accounting and disassembly.

/// Width of a single encoded parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    U8,
    U16,
    U32,
}

impl Param {
    pub const fn size(self) -> usize {
        match self {
            Param::U8 => 1,
            Param::U16 => 2,
            Param::U32 => 4,
        }
    }

    /// Mask applied to a value before it is written at this width.
    pub const fn mask(self) -> u32 {
        match self {
            Param::U8 => 0xFF,
            Param::U16 => 0xFFFF,
            Param::U32 => 0xFFFF_FFFF,
        }
    }
}

/// How many operand-stack values an opcode consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pops {
    Fixed(i32),
    /// The first parameter is the argument count.
    Argc,
    /// Argument count plus the callee address pushed last.
    ArgcAndCallee,
}

const NO_PARAMS: &[Param] = &[];
const B: &[Param] = &[Param::U8];
const H: &[Param] = &[Param::U16];
const I: &[Param] = &[Param::U32];
const BB: &[Param] = &[Param::U8, Param::U8];
const BH: &[Param] = &[Param::U8, Param::U16];
const HH: &[Param] = &[Param::U16, Param::U16];

/// Bit set in the opcode byte when the instruction's result is consumed.
pub const PUSH_BIT: u8 = 0x80;

macro_rules! opcodes {
    ($($variant:ident = $id:literal, $mnemonic:literal, $params:expr, $pops:expr;)*) => {
        /// MSC instruction opcode (low 7 bits of the opcode byte).
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant = $id,)*
        }

        impl Opcode {
            /// All known opcodes in id order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            pub fn from_u8(v: u8) -> Option<Self> {
                match v {
                    $($id => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$variant => $mnemonic,)*
                }
            }

            /// Parameter layout, in encoding order.
            pub fn params(self) -> &'static [Param] {
                match self {
                    $(Self::$variant => $params,)*
                }
            }

            fn pops_rule(self) -> Pops {
                match self {
                    $(Self::$variant => $pops,)*
                }
            }
        }
    };
}

opcodes! {
    Nop = 0x00, "nop", NO_PARAMS, Pops::Fixed(0);
    Begin = 0x02, "begin", HH, Pops::Fixed(0);
    End = 0x03, "end", NO_PARAMS, Pops::Fixed(0);
    Jump = 0x04, "jump", I, Pops::Fixed(0);
    Jump5 = 0x05, "jump5", I, Pops::Fixed(0);
    Return6 = 0x06, "return_6", NO_PARAMS, Pops::Fixed(1);
    Return7 = 0x07, "return_7", NO_PARAMS, Pops::Fixed(0);
    Return8 = 0x08, "return_8", NO_PARAMS, Pops::Fixed(1);
    Return9 = 0x09, "return_9", NO_PARAMS, Pops::Fixed(0);
    PushInt = 0x0A, "pushInt", I, Pops::Fixed(0);
    PushVar = 0x0B, "pushVar", BH, Pops::Fixed(0);
    ErrorC = 0x0C, "error_C", NO_PARAMS, Pops::Fixed(0);
    PushShort = 0x0D, "pushShort", H, Pops::Fixed(0);
    AddI = 0x0E, "addi", NO_PARAMS, Pops::Fixed(2);
    SubI = 0x0F, "subi", NO_PARAMS, Pops::Fixed(2);
    MultI = 0x10, "multi", NO_PARAMS, Pops::Fixed(2);
    DivI = 0x11, "divi", NO_PARAMS, Pops::Fixed(2);
    ModI = 0x12, "modi", NO_PARAMS, Pops::Fixed(2);
    NegI = 0x13, "negi", NO_PARAMS, Pops::Fixed(1);
    IncI = 0x14, "i++", BH, Pops::Fixed(0);
    DecI = 0x15, "i--", BH, Pops::Fixed(0);
    BitAnd = 0x16, "bitAnd", NO_PARAMS, Pops::Fixed(2);
    BitOr = 0x17, "bitOr", NO_PARAMS, Pops::Fixed(2);
    BitNot = 0x18, "bitNot", NO_PARAMS, Pops::Fixed(1);
    BitXor = 0x19, "bitXor", NO_PARAMS, Pops::Fixed(2);
    LeftShift = 0x1A, "leftShift", NO_PARAMS, Pops::Fixed(2);
    RightShift = 0x1B, "rightShift", NO_PARAMS, Pops::Fixed(2);
    SetVar = 0x1C, "setVar", BH, Pops::Fixed(1);
    AddAssignI = 0x1D, "i+=", BH, Pops::Fixed(1);
    SubAssignI = 0x1E, "i-=", BH, Pops::Fixed(1);
    MultAssignI = 0x1F, "i*=", BH, Pops::Fixed(1);
    DivAssignI = 0x20, "i/=", BH, Pops::Fixed(1);
    ModAssignI = 0x21, "i%=", BH, Pops::Fixed(1);
    AndAssignI = 0x22, "i&=", BH, Pops::Fixed(1);
    OrAssignI = 0x23, "i|=", BH, Pops::Fixed(1);
    XorAssignI = 0x24, "i^=", BH, Pops::Fixed(1);
    Equals = 0x25, "equals", NO_PARAMS, Pops::Fixed(2);
    NotEquals = 0x26, "notEquals", NO_PARAMS, Pops::Fixed(2);
    LessThan = 0x27, "lessThan", NO_PARAMS, Pops::Fixed(2);
    LessOrEqual = 0x28, "lessOrEqual", NO_PARAMS, Pops::Fixed(2);
    Greater = 0x29, "greater", NO_PARAMS, Pops::Fixed(2);
    GreaterOrEqual = 0x2A, "greaterOrEqual", NO_PARAMS, Pops::Fixed(2);
    Not = 0x2B, "not", NO_PARAMS, Pops::Fixed(1);
    Printf = 0x2C, "printf", B, Pops::Argc;
    Sys = 0x2D, "sys", BB, Pops::Argc;
    Try = 0x2E, "try", I, Pops::Fixed(0);
    CallFunc = 0x2F, "callFunc", B, Pops::ArgcAndCallee;
    CallFunc2 = 0x30, "callFunc2", B, Pops::ArgcAndCallee;
    CallFunc3 = 0x31, "callFunc3", B, Pops::ArgcAndCallee;
    Push = 0x32, "push", NO_PARAMS, Pops::Fixed(-1);
    Pop = 0x33, "pop", NO_PARAMS, Pops::Fixed(1);
    If = 0x34, "if", I, Pops::Fixed(1);
    IfNot = 0x35, "ifNot", I, Pops::Fixed(1);
    Else = 0x36, "else", I, Pops::Fixed(0);
    Error37 = 0x37, "error_37", NO_PARAMS, Pops::Fixed(0);
    IntToFloat = 0x38, "intToFloat", B, Pops::Fixed(0);
    FloatToInt = 0x39, "floatToInt", B, Pops::Fixed(0);
    AddF = 0x3A, "addf", NO_PARAMS, Pops::Fixed(2);
    SubF = 0x3B, "subf", NO_PARAMS, Pops::Fixed(2);
    MultF = 0x3C, "multf", NO_PARAMS, Pops::Fixed(2);
    DivF = 0x3D, "divf", NO_PARAMS, Pops::Fixed(2);
    NegF = 0x3E, "negf", NO_PARAMS, Pops::Fixed(1);
    IncF = 0x3F, "f++", BH, Pops::Fixed(0);
    DecF = 0x40, "f--", BH, Pops::Fixed(0);
    FloatVarSet = 0x41, "floatVarSet", BH, Pops::Fixed(1);
    AddAssignF = 0x42, "float+=", BH, Pops::Fixed(1);
    SubAssignF = 0x43, "float-=", BH, Pops::Fixed(1);
    MultAssignF = 0x44, "float*=", BH, Pops::Fixed(1);
    DivAssignF = 0x45, "float/=", BH, Pops::Fixed(1);
    FloatEqual = 0x46, "floatEqual", NO_PARAMS, Pops::Fixed(2);
    FloatNotEqual = 0x47, "floatNotEqual", NO_PARAMS, Pops::Fixed(2);
    FloatLess = 0x48, "floatLess", NO_PARAMS, Pops::Fixed(2);
    FloatLessOrEqual = 0x49, "floatLessOrEqual", NO_PARAMS, Pops::Fixed(2);
    FloatGreater = 0x4A, "floatGreater", NO_PARAMS, Pops::Fixed(2);
    FloatGreaterOrEqual = 0x4B, "floatGreaterOrEqual", NO_PARAMS, Pops::Fixed(2);
    Error4C = 0x4C, "error_4C", NO_PARAMS, Pops::Fixed(0);
    Exit = 0x4D, "exit", NO_PARAMS, Pops::Fixed(0);
}

impl Opcode {
    /// Look up an opcode by mnemonic, accepting the historical aliases.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        match name {
            "jump4" => Some(Opcode::Jump),
            "notEqual" => Some(Opcode::NotEquals),
            _ => Opcode::ALL.iter().copied().find(|op| op.mnemonic() == name),
        }
    }

    /// Size of the parameter block in bytes.
    pub fn param_size(self) -> usize {
        self.params().iter().map(|p| p.size()).sum()
    }

    /// Encoded size in bytes, opcode byte included.
    pub fn size(self) -> usize {
        1 + self.param_size()
    }

    /// Values consumed from the operand stack, given the instruction's parameters.
    ///
    /// `push` reports -1: it produces a value without consuming one.
    pub fn pops(self, params: &[u32]) -> i32 {
        let argc = || params.first().copied().unwrap_or(0) as i32;
        match self.pops_rule() {
            Pops::Fixed(n) => n,
            Pops::Argc => argc(),
            Pops::ArgcAndCallee => argc() + 1,
        }
    }

    /// Whether the opcode produces a float value.
    pub fn produces_float(self) -> bool {
        matches!(self as u8, 0x38 | 0x3A..=0x45)
    }

    /// Comparison with the opposite truth value.
    pub fn opposite(self) -> Option<Self> {
        match self {
            Opcode::Equals => Some(Opcode::NotEquals),
            Opcode::NotEquals => Some(Opcode::Equals),
            Opcode::LessThan => Some(Opcode::GreaterOrEqual),
            Opcode::GreaterOrEqual => Some(Opcode::LessThan),
            Opcode::LessOrEqual => Some(Opcode::Greater),
            Opcode::Greater => Some(Opcode::LessOrEqual),
            _ => None,
        }
    }

    /// Control transfers whose first parameter is an absolute code offset.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Opcode::Jump
                | Opcode::Jump5
                | Opcode::Try
                | Opcode::If
                | Opcode::IfNot
                | Opcode::Else
        )
    }

    /// Instructions that leave the current script.
    pub fn is_return(self) -> bool {
        matches!(
            self,
            Opcode::Return6 | Opcode::Return7 | Opcode::Return8 | Opcode::Return9
        )
    }

    /// Bitwise operators never take part in int/float promotion.
    pub fn is_bitwise(self) -> bool {
        matches!(self as u8, 0x16..=0x1B)
    }
}
