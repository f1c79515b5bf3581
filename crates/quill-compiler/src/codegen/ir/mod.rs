//! Structured form of the textual IR.
//!
//! The generator builds a [`Module`] of items first; text is produced only
//! when the module is written out through [`IrWriter`]. Keeping instructions
//! structured lets optimizer passes inspect and rewrite them.

mod writer;

pub use writer::IrWriter;

use std::fmt;

use quill_core::Type;
use quill_parser::ast::BinaryOp;

/// Where a value lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Virtual register `%n`, numbered per function.
    Register(u32),
    /// Stack slot named after its local, `%name`.
    Slot(String),
    /// Module level symbol `@name`.
    Global(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Register(n) => write!(f, "%{n}"),
            Location::Slot(name) => write!(f, "%{name}"),
            Location::Global(name) => write!(f, "@{name}"),
        }
    }
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Location(Location),
    /// Integer constant, written without a width suffix.
    Immediate(i64),
}

impl From<Location> for Operand {
    fn from(location: Location) -> Self {
        Operand::Location(location)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Location(location) => location.fmt(f),
            Operand::Immediate(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Signed integer division.
    SDiv,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
        }
    }
}

impl From<BinaryOp> for BinOp {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => BinOp::Add,
            BinaryOp::Sub => BinOp::Sub,
            BinaryOp::Mul => BinOp::Mul,
            BinaryOp::Div => BinOp::SDiv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `dest = alloca ty`
    Alloca { dest: Location, ty: Type },
    /// `store ty value, ptr ptr`
    Store { ty: Type, value: Operand, ptr: Location },
    /// `dest = load ty, ptr ptr`
    Load { dest: Location, ty: Type, ptr: Location },
    /// `dest = op ty left, right`
    Binary {
        dest: Location,
        op: BinOp,
        ty: Type,
        left: Operand,
        right: Operand,
    },
    /// `[dest =] call ret @callee(ty arg, ...)`
    Call {
        dest: Option<Location>,
        ret: Type,
        callee: String,
        args: Vec<(Type, Operand)>,
    },
    /// `ret [ty value]`
    Ret { value: Option<(Type, Operand)> },
}

impl Instruction {
    /// The location this instruction defines, if any.
    pub fn dest(&self) -> Option<&Location> {
        match self {
            Instruction::Alloca { dest, .. }
            | Instruction::Load { dest, .. }
            | Instruction::Binary { dest, .. } => Some(dest),
            Instruction::Call { dest, .. } => dest.as_ref(),
            Instruction::Store { .. } | Instruction::Ret { .. } => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Ret { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { dest, ty } => write!(f, "{dest} = alloca {}", ty.ir_name()),
            Instruction::Store { ty, value, ptr } => {
                write!(f, "store {} {value}, ptr {ptr}", ty.ir_name())
            }
            Instruction::Load { dest, ty, ptr } => {
                write!(f, "{dest} = load {}, ptr {ptr}", ty.ir_name())
            }
            Instruction::Binary {
                dest,
                op,
                ty,
                left,
                right,
            } => write!(f, "{dest} = {} {} {left}, {right}", op.mnemonic(), ty.ir_name()),
            Instruction::Call {
                dest,
                ret,
                callee,
                args,
            } => {
                if let Some(dest) = dest {
                    write!(f, "{dest} = ")?;
                }
                write!(f, "call {} @{callee}(", ret.ir_name())?;
                for (i, (ty, arg)) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {arg}", ty.ir_name())?;
                }
                f.write_str(")")
            }
            Instruction::Ret { value: None } => f.write_str("ret"),
            Instruction::Ret {
                value: Some((ty, value)),
            } => write!(f, "ret {} {value}", ty.ir_name()),
        }
    }
}

/// Initial value of a global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalInit {
    Int(i64),
    /// Zero of the global's type, filled in by the module initializer.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub ty: Type,
    pub init: GlobalInit,
}

impl Global {
    fn init_text(&self) -> String {
        match (&self.init, &self.ty) {
            (GlobalInit::Int(value), _) => value.to_string(),
            (GlobalInit::Zero, Type::Int32) => "0".to_string(),
            (GlobalInit::Zero, Type::Pointer(_)) => "null".to_string(),
            (GlobalInit::Zero, _) => "zeroinitializer".to_string(),
        }
    }
}

/// An external function known only by its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub ret: Type,
    pub params: Vec<Type>,
}

/// A function with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub ret: Type,
    pub params: Vec<(Type, Location)>,
    pub body: Vec<Instruction>,
}

impl Function {
    pub fn new(name: impl Into<String>, ret: Type) -> Self {
        Self {
            name: name.into(),
            ret,
            params: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.body.push(instruction);
    }

    pub fn ends_with_terminator(&self) -> bool {
        self.body.last().is_some_and(Instruction::is_terminator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Global(Global),
    Declare(Declaration),
    Define(Function),
    /// Functions run before `main`, emitted as `@llvm.global_ctors`.
    Constructors(Vec<String>),
}

/// A whole translation unit, items in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Define(function) => Some(function),
            _ => None,
        })
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.items.iter_mut().filter_map(|item| match item {
            Item::Define(function) => Some(function),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions().find(|function| function.name == name)
    }

    pub fn instruction_count(&self) -> usize {
        self.functions().map(|function| function.body.len()).sum()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = IrWriter::new();
        writer.write_module(self);
        f.write_str(&writer.finish())
    }
}
