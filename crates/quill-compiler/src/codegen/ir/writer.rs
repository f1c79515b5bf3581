//! Text output for IR modules.

use std::fmt::Write;

use super::{Declaration, Function, Global, Item, Module};

/// Element type of `@llvm.global_ctors`: priority, function, associated data.
const CTOR_ENTRY: &str = "{ i32, ptr, ptr }";
const CTOR_PRIORITY: u32 = 65535;

/// Line oriented text writer that indents by brace depth, one tab per level.
#[derive(Debug, Default)]
pub struct IrWriter {
    out: String,
    depth: usize,
}

impl IrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Write `header {` and indent following lines.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn write_module(&mut self, module: &Module) {
        for item in &module.items {
            match item {
                Item::Global(global) => self.write_global(global),
                Item::Declare(decl) => self.write_declaration(decl),
                Item::Define(function) => self.write_function(function),
                Item::Constructors(functions) => self.write_constructors(functions),
            }
        }
    }

    pub fn write_global(&mut self, global: &Global) {
        self.line(format!("@{} = global {} {}", global.name, global.ty.ir_name(), global.init_text()));
    }

    pub fn write_declaration(&mut self, decl: &Declaration) {
        let params: Vec<&str> = decl.params.iter().map(|ty| ty.ir_name()).collect();
        self.line(format!("declare {} @{}({})", decl.ret.ir_name(), decl.name, params.join(", ")));
    }

    pub fn write_function(&mut self, function: &Function) {
        let mut header = format!("define {} @{}(", function.ret.ir_name(), function.name);
        for (i, (ty, location)) in function.params.iter().enumerate() {
            if i > 0 {
                header.push_str(", ");
            }
            let _ = write!(header, "{} {location}", ty.ir_name());
        }
        header.push(')');

        self.open(header);
        for instruction in &function.body {
            self.line(instruction.to_string());
        }
        self.close();
    }

    pub fn write_constructors(&mut self, functions: &[String]) {
        let entries: Vec<String> = functions
            .iter()
            .map(|name| format!("{CTOR_ENTRY} {{ i32 {CTOR_PRIORITY}, ptr @{name}, ptr null }}"))
            .collect();
        self.line(format!(
            "@llvm.global_ctors = appending global [{} x {CTOR_ENTRY}] [{}]",
            functions.len(),
            entries.join(", ")
        ));
    }

    pub fn finish(self) -> String {
        self.out
    }
}
