use std::fmt::Display;

use datapath_netlist::{ComponentId, Operand, PinCursor, Source};

use crate::Warning;

/// A storage cell declaration, `reg[0:bits-1] name_id;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decl {
    pub id: ComponentId,
    pub bits: u32,
}

/// A memory array declaration; `depth` is the highest addressable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemoryDecl {
    pub id: ComponentId,
    pub bits: u32,
    pub depth: u64,
}

/// Text and declarations accumulated by the emission passes of one translation.
///
/// Every region only ever grows; the assembler stitches them together at the end.
#[derive(Debug)]
pub(crate) struct EmitterContext {
    pub always: String,
    pub clocked: String,
    pub assignments: String,
    pub comments: String,
    pub storage: Vec<Decl>,
    pub staging: Vec<Decl>,
    pub memories: Vec<MemoryDecl>,
    pub input_pins: PinCursor,
    pub output_pins: PinCursor,
    pub warnings: Vec<Warning>,
}

impl EmitterContext {
    pub fn new() -> Self {
        EmitterContext {
            always: String::new(),
            clocked: String::new(),
            assignments: String::new(),
            comments: String::new(),
            storage: Vec::new(),
            staging: Vec::new(),
            memories: Vec::new(),
            input_pins: PinCursor::inputs(),
            output_pins: PinCursor::outputs(),
            warnings: Vec::new(),
        }
    }

    pub fn declare(&mut self, id: ComponentId, bits: u32) {
        self.storage.push(Decl { id, bits });
    }

    pub fn declare_staging(&mut self, id: ComponentId, bits: u32) {
        self.staging.push(Decl { id, bits });
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Renders a dereferenced bus as the masked storage cell it reads, e.g. `(table_4&255) `.
pub(crate) struct Deref(pub Operand);

impl Display for Deref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.source {
            Source::Storage(id) => write!(f, "(table_{id}&{mask}) ", mask = self.0.mask),
            Source::Unconnected => write!(f, "0 "),
        }
    }
}

pub(crate) fn join(operands: &[Operand], separator: &str) -> String {
    operands.iter().map(|&operand| Deref(operand).to_string()).collect::<Vec<_>>().join(separator)
}
