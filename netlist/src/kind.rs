use std::fmt::Display;

/// Bitwise and arithmetic operators that fold over all ordered inputs of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
}

impl FoldOp {
    pub fn operator(self) -> &'static str {
        match self {
            FoldOp::And | FoldOp::Nand => "&",
            FoldOp::Or | FoldOp::Nor => "|",
            FoldOp::Xor => "^",
        }
    }

    pub fn is_inverted(self) -> bool {
        matches!(self, FoldOp::Nand | FoldOp::Nor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    LessThan,
    EqualTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Left,
    Right,
}

/// The kind of a schematic element, taken from the tag of its record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Bus,
    Adder,
    Fold(FoldOp),
    Not,
    Negate,
    Increment,
    Decrement,
    Compare(CompareOp),
    Shift(ShiftOp),
    Joiner,
    Splitter,
    InputPin,
    OutputPin,
    Constant,
    Multiplexor,
    DataMultiplexor,
    Register,
    RegisterFile,
    Memory,
    LookupTable,
    /// A tag outside the supported set; kept so that the emitter can report it.
    Other(String),
}

impl Kind {
    pub fn from_tag(tag: &str) -> Kind {
        match tag {
            "bus" => Kind::Bus,
            "adder" | "combinational-adder" => Kind::Adder,
            "combinational-and" => Kind::Fold(FoldOp::And),
            "combinational-or" => Kind::Fold(FoldOp::Or),
            "combinational-xor" => Kind::Fold(FoldOp::Xor),
            "combinational-nand" => Kind::Fold(FoldOp::Nand),
            "combinational-nor" => Kind::Fold(FoldOp::Nor),
            "combinational-not" => Kind::Not,
            "combinational-negate" => Kind::Negate,
            "combinational-increment" => Kind::Increment,
            "combinational-decrement" => Kind::Decrement,
            "combinational-less-than" => Kind::Compare(CompareOp::LessThan),
            "combinational-equal-to" => Kind::Compare(CompareOp::EqualTo),
            "combinational-shift-left" => Kind::Shift(ShiftOp::Left),
            "combinational-shift-right" => Kind::Shift(ShiftOp::Right),
            "joiner" => Kind::Joiner,
            "splitter" => Kind::Splitter,
            "input pin" => Kind::InputPin,
            "output pin" => Kind::OutputPin,
            "constant" => Kind::Constant,
            "multiplexor" => Kind::Multiplexor,
            "data_multiplexor" => Kind::DataMultiplexor,
            "register" => Kind::Register,
            "register file" => Kind::RegisterFile,
            "memory" => Kind::Memory,
            "lookup table" => Kind::LookupTable,
            other => Kind::Other(other.to_owned()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Kind::Bus => "bus",
            Kind::Adder => "adder",
            Kind::Fold(FoldOp::And) => "combinational-and",
            Kind::Fold(FoldOp::Or) => "combinational-or",
            Kind::Fold(FoldOp::Xor) => "combinational-xor",
            Kind::Fold(FoldOp::Nand) => "combinational-nand",
            Kind::Fold(FoldOp::Nor) => "combinational-nor",
            Kind::Not => "combinational-not",
            Kind::Negate => "combinational-negate",
            Kind::Increment => "combinational-increment",
            Kind::Decrement => "combinational-decrement",
            Kind::Compare(CompareOp::LessThan) => "combinational-less-than",
            Kind::Compare(CompareOp::EqualTo) => "combinational-equal-to",
            Kind::Shift(ShiftOp::Left) => "combinational-shift-left",
            Kind::Shift(ShiftOp::Right) => "combinational-shift-right",
            Kind::Joiner => "joiner",
            Kind::Splitter => "splitter",
            Kind::InputPin => "input pin",
            Kind::OutputPin => "output pin",
            Kind::Constant => "constant",
            Kind::Multiplexor => "multiplexor",
            Kind::DataMultiplexor => "data_multiplexor",
            Kind::Register => "register",
            Kind::RegisterFile => "register file",
            Kind::Memory => "memory",
            Kind::LookupTable => "lookup table",
            Kind::Other(tag) => tag,
        }
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, Kind::Bus)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
