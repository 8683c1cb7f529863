use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::{Error, Kind, Record};

/// Identifier of a component, as assigned by the drawing.
///
/// Identifiers are positive; the number 0 means "no connection" wherever an identifier is expected
/// and is never a valid component.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ComponentId(u32);

impl ComponentId {
    pub fn new(index: u32) -> Option<ComponentId> {
        if index == 0 { None } else { Some(ComponentId(index)) }
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns `2^bits - 1`, saturating at all ones.
pub fn width_mask(bits: u32) -> u64 {
    if bits >= u64::BITS { u64::MAX } else { (1 << bits) - 1 }
}

/// An inclusive `high:low` bit range, as declared by a splitter line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BitRange {
    pub high: u32,
    pub low: u32,
}

impl BitRange {
    pub fn width(self) -> u32 {
        self.high - self.low + 1
    }

    pub fn mask(self) -> u64 {
        width_mask(self.width())
    }

    pub fn extract(self, value: u64) -> u64 {
        value.checked_shr(self.low).unwrap_or(0) & self.mask()
    }
}

impl FromStr for BitRange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (high, low) = s.split_once(':').ok_or(())?;
        let high: u32 = high.trim().parse().map_err(|_| ())?;
        let low: u32 = low.trim().parse().map_err(|_| ())?;
        if high < low || high >= u64::BITS {
            return Err(());
        }
        Ok(BitRange { high, low })
    }
}

impl Display for BitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.high, self.low)
    }
}

/// One schematic element with its fields decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: ComponentId,
    pub kind: Kind,
    pub bits: u32,
    pub name: String,
    /// Bus selecting a multiplexor input, memory word or lookup table entry.
    pub address: Option<ComponentId>,
    /// Bus gating the clocked update of a register.
    pub enable: Option<ComponentId>,
    pub entry: Option<ComponentId>,
    pub exit: Option<ComponentId>,
    pub x_coordinate: Option<i64>,
    pub x_coordinate2: Option<i64>,
    /// Splitter only: bit range routed onto each driven bus.
    pub lines: BTreeMap<ComponentId, BitRange>,
    /// Lookup table only: contents by index.
    pub values: BTreeMap<u64, u64>,
    /// Constant only: the value parsed from the name.
    pub constant: Option<u64>,
}

impl Component {
    pub fn new(id: ComponentId, kind: Kind) -> Component {
        Component {
            id,
            kind,
            bits: 0,
            name: String::new(),
            address: None,
            enable: None,
            entry: None,
            exit: None,
            x_coordinate: None,
            x_coordinate2: None,
            lines: BTreeMap::new(),
            values: BTreeMap::new(),
            constant: None,
        }
    }

    pub fn from_record(record: &Record) -> Result<Component, Error> {
        let number = record.field("number").ok_or(Error::MissingNumber)?;
        let index: u32 = parse_literal(None, "number", number, |s| s.parse().ok())?;
        let id = ComponentId::new(index).ok_or(Error::ReservedId)?;
        let mut component = Component::new(id, Kind::from_tag(&record.tag));

        let decimal = |field: &str, value: &str| parse_literal(Some(id), field, value, |s| s.parse::<u32>().ok());
        let reference = |field: &str, value: &str| decimal(field, value).map(ComponentId::new);
        let coordinate = |field: &str, value: &str| parse_literal(Some(id), field, value, |s| s.parse::<i64>().ok());
        let hex = |field: &str, value: &str| parse_literal(Some(id), field, value, parse_hex);

        for field in &record.fields {
            let value = field.value.as_str();
            match field.name.as_str() {
                "number" => (),
                "bits" => component.bits = decimal("bits", value)?,
                "name" => component.name = value.to_owned(),
                "address" => component.address = reference("address", value)?,
                "enable" => component.enable = reference("enable", value)?,
                "entry" => component.entry = reference("entry", value)?,
                "exit" => component.exit = reference("exit", value)?,
                "xcoordinate" => component.x_coordinate = Some(coordinate("xcoordinate", value)?),
                "xcoordinate2" => component.x_coordinate2 = Some(coordinate("xcoordinate2", value)?),
                name => {
                    if let Some(bus) = name.strip_prefix("line ") {
                        let Some(bus) = reference(name, bus)? else { continue };
                        let range = parse_literal(Some(id), name, value, |s| s.parse::<BitRange>().ok())?;
                        component.lines.insert(bus, range);
                    } else if let Some(index) = name.strip_prefix("value ") {
                        let index = parse_literal(Some(id), name, index, |s| s.trim().parse::<u64>().ok())?;
                        component.values.insert(index, hex(name, value)?);
                    }
                }
            }
        }

        if component.kind == Kind::Constant {
            component.constant = Some(hex("name", &component.name)?);
        }
        Ok(component)
    }

    pub fn mask(&self) -> u64 {
        width_mask(self.bits)
    }

    /// Whether the component owns a `table_<id>` cell that buses can read.
    ///
    /// Output pins only drive LEDs, and unhandled devices (including a multiplexor with no select
    /// bus) emit nothing.
    pub fn has_storage(&self) -> bool {
        match self.kind {
            Kind::OutputPin | Kind::Other(_) => false,
            Kind::Multiplexor => self.address.is_some(),
            _ => true,
        }
    }
}

fn parse_hex(s: &str) -> Option<u64> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

fn parse_literal<T>(
    id: Option<ComponentId>,
    field: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, Error> {
    parse(value).ok_or_else(|| Error::MalformedLiteral { id, field: field.to_owned(), value: value.to_owned() })
}
