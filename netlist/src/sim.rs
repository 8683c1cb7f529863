//! A reference evaluator for built netlists.
//!
//! The simulator gives a datapath the same meaning as the module the Verilog backend emits for it:
//! the combinational statements run in emission order, every storage cell is truncated to its
//! declared width, and a clock edge latches staging cells and writes memories in ascending
//! identifier order.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::{
    CompareOp, Component, ComponentId, Error, FoldOp, Kind, Netlist, Operand, PinCursor, ShiftOp, Source, WORD_MASK,
    width_mask,
};

#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    netlist: &'a Netlist<'a>,
    switches: u8,
    input_lines: BTreeMap<ComponentId, Range<usize>>,
    output_lines: BTreeMap<ComponentId, Range<usize>>,
    storage: BTreeMap<ComponentId, u64>,
    staging: BTreeMap<ComponentId, u64>,
    memories: BTreeMap<ComponentId, BTreeMap<u64, u64>>,
}

impl<'a> Simulator<'a> {
    pub fn new(netlist: &'a Netlist<'a>) -> Result<Simulator<'a>, Error> {
        let mut inputs = PinCursor::inputs();
        let mut outputs = PinCursor::outputs();
        let mut input_lines = BTreeMap::new();
        let mut output_lines = BTreeMap::new();
        for component in netlist.datapath().devices() {
            match component.kind {
                Kind::InputPin => {
                    input_lines.insert(component.id, inputs.take(component.id, component.bits)?);
                }
                Kind::OutputPin => {
                    output_lines.insert(component.id, outputs.take(component.id, component.bits)?);
                }
                _ => (),
            }
        }
        Ok(Simulator {
            netlist,
            switches: 0,
            input_lines,
            output_lines,
            storage: BTreeMap::new(),
            staging: BTreeMap::new(),
            memories: BTreeMap::new(),
        })
    }

    pub fn set_switches(&mut self, switches: u8) {
        self.switches = switches;
    }

    /// Current contents of the storage cell of a component or materialized bus.
    pub fn value(&self, id: ComponentId) -> u64 {
        self.storage.get(&id).copied().unwrap_or(0)
    }

    pub fn memory(&self, id: ComponentId, index: u64) -> u64 {
        self.memories.get(&id).and_then(|words| words.get(&index)).copied().unwrap_or(0)
    }

    fn read(&self, operand: Operand) -> u64 {
        match operand.source {
            Source::Storage(id) => self.value(id) & operand.mask,
            Source::Unconnected => 0,
        }
    }

    fn store(&mut self, id: ComponentId, bits: u32, value: u64) {
        self.storage.insert(id, value & width_mask(bits));
    }

    fn input(&self, component: &Component, index: usize) -> Result<u64, Error> {
        Ok(self.read(self.netlist.input(component, index)?))
    }

    fn all_inputs(&self, component: &Component) -> Result<Vec<u64>, Error> {
        Ok(self.netlist.all_inputs(component)?.into_iter().map(|operand| self.read(operand)).collect())
    }

    fn evaluate(&mut self, component: &Component) -> Result<(), Error> {
        let result = match &component.kind {
            _ if !component.has_storage() => return Ok(()),
            Kind::Bus | Kind::OutputPin | Kind::Other(_) => return Ok(()),
            Kind::Adder => self.all_inputs(component)?.into_iter().fold(0u64, u64::wrapping_add) & WORD_MASK,
            &Kind::Fold(op) => {
                let values = self.all_inputs(component)?;
                let folded = values.into_iter().reduce(|a, b| match op {
                    FoldOp::And | FoldOp::Nand => a & b,
                    FoldOp::Or | FoldOp::Nor => a | b,
                    FoldOp::Xor => a ^ b,
                });
                let folded = folded.unwrap_or(0);
                if op.is_inverted() { !folded } else { folded }
            }
            Kind::Not => !self.input(component, 0)?,
            Kind::Negate => self.input(component, 0)?.wrapping_neg(),
            Kind::Increment => self.input(component, 0)?.wrapping_add(1) & WORD_MASK,
            Kind::Decrement => self.input(component, 0)?.wrapping_sub(1) & WORD_MASK,
            &Kind::Compare(op) => {
                let (a, b) = (self.input(component, 0)?, self.input(component, 1)?);
                let holds = match op {
                    CompareOp::LessThan => a < b,
                    CompareOp::EqualTo => a == b,
                };
                holds as u64
            }
            &Kind::Shift(op) => {
                let value = self.input(component, 0)?;
                let amount = match self.netlist.inputs(component.id).len() {
                    2 => self.input(component, 1)?,
                    _ => 1,
                };
                let amount = u32::try_from(amount).unwrap_or(u32::MAX);
                match op {
                    ShiftOp::Left => value.checked_shl(amount).unwrap_or(0),
                    ShiftOp::Right => value.checked_shr(amount).unwrap_or(0),
                }
            }
            Kind::Joiner => {
                let mut value = 0;
                let mut shift = 0u32;
                for operand in self.netlist.all_inputs(component)?.into_iter().rev() {
                    value |= self.read(operand).checked_shl(shift).unwrap_or(0);
                    shift += operand.mask.count_ones();
                }
                value
            }
            Kind::Splitter => self.input(component, 0)?,
            Kind::InputPin => {
                let lines = self.input_lines.get(&component.id).cloned().unwrap_or(0..0);
                lines.enumerate().fold(0, |value, (bit, line)| value | (((self.switches >> line) & 1) as u64) << bit)
            }
            Kind::Constant => component.constant.unwrap_or(0),
            Kind::Multiplexor | Kind::DataMultiplexor => {
                let select = self.read(self.netlist.address(component)?);
                let count = self.netlist.inputs(component.id).len();
                match usize::try_from(select).ok().filter(|&index| index < count) {
                    Some(index) => self.input(component, index)?,
                    None => self.value(component.id),
                }
            }
            Kind::Register => {
                let value = self.input(component, 0)?;
                self.staging.insert(component.id, value & width_mask(component.bits));
                return Ok(());
            }
            Kind::RegisterFile | Kind::Memory => {
                let value = self.input(component, 0)?;
                self.staging.insert(component.id, value & width_mask(component.bits));
                let address = self.read(self.netlist.address(component)?);
                self.memory(component.id, address)
            }
            Kind::LookupTable => {
                let address = self.read(self.netlist.address(component)?);
                component.values.get(&address).copied().unwrap_or(0)
            }
        };
        self.store(component.id, component.bits, result);
        Ok(())
    }

    fn step(&mut self) -> Result<(), Error> {
        let netlist = self.netlist;
        for split in netlist.materialized() {
            let value = split.extract(self.value(split.splitter));
            self.store(split.bus, split.bits, value);
        }
        for component in netlist.datapath().devices() {
            self.evaluate(component)?;
        }
        Ok(())
    }

    /// Re-evaluates the combinational logic until it stops changing.
    ///
    /// Returns `false` if the logic still changes after as many passes as there are components,
    /// which happens for combinational loops that oscillate.
    pub fn settle(&mut self) -> Result<bool, Error> {
        for _ in 0..=self.netlist.datapath().len() {
            let before = (self.storage.clone(), self.staging.clone());
            self.step()?;
            if before == (self.storage.clone(), self.staging.clone()) {
                return Ok(true);
            }
        }
        tracing::warn!("combinational logic did not settle");
        Ok(false)
    }

    /// Applies one rising clock edge, then settles the combinational logic again.
    pub fn clock(&mut self) -> Result<bool, Error> {
        let netlist = self.netlist;
        for component in netlist.datapath().devices() {
            match component.kind {
                Kind::Register => {
                    if let Some(enable) = netlist.enable(component)? {
                        if self.read(enable) == 0 {
                            continue;
                        }
                    }
                    let staged = self.staging.get(&component.id).copied().unwrap_or(0);
                    self.store(component.id, component.bits, staged);
                }
                Kind::RegisterFile | Kind::Memory => {
                    let address = self.read(netlist.address(component)?);
                    let staged = self.staging.get(&component.id).copied().unwrap_or(0);
                    self.memories.entry(component.id).or_default().insert(address, staged);
                }
                _ => (),
            }
        }
        self.settle()
    }

    /// The LED lines as a byte, line 0 in the least significant bit; unassigned lines read as zero.
    pub fn leds(&self) -> Result<u8, Error> {
        let mut leds = 0u8;
        for (&id, lines) in &self.output_lines {
            if lines.is_empty() {
                continue;
            }
            let Some(component) = self.netlist.datapath().get(id) else { continue };
            let value = self.input(component, 0)?;
            for (bit, line) in lines.clone().enumerate() {
                if (value >> bit) & 1 != 0 {
                    leds |= 1 << line;
                }
            }
        }
        Ok(leds)
    }
}
