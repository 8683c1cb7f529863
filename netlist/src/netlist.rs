use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::builder::Builder;
use crate::resolve::resolve;
use crate::{Component, ComponentId, Datapath, Error, Materialized};

/// Where the value carried by a bus is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// The storage cell of a non-bus component, or of a materialized bus.
    Storage(ComponentId),
    /// A bus chain that is never driven reads as zero.
    Unconnected,
}

/// A dereferenced bus: the storage it reads and the mask for the bus width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operand {
    pub bus: ComponentId,
    pub source: Source,
    pub mask: u64,
}

/// A datapath with all pass-through wiring collapsed and all component inputs ordered.
#[derive(Debug, Clone)]
pub struct Netlist<'a> {
    datapath: &'a Datapath,
    sources: IndexMap<ComponentId, Source>,
    masks: BTreeMap<ComponentId, u64>,
    inputs: BTreeMap<ComponentId, Vec<ComponentId>>,
    materialized: Vec<Materialized>,
}

impl<'a> Netlist<'a> {
    pub fn build(datapath: &'a Datapath) -> Result<Netlist<'a>, Error> {
        let builder = Builder::new(datapath).run()?;
        let sources = resolve(&builder.aliases)?;
        let inputs = builder.inputs();
        Ok(Netlist { datapath, sources, masks: builder.masks, inputs, materialized: builder.materialized })
    }

    pub fn datapath(&self) -> &'a Datapath {
        self.datapath
    }

    /// Buses that extract a bit range from a splitter, in bus processing order.
    pub fn materialized(&self) -> &[Materialized] {
        &self.materialized
    }

    /// Resolved aliases, keyed by bus; materialized buses are not aliases and do not appear here.
    pub fn sources(&self) -> impl Iterator<Item = (ComponentId, Source)> + '_ {
        self.sources.iter().map(|(&bus, &source)| (bus, source))
    }

    pub fn mask(&self, bus: ComponentId) -> Option<u64> {
        self.masks.get(&bus).copied()
    }

    /// Buses feeding `id`, ordered left to right.
    pub fn inputs(&self, id: ComponentId) -> &[ComponentId] {
        self.inputs.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dereferences the bus that `referrer` names in `field`.
    pub fn operand(&self, referrer: ComponentId, field: &'static str, bus: ComponentId) -> Result<Operand, Error> {
        let component = self.datapath.lookup(referrer, field, bus)?;
        let Some(&mask) = self.masks.get(&bus) else {
            return Err(Error::NotABus { id: referrer, field, target: component.id });
        };
        let source = self.sources.get(&bus).copied().unwrap_or(Source::Storage(bus));
        if let Source::Storage(driver) = source {
            if !self.datapath.get(driver).is_some_and(Component::has_storage) {
                return Err(Error::NoStorage { id: referrer, bus, driver });
            }
        }
        Ok(Operand { bus, source, mask })
    }

    pub fn input(&self, component: &Component, index: usize) -> Result<Operand, Error> {
        let Some(&bus) = self.inputs(component.id).get(index) else {
            return Err(Error::MissingInput { id: component.id, index });
        };
        self.operand(component.id, "input", bus)
    }

    pub fn all_inputs(&self, component: &Component) -> Result<Vec<Operand>, Error> {
        let count = self.inputs(component.id).len();
        if count == 0 {
            return Err(Error::MissingInput { id: component.id, index: 0 });
        }
        (0..count).map(|index| self.input(component, index)).collect()
    }

    /// Dereferences the `address` bus of a component that requires one.
    pub fn address(&self, component: &Component) -> Result<Operand, Error> {
        let bus = component.address.ok_or(Error::MissingField { id: component.id, field: "address" })?;
        self.operand(component.id, "address", bus)
    }

    pub fn enable(&self, component: &Component) -> Result<Option<Operand>, Error> {
        component.enable.map(|bus| self.operand(component.id, "enable", bus)).transpose()
    }
}
