use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{BitRange, Component, ComponentId, Datapath, Error, Kind};

/// A bus that extracts a bit range from a splitter and therefore owns its own storage cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materialized {
    pub bus: ComponentId,
    pub splitter: ComponentId,
    /// The range the splitter declares for this bus; without one the splitter value passes through.
    pub range: Option<BitRange>,
    pub bits: u32,
    pub mask: u64,
}

impl Materialized {
    pub fn extract(&self, value: u64) -> u64 {
        match self.range {
            Some(range) => range.extract(value),
            None => value & self.mask,
        }
    }
}

/// Walks every bus in ascending identifier order and records how it is driven and whom it feeds.
pub(crate) struct Builder<'a> {
    datapath: &'a Datapath,
    /// Bus to the component named by its entry; `None` for a bus with no entry.
    pub(crate) aliases: IndexMap<ComponentId, Option<ComponentId>>,
    pub(crate) masks: BTreeMap<ComponentId, u64>,
    pub(crate) materialized: Vec<Materialized>,
    inputs: BTreeMap<ComponentId, Vec<(i64, ComponentId)>>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(datapath: &'a Datapath) -> Self {
        Builder {
            datapath,
            aliases: IndexMap::new(),
            masks: BTreeMap::new(),
            materialized: Vec::new(),
            inputs: BTreeMap::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Self, Error> {
        let _span = tracing::debug_span!("bus pass").entered();
        for bus in self.datapath.buses() {
            self.add_bus(bus)?;
        }
        tracing::debug!(aliases = self.aliases.len(), materialized = self.materialized.len(), "buses collected");
        Ok(self)
    }

    fn add_bus(&mut self, bus: &Component) -> Result<(), Error> {
        let mask = bus.mask();
        match bus.entry {
            Some(entry) => {
                let driver = self.datapath.lookup(bus.id, "entry", entry)?;
                if driver.kind == Kind::Splitter {
                    let range = driver.lines.get(&bus.id).copied();
                    tracing::trace!(bus = %bus.id, splitter = %entry, ?range, "materialized splitter bus");
                    self.materialized.push(Materialized { bus: bus.id, splitter: entry, range, bits: bus.bits, mask });
                } else {
                    self.aliases.insert(bus.id, Some(entry));
                }
            }
            None => {
                self.aliases.insert(bus.id, None);
            }
        }
        self.masks.insert(bus.id, mask);

        if let Some(exit) = bus.exit {
            self.datapath.lookup(bus.id, "exit", exit)?;
            let (x, x2) = match (bus.x_coordinate, bus.x_coordinate2) {
                (Some(x), Some(x2)) => (x, x2),
                (None, _) => return Err(Error::MissingField { id: bus.id, field: "xcoordinate" }),
                (_, None) => return Err(Error::MissingField { id: bus.id, field: "xcoordinate2" }),
            };
            if x == x2 {
                let inputs = self.inputs.entry(exit).or_default();
                let position = inputs.iter().position(|&(other, _)| x < other).unwrap_or(inputs.len());
                inputs.insert(position, (x, bus.id));
            } else {
                tracing::trace!(bus = %bus.id, %exit, "bent connector is not an input");
            }
        }
        Ok(())
    }

    pub(crate) fn inputs(&self) -> BTreeMap<ComponentId, Vec<ComponentId>> {
        self.inputs
            .iter()
            .map(|(&dest, inputs)| (dest, inputs.iter().map(|&(_, bus)| bus).collect()))
            .collect()
    }
}
