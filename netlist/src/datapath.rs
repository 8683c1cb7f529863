use std::collections::BTreeMap;
use std::str::FromStr;

use crate::{Component, ComponentId, Error, parse};

/// An immutable collection of components, addressed by identifier.
///
/// Iteration is always in ascending identifier order, which every pass relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datapath {
    components: BTreeMap<ComponentId, Component>,
}

impl Datapath {
    pub fn new() -> Datapath {
        Datapath::default()
    }

    pub fn parse(text: &str) -> Result<Datapath, Error> {
        let mut datapath = Datapath::new();
        for record in parse(text)? {
            datapath.add(Component::from_record(&record)?)?;
        }
        tracing::debug!(components = datapath.len(), highest = ?datapath.highest_id(), "parsed datapath");
        Ok(datapath)
    }

    pub fn add(&mut self, component: Component) -> Result<(), Error> {
        let id = component.id;
        if self.components.insert(id, component).is_some() {
            return Err(Error::DuplicateId(id));
        }
        Ok(())
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Looks up the component `referrer` names in `field`.
    pub fn lookup(&self, referrer: ComponentId, field: &'static str, target: ComponentId) -> Result<&Component, Error> {
        self.get(target).ok_or(Error::UnknownComponent { id: referrer, field, target })
    }

    pub fn highest_id(&self) -> Option<ComponentId> {
        self.components.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> + '_ {
        self.components.values()
    }

    pub fn buses(&self) -> impl Iterator<Item = &Component> + '_ {
        self.iter().filter(|component| component.kind.is_bus())
    }

    pub fn devices(&self) -> impl Iterator<Item = &Component> + '_ {
        self.iter().filter(|component| !component.kind.is_bus())
    }
}

impl FromStr for Datapath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Datapath::parse(s)
    }
}
