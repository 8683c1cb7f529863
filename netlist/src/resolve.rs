use indexmap::IndexMap;

use crate::{ComponentId, Error, Source};

/// Flattens bus aliases so that every bus maps straight to the component that ultimately drives it.
///
/// Each round replaces every alias that points at another aliased bus with that bus's alias, which
/// shortens the longest chain by at least one hop. A table that still changes after as many rounds
/// as it has entries contains a cycle.
pub(crate) fn resolve(
    aliases: &IndexMap<ComponentId, Option<ComponentId>>,
) -> Result<IndexMap<ComponentId, Source>, Error> {
    let _span = tracing::debug_span!("resolve", aliases = aliases.len()).entered();
    let mut table = aliases.clone();
    for round in 0..=table.len() {
        let mut changed = false;
        for index in 0..table.len() {
            let Some(target) = table[index] else { continue };
            if let Some(&next) = table.get(&target) {
                table[index] = next;
                changed = true;
            }
        }
        if !changed {
            tracing::debug!(rounds = round, "bus aliases converged");
            return Ok(table
                .into_iter()
                .map(|(bus, driver)| {
                    let source = match driver {
                        Some(driver) => Source::Storage(driver),
                        None => Source::Unconnected,
                    };
                    tracing::trace!(%bus, ?source, "resolved bus");
                    (bus, source)
                })
                .collect());
        }
    }

    let buses = table
        .iter()
        .filter(|(_, target)| target.is_some_and(|target| table.contains_key(&target)))
        .map(|(&bus, _)| bus)
        .collect();
    Err(Error::CyclicBusChain { buses })
}
