use datapath_netlist::Netlist;

use crate::context::EmitterContext;

/// Gives every bus that extracts bits from a splitter its own storage cell and extraction statement.
pub(crate) fn emit_materialized(ctx: &mut EmitterContext, netlist: &Netlist<'_>) {
    for split in netlist.materialized() {
        let (bus, splitter) = (split.bus, split.splitter);
        let statement = match split.range {
            Some(range) => {
                format!("table_{bus}=(table_{splitter}>>{low})&{mask};\n", low = range.low, mask = range.mask())
            }
            None => format!("table_{bus}=table_{splitter} & {mask};\n", mask = split.mask),
        };
        ctx.always.push_str(&statement);
        ctx.declare(bus, split.bits);
    }
}
