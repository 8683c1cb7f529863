use datapath_netlist::{Error, Kind, Netlist};

use crate::context::{Deref, EmitterContext, MemoryDecl};

/// Emits the edge-triggered latch of every register and the write port of every memory.
pub(crate) fn emit_clocked(ctx: &mut EmitterContext, netlist: &Netlist<'_>) -> Result<(), Error> {
    let _span = tracing::debug_span!("clock pass").entered();
    for component in netlist.datapath().devices() {
        let id = component.id;
        match component.kind {
            Kind::Register => {
                if let Some(enable) = netlist.enable(component)? {
                    ctx.clocked.push_str(&format!("if({}!=0) ", Deref(enable)));
                }
                ctx.clocked.push_str(&format!("table_{id}=registerInput_{id};\n"));
            }
            Kind::RegisterFile | Kind::Memory => {
                let address = netlist.address(component)?;
                ctx.clocked.push_str(&format!("memory_{id}[{}]=registerInput_{id};\n", Deref(address)));
                ctx.memories.push(MemoryDecl { id, bits: component.bits, depth: address.mask });
            }
            _ => (),
        }
    }
    Ok(())
}
