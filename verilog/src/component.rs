use datapath_netlist::{CompareOp, Component, Error, Kind, Netlist, ShiftOp, WORD_MASK};

use crate::Warning;
use crate::context::{Deref, EmitterContext, join};

/// Emits the combinational update of one non-bus component.
///
/// Components that hold a value also get a storage declaration; output pins only contribute
/// continuous assignments.
pub(crate) fn emit_component(
    ctx: &mut EmitterContext,
    netlist: &Netlist<'_>,
    component: &Component,
) -> Result<(), Error> {
    let id = component.id;
    let word = format!("'h{WORD_MASK:x}");
    let statement = match &component.kind {
        Kind::Bus => return Ok(()),
        Kind::Adder => {
            let sum = join(&netlist.all_inputs(component)?, " + ");
            format!("table_{id}={word}&({sum});\n")
        }
        Kind::Fold(op) => {
            let folded = join(&netlist.all_inputs(component)?, &format!(" {} ", op.operator()));
            let invert = if op.is_inverted() { "~" } else { "" };
            format!("table_{id}={invert}({folded});\n")
        }
        Kind::Not => format!("table_{id}=~{};\n", Deref(netlist.input(component, 0)?)),
        Kind::Negate => format!("table_{id}=-{};\n", Deref(netlist.input(component, 0)?)),
        Kind::Increment => format!("table_{id}=({}+1)&{word};\n", Deref(netlist.input(component, 0)?)),
        Kind::Decrement => format!("table_{id}=({}-1)&{word};\n", Deref(netlist.input(component, 0)?)),
        Kind::Compare(op) => {
            let operator = match op {
                CompareOp::LessThan => "<",
                CompareOp::EqualTo => "==",
            };
            let (a, b) = (netlist.input(component, 0)?, netlist.input(component, 1)?);
            format!("table_{id}={} {operator} {}? 1:0;\n", Deref(a), Deref(b))
        }
        Kind::Shift(op) => {
            let operator = match op {
                ShiftOp::Left => "<<",
                ShiftOp::Right => ">>",
            };
            let value = Deref(netlist.input(component, 0)?);
            if netlist.inputs(id).len() == 2 {
                format!("table_{id}={value} {operator} {};\n", Deref(netlist.input(component, 1)?))
            } else {
                format!("table_{id}={value} {operator} 1;\n")
            }
        }
        Kind::Joiner => {
            // the last input lands in the least significant bits
            let mut fields = Vec::new();
            let mut shift = 0;
            for operand in netlist.all_inputs(component)?.into_iter().rev() {
                fields.push(format!("({}<<{shift})", Deref(operand)));
                shift += operand.mask.count_ones();
            }
            format!("table_{id}=({});\n", fields.join(" | "))
        }
        Kind::Splitter => format!("table_{id}={};\n", Deref(netlist.input(component, 0)?)),
        Kind::InputPin => {
            let name = &component.name;
            ctx.comments.push_str(&format!("//Switch {} is connected to input pin {name}\n", ctx.input_pins.next()));
            let lines = ctx.input_pins.take(id, component.bits)?;
            let bits = lines.enumerate().map(|(bit, line)| format!("(DPSwitch[{line}]<<{bit})")).collect::<Vec<_>>();
            if bits.is_empty() {
                format!("table_{id}=0;\n")
            } else {
                format!("table_{id}={};\n", bits.join("|"))
            }
        }
        Kind::OutputPin => {
            let name = &component.name;
            ctx.comments.push_str(&format!("//LED {} is connected to output pin {name}\n", ctx.output_pins.next()));
            let lines = ctx.output_pins.take(id, component.bits)?;
            if !lines.is_empty() {
                let value = Deref(netlist.input(component, 0)?);
                for (bit, line) in lines.enumerate() {
                    ctx.assignments.push_str(&format!("assign LED[{line}]=(({value}>>{bit})&1)==0? 0:1;\n"));
                }
            }
            return Ok(());
        }
        Kind::Constant => {
            let value = component.constant.ok_or(Error::MissingField { id, field: "name" })?;
            format!("table_{id}='h{value:x};\n")
        }
        Kind::Multiplexor if component.address.is_none() => {
            ctx.warn(Warning::UnhandledDevice { id, kind: component.kind.to_string() });
            return Ok(());
        }
        Kind::Multiplexor | Kind::DataMultiplexor => {
            let select = Deref(netlist.address(component)?);
            let mut statement = String::new();
            for index in 0..netlist.inputs(id).len() {
                let input = Deref(netlist.input(component, index)?);
                statement.push_str(&format!("if ({select}=={index}) table_{id}={input};\n"));
            }
            statement
        }
        Kind::Register => {
            ctx.declare_staging(id, component.bits);
            format!("registerInput_{id}={};\n", Deref(netlist.input(component, 0)?))
        }
        Kind::RegisterFile | Kind::Memory => {
            ctx.declare_staging(id, component.bits);
            let input = Deref(netlist.input(component, 0)?);
            let address = Deref(netlist.address(component)?);
            format!("registerInput_{id}={input};\ntable_{id}=memory_{id}[{address}];\n")
        }
        Kind::LookupTable => {
            let address = netlist.address(component)?;
            let mut statement = format!("case({}) \n", Deref(address));
            for (index, value) in component.values.range(..=address.mask) {
                statement.push_str(&format!("{index}: table_{id} = 'h{value:x}; \n"));
            }
            statement.push_str(&format!("default: table_{id}=0; endcase\n"));
            statement
        }
        Kind::Other(kind) => {
            ctx.warn(Warning::UnhandledDevice { id, kind: kind.clone() });
            return Ok(());
        }
    };
    ctx.always.push_str(&statement);
    ctx.declare(id, component.bits);
    Ok(())
}
