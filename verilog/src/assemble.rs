use std::fmt::Write;

use datapath_netlist::{INPUT_LINES, OUTPUT_LINES};

use crate::Options;
use crate::context::EmitterContext;

/// Number of auxiliary switch lines; one of them is the clock.
const AUX_LINES: usize = 6;
/// Auxiliary switch line whose rising edge clocks registers and memories.
const CLOCK_LINE: usize = 3;

fn high_index(bits: u32) -> i64 {
    i64::from(bits) - 1
}

pub(crate) fn assemble(ctx: &EmitterContext, options: &Options) -> Result<String, std::fmt::Error> {
    let mut v = String::new();
    if let Some(header) = &options.header {
        write!(v, "{header}\n\n")?;
    }
    write!(v, "{}", ctx.comments)?;
    writeln!(
        v,
        "module {name}(input DPSwitch[0:{inputs}],Switch[0:{aux}], output LED[0:{outputs}]);",
        name = options.module_name,
        inputs = INPUT_LINES - 1,
        aux = AUX_LINES - 1,
        outputs = OUTPUT_LINES - 1,
    )?;
    for decl in &ctx.storage {
        write!(v, "reg[0:{}] table_{}; ", high_index(decl.bits), decl.id)?;
    }
    writeln!(v)?;
    for decl in &ctx.staging {
        write!(v, "reg[0:{}] registerInput_{}; ", high_index(decl.bits), decl.id)?;
    }
    writeln!(v)?;
    for decl in &ctx.memories {
        write!(v, "reg[0:{}] memory_{}[0:{}]; ", high_index(decl.bits), decl.id, decl.depth)?;
    }
    write!(v, "\n\n")?;

    write!(v, "always begin\n{}end\n", ctx.always)?;
    write!(v, "always @(posedge Switch[{CLOCK_LINE}]) begin\n{}end\n\n", ctx.clocked)?;

    write!(v, "{}", ctx.assignments)?;
    for line in ctx.output_pins.next()..OUTPUT_LINES {
        writeln!(v, "assign LED[{line}]=0;")?;
    }
    writeln!(v, "endmodule")?;
    Ok(v)
}
