//! Verilog backend for datapath drawings.
//!
//! The generated module talks to a fixed board: eight input switches (`DPSwitch`), six auxiliary
//! switches (`Switch`, of which line 3 is the clock) and eight LEDs. Every component owns a
//! `table_<id>` register updated by one level-sensitive block; registers and memories stage their
//! next value in `registerInput_<id>` and latch it in a single block triggered by the clock.

use std::fmt::Display;

use datapath_netlist::{ComponentId, Datapath, Netlist};

mod options;
mod context;
mod bus;
mod component;
mod clock;
mod assemble;

pub use options::Options;

use assemble::assemble;
use bus::emit_materialized;
use clock::emit_clocked;
use component::emit_component;
use context::EmitterContext;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Netlist(#[from] datapath_netlist::Error),
    #[error("cannot format module text")]
    Format(#[from] std::fmt::Error),
}

/// A problem that does not prevent translation, but leaves a gap in the generated hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnhandledDevice { id: ComponentId, kind: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnhandledDevice { id, kind } => write!(f, "unhandled device {kind:?} (component {id})"),
        }
    }
}

/// The result of translating one datapath drawing.
#[derive(Debug, Clone)]
pub struct Translation {
    verilog: String,
    warnings: Vec<Warning>,
}

impl Translation {
    pub fn new(text: &str) -> Result<Translation, Error> {
        Translation::with_options(text, &Options::default())
    }

    pub fn with_options(text: &str, options: &Options) -> Result<Translation, Error> {
        let datapath = Datapath::parse(text)?;
        Translation::from_datapath(&datapath, options)
    }

    pub fn from_datapath(datapath: &Datapath, options: &Options) -> Result<Translation, Error> {
        let _span = tracing::debug_span!("translate", module = %options.module_name).entered();
        let netlist = Netlist::build(datapath)?;
        let mut ctx = EmitterContext::new();
        emit_materialized(&mut ctx, &netlist);
        {
            let _span = tracing::debug_span!("component pass").entered();
            for component in datapath.devices() {
                emit_component(&mut ctx, &netlist, component)?;
            }
        }
        emit_clocked(&mut ctx, &netlist)?;
        let verilog = assemble(&ctx, options)?;
        tracing::debug!(bytes = verilog.len(), warnings = ctx.warnings.len(), "module assembled");
        Ok(Translation { verilog, warnings: ctx.warnings })
    }

    pub fn verilog(&self) -> &str {
        &self.verilog
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_verilog(self) -> String {
        self.verilog
    }
}
