//! This library provides the in-memory form of a datapath drawing.
//!
//! A [`Datapath`] is a collection of [`Component`]s identified by positive numbers. Buses are
//! components too: each names the component driving it (`entry`) and the component it feeds
//! (`exit`). Building a [`Netlist`] collapses chains of buses into direct references to the
//! component that ultimately drives them and orders the inputs of every component from left to
//! right, which is the form code generators and the [`sim::Simulator`] consume.

mod error;
mod kind;
mod component;
mod parse;
mod datapath;
mod builder;
mod resolve;
mod netlist;
mod pins;

pub mod sim;

pub use error::{Error, ParseError};
pub use kind::{Kind, FoldOp, CompareOp, ShiftOp};
pub use component::{ComponentId, Component, BitRange, width_mask};
pub use parse::{parse, Record, Field};
pub use datapath::Datapath;
pub use builder::Materialized;
pub use netlist::{Netlist, Source, Operand};
pub use pins::{PinCursor, INPUT_LINES, OUTPUT_LINES};

/// Arithmetic results are truncated to a 32-bit machine word.
pub const WORD_MASK: u64 = 0xffff_ffff;
