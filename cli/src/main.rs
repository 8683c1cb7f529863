use std::error::Error;
use std::fs;
use std::process::ExitCode;

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use datapath_netlist::{Datapath, Netlist, sim::Simulator};
use datapath_verilog::{Options, Translation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default)]
struct Args {
    input: String,
    output: Option<String>,
    module_name: Option<String>,
    no_header: bool,
    simulate: Option<u32>,
    switches: u8,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Translate a datapath drawing into a Verilog module.");
        ap.refer(&mut args.input).add_argument("INPUT", Store, "datapath drawing to read").required();
        ap.refer(&mut args.output).add_argument("OUTPUT", StoreOption, "Verilog file to write (default: stdout)");
        ap.refer(&mut args.module_name).add_option(
            &["-m", "--module-name"],
            StoreOption,
            "name of the generated module",
        );
        ap.refer(&mut args.no_header).add_option(&["--no-header"], StoreTrue, "omit the header comment");
        ap.refer(&mut args.simulate).add_option(
            &["--simulate"],
            StoreOption,
            "simulate this many clock edges and print the LEDs instead of translating",
        );
        ap.refer(&mut args.switches).add_option(&["--switches"], Store, "input switch byte used by --simulate");
        ap.parse_args_or_exit();
    }
    args
}

fn simulate(text: &str, edges: u32, switches: u8) -> Result<(), Box<dyn Error>> {
    let datapath = Datapath::parse(text)?;
    let netlist = Netlist::build(&datapath)?;
    let mut sim = Simulator::new(&netlist)?;
    sim.set_switches(switches);
    sim.settle()?;
    println!("edge 0: LED={:08b}", sim.leds()?);
    for edge in 1..=edges {
        sim.clock()?;
        println!("edge {edge}: LED={:08b}", sim.leds()?);
    }
    Ok(())
}

fn translate(text: &str, args: &Args) -> Result<(), Box<dyn Error>> {
    let mut options = Options::default();
    if let Some(module_name) = &args.module_name {
        options = options.with_module_name(module_name);
    }
    if args.no_header {
        options = options.without_header();
    }
    let translation = Translation::with_options(text, &options)?;
    match &args.output {
        Some(path) => {
            fs::write(path, translation.verilog())?;
            tracing::info!(%path, warnings = translation.warnings().len(), "module written");
        }
        None => print!("{}", translation.verilog()),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_tree::HierarchicalLayer::new(2))
        .init();

    let args = parse_args();
    let result = match fs::read_to_string(&args.input) {
        Ok(text) => match args.simulate {
            Some(edges) => simulate(&text, edges, args.switches),
            None => translate(&text, &args),
        },
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
