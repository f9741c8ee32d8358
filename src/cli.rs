use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use strum::IntoEnumIterator;

use crate::{
    hardware::{
        map::{self, MemoryRegion},
        Memory,
    },
    hexdump::hexdump,
    host::{self, HostCalls, Operation, Value},
    runtime,
};

const DUMP_STRIDE: usize = 16;

fn parse_region(name: &str) -> Result<&'static MemoryRegion, String> {
    map::region_by_name(name).ok_or_else(|| {
        let names: Vec<&str> = map::REGIONS.iter().map(|region| region.name).collect();
        format!("unknown region '{}', expected one of {}", name, names.join(", "))
    })
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[clap(help = "Call script to run")]
    pub script: PathBuf,
    #[clap(short, long, value_parser = parse_region)]
    #[clap(help = "Region to hexdump after the script has run (io, palette, vram, oam)")]
    pub dump: Vec<&'static MemoryRegion>,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[clap(short, long, value_parser = parse_region)]
    #[clap(help = "Region to hexdump after the demo has run (io, palette, vram, oam)")]
    pub dump: Vec<&'static MemoryRegion>,
}

fn dump_regions(memory: &Memory, regions: &[&'static MemoryRegion]) {
    for region in regions {
        println!("{}", region);
        println!(
            "{}",
            hexdump(memory.region(region), region.base_address, DUMP_STRIDE)
        );
    }
}

/// Run a call script against simulated hardware.
pub fn run(args: &RunArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Unable to read {}", args.script.display()))?;

    let mut host = HostCalls::simulated();
    runtime::run_script(&source, &mut host)
        .with_context(|| format!("Script {} failed", args.script.display()))?;

    dump_regions(host.registers().bus(), &args.dump);
    Ok(())
}

/// Draw the demo pixels on simulated hardware.
pub fn demo(args: &DemoArgs) -> Result<()> {
    let mut host = HostCalls::simulated();
    host.dispatch(Operation::RunDemo, &[])
        .with_context(|| "Demo failed")?;

    dump_regions(host.registers().bus(), &args.dump);
    Ok(())
}

/// Describe every operation and constant a script can use.
pub fn operations() -> String {
    let mut lines = vec![format!("class {}", host::CLASS_NAME)];
    for operation in Operation::iter() {
        let returns = if operation.returns_value() {
            " -> integer"
        } else {
            ""
        };
        lines.push(format!(
            "  {}({}){}",
            operation,
            operation.parameters().join(", "),
            returns
        ));
    }
    for (name, value) in host::constants() {
        let value = match value {
            Value::Integer(address) if address > 0xFFFF => format!("{:#010x}", address),
            value => value.to_string(),
        };
        lines.push(format!("  {}::{} = {}", host::CLASS_NAME, name, value));
    }
    lines.join("\n")
}
