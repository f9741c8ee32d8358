use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use gba_bridge::{
    cli::{demo, operations, run, DemoArgs, RunArgs},
    instrumentation,
};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[clap(long, global = true)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
    #[clap(short, long, global = true, action = ArgAction::Count)]
    #[clap(help = "Increase log verbosity (-v info, -vv debug, -vvv trace)")]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[clap(about = "Run a call script against simulated hardware")]
    #[clap(aliases = &["r"])]
    Run(RunArgs),
    #[clap(about = "Draw the demo pixels on simulated hardware")]
    #[clap(aliases = &["d"])]
    Demo(DemoArgs),
    #[clap(about = "List the operations and constants scripts can use")]
    Ops,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = instrumentation::init(cli.verbose, cli.trace);

    match &cli.command {
        Command::Run(args) => run(args),
        Command::Demo(args) => demo(args),
        Command::Ops => {
            println!("{}", operations());
            Ok(())
        }
    }
}
