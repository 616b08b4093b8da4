use anyhow::Result;
use clap::Parser;

use petuchpc::{
    assembler::{assemble, AssemblyArgs},
    instrumentation,
};

#[derive(Parser)]
#[command(version)]
#[command(about = "Assembler for the PetuchPC")]
struct Cli {
    #[clap(long)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
    #[command(flatten)]
    args: AssemblyArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = instrumentation::init(cli.trace);

    assemble(&cli.args)
}
