//! Vaultfill CLI: fill placeholder templates in JSON documents.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "vaultfill",
    version,
    about = "Fill placeholder templates in JSON documents — random secrets, env values, cross-references"
)]
struct Cli {
    #[command(flatten)]
    args: vaultfill::cli::FillArgs,
}

fn main() {
    let cli = Cli::parse();
    vaultfill::cli::init_tracing(cli.args.quiet);
    if let Err(e) = vaultfill::cli::dispatch(cli.args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
