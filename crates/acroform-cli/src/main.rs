mod cli;
mod da_cmd;
mod form_file;
mod fields_cmd;
mod fit_cmd;
mod regen_cmd;
mod render_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Render {
            ref input,
            ref output,
            conformance,
        } => render_cmd::run(input, output, conformance),
        cli::Commands::Regen {
            ref file,
            ref output,
            ref assignments,
            conformance,
        } => regen_cmd::run(file, output, assignments, conformance),
        cli::Commands::Fields {
            ref file,
            ref format,
        } => fields_cmd::run(file, format),
        cli::Commands::Da { ref da, ref format } => da_cmd::run(da, format),
        cli::Commands::Fit {
            width,
            height,
            ref text,
            ref font,
            border,
        } => fit_cmd::run(width, height, text, font, border),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
