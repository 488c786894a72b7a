use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Generate appearance streams for PDF form fields.
#[derive(Debug, Parser)]
#[command(name = "acroform", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a PDF from a JSON form description with generated appearances
    Render {
        /// Path to the JSON form description
        #[arg(value_name = "FORM_JSON")]
        input: PathBuf,

        /// Output PDF path
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Archival conformance level applied to every field
        #[arg(long, value_enum)]
        conformance: Option<ConformanceArg>,
    },

    /// Regenerate every appearance of an existing PDF form
    Regen {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output PDF path
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Set a field value before regenerating (repeatable, NAME=VALUE)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,

        /// Archival conformance level applied to every field
        #[arg(long, value_enum)]
        conformance: Option<ConformanceArg>,
    },

    /// List the fields of a PDF form
    Fields {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Decode a default appearance (DA) string
    Da {
        /// The DA string, e.g. '/Helv 12 Tf 0 g'
        #[arg(value_name = "DA", allow_hyphen_values = true)]
        da: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute the auto-fit font size for text in a box
    Fit {
        /// Box width in points
        #[arg(long)]
        width: f64,

        /// Box height in points
        #[arg(long)]
        height: f64,

        /// Text to fit
        #[arg(long, default_value = "")]
        text: String,

        /// Standard font name or alias (e.g. Helvetica, Cour)
        #[arg(long, default_value = "Helvetica")]
        font: String,

        /// Border width in points
        #[arg(long, default_value_t = 0.0)]
        border: f64,
    },
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Archival conformance levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConformanceArg {
    #[value(name = "pdfa-1b")]
    PdfA1b,
    #[value(name = "pdfa-2b")]
    PdfA2b,
    #[value(name = "pdfa-3b")]
    PdfA3b,
}

impl From<ConformanceArg> for acroform::ConformanceLevel {
    fn from(arg: ConformanceArg) -> Self {
        match arg {
            ConformanceArg::PdfA1b => acroform::ConformanceLevel::PdfA1b,
            ConformanceArg::PdfA2b => acroform::ConformanceLevel::PdfA2b,
            ConformanceArg::PdfA3b => acroform::ConformanceLevel::PdfA3b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_assignments() {
        let cli = Cli::parse_from([
            "acroform", "regen", "in.pdf", "-o", "out.pdf", "--set", "a=1", "--set", "b.c=two",
        ]);
        match cli.command {
            Commands::Regen { assignments, .. } => assert_eq!(assignments, ["a=1", "b.c=two"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verbose_counts_occurrences() {
        let cli = Cli::parse_from(["acroform", "-vv", "da", "/Helv 12 Tf"]);
        assert_eq!(cli.verbose, 2);
    }
}
