use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotter::graphics::{OutputFormat, Program};
use dotter::script::{Script, ScriptError};
use dotter::session::Destination;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dotter",
    about = "Stream a graph script into a Graphviz renderer."
)]
struct Args {
    #[clap(long = "input", short = 'i', help = "Script file (default: stdin)")]
    script_file: Option<PathBuf>,
    #[clap(long = "format", short = 'T', help = "Output format (overrides the script)")]
    format: Option<OutputFormat>,
    #[clap(long = "program", short = 'p', help = "Layout program (overrides the script)")]
    program: Option<Program>,
    #[clap(
        long = "output",
        short = 'o',
        conflicts_with = "stdout",
        help = "Output file (overrides the script)"
    )]
    output_file: Option<PathBuf>,
    #[clap(long = "stdout", help = "Write the rendered graph to stdout")]
    stdout: bool,
    #[clap(long = "debug", help = "Log every line sent to the renderer")]
    debug: bool,
    #[clap(
        long = "print",
        help = "Print the graph description instead of rendering it"
    )]
    print: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(reason) => {
            error!("{}", reason);
            ExitCode::FAILURE
        },
    }
}

fn run(args: Args) -> Result<(), ScriptError> {
    let mut script = match &args.script_file {
        Some(path) => Script::load(path)?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(ScriptError::Io)?;
            Script::parse(&input)?
        },
    };

    if args.print {
        return script.render_to(io::stdout().lock());
    }

    let session = &mut script.session;
    if let Some(format) = args.format {
        session.format = format;
    }
    if let Some(program) = args.program {
        session.program = program;
    }
    if let Some(path) = args.output_file {
        session.destination = Destination::File(path);
    }
    if args.stdout {
        session.destination = Destination::Stdout;
    }
    if args.debug {
        session.debug = true;
    }

    script.run()
}
