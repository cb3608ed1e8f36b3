use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::process::ExitCode;

use b64dec::decode::{DecodeConfig, GroupDecoder};
use b64dec::stream::{self, StreamReport};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "b64dec")]
#[command(
    about = "Decode base64 from stdin to stdout, skipping non-base64 bytes",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        help = "Only decode the first line of input, up to 255 bytes of it"
    )]
    line: bool,
    #[arg(short, long, help = "Stop at the first malformed group")]
    abort_on_error: bool,
    #[arg(
        short,
        long,
        help = "Reject padded groups whose last symbol has bits that would be discarded"
    )]
    strict: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if args.verbose {
                    "b64dec=debug"
                } else {
                    "b64dec=warn"
                }
                .into()
            }),
        )
        .init();

    match run(&args) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Cli) -> io::Result<StreamReport> {
    let decoder = GroupDecoder::new(
        DecodeConfig::new().with_decode_allow_trailing_bits(!args.strict),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = if args.line {
        let line = stream::first_line(stdin.lock())?;
        decode_to(&line[..], &mut out, &decoder, args.abort_on_error)?
    } else {
        decode_to(stdin.lock(), &mut out, &decoder, args.abort_on_error)?
    };
    out.flush()?;

    info!(
        groups = report.groups,
        malformed = report.malformed,
        bytes = report.bytes_written,
        aborted = report.aborted,
        "done"
    );

    Ok(report)
}

fn decode_to<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    decoder: &GroupDecoder,
    abort_on_error: bool,
) -> io::Result<StreamReport> {
    let stderr = io::stderr();
    stream::decode_stream(reader, writer, decoder, |_| {
        // a failed diagnostic write shouldn't stop decoding
        let _ = writeln!(stderr.lock(), "Malformed input");
        if abort_on_error {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
}
