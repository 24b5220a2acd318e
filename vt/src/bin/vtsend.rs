use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vtsend",
    version,
    about = "Send length-prefixed data units from a file over TCP",
    long_about = "`vtsend` reads pre-framed data units from a file and transmits them, in \
order, over a single TCP connection to a `vtrecv` instance.

Each unit is validated against the transport limits before it goes on the \
wire; the bytes are sent verbatim. Units are paced by a fixed inter-unit \
delay (--send-delay)."
)]
struct Args {
    // Transport options
    /// Delay between consecutive data units
    ///
    /// Accepts human-readable durations like "10ms", "1s". The delay paces
    /// the stream and has no effect on correctness.
    #[arg(
        long,
        default_value = "10ms",
        value_name = "DELAY",
        help_heading = "Transport options"
    )]
    send_delay: String,

    // Progress & output
    /// Verbose level: -v INFO / -vv DEBUG / -vvv TRACE (default: ERROR)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,

    /// Quiet mode, don't report errors
    #[arg(short = 'q', long = "quiet", help_heading = "Progress & output")]
    quiet: bool,

    /// Print a transfer summary at the end
    #[arg(long, help_heading = "Progress & output")]
    summary: bool,

    // Advanced settings
    /// Number of worker threads, 0 means number of cores
    #[arg(
        long,
        default_value = "0",
        value_name = "N",
        help_heading = "Advanced settings"
    )]
    max_workers: usize,

    /// Number of blocking worker threads, 0 means Tokio runtime default (512)
    #[arg(
        long,
        default_value = "0",
        value_name = "N",
        help_heading = "Advanced settings"
    )]
    max_blocking_threads: usize,

    // ARGUMENTS
    /// File holding the data units to send
    #[arg()]
    input_file: std::path::PathBuf,

    /// Destination host name or IP address
    #[arg()]
    destination_host: String,

    /// Destination TCP port
    #[arg()]
    destination_port: u16,
}

async fn async_main(args: Args) -> anyhow::Result<vt_tools_vt::sender::SendSummary> {
    let delay = humantime::parse_duration(&args.send_delay)
        .with_context(|| format!("invalid --send-delay value: {:?}", args.send_delay))?;
    let reader = wire::unitfile::UnitFileReader::open(&args.input_file).await?;
    let mut provider = wire::provider::DataProvider::new(reader);
    let mut stream =
        vt_tools_vt::sender::connect(&args.destination_host, args.destination_port).await?;
    vt_tools_vt::sender::run_sender(&mut stream, &mut provider, delay).await
}

fn main() {
    let args = Args::parse();
    let func = {
        let args = args.clone();
        || async_main(args)
    };
    let output = common::OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        print_summary: args.summary,
    };
    let runtime = common::RuntimeConfig {
        max_workers: args.max_workers,
        max_blocking_threads: args.max_blocking_threads,
    };
    match common::run(output, runtime, func) {
        Some(summary) => {
            if args.summary {
                println!("{summary}");
            }
        }
        None => std::process::exit(1),
    }
}
