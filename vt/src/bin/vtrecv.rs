use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vtrecv",
    version,
    about = "Receive length-prefixed data units over TCP into a file",
    long_about = "`vtrecv` accepts a single TCP connection from a `vtsend` instance, \
reassembles data units from the byte stream, and appends each unit (in \
canonical wire form) to the output file. One timestamped line per unit is \
written to the timestamp log.

On clean shutdown (peer closed the connection) the final counters are \
printed to stdout."
)]
struct Args {
    // Transport options
    /// Buffer size for socket reads
    ///
    /// Accepts human-readable sizes like "64KiB", "1MB".
    #[arg(
        long,
        default_value = "64KiB",
        value_name = "SIZE",
        help_heading = "Transport options"
    )]
    read_buffer: String,

    /// Timestamp log path
    ///
    /// Defaults to `<output_file>_timestamps.txt`.
    #[arg(long, value_name = "PATH", help_heading = "Transport options")]
    timestamp_log: Option<std::path::PathBuf>,

    // Progress & output
    /// Verbose level: -v INFO / -vv DEBUG / -vvv TRACE (default: ERROR)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,

    /// Quiet mode, don't report errors
    #[arg(short = 'q', long = "quiet", help_heading = "Progress & output")]
    quiet: bool,

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
    /// File to write received data units to
    #[arg()]
    output_file: std::path::PathBuf,

    /// TCP port to listen on
    #[arg()]
    listening_port: u16,
}

#[derive(Debug, Clone, Copy)]
struct RecvSummary {
    units_received: u64,
    bytes_received: u64,
}

fn default_timestamp_path(output_file: &std::path::Path) -> std::path::PathBuf {
    let mut name = output_file.as_os_str().to_os_string();
    name.push("_timestamps.txt");
    std::path::PathBuf::from(name)
}

async fn async_main(args: Args) -> anyhow::Result<RecvSummary> {
    let read_buffer = args
        .read_buffer
        .parse::<bytesize::ByteSize>()
        .map_err(|error| {
            anyhow::anyhow!("invalid --read-buffer value {:?}: {error}", args.read_buffer)
        })?
        .as_u64() as usize;
    anyhow::ensure!(read_buffer > 0, "--read-buffer must be at least 1 byte");
    let timestamp_path = args
        .timestamp_log
        .clone()
        .unwrap_or_else(|| default_timestamp_path(&args.output_file));
    let writer = wire::unitfile::UnitFileWriter::create(&args.output_file).await?;
    let timestamps = common::tslog::TimestampLog::create(&timestamp_path).await?;
    let mut acceptor = wire::acceptor::DataAcceptor::new(writer, timestamps);
    let listener =
        tokio::net::TcpListener::bind((std::net::Ipv4Addr::UNSPECIFIED, args.listening_port))
            .await
            .with_context(|| {
                format!("failed to bind TCP listener on port {}", args.listening_port)
            })?;
    tracing::info!("Listening on 0.0.0.0:{}", args.listening_port);
    vt_tools_vt::receiver::run_receiver(&listener, &mut acceptor, read_buffer).await?;
    let summary = RecvSummary {
        units_received: acceptor.units_received(),
        bytes_received: acceptor.bytes_received(),
    };
    acceptor.finish().await?;
    Ok(summary)
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
        print_summary: true,
    };
    let runtime = common::RuntimeConfig {
        max_workers: args.max_workers,
        max_blocking_threads: args.max_blocking_threads,
    };
    match common::run(output, runtime, func) {
        Some(summary) => {
            println!("Data units received: {}", summary.units_received);
            println!("Total bytes received: {}", summary.bytes_received);
        }
        None => std::process::exit(1),
    }
}
