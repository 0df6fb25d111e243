use std::io::Write;

use clap::Parser;

mod args;
mod check;
mod debug;

/// Check a Jekyll-style site configuration and inspect what it resolves to
#[derive(clap::Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
enum Command {
    Check(check::CheckArgs),

    #[command(subcommand)]
    Debug(debug::DebugCommands),
}

impl Command {
    fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Check(args) => args.run(),
            Self::Debug(cmd) => cmd.run(),
        }
    }
}

fn main() {
    human_panic::setup_panic!();
    let result = run();
    proc_exit::exit(result);
}

fn run() -> proc_exit::ExitResult {
    let cli = Cli::parse();

    cli.color.write_global();
    init_logging(cli.verbose.log_level_filter());

    cli.command
        .run()
        .map_err(|e| proc_exit::Code::FAILURE.with_message(format!("{e:?}")))?;

    Ok(())
}

fn init_logging(level: log::LevelFilter) {
    let write_style = match colorchoice::ColorChoice::global() {
        colorchoice::ColorChoice::Never => env_logger::WriteStyle::Never,
        colorchoice::ColorChoice::Always | colorchoice::ColorChoice::AlwaysAnsi => {
            env_logger::WriteStyle::Always
        }
        colorchoice::ColorChoice::Auto => env_logger::WriteStyle::Auto,
    };

    let mut builder = env_logger::Builder::new();
    builder.write_style(write_style);
    builder.filter(None, level);
    builder.format(|f, record| {
        writeln!(
            f,
            "[{}] {}",
            record.level().as_str().to_lowercase(),
            record.args()
        )
    });
    builder.init();
}
