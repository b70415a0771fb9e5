use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw(RawOutputMode),
}

#[derive(Debug, Clone, Copy)]
enum RawOutputMode {
    ToolPassthrough,
    Markdown,
}

mod commands;
mod output;
mod tty;

use commands::{changelog, config, deploy, release, version};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "momentum-ops")]
#[command(version = VERSION)]
#[command(about = "Deploy the momentum indicator to Kubernetes and cut patch releases")]
struct Cli {
    /// Path to a momentum-ops.json config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install or upgrade the Helm release
    Deploy(deploy::ActionArgs),
    /// Uninstall the Helm release
    Delete(deploy::ActionArgs),
    /// List every resource in the app namespace
    Status(deploy::ActionArgs),
    /// Run or plan the release pipeline
    Release(release::ReleaseArgs),
    /// Preview the changelog the next release would write
    Changelog(changelog::ChangelogArgs),
    /// Show the current and next version
    Version(version::VersionArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Deploy(args) | Commands::Delete(args) | Commands::Status(args)
            if !args.dry_run =>
        {
            ResponseMode::Raw(RawOutputMode::ToolPassthrough)
        }
        Commands::Changelog(_) => ResponseMode::Raw(RawOutputMode::Markdown),
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };
    let mode = response_mode(&cli.command);

    if let ResponseMode::Raw(RawOutputMode::Markdown) = mode {
        let markdown_result = commands::run_markdown(cli.command, &global);

        match markdown_result {
            Ok((content, exit_code)) => {
                print!("{}", content);
                return std::process::ExitCode::from(exit_code_to_u8(exit_code));
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_error(&err);
                return std::process::ExitCode::from(exit_code_to_u8(exit_code));
            }
        }
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    match mode {
        ResponseMode::Json => {
            let _ = output::print_json_result(json_result);
        }
        // The tool already wrote to the terminal; only launch or config failures are reported.
        ResponseMode::Raw(RawOutputMode::ToolPassthrough) => {
            if let Err(err) = json_result {
                let _ = output::print_error(&err);
            }
        }
        ResponseMode::Raw(RawOutputMode::Markdown) => {}
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
