use clap::Parser;

mod commands;
mod output;

use commands::rewrite::{self, RewriteArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "retree")]
#[command(version = VERSION)]
#[command(about = "Recursively rewrite text in file contents and file names")]
struct Cli {
    #[command(flatten)]
    args: RewriteArgs,

    /// Print the run summary as JSON on stdout (the report moves to stderr)
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = rewrite::run(cli.args, cli.json);

    let exit_code = if cli.json {
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        match output::print_json_result(json_result) {
            Ok(()) => exit_code,
            Err(err) => {
                output::print_error_line(&err);
                output::exit_code_for_error(err.code)
            }
        }
    } else {
        match result {
            Ok((_, exit_code)) => exit_code,
            Err(err) => {
                output::print_error_line(&err);
                output::exit_code_for_error(err.code)
            }
        }
    };

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
