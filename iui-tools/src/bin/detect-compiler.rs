use std::process;

use clap::Parser;
use iui_tools::{cli, detect, have_emcc, CompilerEnv, CompilerFamily, DEFAULT_VERSION_TIMEOUT};

/// Detects the compiler family selected by CROSS_COMPILE and CC.
///
/// Answers are printed as `y`/`n` for Kconfig and mirrored in the exit status.
#[derive(Parser)]
#[command(name = "detect-compiler", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Check whether emcc is available in PATH
    #[arg(long)]
    have_emcc: bool,
    /// Check whether the compiler is FAMILY (GCC, Clang or Emscripten)
    #[arg(long = "is", value_name = "FAMILY")]
    is: Option<String>,
}

fn answer(yes: bool) -> i32 {
    println!("{}", if yes { "y" } else { "n" });
    if yes {
        0
    } else {
        1
    }
}

fn run(args: &Args) -> i32 {
    if args.have_emcc {
        return answer(have_emcc());
    }

    let family = detect(&CompilerEnv::from_env(), DEFAULT_VERSION_TIMEOUT);

    match (&args.is, family) {
        (Some(expected), family) => answer(family.is_some_and(|f| f.matches(expected))),
        (None, Some(family)) => {
            println!("{family}");
            if family.is_known() {
                0
            } else {
                1
            }
        }
        (None, None) => {
            eprintln!("{}", CompilerFamily::Unknown);
            1
        }
    }
}

fn main() {
    env_logger::init();
    let args: Args = cli::parse_or_exit();
    process::exit(run(&args));
}
