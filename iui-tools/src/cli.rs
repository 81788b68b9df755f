use std::process;

use clap::Parser;

/// Parses the command line. Malformed arguments exit with status 1 instead
/// of clap's usual 2; `--help` and `--version` exit 0.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    }
}
