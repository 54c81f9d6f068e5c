use harmony_cli::run;

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        // Usage mistakes share clap's exit status; environment failures exit 1.
        std::process::exit(if err.is_client_error() { 2 } else { 1 });
    }
}
