//! Dark command-line driver.

fn main() {
    darkc::tracing_setup::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = match darkc::commands::parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            darkc::commands::print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = darkc::commands::run(command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
