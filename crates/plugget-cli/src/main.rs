use plugget_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible.
    logging::init_logging().expect("failed to initialize logging");

    // Parse flags and run the pipeline. Errors carry their taxonomy label;
    // the banner is the one guaranteed failure signal on any fatal path.
    if let Err(err) = cli::run_from_args() {
        eprintln!("plugget error: {}", err);
        eprintln!("plugget: installation failed");
        std::process::exit(1);
    }
}
