fn main() {
    #[cfg(feature = "cli")]
    logpacker::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("logpacker: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
