fn main() {
    conquery_cli::init_tracing();
    if let Err(e) = conquery_cli::run(std::env::args().collect()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
