fn main() {
    env_logger::init();

    if let Err(e) = quire_cli::run() {
        eprintln!("quire: {}", e);
        std::process::exit(1);
    }
}
