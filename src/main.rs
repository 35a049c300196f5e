fn main() {
    if let Err(e) = goatterm::app::run() {
        eprintln!("{:#}", e); // pretty anyhow chain
        std::process::exit(1);
    }
}
