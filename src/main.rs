fn main() {
    if let Err(err) = mindr::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
