fn main() {
    if let Err(error) = carq::run() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
