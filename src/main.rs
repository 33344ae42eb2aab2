fn main() {
    if let Err(err) = datagenesis::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
