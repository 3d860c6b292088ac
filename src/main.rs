fn main() {
    if let Err(err) = salescope::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
