fn main() {
    if let Err(err) = badge_forge::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
