fn main() {
    if let Err(err) = prereq_router::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
