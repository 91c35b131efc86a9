pub fn execute(log_level: Option<&str>) {
    if let Err(e) = borderless_windows::run(log_level) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
