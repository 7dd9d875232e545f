fn main() {
    if let Err(e) = vitalrisk_lib::run() {
        tracing::error!(error = %e, "vitalrisk failed");
        eprintln!("vitalrisk: {e}");
        std::process::exit(1);
    }
}
