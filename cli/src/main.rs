//! Binary entrypoint for vesti-aux

fn main() {
    if let Err(err) = vesti_aux_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
