#![forbid(unsafe_code)]

fn main() {
    let integration = markup_migrate::util::OutputIntegration::detect();
    if let Err(error) = markup_migrate::run_from_env() {
        if error.is_usage() {
            println!("{error}");
        } else if integration.should_emit_json() {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                    "integration": integration,
                })
            );
        } else {
            eprintln!("Error: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
