//! Print the OpenAPI document as JSON.

use std::process::ExitCode;

use utoipa::OpenApi;
use workshop_stats::doc::ApiDoc;

fn main() -> ExitCode {
    match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("failed to serialise OpenAPI document: {error}");
            ExitCode::FAILURE
        }
    }
}
