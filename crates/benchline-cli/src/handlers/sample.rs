//! Sample command handler

use super::utils::{load_schema, save_document};
use crate::cli::SampleArgs;
use crate::error::{ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use benchline_schemas::generate_sample_input;
use tracing::{debug, instrument};

/// Handle the sample command
#[instrument(skip(output), fields(file = %args.source.display()))]
pub async fn handle_sample(args: SampleArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("sample_command", &format!("file: {}", args.source.display()));

    let schema = load_schema(&args.source)?;
    debug!(
        schema_type = schema.as_ref().and_then(|s| s.type_name()).unwrap_or("any"),
        "Generating sample input"
    );
    let sample = generate_sample_input(schema.as_ref());

    match args.save_to {
        Some(path) => {
            save_document(&path, &sample)
                .with_context(|| format!("Failed to save sample to {}", path.display()))?;
            output.success(&format!("✓ Sample saved to {}", path.display()))
        }
        None => output.data(&sample),
    }
}
