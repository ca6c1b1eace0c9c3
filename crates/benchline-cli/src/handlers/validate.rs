//! Validate command handler

use super::utils::{load_document, load_schema};
use crate::cli::ValidateArgs;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use benchline_schemas::validate_input;
use tracing::{info, instrument, warn};

/// Handle the validate command
///
/// Prints the validation result and fails with
/// [`Error::ValidationFailed`] when the input does not conform.
#[instrument(skip(output), fields(input = %args.input.display(), schema = %args.schema.display()))]
pub async fn handle_validate(args: ValidateArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("validate_command");
    output.info(&format!(
        "Validating {} against {}",
        args.input.display(),
        args.schema.display()
    ))?;

    let input = load_document(&args.input)?;
    let schema = load_schema(&args.schema)?;
    if schema.is_none() {
        output.warning("Endpoint has no input schema; every input is accepted")?;
    }

    let result = validate_input(Some(&input), schema.as_ref());
    output.validation_result(&result)?;

    if result.is_valid() {
        info!("Input is valid");
        Ok(())
    } else {
        warn!(errors = result.errors().len(), "Input failed validation");
        Err(Error::ValidationFailed {
            count: result.errors().len(),
        })
    }
}
