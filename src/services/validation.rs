use validator::{Validate, ValidationErrors};

use super::ServiceError;

/// Run the declarative rules on `input`, collecting every failure
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|errors| ServiceError::Validation(format_validation_errors(&errors)))
}

/// Flatten field errors into messages, sorted by field so output is stable
pub fn format_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, _)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => default_message(&field, e),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn default_message(field: &str, error: &validator::ValidationError) -> String {
    match (&*error.code, error.params.get("min")) {
        ("required", _) => format!("{} is required", field),
        ("email", _) => format!("{} must be a valid email address", field),
        ("range", Some(min)) | ("length", Some(min)) => {
            format!("{} must be greater than or equal to {}", field, min)
        }
        _ => format!("{} is invalid", field),
    }
}
