//! Bridge from `validator` results to the core error collection

use pd_core::error::ValidationErrors;
use validator::Validate;

/// Run `validator` rules and collect failures keyed by camelCase field name
pub fn validate<T: Validate>(value: &T) -> Result<(), ValidationErrors> {
    let Err(report) = value.validate() else {
        return Ok(());
    };

    let mut errors = ValidationErrors::new();
    for (field, field_errors) in report.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());

            if field == "__all__" {
                errors.add_base(message);
            } else {
                errors.add(camel_case(field), message);
            }
        }
    }
    Err(errors)
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("sequence_index"), "sequenceIndex");
        assert_eq!(camel_case("title"), "title");
    }
}
