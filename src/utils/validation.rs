use crate::utils::error::{PredictorError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> PredictorError {
    PredictorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(invalid(
            field_name,
            file,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        )),
        None => Err(invalid(
            field_name,
            file,
            "File has no extension or invalid filename",
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Expected one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(field_name, value, "Value must be a finite number"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_ordered_bounds(field_name: &str, min: f64, max: f64) -> Result<()> {
    validate_finite(field_name, min)?;
    validate_finite(field_name, max)?;
    if min > max {
        return Err(invalid(
            field_name,
            format!("{}..{}", min, max),
            "Lower bound must not exceed upper bound",
        ));
    }
    Ok(())
}
