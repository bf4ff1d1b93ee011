//! Request validation for order creation
//!
//! Callers build a [`CreateOrderRequest`] from their transport payload, run
//! [`CreateOrderRequest::sanitized`] and [`CreateOrderRequest::validate_request`],
//! and only then hand the items to the catalog. Declarative rules come from the
//! `validator` derive; the catalog re-checks its own invariants with
//! [`validators::check_new_order`].

pub mod filters;
pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::order::NewOrderItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// One line of a create-order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateOrderItem {
    #[validate(custom(function = "validate_description"))]
    pub description: String,

    #[validate(custom(function = "validate_unit_price"))]
    pub unit_price: Decimal,

    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
}

/// Create-order payload supplied by the request layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(custom(function = "validate_client_name"))]
    pub client_name: String,

    #[validate(length(min = 1, message = "at least one item is required"), nested)]
    pub items: Vec<CreateOrderItem>,
}

fn validate_client_name(value: &str) -> Result<(), validator::ValidationError> {
    required(value, "client name is required")
}

fn validate_description(value: &str) -> Result<(), validator::ValidationError> {
    required(value, "description is required")
}

// Whitespace-only text counts as missing, sanitized or not
fn required(value: &str, message: &'static str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("required");
        err.message = Some(Cow::Borrowed(message));
        return Err(err);
    }
    Ok(())
}

fn validate_unit_price(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = validator::ValidationError::new("range");
        err.message = Some(Cow::Borrowed("unit price must be greater than or equal to 0"));
        return Err(err);
    }
    Ok(())
}

impl CreateOrderRequest {
    /// Return a copy with normalized text fields
    pub fn sanitized(self) -> Self {
        let trim = filters::trim();
        let collapse = filters::collapse_whitespace();
        Self {
            client_name: collapse(trim(self.client_name)),
            items: self
                .items
                .into_iter()
                .map(|item| CreateOrderItem {
                    description: collapse(trim(item.description)),
                    ..item
                })
                .collect(),
        }
    }

    /// Run the declarative rules, reporting every failing field
    pub fn validate_request(&self) -> Result<(), ValidationError> {
        self.validate()
            .map_err(|errors| ValidationError::FieldErrors(flatten_errors(&errors)))
    }

    /// Split into the arguments expected by `OrderCatalog::create`
    pub fn into_parts(self) -> (String, Vec<NewOrderItem>) {
        let items = self
            .items
            .into_iter()
            .map(|item| NewOrderItem::new(item.description, item.unit_price, item.quantity))
            .collect();
        (self.client_name, items)
    }
}

/// Flatten nested `validator` errors into dotted field paths
///
/// Output is sorted by field path so messages are stable.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut out = Vec::new();
    collect_errors(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message: err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string()),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(nested, &path, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
