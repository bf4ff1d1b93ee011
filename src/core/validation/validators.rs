//! Reusable field validators
//!
//! The catalog runs these as a second line of defence on every `create`,
//! whatever validation the caller already did.

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::order::NewOrderItem;
use rust_decimal::Decimal;

/// Validator: text must contain something other than whitespace
pub fn non_blank() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(format!("'{}' is required", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: amount must be zero or more
pub fn non_negative() -> impl Fn(&str, &Decimal) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Decimal| {
        if *value < Decimal::ZERO {
            Err(format!(
                "'{}' must be greater than or equal to 0 (value: {})",
                field, value
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: count must be at least `min`
pub fn at_least(min: u32) -> impl Fn(&str, u32) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: u32| {
        if value < min {
            Err(format!(
                "'{}' must be at least {} (value: {})",
                field, min, value
            ))
        } else {
            Ok(())
        }
    }
}

/// Check the invariants of a new order before anything is written
///
/// An empty item list is reported on its own; otherwise every offending
/// field is collected. The first item whose subtotal, or whose addition to
/// the running total, leaves the `Decimal` range is reported on its
/// `unit_price`.
pub fn check_new_order(client_name: &str, items: &[NewOrderItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }

    let text = non_blank();
    let price = non_negative();
    let quantity = at_least(1);

    let mut errors = Vec::new();
    let mut collect = |field: String, result: Result<(), String>| {
        if let Err(message) = result {
            errors.push(FieldValidationError { field, message });
        }
    };

    collect("client_name".to_string(), text("client_name", client_name));
    let mut running_total = Some(Decimal::ZERO);
    for (index, item) in items.iter().enumerate() {
        let field = format!("items[{}].description", index);
        let result = text(field.as_str(), item.description.as_str());
        collect(field, result);

        let field = format!("items[{}].unit_price", index);
        let result = price(field.as_str(), &item.unit_price);
        collect(field, result);

        let field = format!("items[{}].quantity", index);
        let result = quantity(field.as_str(), item.quantity);
        collect(field, result);

        if let Some(total) = running_total {
            running_total = item.subtotal().and_then(|line| total.checked_add(line));
            if running_total.is_none() {
                let field = format!("items[{}].unit_price", index);
                collect(field, Err("amount out of range".to_string()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::FieldErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // === non_blank() ===

    #[test]
    fn test_non_blank_empty_returns_error() {
        let v = non_blank();
        let result = v("client_name", "");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("required"));
    }

    #[test]
    fn test_non_blank_whitespace_returns_error() {
        let v = non_blank();
        assert!(v("client_name", "   ").is_err());
    }

    #[test]
    fn test_non_blank_text_returns_ok() {
        let v = non_blank();
        assert!(v("client_name", "Ana López").is_ok());
    }

    // === non_negative() ===

    #[test]
    fn test_non_negative_negative_returns_error() {
        let v = non_negative();
        let result = v("unit_price", &dec!(-0.01));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("-0.01"));
    }

    #[test]
    fn test_non_negative_zero_returns_ok() {
        let v = non_negative();
        assert!(v("unit_price", &Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_non_negative_positive_returns_ok() {
        let v = non_negative();
        assert!(v("unit_price", &dec!(10.5)).is_ok());
    }

    // === at_least() ===

    #[test]
    fn test_at_least_below_returns_error() {
        let v = at_least(1);
        assert!(v("quantity", 0).is_err());
    }

    #[test]
    fn test_at_least_equal_returns_ok() {
        let v = at_least(1);
        assert!(v("quantity", 1).is_ok());
    }

    // === check_new_order() ===

    #[test]
    fn test_check_new_order_empty_items() {
        let result = check_new_order("Ana", &[]);
        assert!(matches!(result, Err(ValidationError::EmptyItems)));
    }

    #[test]
    fn test_check_new_order_valid() {
        let items = vec![NewOrderItem::new("Ceviche", dec!(10.5), 2)];
        assert!(check_new_order("Ana", &items).is_ok());
    }

    #[test]
    fn test_check_new_order_collects_all_fields() {
        let items = vec![
            NewOrderItem::new("Ceviche", dec!(10.5), 2),
            NewOrderItem::new(" ", dec!(-1), 0),
        ];
        let err = check_new_order("", &items).unwrap_err();
        let fields: Vec<String> = err.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "client_name",
                "items[1].description",
                "items[1].unit_price",
                "items[1].quantity",
            ]
        );
    }

    #[test]
    fn test_check_new_order_line_overflow() {
        let items = vec![NewOrderItem::new("Caviar", Decimal::MAX, 2)];
        let err = check_new_order("Ana", &items).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "items[0].unit_price");
        assert_eq!(errors[0].message, "amount out of range");
    }

    #[test]
    fn test_check_new_order_total_overflow_reported_once() {
        let items = vec![
            NewOrderItem::new("Caviar", Decimal::MAX, 1),
            NewOrderItem::new("Bread", dec!(1), 1),
            NewOrderItem::new("Butter", dec!(1), 1),
        ];
        let err = check_new_order("Ana", &items).unwrap_err();
        let fields: Vec<String> = err.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["items[1].unit_price"]);
    }
}
