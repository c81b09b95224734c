//! Request schemas and validation for inventory writes

use serde::Deserialize;

use crate::util::parse::parse_int_prefix;

/// Quantity as sent by clients: a JSON number, a numeric string, or anything else
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl QuantityInput {
    /// Coerce to an integer: floats truncate, strings take their leading integer.
    pub fn coerce(&self) -> Result<i64, ValidationError> {
        match self {
            QuantityInput::Integer(n) => Ok(*n),
            QuantityInput::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => {
                Ok(f.trunc() as i64)
            }
            QuantityInput::Text(s) => parse_int_prefix(s).ok_or(ValidationError::InvalidQuantity),
            _ => Err(ValidationError::InvalidQuantity),
        }
    }
}

impl From<i64> for QuantityInput {
    fn from(n: i64) -> Self {
        QuantityInput::Integer(n)
    }
}

/// Body of `POST /api/inventory`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `PUT /api/inventory/:id`; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A validated item ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub category: String,
    pub status: String,
}

/// A validated partial overwrite; `None` leaves the field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// Text fields count only when present and non-empty.
pub fn is_truthy(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// Quantity counts whenever it was sent as something other than null, zero included.
pub fn is_provided(field: &Option<QuantityInput>) -> bool {
    field.is_some()
}

fn truthy(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl CreateItemRequest {
    pub fn validate(self) -> Result<NewItem, ValidationError> {
        if !(is_truthy(&self.name)
            && is_truthy(&self.category)
            && is_truthy(&self.status)
            && is_provided(&self.quantity))
        {
            return Err(ValidationError::MissingFields);
        }

        match (self.name, self.quantity, self.category, self.status) {
            (Some(name), Some(quantity), Some(category), Some(status)) => Ok(NewItem {
                name,
                quantity: quantity.coerce()?,
                category,
                status,
            }),
            _ => Err(ValidationError::MissingFields),
        }
    }
}

impl UpdateItemRequest {
    pub fn validate(self) -> Result<ItemPatch, ValidationError> {
        let quantity = self.quantity.as_ref().map(QuantityInput::coerce).transpose()?;

        Ok(ItemPatch {
            name: truthy(self.name),
            quantity,
            category: truthy(self.category),
            status: truthy(self.status),
        })
    }
}

/// Rejections raised before any mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name, quantity, category, and status are required.")]
    MissingFields,

    #[error("quantity must be an integer.")]
    InvalidQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(body: serde_json::Value) -> Result<NewItem, ValidationError> {
        serde_json::from_value::<CreateItemRequest>(body)
            .expect("body deserializes")
            .validate()
    }

    fn update(body: serde_json::Value) -> Result<ItemPatch, ValidationError> {
        serde_json::from_value::<UpdateItemRequest>(body)
            .expect("body deserializes")
            .validate()
    }

    #[test]
    fn create_accepts_zero_quantity() {
        let item = create(serde_json::json!({
            "name": "Pen", "quantity": 0, "category": "Office", "status": "Available"
        }))
        .unwrap();
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn create_requires_every_field() {
        let full = serde_json::json!({
            "name": "Pen", "quantity": 1, "category": "Office", "status": "Available"
        });
        for field in ["name", "quantity", "category", "status"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(create(body), Err(ValidationError::MissingFields), "{field}");
        }
    }

    #[test]
    fn create_treats_empty_strings_and_null_as_missing() {
        assert_eq!(
            create(serde_json::json!({
                "name": "", "quantity": 1, "category": "Office", "status": "Available"
            })),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            create(serde_json::json!({
                "name": "Pen", "quantity": null, "category": "Office", "status": "Available"
            })),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn quantity_coercion() {
        assert_eq!(QuantityInput::Integer(5).coerce(), Ok(5));
        assert_eq!(QuantityInput::Float(7.9).coerce(), Ok(7));
        assert_eq!(QuantityInput::Text("12abc".into()).coerce(), Ok(12));
        assert_eq!(
            QuantityInput::Text("abc".into()).coerce(),
            Err(ValidationError::InvalidQuantity)
        );
        assert_eq!(
            QuantityInput::Other(serde_json::json!(true)).coerce(),
            Err(ValidationError::InvalidQuantity)
        );
    }

    #[test]
    fn create_rejects_non_numeric_quantity() {
        assert_eq!(
            create(serde_json::json!({
                "name": "Pen", "quantity": "lots", "category": "Office", "status": "Available"
            })),
            Err(ValidationError::InvalidQuantity)
        );
    }

    #[test]
    fn update_keeps_zero_and_drops_empty_strings() {
        let patch = update(serde_json::json!({ "quantity": 0, "name": "" })).unwrap();
        assert_eq!(
            patch,
            ItemPatch {
                quantity: Some(0),
                ..ItemPatch::default()
            }
        );
    }

    #[test]
    fn update_with_nothing_is_empty_patch() {
        assert_eq!(update(serde_json::json!({})).unwrap(), ItemPatch::default());
        assert_eq!(
            update(serde_json::json!({ "quantity": null })).unwrap(),
            ItemPatch::default()
        );
    }
}
