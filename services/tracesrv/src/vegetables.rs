//! Vegetable inventory model and the edit operation

use serde::{Deserialize, Serialize};

/// Stored inventory row
///
/// Serialized with the field names the frontend uses: `ID`, `Name`, `Quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vegetable {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
}

/// Body of `POST /vegetables`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewVegetable {
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
}

impl NewVegetable {
    /// Name as it will be stored
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }
}

/// Body of `PATCH /vegetables/{id}`
///
/// ```json
/// {"type": "dec_quantity", "by": 15}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VegetableEdit {
    Rename { name: String },
    SetQuantity { quantity: i64 },
    IncQuantity { by: i64 },
    DecQuantity { by: i64 },
}

impl VegetableEdit {
    /// Apply the edit in place
    ///
    /// Only `DecQuantity` clamps at zero. `SetQuantity` and `IncQuantity`
    /// accept any value, and a rename may leave an empty name.
    pub fn apply(&self, vegetable: &mut Vegetable) {
        match self {
            Self::Rename { name } => vegetable.name = name.trim().to_string(),
            Self::SetQuantity { quantity } => vegetable.quantity = *quantity,
            Self::IncQuantity { by } => {
                vegetable.quantity = vegetable.quantity.saturating_add(*by);
            },
            Self::DecQuantity { by } => {
                vegetable.quantity = vegetable.quantity.saturating_sub(*by).max(0);
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rename { .. } => "rename",
            Self::SetQuantity { .. } => "set_quantity",
            Self::IncQuantity { .. } => "inc_quantity",
            Self::DecQuantity { .. } => "dec_quantity",
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use serde_json::json;

    fn beet() -> Vegetable {
        Vegetable {
            id: 1,
            name: "Beet".to_string(),
            quantity: 10,
        }
    }

    #[test]
    fn test_dec_clamps_at_zero() {
        let mut veg = beet();
        VegetableEdit::DecQuantity { by: 15 }.apply(&mut veg);
        assert_eq!(
            veg,
            Vegetable {
                id: 1,
                name: "Beet".to_string(),
                quantity: 0
            }
        );
    }

    #[test]
    fn test_inc_then_dec_never_negative() {
        let mut veg = beet();
        VegetableEdit::IncQuantity { by: 5 }.apply(&mut veg);
        assert_eq!(veg.quantity, 15);
        VegetableEdit::DecQuantity { by: 100 }.apply(&mut veg);
        assert_eq!(veg.quantity, 0);
    }

    #[test]
    fn test_rename_trims() {
        let mut veg = beet();
        VegetableEdit::Rename {
            name: "  Carrot  ".to_string(),
        }
        .apply(&mut veg);
        assert_eq!(veg.name, "Carrot");

        // Whitespace-only names are accepted as empty
        VegetableEdit::Rename {
            name: "   ".to_string(),
        }
        .apply(&mut veg);
        assert_eq!(veg.name, "");
    }

    #[test]
    fn test_set_and_inc_are_unchecked() {
        let mut veg = beet();
        VegetableEdit::SetQuantity { quantity: -4 }.apply(&mut veg);
        assert_eq!(veg.quantity, -4);
        VegetableEdit::IncQuantity { by: -3 }.apply(&mut veg);
        assert_eq!(veg.quantity, -7);
        VegetableEdit::IncQuantity { by: i64::MAX }.apply(&mut veg);
        VegetableEdit::IncQuantity { by: i64::MAX }.apply(&mut veg);
        assert_eq!(veg.quantity, i64::MAX);
    }

    #[test]
    fn test_dec_with_negative_by_grows() {
        let mut veg = beet();
        VegetableEdit::DecQuantity { by: -5 }.apply(&mut veg);
        assert_eq!(veg.quantity, 15);
    }

    #[test]
    fn test_edit_wire_format() {
        let edit: VegetableEdit =
            serde_json::from_value(json!({"type": "dec_quantity", "by": 15})).unwrap();
        assert_eq!(edit, VegetableEdit::DecQuantity { by: 15 });
        assert_eq!(edit.kind(), "dec_quantity");

        let edit: VegetableEdit =
            serde_json::from_value(json!({"type": "rename", "name": "Leek"})).unwrap();
        assert_eq!(
            edit,
            VegetableEdit::Rename {
                name: "Leek".to_string()
            }
        );

        assert!(serde_json::from_value::<VegetableEdit>(json!({"type": "explode"})).is_err());
    }

    #[test]
    fn test_vegetable_field_names() {
        let body = serde_json::to_value(beet()).unwrap();
        assert_eq!(body, json!({"ID": 1, "Name": "Beet", "Quantity": 10}));

        let new: NewVegetable =
            serde_json::from_value(json!({"Name": " Kale ", "Quantity": 3})).unwrap();
        assert_eq!(new.normalized_name(), "Kale");
        assert_eq!(new.quantity, 3);
    }
}
