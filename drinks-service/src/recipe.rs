use serde::{Deserialize, Serialize};

/// One ingredient line of a drink recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: i64,
}

/// Ingredient as shown on the public menu: the name stays hidden.
#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

/// Serialize a recipe into the TEXT column representation.
pub fn encode(recipe: &[Ingredient]) -> Result<String, serde_json::Error> {
    serde_json::to_string(recipe)
}

/// Parse a stored recipe column back into its structured form. Rows are
/// written through [`encode`], so a failure here means the column was
/// tampered with out of band.
pub fn decode(raw: &str) -> Result<Vec<Ingredient>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn espresso() -> Vec<Ingredient> {
        vec![
            Ingredient {
                color: "brown".into(),
                name: "espresso".into(),
                parts: 1,
            },
            Ingredient {
                color: "white".into(),
                name: "steamed milk".into(),
                parts: 3,
            },
        ]
    }

    #[test]
    fn encode_decode_round_trip() {
        let recipe = espresso();
        let raw = encode(&recipe).expect("encode");
        assert_eq!(decode(&raw).expect("decode"), recipe);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"color":"brown"}"#).is_err());
        assert!(decode(r#"[{"color":"brown","parts":1}]"#).is_err());
        assert!(decode(r#"[{"color":"brown","name":"espresso","parts":"one"}]"#).is_err());
    }

    #[test]
    fn short_ingredient_omits_name() {
        let recipe = espresso();
        let value = serde_json::to_value(ShortIngredient::from(&recipe[0])).expect("serialize");
        assert_eq!(value.get("color"), Some(&serde_json::json!("brown")));
        assert_eq!(value.get("parts"), Some(&serde_json::json!(1)));
        assert_eq!(value.get("name"), None);
    }
}
