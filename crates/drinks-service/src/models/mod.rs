use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One recipe entry: `{name, color, parts}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Ordered ingredient list.
///
/// Clients may submit either a single ingredient object or a list; both
/// normalize to a list. Serialization always emits a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipe(pub Vec<Ingredient>);

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Many(Vec<Ingredient>),
            One(Ingredient),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Many(list) => Recipe(list),
            Repr::One(one) => Recipe(vec![one]),
        })
    }
}

impl Recipe {
    /// Serialize to the text form the store persists.
    pub fn to_storage(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Parse the store's text column back into a structured recipe.
    pub fn from_storage(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Raw drinks row (maps to the drinks table; recipe still serialized).
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: String,
}

/// A drink with its recipe fully structured.
///
/// Serializing this type directly is the *long* view
/// (`{id, title, recipe:[{name, color, parts}]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Recipe,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = serde_json::Error;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe: Recipe::from_storage(&row.recipe)?,
        })
    }
}

/// *Short* view ingredient: `name` omitted.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: i64,
}

/// *Short* view of a drink: `{id, title, recipe:[{color, parts}]}`.
#[derive(Debug, Clone, Serialize)]
pub struct DrinkSummary {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .0
                .iter()
                .map(|i| IngredientSummary {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

/// Body of POST /drinks.
#[derive(Debug, Deserialize)]
pub struct CreateDrink {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

/// Body of PATCH /drinks/{id}.
///
/// Outer Option: field absent from the body (leave untouched).
/// Inner Option: field present, possibly null (null violates the column's
/// invariants and is rejected by the handler).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDrink {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recipe: Option<Option<Recipe>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// `{success:true, drinks:[...]}` for the list endpoints and update.
#[derive(Debug, Serialize)]
pub struct DrinkListResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

/// `{success:true, drinks:<long>}` for create (single object, per the
/// original wire format).
#[derive(Debug, Serialize)]
pub struct DrinkCreatedResponse {
    pub success: bool,
    pub drinks: Drink,
}

/// `{success:true, delete:<id>}` for delete.
#[derive(Debug, Serialize)]
pub struct DrinkDeletedResponse {
    pub success: bool,
    pub delete: i32,
}
