//! Catalog items (animal listings) and the farmer-side listing forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::foundation::{AnimalId, UserId, ValidationError};

/// Kind of livestock. Values the client does not know map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnimalType {
    #[default]
    Cow,
    Goat,
    Sheep,
    Chicken,
    Pig,
    #[serde(other)]
    Other,
}

impl AnimalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalType::Cow => "COW",
            AnimalType::Goat => "GOAT",
            AnimalType::Sheep => "SHEEP",
            AnimalType::Chicken => "CHICKEN",
            AnimalType::Pig => "PIG",
            AnimalType::Other => "OTHER",
        }
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog item as served by `GET /api/animals/`.
///
/// `quantity` is the stock available at the time the catalog was fetched and
/// doubles as the cart's stock ceiling for this item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    #[serde(default)]
    pub farmer: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub animal_type: AnimalType,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age: Option<u32>,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl Animal {
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_listed_by(&self, farmer: UserId) -> bool {
        self.farmer == Some(farmer)
    }
}

/// Image attached to a listing upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guesses the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = match file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

/// Form for creating a listing (`POST /api/animals/`, multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub name: String,
    pub animal_type: AnimalType,
    pub breed: String,
    pub age: u32,
    pub price: Decimal,
    pub description: String,
    pub quantity: u32,
    pub image: Option<ImageUpload>,
}

impl NewListing {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::require("breed", &self.breed)?;
        ValidationError::require("description", &self.description)?;
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::invalid_format("price", "must be greater than zero"));
        }
        if self.quantity == 0 {
            return Err(ValidationError::invalid_format("quantity", "must be at least 1"));
        }
        Ok(())
    }

    /// Text parts of the multipart body, in the order the portal sends them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("animal_type".to_string(), self.animal_type.to_string()),
            ("breed".to_string(), self.breed.clone()),
            ("age".to_string(), self.age.to_string()),
            ("price".to_string(), self.price.to_string()),
            ("description".to_string(), self.description.clone()),
            ("quantity".to_string(), self.quantity.to_string()),
        ]
    }
}

/// Partial update of a listing (`PATCH /api/animals/{id}/`, multipart).
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub animal_type: Option<AnimalType>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub image: Option<ImageUpload>,
}

impl ListingUpdate {
    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty() && self.image.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            ValidationError::require("name", name)?;
        }
        if let Some(breed) = &self.breed {
            ValidationError::require("breed", breed)?;
        }
        if let Some(price) = self.price {
            if price <= Decimal::ZERO {
                return Err(ValidationError::invalid_format("price", "must be greater than zero"));
            }
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.name {
            fields.push(("name".to_string(), v.clone()));
        }
        if let Some(v) = self.animal_type {
            fields.push(("animal_type".to_string(), v.to_string()));
        }
        if let Some(v) = &self.breed {
            fields.push(("breed".to_string(), v.clone()));
        }
        if let Some(v) = self.age {
            fields.push(("age".to_string(), v.to_string()));
        }
        if let Some(v) = self.price {
            fields.push(("price".to_string(), v.to_string()));
        }
        if let Some(v) = &self.description {
            fields.push(("description".to_string(), v.clone()));
        }
        if let Some(v) = self.quantity {
            fields.push(("quantity".to_string(), v.to_string()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn listing() -> NewListing {
        NewListing {
            name: "Bessie".to_string(),
            animal_type: AnimalType::Cow,
            breed: "Friesian".to_string(),
            age: 24,
            price: dec("85000.00"),
            description: "Healthy dairy cow".to_string(),
            quantity: 1,
            image: None,
        }
    }

    #[test]
    fn deserializes_backend_animal_with_string_price() {
        let json = serde_json::json!({
            "id": 4,
            "farmer": 2,
            "name": "Bessie",
            "animal_type": "COW",
            "breed": "Friesian",
            "age": 24,
            "price": "85000.00",
            "description": "Dairy",
            "quantity": 3,
            "image": null
        });
        let animal: Animal = serde_json::from_value(json).unwrap();
        assert_eq!(animal.id, AnimalId::new(4));
        assert_eq!(animal.price, dec("85000.00"));
        assert!(animal.is_listed_by(UserId::new(2)));
        assert!(!animal.is_out_of_stock());
    }

    #[test]
    fn unknown_animal_type_maps_to_other() {
        let t: AnimalType = serde_json::from_str("\"CAMEL\"").unwrap();
        assert_eq!(t, AnimalType::Other);
    }

    #[test]
    fn valid_listing_passes() {
        assert!(listing().validate().is_ok());
    }

    #[test]
    fn listing_requires_positive_price() {
        let mut l = listing();
        l.price = Decimal::ZERO;
        assert!(l.validate().is_err());
    }

    #[test]
    fn listing_requires_stock() {
        let mut l = listing();
        l.quantity = 0;
        assert!(l.validate().is_err());
    }

    #[test]
    fn listing_form_contains_every_field() {
        let fields = listing().form_fields();
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "animal_type", "breed", "age", "price", "description", "quantity"]
        );
    }

    #[test]
    fn update_sends_only_set_fields() {
        let update = ListingUpdate {
            quantity: Some(5),
            ..Default::default()
        };
        assert_eq!(update.form_fields(), vec![("quantity".to_string(), "5".to_string())]);
        assert!(ListingUpdate::default().is_empty());
    }

    #[test]
    fn image_upload_guesses_mime_type() {
        assert_eq!(ImageUpload::new("cow.JPG", vec![]).mime_type, "image/jpeg");
        assert_eq!(
            ImageUpload::new("cow", vec![]).mime_type,
            "application/octet-stream"
        );
    }
}
