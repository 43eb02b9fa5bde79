//! CatalogService - animal listings for both portals.

use std::sync::Arc;

use crate::domain::catalog::{Animal, ImageUpload, ListingUpdate, NewListing};
use crate::domain::foundation::{AnimalId, UserId, ValidationError};
use crate::ports::{ApiGateway, FilePart, HttpMethod, MultipartForm};

use super::wire::{decode, decode_value};
use super::{ClientError, RefreshSignal, SessionStore};

pub const ANIMALS_PATH: &str = "/api/animals/";

pub fn animal_path(id: AnimalId) -> String {
    format!("/api/animals/{}/", id)
}

pub struct CatalogService {
    session: Arc<SessionStore>,
    gateway: Arc<dyn ApiGateway>,
    refresh: RefreshSignal,
}

impl CatalogService {
    pub fn new(session: Arc<SessionStore>, gateway: Arc<dyn ApiGateway>, refresh: RefreshSignal) -> Self {
        Self {
            session,
            gateway,
            refresh,
        }
    }

    /// The full catalog. Each item's `quantity` is its stock ceiling.
    pub async fn list_animals(&self) -> Result<Vec<Animal>, ClientError> {
        let token = self.session.require_token()?;
        let response = self
            .gateway
            .request(HttpMethod::Get, ANIMALS_PATH, None, Some(&token))
            .await?;
        decode(ANIMALS_PATH, response)
    }

    /// Listings owned by `farmer`. The backend has no owner filter, so the
    /// catalog is filtered here.
    pub async fn farmer_listings(&self, farmer: UserId) -> Result<Vec<Animal>, ClientError> {
        let mut animals = self.list_animals().await?;
        animals.retain(|a| a.is_listed_by(farmer));
        Ok(animals)
    }

    /// Listings of the signed-in farmer.
    pub async fn my_listings(&self) -> Result<Vec<Animal>, ClientError> {
        let user = self.session.user().ok_or(ValidationError::NotAuthenticated)?;
        self.farmer_listings(user.id).await
    }

    pub async fn create_listing(&self, listing: NewListing) -> Result<Animal, ClientError> {
        listing.validate()?;
        let token = self.session.require_token()?;
        let form = with_image(MultipartForm::new(listing.form_fields()), listing.image);

        let response = self
            .gateway
            .request_with_file(HttpMethod::Post, ANIMALS_PATH, form, Some(&token))
            .await?;
        let animal: Animal = decode_value(ANIMALS_PATH, response)?;

        tracing::info!(animal_id = %animal.id, name = %animal.name, "Listing created");
        self.refresh.trigger();
        Ok(animal)
    }

    pub async fn update_listing(&self, id: AnimalId, update: ListingUpdate) -> Result<Animal, ClientError> {
        if update.is_empty() {
            return Err(ValidationError::invalid_format("listing", "nothing to update").into());
        }
        update.validate()?;
        let token = self.session.require_token()?;
        let path = animal_path(id);
        let form = with_image(MultipartForm::new(update.form_fields()), update.image);

        let response = self
            .gateway
            .request_with_file(HttpMethod::Patch, &path, form, Some(&token))
            .await?;
        let animal: Animal = decode_value(&path, response)?;

        tracing::info!(animal_id = %id, "Listing updated");
        self.refresh.trigger();
        Ok(animal)
    }

    pub async fn delete_listing(&self, id: AnimalId) -> Result<(), ClientError> {
        let token = self.session.require_token()?;
        self.gateway
            .request(HttpMethod::Delete, &animal_path(id), None, Some(&token))
            .await?;
        tracing::info!(animal_id = %id, "Listing deleted");
        self.refresh.trigger();
        Ok(())
    }
}

fn with_image(form: MultipartForm, image: Option<ImageUpload>) -> MultipartForm {
    match image {
        Some(image) => form.with_file(FilePart {
            field: "image".to_string(),
            file_name: image.file_name,
            mime_type: image.mime_type,
            bytes: image.bytes,
        }),
        None => form,
    }
}
