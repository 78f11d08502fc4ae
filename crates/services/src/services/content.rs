//! Admin mutation operations: validate, optionally upload an asset, write the
//! record, publish a change notification.

use std::collections::HashSet;

use db::models::{
    client_logo::{ClientLogo, CreateClientLogo, UpdateClientLogo},
    profile::{Profile, UpdateProfile},
    project::{CreateProject, Project, UpdateProject},
    site_setting::SiteSetting,
    software_logo::{CreateSoftwareLogo, SoftwareLogo, UpdateSoftwareLogo},
    testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial},
};
use futures::future::try_join_all;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::{
    error::StoreError,
    events::{EventBus, RowOp, Table},
    storage::{StorageError, StorageService, StoredObject},
};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("reorder request does not match the current project rows")]
    ReorderMismatch,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Upload(#[from] StorageError),
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Store(StoreError::from(err))
    }
}

/// Witness that the caller passed a blocking confirmation step. Deletes take
/// it by value, so an unconfirmed delete cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Confirmed,
}

/// A file taken from a form input, prior to upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ContentService {
    pool: SqlitePool,
    bus: EventBus,
    storage: StorageService,
}

impl ContentService {
    pub fn new(pool: SqlitePool, bus: EventBus, storage: StorageService) -> Self {
        Self { pool, bus, storage }
    }

    /// Stand-alone upload; returns the stored object and its public URL.
    pub async fn upload_asset(
        &self,
        scope: &str,
        file: UploadedFile,
    ) -> Result<(StoredObject, String), ContentError> {
        let object = self
            .storage
            .upload(scope, &file.file_name, file.content_type.as_deref(), &file.bytes)
            .await?;
        let url = self.storage.public_url(&object);
        Ok((object, url))
    }

    async fn upload_url(
        &self,
        scope: &str,
        file: Option<UploadedFile>,
    ) -> Result<Option<String>, ContentError> {
        match file {
            Some(file) => {
                let (_, url) = self.upload_asset(scope, file).await?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }

    // ---- projects ----

    pub async fn create_project(
        &self,
        mut data: CreateProject,
        image: Option<UploadedFile>,
    ) -> Result<Project, ContentError> {
        require(&data.title, "title")?;
        require(&data.category, "category")?;
        if let Some(url) = self.upload_url("projects", image).await? {
            data.image_url = Some(url);
        }

        let project = Project::create(&self.pool, &data, Uuid::new_v4()).await?;
        self.bus.publish(Table::Projects, RowOp::Insert, project.id);
        info!(project_id = %project.id, title = %project.title, "project created");
        Ok(project)
    }

    /// A missing `image` keeps the stored URL: the update statement only
    /// overwrites URL columns when a new value is present.
    pub async fn update_project(
        &self,
        id: Uuid,
        mut data: UpdateProject,
        image: Option<UploadedFile>,
    ) -> Result<Project, ContentError> {
        require(&data.title, "title")?;
        require(&data.category, "category")?;
        if let Some(url) = self.upload_url("projects", image).await? {
            data.image_url = Some(url);
        }

        let project = Project::update(&self.pool, id, &data).await?;
        self.bus.publish(Table::Projects, RowOp::Update, project.id);
        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid, _confirm: Confirm) -> Result<(), ContentError> {
        if Project::delete(&self.pool, id).await? == 0 {
            return Err(StoreError::NotFound.into());
        }
        self.bus.publish(Table::Projects, RowOp::Delete, id);
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Two-phase optimistic reorder. The caller has already applied the new
    /// order locally; this issues one `display_order` write per row, all
    /// concurrently, and assigns each row its 1-based position. Any rejection
    /// fails the whole operation and the caller discards its speculative
    /// state and refetches.
    pub async fn reorder_projects(&self, ordered_ids: &[Uuid]) -> Result<(), ContentError> {
        let current = Project::find_all(&self.pool).await?;
        let current_ids: HashSet<Uuid> = current.iter().map(|p| p.id).collect();
        let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != current_ids {
            return Err(ContentError::ReorderMismatch);
        }

        try_join_all(ordered_ids.iter().enumerate().map(|(idx, id)| {
            Project::update_display_order(&self.pool, *id, (idx + 1) as i64)
        }))
        .await?;

        for id in ordered_ids {
            self.bus.publish(Table::Projects, RowOp::Update, *id);
        }
        info!(count = ordered_ids.len(), "projects reordered");
        Ok(())
    }

    // ---- testimonials ----

    pub async fn create_testimonial(
        &self,
        mut data: CreateTestimonial,
        image: Option<UploadedFile>,
    ) -> Result<Testimonial, ContentError> {
        require(&data.name, "name")?;
        require(&data.text, "text")?;
        if let Some(url) = self.upload_url("testimonials", image).await? {
            data.image_url = Some(url);
        }

        let testimonial = Testimonial::create(&self.pool, &data, Uuid::new_v4()).await?;
        self.bus
            .publish(Table::Testimonials, RowOp::Insert, testimonial.id);
        Ok(testimonial)
    }

    pub async fn update_testimonial(
        &self,
        id: Uuid,
        mut data: UpdateTestimonial,
        image: Option<UploadedFile>,
    ) -> Result<Testimonial, ContentError> {
        require(&data.name, "name")?;
        require(&data.text, "text")?;
        if let Some(url) = self.upload_url("testimonials", image).await? {
            data.image_url = Some(url);
        }

        let testimonial = Testimonial::update(&self.pool, id, &data).await?;
        self.bus
            .publish(Table::Testimonials, RowOp::Update, testimonial.id);
        Ok(testimonial)
    }

    pub async fn delete_testimonial(&self, id: Uuid, _confirm: Confirm) -> Result<(), ContentError> {
        if Testimonial::delete(&self.pool, id).await? == 0 {
            return Err(StoreError::NotFound.into());
        }
        self.bus.publish(Table::Testimonials, RowOp::Delete, id);
        Ok(())
    }

    // ---- client logos ----

    pub async fn create_client_logo(
        &self,
        mut data: CreateClientLogo,
        logo: Option<UploadedFile>,
    ) -> Result<ClientLogo, ContentError> {
        require(&data.name, "name")?;
        if let Some(url) = self.upload_url("clients", logo).await? {
            data.logo_url = url;
        }
        require(&data.logo_url, "logo")?;

        let row = ClientLogo::create(&self.pool, &data, Uuid::new_v4()).await?;
        self.bus.publish(Table::ClientLogos, RowOp::Insert, row.id);
        Ok(row)
    }

    pub async fn update_client_logo(
        &self,
        id: Uuid,
        mut data: UpdateClientLogo,
        logo: Option<UploadedFile>,
    ) -> Result<ClientLogo, ContentError> {
        require(&data.name, "name")?;
        if let Some(url) = self.upload_url("clients", logo).await? {
            data.logo_url = Some(url);
        }

        let row = ClientLogo::update(&self.pool, id, &data).await?;
        self.bus.publish(Table::ClientLogos, RowOp::Update, row.id);
        Ok(row)
    }

    pub async fn delete_client_logo(&self, id: Uuid, _confirm: Confirm) -> Result<(), ContentError> {
        if ClientLogo::delete(&self.pool, id).await? == 0 {
            return Err(StoreError::NotFound.into());
        }
        self.bus.publish(Table::ClientLogos, RowOp::Delete, id);
        Ok(())
    }

    // ---- software logos ----

    pub async fn create_software_logo(
        &self,
        mut data: CreateSoftwareLogo,
        logo: Option<UploadedFile>,
    ) -> Result<SoftwareLogo, ContentError> {
        require(&data.name, "name")?;
        if let Some(url) = self.upload_url("software", logo).await? {
            data.logo_url = url;
        }
        require(&data.logo_url, "logo")?;

        let row = SoftwareLogo::create(&self.pool, &data, Uuid::new_v4()).await?;
        self.bus.publish(Table::SoftwareLogos, RowOp::Insert, row.id);
        Ok(row)
    }

    pub async fn update_software_logo(
        &self,
        id: Uuid,
        mut data: UpdateSoftwareLogo,
        logo: Option<UploadedFile>,
    ) -> Result<SoftwareLogo, ContentError> {
        require(&data.name, "name")?;
        if let Some(url) = self.upload_url("software", logo).await? {
            data.logo_url = Some(url);
        }

        let row = SoftwareLogo::update(&self.pool, id, &data).await?;
        self.bus.publish(Table::SoftwareLogos, RowOp::Update, row.id);
        Ok(row)
    }

    pub async fn delete_software_logo(
        &self,
        id: Uuid,
        _confirm: Confirm,
    ) -> Result<(), ContentError> {
        if SoftwareLogo::delete(&self.pool, id).await? == 0 {
            return Err(StoreError::NotFound.into());
        }
        self.bus.publish(Table::SoftwareLogos, RowOp::Delete, id);
        Ok(())
    }

    // ---- profile ----

    /// A missing `avatar` keeps the stored URL, same as the collection image
    /// updates.
    pub async fn update_profile(
        &self,
        id: Uuid,
        mut data: UpdateProfile,
        avatar: Option<UploadedFile>,
    ) -> Result<Profile, ContentError> {
        require(&data.full_name, "full name")?;
        if let Some(url) = self.upload_url("avatars", avatar).await? {
            data.avatar_url = Some(url);
        }

        let profile = Profile::update(&self.pool, id, &data).await?;
        self.bus.publish(Table::Profiles, RowOp::Update, profile.id);
        info!(profile_id = %profile.id, "profile updated");
        Ok(profile)
    }

    // ---- site settings ----

    pub async fn update_setting(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<SiteSetting, ContentError> {
        let setting = SiteSetting::update_value(&self.pool, key, &value.to_string()).await?;
        self.bus
            .publish(Table::SiteSettings, RowOp::Update, setting.id);
        info!(key = %setting.key, "setting updated");
        Ok(setting)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        Err(ContentError::MissingField(field))
    } else {
        Ok(())
    }
}
