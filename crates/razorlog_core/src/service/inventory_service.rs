//! Inventory use-case service.
//!
//! # Responsibility
//! - Turn create/update payloads into repository mutations.
//! - Enforce that usage records reference an existing razor and blade.
//! - Apply pagination defaults and assemble statistics views.
//!
//! # Invariants
//! - Repository errors are never swallowed; `NotFound` keeps its kind.
//! - Delete and update fetch the entity first, so a missing entity reports
//!   `NotFound` before any backend capability error.
//! - Service layer remains storage-agnostic.

use crate::model::blade::{Blade, CreateBladeRequest, UpdateBladeRequest};
use crate::model::page::{ListQuery, Page, PageRequest};
use crate::model::razor::{CreateRazorRequest, Razor, UpdateRazorRequest};
use crate::model::usage::{
    effective_blade_usage_count, CreateUsageRecordRequest, UpdateUsageRecordRequest, UsageRecord,
};
use crate::model::{EntityId, EntityKind, ValidationError};
use crate::repo::inventory_repo::{BackendKind, InventoryRepository, Listing, RepoError};
use crate::stats::{total_pages, DashboardData, UsageStatistics, DASHBOARD_RECENT_LIMIT};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error categories exposed to transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    DanglingReference,
    BackendUnavailable,
    ValidationFailure,
}

/// Service-level errors for inventory use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target entity does not exist.
    NotFound { entity: EntityKind, id: EntityId },
    /// A usage record points at a razor or blade that does not exist.
    DanglingReference { entity: EntityKind, id: EntityId },
    /// Storage failed or the active backend lacks the operation.
    BackendUnavailable(String),
    /// Entity failed field-level validation.
    Validation(ValidationError),
    /// Persisted data could not be read back.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DanglingReference { .. } => ErrorKind::DanglingReference,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::BackendUnavailable(_) | Self::Repo(_) => ErrorKind::BackendUnavailable,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DanglingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::BackendUnavailable(reason) => write!(f, "backend unavailable: {reason}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::DanglingReference { entity, id } => Self::DanglingReference { entity, id },
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::InvalidData(_) => Self::Repo(value),
            other => Self::BackendUnavailable(other.to_string()),
        }
    }
}

/// Use-case service over one inventory repository.
pub struct InventoryService<R: InventoryRepository> {
    repo: R,
}

impl<R: InventoryRepository> InventoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.repo.backend_kind()
    }

    pub fn create_razor(&self, request: CreateRazorRequest) -> ServiceResult<Razor> {
        let razor = self.repo.create_razor(&request.into_draft())?;
        info!(
            "event=razor_create module=service status=ok id={}",
            razor.id
        );
        Ok(razor)
    }

    pub fn get_razor(&self, id: EntityId) -> ServiceResult<Razor> {
        Ok(self.repo.get_razor(id)?)
    }

    pub fn list_razors(&self, request: PageRequest) -> ServiceResult<Page<Razor>> {
        paginate(request, |query| self.repo.list_razors(query))
    }

    /// Applies a partial update.
    ///
    /// Blank `brand`/`model` and absent `purchase_date`/`price` keep the stored
    /// values; `notes` is always overwritten.
    pub fn update_razor(&self, id: EntityId, request: UpdateRazorRequest) -> ServiceResult<Razor> {
        let mut razor = self.repo.get_razor(id)?;
        apply_razor_patch(&mut razor, request);
        Ok(self.repo.update_razor(&razor).map_err(log_mutation_error)?)
    }

    pub fn delete_razor(&self, id: EntityId) -> ServiceResult<()> {
        self.repo.get_razor(id)?;
        self.repo.delete_razor(id).map_err(log_mutation_error)?;
        info!("event=razor_delete module=service status=ok id={}", id);
        Ok(())
    }

    pub fn create_blade(&self, request: CreateBladeRequest) -> ServiceResult<Blade> {
        let blade = self.repo.create_blade(&request.into_draft())?;
        info!(
            "event=blade_create module=service status=ok id={}",
            blade.id
        );
        Ok(blade)
    }

    pub fn get_blade(&self, id: EntityId) -> ServiceResult<Blade> {
        Ok(self.repo.get_blade(id)?)
    }

    pub fn list_blades(&self, request: PageRequest) -> ServiceResult<Page<Blade>> {
        paginate(request, |query| self.repo.list_blades(query))
    }

    /// Applies a partial update.
    ///
    /// Blank `brand`/`model` and absent `purchase_date`/`unit_price` keep the
    /// stored values; compatibility, quantities and notes are always overwritten.
    pub fn update_blade(&self, id: EntityId, request: UpdateBladeRequest) -> ServiceResult<Blade> {
        let mut blade = self.repo.get_blade(id)?;
        apply_blade_patch(&mut blade, request);
        Ok(self.repo.update_blade(&blade).map_err(log_mutation_error)?)
    }

    pub fn delete_blade(&self, id: EntityId) -> ServiceResult<()> {
        self.repo.get_blade(id)?;
        self.repo.delete_blade(id).map_err(log_mutation_error)?;
        info!("event=blade_delete module=service status=ok id={}", id);
        Ok(())
    }

    /// Records a shave; the repository rejects missing references atomically.
    pub fn create_usage_record(
        &self,
        request: CreateUsageRecordRequest,
    ) -> ServiceResult<UsageRecord> {
        let record = self
            .repo
            .create_usage_record(&request.into_draft())
            .map_err(log_reference_error)?;
        info!(
            "event=usage_create module=service status=ok id={} razor_id={} blade_id={}",
            record.id, record.razor_id, record.blade_id
        );
        Ok(record)
    }

    pub fn get_usage_record(&self, id: EntityId) -> ServiceResult<UsageRecord> {
        Ok(self.repo.get_usage_record(id)?)
    }

    /// Lists usage records most-recent first.
    pub fn list_usage_records(&self, request: PageRequest) -> ServiceResult<Page<UsageRecord>> {
        paginate(request, |query| self.repo.list_usage_records(query))
    }

    /// Applies a partial update, then re-checks both references.
    ///
    /// References are checked before the write so a dangling patch reports
    /// `DanglingReference` even where the backend cannot update records.
    ///
    /// Absent `usage_time`, `razor_id`, `blade_id` and `rating` keep the stored
    /// values; the remaining fields are always overwritten.
    pub fn update_usage_record(
        &self,
        id: EntityId,
        request: UpdateUsageRecordRequest,
    ) -> ServiceResult<UsageRecord> {
        let mut record = self.repo.get_usage_record(id)?;
        apply_usage_patch(&mut record, request);
        self.ensure_references(record.razor_id, record.blade_id)?;
        Ok(self
            .repo
            .update_usage_record(&record)
            .map_err(log_mutation_error)?)
    }

    pub fn delete_usage_record(&self, id: EntityId) -> ServiceResult<()> {
        self.repo.get_usage_record(id)?;
        self.repo
            .delete_usage_record(id)
            .map_err(log_mutation_error)?;
        info!("event=usage_delete module=service status=ok id={}", id);
        Ok(())
    }

    pub fn statistics(&self) -> ServiceResult<UsageStatistics> {
        Ok(self.repo.usage_statistics()?)
    }

    /// Returns at most `limit` usage records, most-recent first.
    pub fn recent_usage(&self, limit: u32) -> ServiceResult<Vec<UsageRecord>> {
        Ok(self.repo.recent_usage_records(limit)?)
    }

    /// Statistics plus the five most recent usage records.
    pub fn dashboard(&self) -> ServiceResult<DashboardData> {
        Ok(DashboardData {
            statistics: self.statistics()?,
            recent_records: self.recent_usage(DASHBOARD_RECENT_LIMIT)?,
        })
    }

    fn ensure_references(&self, razor_id: EntityId, blade_id: EntityId) -> ServiceResult<()> {
        self.repo
            .get_razor(razor_id)
            .map_err(|err| dangling(err, EntityKind::Razor, razor_id))?;
        self.repo
            .get_blade(blade_id)
            .map_err(|err| dangling(err, EntityKind::Blade, blade_id))?;
        Ok(())
    }
}

fn paginate<T>(
    request: PageRequest,
    list: impl FnOnce(ListQuery) -> Result<Listing<T>, RepoError>,
) -> ServiceResult<Page<T>> {
    let (page, page_size) = request.normalized();
    let listing = list(ListQuery::from_page(page, page_size))?;
    Ok(Page {
        items: listing.items,
        page,
        page_size,
        total: listing.total,
        total_pages: total_pages(listing.total, page_size),
    })
}

fn dangling(err: RepoError, entity: EntityKind, id: EntityId) -> RepoError {
    match err {
        RepoError::NotFound { .. } => {
            log_reference_error(RepoError::DanglingReference { entity, id })
        }
        other => other,
    }
}

fn log_reference_error(err: RepoError) -> RepoError {
    if let RepoError::DanglingReference { entity, id } = &err {
        warn!(
            "event=usage_reference_check module=service status=dangling entity={} id={}",
            entity.as_str(),
            id
        );
    }
    err
}

fn log_mutation_error(err: RepoError) -> RepoError {
    if let RepoError::Unsupported { backend, operation } = &err {
        warn!(
            "event=store_mutation module=service status=unsupported backend={} operation={}",
            backend, operation
        );
    }
    err
}

fn apply_razor_patch(razor: &mut Razor, request: UpdateRazorRequest) {
    if !request.brand.trim().is_empty() {
        razor.brand = request.brand;
    }
    if !request.model.trim().is_empty() {
        razor.model = request.model;
    }
    if request.purchase_date.is_some() {
        razor.purchase_date = request.purchase_date;
    }
    if request.price.is_some() {
        razor.price = request.price;
    }
    razor.notes = request.notes;
}

fn apply_blade_patch(blade: &mut Blade, request: UpdateBladeRequest) {
    if !request.brand.trim().is_empty() {
        blade.brand = request.brand;
    }
    if !request.model.trim().is_empty() {
        blade.model = request.model;
    }
    blade.compatible_razors = request.compatible_razors;
    if request.purchase_date.is_some() {
        blade.purchase_date = request.purchase_date;
    }
    if request.unit_price.is_some() {
        blade.unit_price = request.unit_price;
    }
    blade.total_quantity = request.total_quantity;
    blade.remaining_quantity = request.remaining_quantity;
    blade.notes = request.notes;
}

fn apply_usage_patch(record: &mut UsageRecord, request: UpdateUsageRecordRequest) {
    if let Some(usage_time) = request.usage_time {
        record.usage_time = usage_time;
    }
    if let Some(razor_id) = request.razor_id {
        record.razor_id = razor_id;
    }
    if let Some(blade_id) = request.blade_id {
        record.blade_id = blade_id;
    }
    if request.rating.is_some() {
        record.rating = request.rating;
    }
    record.blade_usage_count = effective_blade_usage_count(request.blade_usage_count);
    record.experience_text = request.experience_text;
    record.need_blade_change = request.need_blade_change;
}

#[cfg(test)]
mod tests {
    use super::{apply_razor_patch, apply_usage_patch, ErrorKind, ServiceError};
    use crate::model::razor::{Razor, UpdateRazorRequest};
    use crate::model::usage::{UpdateUsageRecordRequest, UsageRecord};
    use crate::model::EntityKind;
    use crate::repo::inventory_repo::{BackendKind, RepoError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn blank_strings_keep_stored_razor_fields() {
        let mut razor = Razor::new("Gillette", "Fusion 5");
        razor.price = Some(89.9);
        razor.notes = "old".to_string();

        apply_razor_patch(
            &mut razor,
            UpdateRazorRequest {
                brand: "  ".to_string(),
                model: "Fusion 5 ProGlide".to_string(),
                ..UpdateRazorRequest::default()
            },
        );

        assert_eq!(razor.brand, "Gillette");
        assert_eq!(razor.model, "Fusion 5 ProGlide");
        assert_eq!(razor.price, Some(89.9));
        assert_eq!(razor.notes, "");
    }

    #[test]
    fn usage_patch_keeps_absent_optionals_and_defaults_count() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        let mut record = UsageRecord::new(time, 1, 2);
        record.rating = Some(3);
        record.blade_usage_count = 4;
        record.need_blade_change = true;

        apply_usage_patch(
            &mut record,
            UpdateUsageRecordRequest {
                blade_id: Some(5),
                experience_text: "smooth".to_string(),
                ..UpdateUsageRecordRequest::default()
            },
        );

        assert_eq!(record.usage_time, time);
        assert_eq!((record.razor_id, record.blade_id), (1, 5));
        assert_eq!(record.rating, Some(3));
        assert_eq!(record.blade_usage_count, 1);
        assert_eq!(record.experience_text, "smooth");
        assert!(!record.need_blade_change);
    }

    #[test]
    fn repo_errors_map_to_service_kinds() {
        let not_found: ServiceError = RepoError::NotFound {
            entity: EntityKind::Blade,
            id: 3,
        }
        .into();
        let unsupported: ServiceError = RepoError::Unsupported {
            backend: BackendKind::Fallback,
            operation: "delete_razor",
        }
        .into();
        let unavailable: ServiceError = RepoError::Unavailable("lock poisoned".to_string()).into();

        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.to_string(), "blade not found: 3");
        assert_eq!(unsupported.kind(), ErrorKind::BackendUnavailable);
        assert!(unsupported.to_string().contains("delete_razor"));
        assert_eq!(unavailable.kind(), ErrorKind::BackendUnavailable);
    }
}
