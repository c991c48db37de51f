use chrono::{Duration, TimeZone, Utc};
use razorlog_core::db::open_db_in_memory;
use razorlog_core::{
    CreateBladeRequest, CreateRazorRequest, CreateUsageRecordRequest, EntityKind, ErrorKind,
    InventoryService, MemoryInventoryRepository, PageRequest, RepoError, ServiceError,
    SqliteInventoryRepository, UpdateBladeRequest, UpdateRazorRequest, UpdateUsageRecordRequest,
    DASHBOARD_RECENT_LIMIT,
};

fn durable_service() -> InventoryService<SqliteInventoryRepository> {
    let repo = SqliteInventoryRepository::try_new(open_db_in_memory().unwrap()).unwrap();
    InventoryService::new(repo)
}

fn seeded_fallback_service() -> InventoryService<MemoryInventoryRepository> {
    InventoryService::new(MemoryInventoryRepository::new())
}

fn create_razor_request(brand: &str, model: &str) -> CreateRazorRequest {
    CreateRazorRequest {
        brand: brand.to_string(),
        model: model.to_string(),
        ..CreateRazorRequest::default()
    }
}

fn create_blade_request(brand: &str, model: &str) -> CreateBladeRequest {
    CreateBladeRequest {
        brand: brand.to_string(),
        model: model.to_string(),
        total_quantity: 10,
        remaining_quantity: 8,
        ..CreateBladeRequest::default()
    }
}

fn usage_request(razor_id: i64, blade_id: i64) -> CreateUsageRecordRequest {
    CreateUsageRecordRequest {
        usage_time: Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
        razor_id,
        blade_id,
        blade_usage_count: 0,
        rating: None,
        experience_text: String::new(),
        need_blade_change: false,
    }
}

fn seed_durable(service: &InventoryService<SqliteInventoryRepository>) {
    service
        .create_razor(create_razor_request("Gillette", "Fusion 5"))
        .unwrap();
    service
        .create_razor(create_razor_request("Philips", "OneBlade Pro"))
        .unwrap();
    service
        .create_blade(create_blade_request("Gillette", "Fusion 5 Cartridge"))
        .unwrap();
    service
        .create_blade(create_blade_request("Philips", "OneBlade Blade"))
        .unwrap();
}

#[test]
fn usage_record_with_unknown_razor_is_a_dangling_reference() {
    let service = seeded_fallback_service();
    let before = service.statistics().unwrap();

    let err = service
        .create_usage_record(usage_request(9999, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DanglingReference {
            entity: EntityKind::Razor,
            id: 9999
        }
    ));
    assert_eq!(err.kind(), ErrorKind::DanglingReference);
    assert!(err.to_string().contains("razor"));

    let err = service
        .create_usage_record(usage_request(1, 9999))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DanglingReference {
            entity: EntityKind::Blade,
            id: 9999
        }
    ));

    assert_eq!(service.statistics().unwrap(), before);
}

#[test]
fn seeded_scenario_defaults_usage_count_and_updates_statistics() {
    let service = seeded_fallback_service();

    let record = service.create_usage_record(usage_request(1, 1)).unwrap();
    assert_eq!(record.blade_usage_count, 1);
    assert_eq!(record.razor.as_ref().map(|razor| razor.id), Some(1));

    let stats = service.statistics().unwrap();
    assert_eq!(stats.razor_count, 2);
    assert_eq!(stats.blade_count, 2);
    assert_eq!(stats.total_usage, 2);
    assert_eq!(stats.average_rating, 4.0);
}

#[test]
fn durable_scenario_defaults_usage_count_and_updates_statistics() {
    let service = durable_service();
    seed_durable(&service);

    let mut rated = usage_request(2, 2);
    rated.rating = Some(3);
    service.create_usage_record(rated).unwrap();
    let record = service.create_usage_record(usage_request(1, 1)).unwrap();
    assert_eq!(record.blade_usage_count, 1);

    let stats = service.statistics().unwrap();
    assert_eq!(stats.razor_count, 2);
    assert_eq!(stats.blade_count, 2);
    assert_eq!(stats.total_usage, 2);
    assert_eq!(stats.average_rating, 3.0);
}

#[test]
fn list_applies_page_defaults_and_ceiling_total_pages() {
    let service = durable_service();
    for index in 0..23 {
        service
            .create_razor(create_razor_request("Brand", &format!("Model {index}")))
            .unwrap();
    }

    let first = service.list_razors(PageRequest::default()).unwrap();
    assert_eq!((first.page, first.page_size), (1, 10));
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 23);
    assert_eq!(first.total_pages, 3);

    let last = service.list_razors(PageRequest::new(3, 0)).unwrap();
    assert_eq!(last.items.len(), 3);

    let beyond = service.list_razors(PageRequest::new(u32::MAX, 10)).unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 23);
}

#[test]
fn empty_collection_has_zero_pages() {
    let service = durable_service();
    let page = service.list_blades(PageRequest::new(0, 0)).unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn razor_update_is_partial() {
    let service = durable_service();
    let created = service
        .create_razor(CreateRazorRequest {
            brand: "Gillette".to_string(),
            model: "Fusion 5".to_string(),
            price: Some(89.9),
            notes: "daily".to_string(),
            ..CreateRazorRequest::default()
        })
        .unwrap();

    let updated = service
        .update_razor(
            created.id,
            UpdateRazorRequest {
                model: "Fusion 5 ProGlide".to_string(),
                ..UpdateRazorRequest::default()
            },
        )
        .unwrap();

    assert_eq!(updated.brand, "Gillette");
    assert_eq!(updated.model, "Fusion 5 ProGlide");
    assert_eq!(updated.price, Some(89.9));
    assert_eq!(updated.notes, "");
    assert_eq!(service.get_razor(created.id).unwrap(), updated);
}

#[test]
fn blade_update_overwrites_quantities_on_both_backends() {
    let durable = durable_service();
    seed_durable(&durable);
    let fallback = seeded_fallback_service();

    let request = UpdateBladeRequest {
        compatible_razors: "[1,2]".to_string(),
        total_quantity: 10,
        remaining_quantity: 0,
        ..UpdateBladeRequest::default()
    };
    let from_durable = durable.update_blade(1, request.clone()).unwrap();
    let from_fallback = fallback.update_blade(1, request).unwrap();

    for blade in [from_durable, from_fallback] {
        assert_eq!(blade.brand, "Gillette");
        assert_eq!(blade.compatible_razors, "[1,2]");
        assert_eq!(blade.remaining_quantity, 0);
        assert_eq!(blade.notes, "");
    }
}

#[test]
fn update_rejects_values_that_fail_validation() {
    let service = seeded_fallback_service();
    let err = service
        .update_blade(
            1,
            UpdateBladeRequest {
                unit_price: Some(f64::NAN),
                ..UpdateBladeRequest::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
}

#[test]
fn fallback_razor_mutations_report_backend_unavailable() {
    let service = seeded_fallback_service();

    let err = service
        .update_razor(1, UpdateRazorRequest::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);

    let err = service.delete_razor(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    assert!(service.get_razor(1).is_ok());

    let err = service.delete_razor(9999).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service.delete_usage_record(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
}

#[test]
fn deleting_referenced_razor_succeeds_on_durable_backend() {
    let service = durable_service();
    seed_durable(&service);
    let record = service.create_usage_record(usage_request(1, 1)).unwrap();

    service.delete_razor(1).unwrap();

    let orphaned = service.get_usage_record(record.id).unwrap();
    assert!(orphaned.razor.is_none());
    assert_eq!(
        service.get_razor(1).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.delete_razor(1).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn usage_update_applies_present_fields_and_checks_references() {
    let service = durable_service();
    seed_durable(&service);
    let mut request = usage_request(1, 1);
    request.rating = Some(4);
    request.blade_usage_count = 3;
    let record = service.create_usage_record(request).unwrap();

    let err = service
        .update_usage_record(
            record.id,
            UpdateUsageRecordRequest {
                blade_id: Some(9999),
                ..UpdateUsageRecordRequest::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DanglingReference {
            entity: EntityKind::Blade,
            id: 9999
        }
    ));
    assert_eq!(service.get_usage_record(record.id).unwrap(), record);

    let later = record.usage_time + Duration::hours(1);
    let updated = service
        .update_usage_record(
            record.id,
            UpdateUsageRecordRequest {
                usage_time: Some(later),
                razor_id: Some(2),
                experience_text: "irritation".to_string(),
                need_blade_change: true,
                ..UpdateUsageRecordRequest::default()
            },
        )
        .unwrap();

    assert_eq!(updated.usage_time, later);
    assert_eq!(updated.razor_id, 2);
    assert_eq!(updated.blade_id, 1);
    assert_eq!(updated.rating, Some(4));
    assert_eq!(updated.blade_usage_count, 1);
    assert_eq!(updated.experience_text, "irritation");
    assert!(updated.need_blade_change);
    assert_eq!(updated.razor.as_ref().map(|razor| razor.id), Some(2));
}

#[test]
fn dashboard_combines_statistics_and_recent_records() {
    let service = durable_service();
    seed_durable(&service);
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
    for day in 0..8 {
        let mut request = usage_request(1, 1);
        request.usage_time = start + Duration::days(day);
        request.rating = Some(5);
        service.create_usage_record(request).unwrap();
    }

    let dashboard = service.dashboard().unwrap();
    assert_eq!(dashboard.statistics.total_usage, 8);
    assert_eq!(dashboard.statistics.average_rating, 5.0);
    assert_eq!(
        dashboard.recent_records.len(),
        DASHBOARD_RECENT_LIMIT as usize
    );
    assert_eq!(
        dashboard.recent_records[0].usage_time,
        start + Duration::days(7)
    );
}

#[test]
fn create_rejects_blank_brand() {
    let service = durable_service();
    let err = service
        .create_razor(create_razor_request("", "Fusion 5"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
}

#[test]
fn corrupt_rows_are_reported_as_backend_unavailable() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO blades (brand, model, total_quantity, created_at, updated_at)
         VALUES ('Feather', 'Hi-Stainless', -3, 0, 0);",
        [],
    )
    .unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::try_new(conn).unwrap());

    let err = service.get_blade(1).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    assert!(err.to_string().contains("-3"));

    assert_eq!(
        service.list_blades(PageRequest::default()).unwrap_err().kind(),
        ErrorKind::BackendUnavailable
    );
}
