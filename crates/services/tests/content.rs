use db::{
    DBService,
    models::{
        client_logo::CreateClientLogo,
        profile::{Profile, UpdateProfile},
        project::{CreateProject, Project, UpdateProject},
        testimonial::CreateTestimonial,
    },
};
use services::services::{
    content::{Confirm, ContentError, ContentService, UploadedFile},
    error::StoreError,
    events::{EventBus, RowOp, Table},
    storage::StorageService,
    sync::ProjectsSync,
};
use uuid::Uuid;

struct Fixture {
    db: DBService,
    bus: EventBus,
    content: ContentService,
    _assets: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let db = DBService::memory().await.unwrap();
    let bus = EventBus::default();
    let assets = tempfile::tempdir().unwrap();
    let storage = StorageService::new(assets.path(), "/assets");
    let content = ContentService::new(db.pool.clone(), bus.clone(), storage);
    Fixture { db, bus, content, _assets: assets }
}

fn png(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: format!("{name}.png"),
        content_type: Some("image/png".to_string()),
        bytes: b"png".to_vec(),
    }
}

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        category: "COMMERCIAL".to_string(),
        image_url: None,
        video_url: None,
    }
}

#[tokio::test]
async fn create_project_validates_required_fields() {
    let f = fixture().await;

    let err = f.content.create_project(new_project("  "), None).await;
    assert!(matches!(err, Err(ContentError::MissingField("title"))));

    let err = f
        .content
        .create_project(
            CreateProject { category: "".into(), ..new_project("ok") },
            None,
        )
        .await;
    assert!(matches!(err, Err(ContentError::MissingField("category"))));
}

#[tokio::test]
async fn create_project_uploads_image_and_substitutes_url() {
    let f = fixture().await;
    let mut rx = f.bus.subscribe();

    let project = f
        .content
        .create_project(new_project("teaser"), Some(png("frame")))
        .await
        .unwrap();

    let url = project.image_url.unwrap();
    assert!(url.starts_with("/assets/projects/"));
    assert!(url.ends_with(".png"));

    let event = rx.recv().await.unwrap();
    assert_eq!((event.table, event.op, event.row_id), (Table::Projects, RowOp::Insert, project.id));
}

#[tokio::test]
async fn update_without_file_preserves_existing_url() {
    let f = fixture().await;

    let created = f
        .content
        .create_project(new_project("keeper"), Some(png("original")))
        .await
        .unwrap();
    let original_url = created.image_url.clone().unwrap();

    let updated = f
        .content
        .update_project(
            created.id,
            UpdateProject {
                title: "keeper v2".into(),
                category: "COMMERCIAL".into(),
                image_url: None,
                video_url: None,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.image_url.as_deref(), Some(original_url.as_str()));
}

#[tokio::test]
async fn update_with_file_replaces_url() {
    let f = fixture().await;
    let created = f
        .content
        .create_project(new_project("replace"), Some(png("old")))
        .await
        .unwrap();

    let updated = f
        .content
        .update_project(
            created.id,
            UpdateProject {
                title: "replace".into(),
                category: "COMMERCIAL".into(),
                image_url: None,
                video_url: None,
            },
            Some(png("new")),
        )
        .await
        .unwrap();

    assert_ne!(updated.image_url, created.image_url);
}

#[tokio::test]
async fn confirmed_delete_removes_exactly_the_targeted_row() {
    let f = fixture().await;
    let keep = f.content.create_project(new_project("keep"), None).await.unwrap();
    let gone = f.content.create_project(new_project("gone"), None).await.unwrap();

    f.content
        .delete_project(gone.id, Confirm::Confirmed)
        .await
        .unwrap();

    let remaining = Project::find_all(&f.db.pool).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);

    let err = f.content.delete_project(gone.id, Confirm::Confirmed).await;
    assert!(matches!(err, Err(ContentError::Store(StoreError::NotFound))));
}

#[tokio::test]
async fn reorder_assigns_positional_indices() {
    let f = fixture().await;
    let a = f.content.create_project(new_project("a"), None).await.unwrap();
    let b = f.content.create_project(new_project("b"), None).await.unwrap();
    let c = f.content.create_project(new_project("c"), None).await.unwrap();

    // Drag c to the front.
    f.content.reorder_projects(&[c.id, a.id, b.id]).await.unwrap();

    let all = Project::find_all(&f.db.pool).await.unwrap();
    let order: Vec<(&str, i64)> = all.iter().map(|p| (p.title.as_str(), p.display_order)).collect();
    assert_eq!(order, [("c", 1), ("a", 2), ("b", 3)]);
}

#[tokio::test]
async fn failed_reorder_leaves_remote_state_untouched_and_caller_reverts() {
    let f = fixture().await;
    let a = f.content.create_project(new_project("a"), None).await.unwrap();
    let b = f.content.create_project(new_project("b"), None).await.unwrap();

    let sync = ProjectsSync::start(f.db.pool.clone(), &f.bus).await;
    let before = sync.items().await;

    // One id does not belong to the table: the whole reorder is rejected.
    let err = f.content.reorder_projects(&[Uuid::new_v4(), a.id, b.id]).await;
    assert!(matches!(err, Err(ContentError::ReorderMismatch)));

    // The caller discards its speculative order and refetches.
    sync.refetch().await;
    assert_eq!(sync.items().await, before);
}

#[tokio::test]
async fn reorder_rejects_duplicate_ids() {
    let f = fixture().await;
    let a = f.content.create_project(new_project("a"), None).await.unwrap();
    f.content.create_project(new_project("b"), None).await.unwrap();

    let err = f.content.reorder_projects(&[a.id, a.id]).await;
    assert!(matches!(err, Err(ContentError::ReorderMismatch)));
}

#[tokio::test]
async fn logo_create_requires_an_image() {
    let f = fixture().await;

    let err = f
        .content
        .create_client_logo(
            CreateClientLogo { name: "acme".into(), logo_url: String::new() },
            None,
        )
        .await;
    assert!(matches!(err, Err(ContentError::MissingField("logo"))));

    let row = f
        .content
        .create_client_logo(
            CreateClientLogo { name: "acme".into(), logo_url: String::new() },
            Some(png("acme")),
        )
        .await
        .unwrap();
    assert!(row.logo_url.starts_with("/assets/clients/"));
}

#[tokio::test]
async fn testimonial_crud_publishes_events() {
    let f = fixture().await;
    let mut rx = f.bus.subscribe();

    let t = f
        .content
        .create_testimonial(
            CreateTestimonial {
                name: "producer".into(),
                position: "lead".into(),
                company: "studio".into(),
                text: "fast turnaround".into(),
                image_url: None,
            },
            None,
        )
        .await
        .unwrap();
    f.content.delete_testimonial(t.id, Confirm::Confirmed).await.unwrap();

    assert_eq!(rx.recv().await.unwrap().op, RowOp::Insert);
    assert_eq!(rx.recv().await.unwrap().op, RowOp::Delete);
}

#[tokio::test]
async fn profile_update_uploads_avatar_and_publishes() {
    let f = fixture().await;
    let user_id = Uuid::new_v4();
    Profile::create(&f.db.pool, user_id, "editor", true).await.unwrap();
    let mut rx = f.bus.subscribe();

    let profile = f
        .content
        .update_profile(
            user_id,
            UpdateProfile { full_name: "Jane Editor".into(), avatar_url: None },
            Some(png("headshot")),
        )
        .await
        .unwrap();

    assert_eq!(profile.full_name, "Jane Editor");
    let url = profile.avatar_url.clone().unwrap();
    assert!(url.starts_with("/assets/avatars/"));
    assert!(url.ends_with(".png"));

    let event = rx.recv().await.unwrap();
    assert_eq!(
        (event.table, event.op, event.row_id),
        (Table::Profiles, RowOp::Update, user_id)
    );

    // A later update without a new file keeps the stored avatar.
    let updated = f
        .content
        .update_profile(
            user_id,
            UpdateProfile { full_name: "Jane Editor".into(), avatar_url: None },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.avatar_url.as_deref(), Some(url.as_str()));

    let err = f
        .content
        .update_profile(
            user_id,
            UpdateProfile { full_name: "  ".into(), avatar_url: None },
            None,
        )
        .await;
    assert!(matches!(err, Err(ContentError::MissingField("full name"))));
}

#[tokio::test]
async fn settings_update_rejects_unknown_keys() {
    let f = fixture().await;

    let updated = f
        .content
        .update_setting("hero_title", serde_json::json!("Showreel 2026"))
        .await
        .unwrap();
    assert_eq!(updated.value_json().unwrap(), serde_json::json!("Showreel 2026"));

    let err = f
        .content
        .update_setting("made_up_key", serde_json::json!(1))
        .await;
    assert!(matches!(err, Err(ContentError::Store(StoreError::NotFound))));
}
