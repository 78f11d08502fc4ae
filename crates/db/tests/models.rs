use db::{
    DBService,
    models::{
        client_logo::{ClientLogo, CreateClientLogo},
        profile::Profile,
        project::{CreateProject, Project, UpdateProject},
        site_setting::SiteSetting,
        software_logo::{CreateSoftwareLogo, SoftwareLogo},
        testimonial::{CreateTestimonial, Testimonial},
        user::User,
    },
};
use uuid::Uuid;

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        category: "CORPORATE".to_string(),
        image_url: None,
        video_url: None,
    }
}

#[tokio::test]
async fn projects_are_ordered_by_display_order() {
    let db = DBService::memory().await.unwrap();

    let a = Project::create(&db.pool, &new_project("a"), Uuid::new_v4())
        .await
        .unwrap();
    let b = Project::create(&db.pool, &new_project("b"), Uuid::new_v4())
        .await
        .unwrap();
    let c = Project::create(&db.pool, &new_project("c"), Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!((a.display_order, b.display_order, c.display_order), (1, 2, 3));

    // Move c to the front.
    Project::update_display_order(&db.pool, c.id, 0).await.unwrap();
    let all = Project::find_all(&db.pool).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["c", "a", "b"]);
}

#[tokio::test]
async fn project_update_preserves_urls_when_omitted() {
    let db = DBService::memory().await.unwrap();

    let created = Project::create(
        &db.pool,
        &CreateProject {
            title: "reel".into(),
            category: "SHORT".into(),
            image_url: Some("/assets/projects/reel.png".into()),
            video_url: Some("https://example.com/v".into()),
        },
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    let updated = Project::update(
        &db.pool,
        created.id,
        &UpdateProject {
            title: "reel v2".into(),
            category: "SHORT".into(),
            image_url: None,
            video_url: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "reel v2");
    assert_eq!(updated.image_url.as_deref(), Some("/assets/projects/reel.png"));
    assert_eq!(updated.video_url.as_deref(), Some("https://example.com/v"));
}

#[tokio::test]
async fn project_delete_reports_rows_affected() {
    let db = DBService::memory().await.unwrap();
    let p = Project::create(&db.pool, &new_project("gone"), Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(Project::delete(&db.pool, p.id).await.unwrap(), 1);
    assert_eq!(Project::delete(&db.pool, p.id).await.unwrap(), 0);
    assert!(Project::find_by_id(&db.pool, p.id).await.unwrap().is_none());
}

#[tokio::test]
async fn testimonials_are_newest_first() {
    let db = DBService::memory().await.unwrap();

    for name in ["first", "second", "third"] {
        Testimonial::create(
            &db.pool,
            &CreateTestimonial {
                name: name.to_string(),
                position: "CEO".into(),
                company: "Acme".into(),
                text: "great work".into(),
                image_url: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    }

    let all = Testimonial::find_all(&db.pool).await.unwrap();
    let names: Vec<&str> = all.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn logo_orderings_differ() {
    let db = DBService::memory().await.unwrap();

    for name in ["one", "two"] {
        ClientLogo::create(
            &db.pool,
            &CreateClientLogo {
                name: name.to_string(),
                logo_url: format!("/assets/clients/{name}.png"),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        SoftwareLogo::create(
            &db.pool,
            &CreateSoftwareLogo {
                name: name.to_string(),
                logo_url: format!("/assets/software/{name}.png"),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    }

    let clients = ClientLogo::find_all(&db.pool).await.unwrap();
    let software = SoftwareLogo::find_all(&db.pool).await.unwrap();
    assert_eq!(clients[0].name, "two"); // newest first
    assert_eq!(software[0].name, "one"); // oldest first
}

#[tokio::test]
async fn fetch_is_idempotent_without_intervening_writes() {
    let db = DBService::memory().await.unwrap();
    Project::create(&db.pool, &new_project("stable"), Uuid::new_v4())
        .await
        .unwrap();

    let first = Project::find_all(&db.pool).await.unwrap();
    let second = Project::find_all(&db.pool).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn settings_update_by_key_and_upsert() {
    let db = DBService::memory().await.unwrap();

    // Seeded by migration.
    let seeded = SiteSetting::find_by_key(&db.pool, "hero_title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seeded.section, "hero");

    let updated = SiteSetting::update_value(&db.pool, "hero_title", "\"New title\"")
        .await
        .unwrap();
    assert_eq!(updated.value_json().unwrap(), serde_json::json!("New title"));

    let err = SiteSetting::update_value(&db.pool, "no_such_key", "1").await;
    assert!(matches!(err, Err(sqlx::Error::RowNotFound)));

    let created = SiteSetting::upsert(&db.pool, "footer_note", "\"hi\"", "footer", None)
        .await
        .unwrap();
    let replaced = SiteSetting::upsert(&db.pool, "footer_note", "\"bye\"", "footer", None)
        .await
        .unwrap();
    assert_eq!(created.id, replaced.id);
    assert_eq!(replaced.value, "\"bye\"");

    let all = SiteSetting::find_all(&db.pool).await.unwrap();
    let keys: Vec<(&str, &str)> = all
        .iter()
        .map(|s| (s.section.as_str(), s.key.as_str()))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn profile_is_keyed_by_user_id() {
    let db = DBService::memory().await.unwrap();

    let user = User::create(&db.pool, Uuid::new_v4(), "editor@example.com", "x$y")
        .await
        .unwrap();
    assert!(Profile::find_by_id(&db.pool, user.id).await.unwrap().is_none());

    let profile = Profile::create(&db.pool, user.id, "editor", true).await.unwrap();
    assert!(profile.is_admin);

    Profile::set_admin(&db.pool, user.id, false).await.unwrap();
    let profile = Profile::find_by_id(&db.pool, user.id).await.unwrap().unwrap();
    assert!(!profile.is_admin);
}
