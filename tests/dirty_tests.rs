use garden_backend::dirty::{set_eq, DraftDiff, WorkingCopy};
use garden_backend::entities::project::{Project, ProjectImage, ProjectStatus};
use garden_backend::entities::settings::{
    normalize_taxonomy, ProjectSettings, WebsiteSettings, WebsiteSettingsPatch,
};
use garden_backend::publish_state::Stamp;
use chrono::Utc;
use uuid::Uuid;

fn sample_settings() -> WebsiteSettings {
    let mut settings = WebsiteSettings::default();
    settings.title = "Mallorca Gardens".into();
    settings.tagline = "Premier Gardening Experts".into();
    settings.seo = vec!["gardening".into(), "mallorca".into()];
    settings.content.gallery.projects = vec!["p1".into(), "p2".into()];
    settings.updated_at = Stamp::now();
    settings
}

fn image(id: &str) -> ProjectImage {
    ProjectImage {
        id: id.into(),
        url: format!("https://cdn.example.com/{id}.webp"),
        storage_path: format!("project-images/x/{id}.webp"),
        caption: String::new(),
        alt: String::new(),
    }
}

fn sample_project() -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        title: "Terrace garden".into(),
        description: "A terraced hillside garden".into(),
        location: "Sóller".into(),
        category: "residential".into(),
        tags: vec!["palms".into(), "Irrigation".into()],
        images: vec![image("a"), image("b")],
        cover_image: "https://cdn.example.com/a.webp".into(),
        status: ProjectStatus::Active,
        featured: false,
        testimonial: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn identical_settings_are_clean() {
    let baseline = sample_settings();
    let draft = baseline.clone();
    assert!(!draft.differs_from(&baseline));
}

#[test]
fn stamp_changes_alone_are_clean() {
    let baseline = sample_settings();
    let mut draft = baseline.clone();
    draft.updated_at = Stamp::Unset;
    draft.published_at = Stamp::now();
    draft.project_updated_at = Stamp::now();
    assert!(!draft.differs_from(&baseline));
}

#[test]
fn any_scalar_change_is_dirty() {
    let baseline = sample_settings();

    let mut draft = baseline.clone();
    draft.tagline = "Gardens of distinction".into();
    assert!(draft.differs_from(&baseline));

    let mut draft = baseline.clone();
    draft.social.instagram = "https://instagram.com/gardens".into();
    assert!(draft.differs_from(&baseline));

    let mut draft = baseline.clone();
    draft.content.hero.show_cta = !draft.content.hero.show_cta;
    assert!(draft.differs_from(&baseline));
}

#[test]
fn seo_keywords_compare_as_a_set() {
    let baseline = sample_settings();

    let mut draft = baseline.clone();
    draft.seo = vec!["MALLORCA".into(), "gardening".into()];
    assert!(!draft.differs_from(&baseline));

    let mut draft = baseline.clone();
    draft.seo.push("landscaping".into());
    assert!(draft.differs_from(&baseline));
}

#[test]
fn gallery_selection_compares_as_a_set() {
    let baseline = sample_settings();
    let mut draft = baseline.clone();
    draft.content.gallery.projects = vec!["p2".into(), "p1".into()];
    assert!(!draft.differs_from(&baseline));

    draft.content.gallery.projects = vec!["p1".into()];
    assert!(draft.differs_from(&baseline));
}

#[test]
fn content_card_order_is_meaningful() {
    use garden_backend::entities::settings::ContentCard;

    let baseline = {
        let mut s = sample_settings();
        s.content.services.cards = vec![
            ContentCard { title: "Design".into(), order: 0, ..Default::default() },
            ContentCard { title: "Maintenance".into(), order: 1, ..Default::default() },
        ];
        s
    };

    let mut draft = baseline.clone();
    draft.content.services.cards.swap(0, 1);
    assert!(draft.differs_from(&baseline));
}

#[test]
fn project_tag_reorder_is_clean_but_image_reorder_is_dirty() {
    let baseline = sample_project();

    let mut draft = baseline.clone();
    draft.tags = vec!["irrigation".into(), "Palms".into()];
    assert!(!draft.differs_from(&baseline));

    let mut draft = baseline.clone();
    draft.images.swap(0, 1);
    assert!(draft.differs_from(&baseline));
}

#[test]
fn project_timestamps_are_excluded() {
    let baseline = sample_project();
    let mut draft = baseline.clone();
    draft.updated_at = Utc::now() + chrono::Duration::hours(1);
    assert!(!draft.differs_from(&baseline));

    draft.featured = true;
    assert!(draft.differs_from(&baseline));
}

#[test]
fn pending_uploads_make_a_working_copy_dirty() {
    let baseline = sample_settings();
    let copy = WorkingCopy {
        draft: baseline.clone(),
        pending_uploads: 1,
    };
    assert!(copy.is_dirty(&baseline));

    let copy = WorkingCopy {
        draft: baseline.clone(),
        pending_uploads: 0,
    };
    assert!(!copy.is_dirty(&baseline));
}

#[test]
fn taxonomy_compares_as_case_insensitive_set() {
    let baseline = ProjectSettings {
        categories: vec!["Residential".into(), "Commercial".into()],
        tags: vec!["palms".into()],
        updated_at: Stamp::now(),
    };

    let draft = ProjectSettings {
        categories: vec!["commercial".into(), "RESIDENTIAL".into()],
        tags: vec!["Palms".into()],
        updated_at: Stamp::Unset,
    };
    assert!(!draft.differs_from(&baseline));

    let draft = ProjectSettings {
        categories: vec!["Residential".into()],
        tags: vec!["palms".into()],
        updated_at: Stamp::Unset,
    };
    assert!(draft.differs_from(&baseline));
}

#[test]
fn set_eq_collapses_duplicates_and_whitespace() {
    let a = vec!["Palms ".to_string(), "palms".to_string(), "ferns".to_string()];
    let b = vec!["ferns".to_string(), "PALMS".to_string()];
    assert!(set_eq(&a, &b));
    assert!(!set_eq(&a, &["ferns".to_string()]));
}

#[test]
fn normalize_taxonomy_keeps_first_spelling() {
    let values = vec![
        " Residential ".to_string(),
        "residential".to_string(),
        "".to_string(),
        "Landscape".to_string(),
    ];
    assert_eq!(
        normalize_taxonomy(values),
        vec!["Residential".to_string(), "Landscape".to_string()]
    );
}

#[test]
fn patch_merges_only_present_fields() {
    let baseline = sample_settings();

    let patch: WebsiteSettingsPatch =
        serde_json::from_value(serde_json::json!({"tagline": "New tagline"})).unwrap();

    let mut merged = baseline.clone();
    patch.apply(&mut merged);

    assert_eq!(merged.tagline, "New tagline");
    assert_eq!(merged.title, baseline.title);
    assert_eq!(merged.content, baseline.content);
    assert!(merged.differs_from(&baseline));
}

#[test]
fn empty_patch_is_a_no_op_merge() {
    let baseline = sample_settings();
    let patch: WebsiteSettingsPatch = serde_json::from_value(serde_json::json!({})).unwrap();

    let mut merged = baseline.clone();
    patch.apply(&mut merged);
    assert!(!merged.differs_from(&baseline));
}

#[test]
fn patch_replaces_sections_whole() {
    let baseline = sample_settings();
    let patch: WebsiteSettingsPatch = serde_json::from_value(serde_json::json!({
        "content": {
            "about": {"title": "About us", "text": "Since 1998", "showCTA": false}
        }
    }))
    .unwrap();

    let mut merged = baseline.clone();
    patch.apply(&mut merged);

    assert_eq!(merged.content.about.title, "About us");
    // Untouched sections survive.
    assert_eq!(merged.content.gallery, baseline.content.gallery);
}
