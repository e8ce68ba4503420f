use marketplace_blog::domain::reference::{InlineMedia, InlineTerm, MediaReference, TermReference};
use marketplace_blog::domain::types::{PostId, TermId, TermKind};
use marketplace_blog::forms::posts::{PostListFilters, PostPayload};
use marketplace_blog::forms::taxonomy::{TermForm, TermFormPayload, TermListFilters};
use marketplace_blog::services::ServiceError;
use marketplace_blog::services::posts::{UpsertContext, delete_post, upsert_post};
use marketplace_blog::services::queries::get_post;
use marketplace_blog::services::taxonomy::{create_term, delete_term, list_terms, update_term};

mod common;

fn create_ctx(workspace: Option<i32>) -> UpsertContext {
    UpsertContext::create(common::author(), workspace.and_then(common::workspace))
}

fn inline_tag(name: &str) -> TermReference {
    TermReference::Inline(InlineTerm {
        name: Some(name.into()),
        ..InlineTerm::default()
    })
}

fn term_form(name: &str) -> TermFormPayload {
    TermFormPayload::try_from(TermForm {
        name: name.into(),
        ..TermForm::default()
    })
    .unwrap()
}

#[test]
fn creates_post_with_new_terms_and_keeps_slug_on_resubmit() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let payload = PostPayload {
        category: Some(TermReference::from("Design")),
        tags: Some(vec![inline_tag("Growth")]),
        ..PostPayload::new("Hello", "Some words here")
    };

    let created = upsert_post(&repo, payload.clone(), &create_ctx(None)).unwrap();

    assert_eq!(created.slug, "hello");
    assert_eq!(created.status, "draft");
    assert_eq!(created.published_at, None);
    assert_eq!(created.reading_time_minutes, 1);
    assert_eq!(created.category.as_ref().map(|c| c.slug.as_str()), Some("design"));
    assert_eq!(created.category.as_ref().and_then(|c| c.workspace_id), None);
    let tags: Vec<&str> = created.tags.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(tags, vec!["growth"]);
    assert_eq!(created.author.as_ref().map(|a| a.id), Some(common::AUTHOR_ID));

    let ctx = UpsertContext::edit(common::author(), PostId::new(created.id).unwrap());
    let resubmitted = upsert_post(&repo, payload, &ctx).unwrap();

    assert_eq!(resubmitted.id, created.id);
    assert_eq!(resubmitted.slug, "hello");
    assert_eq!(test_db.count_rows("categories"), 1);
    assert_eq!(test_db.count_rows("tags"), 1);
}

#[test]
fn second_post_with_same_title_gets_suffix_per_scope() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let first = upsert_post(&repo, PostPayload::new("Hello", "Body"), &create_ctx(None)).unwrap();
    let second = upsert_post(&repo, PostPayload::new("Hello", "Body"), &create_ctx(None)).unwrap();
    let scoped = upsert_post(
        &repo,
        PostPayload::new("Hello", "Body"),
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap();

    assert_eq!(first.slug, "hello");
    assert_eq!(second.slug, "hello-2");
    assert_eq!(scoped.slug, "hello");
    assert_eq!(scoped.workspace.as_ref().map(|w| w.slug.as_str()), Some("agency-five"));
}

#[test]
fn workspace_post_reuses_global_category_by_name() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let global = create_term(&repo, TermKind::Category, term_form("Design"), None).unwrap();

    let post = upsert_post(
        &repo,
        PostPayload {
            category: Some(TermReference::from("Design")),
            ..PostPayload::new("Scoped", "Body")
        },
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap();

    assert_eq!(post.category_id, Some(global.id));
    assert_eq!(test_db.count_rows("categories"), 1);
}

#[test]
fn category_from_another_workspace_is_not_found() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let foreign = create_term(
        &repo,
        TermKind::Category,
        term_form("Ops"),
        common::workspace(common::WORKSPACE_B),
    )
    .unwrap();

    let err = upsert_post(
        &repo,
        PostPayload {
            category: Some(TermReference::ById(foreign.id.into())),
            ..PostPayload::new("Scoped", "Body")
        },
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(test_db.count_rows("posts"), 0);
}

#[test]
fn failed_upsert_rolls_back_created_terms() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let payload = PostPayload {
        category: Some(TermReference::from("Fresh Category")),
        tags: Some(vec![inline_tag("Fresh Tag")]),
        media: Some(vec![MediaReference::ById(999)]),
        ..PostPayload::new("Hello", "Body")
    };

    let err = upsert_post(&repo, payload, &create_ctx(None)).unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(test_db.count_rows("categories"), 0);
    assert_eq!(test_db.count_rows("tags"), 0);
    assert_eq!(test_db.count_rows("posts"), 0);
}

#[test]
fn media_without_url_rolls_back_created_terms() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let payload = PostPayload {
        category: Some(TermReference::from("Fresh Category")),
        tags: Some(vec![inline_tag("Fresh Tag"), TermReference::from("Second Tag")]),
        media: Some(vec![
            MediaReference::from(InlineMedia::url("https://cdn.example.com/a.png")),
            MediaReference::from(InlineMedia {
                caption: Some("No source".into()),
                ..InlineMedia::default()
            }),
            MediaReference::from(InlineMedia::url("https://cdn.example.com/c.png")),
        ]),
        ..PostPayload::new("Hello", "Body")
    };

    let err = upsert_post(&repo, payload, &create_ctx(None)).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(test_db.count_rows("categories"), 0);
    assert_eq!(test_db.count_rows("tags"), 0);
    assert_eq!(test_db.count_rows("media"), 0);
    assert_eq!(test_db.count_rows("posts"), 0);
}

#[test]
fn moving_post_to_another_workspace_drops_scoped_category() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let created = upsert_post(
        &repo,
        PostPayload {
            category: Some(TermReference::from("Ops")),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap();
    assert_eq!(
        created.category.as_ref().and_then(|c| c.workspace_id),
        Some(common::WORKSPACE_A)
    );

    let moved = UpsertContext {
        workspace_id: common::workspace(common::WORKSPACE_B),
        ..UpsertContext::edit(common::author(), PostId::new(created.id).unwrap())
    };

    let err = upsert_post(&repo, PostPayload::new("Hello", "Body"), &moved).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let unchanged = get_post(
        &repo,
        &created.id.to_string(),
        &PostListFilters {
            include_unpublished: true,
            ..PostListFilters::default()
        },
    )
    .unwrap();
    assert_eq!(unchanged.workspace_id, Some(common::WORKSPACE_A));

    let recategorised = upsert_post(
        &repo,
        PostPayload {
            category: Some(TermReference::from("Ops")),
            ..PostPayload::new("Hello", "Body")
        },
        &moved,
    )
    .unwrap();
    assert_eq!(recategorised.workspace_id, Some(common::WORKSPACE_B));
    assert_eq!(
        recategorised.category.as_ref().and_then(|c| c.workspace_id),
        Some(common::WORKSPACE_B)
    );
    assert_ne!(recategorised.category_id, created.category_id);
}

#[test]
fn moving_post_keeps_global_category() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let created = upsert_post(
        &repo,
        PostPayload {
            category: Some(TermReference::from("Design")),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(None),
    )
    .unwrap();

    let moved = UpsertContext {
        workspace_id: common::workspace(common::WORKSPACE_B),
        ..UpsertContext::edit(common::author(), PostId::new(created.id).unwrap())
    };
    let edited = upsert_post(&repo, PostPayload::new("Hello", "Body"), &moved).unwrap();

    assert_eq!(edited.workspace_id, Some(common::WORKSPACE_B));
    assert_eq!(edited.category_id, created.category_id);
}

#[test]
fn duplicate_gallery_positions_roll_back() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let payload = PostPayload {
        media: Some(vec![
            MediaReference::from(InlineMedia {
                position: Some(0),
                ..InlineMedia::url("https://cdn.example.com/a.png")
            }),
            MediaReference::from(InlineMedia::url("https://cdn.example.com/b.png")),
        ]),
        ..PostPayload::new("Hello", "Body")
    };

    let err = upsert_post(&repo, payload, &create_ctx(None)).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(test_db.count_rows("media"), 0);
}

#[test]
fn gallery_survives_empty_media_but_tags_are_cleared() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let created = upsert_post(
        &repo,
        PostPayload {
            tags: Some(vec![TermReference::from("Growth")]),
            media: Some(vec![
                MediaReference::from(InlineMedia {
                    role: Some("hero".into()),
                    caption: Some("Launch".into()),
                    ..InlineMedia::url("https://cdn.example.com/a.png")
                }),
                MediaReference::from(InlineMedia::url("https://cdn.example.com/b.png")),
            ]),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(None),
    )
    .unwrap();

    assert_eq!(created.media.len(), 2);
    assert_eq!(created.media[0].role.as_deref(), Some("hero"));
    assert_eq!(created.media[0].caption.as_deref(), Some("Launch"));
    assert_eq!(created.tags.len(), 1);

    let ctx = UpsertContext::edit(common::author(), PostId::new(created.id).unwrap());
    let edited = upsert_post(
        &repo,
        PostPayload {
            media: Some(vec![]),
            ..PostPayload::new("Hello", "Body")
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(edited.media.len(), 2);
    assert!(edited.tags.is_empty());

    let replaced = upsert_post(
        &repo,
        PostPayload {
            media: Some(vec![MediaReference::ById(created.media[1].id.into())]),
            ..PostPayload::new("Hello", "Body")
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(replaced.media.len(), 1);
    assert_eq!(replaced.media[0].id, created.media[1].id);
    assert_eq!(replaced.media[0].position, 0);
}

#[test]
fn published_at_is_stamped_once_and_preserved() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let published = upsert_post(
        &repo,
        PostPayload {
            status: Some("published".into()),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(None),
    )
    .unwrap();
    let stamped = published.published_at.expect("stamped on publish");

    let ctx = UpsertContext::edit(common::author(), PostId::new(published.id).unwrap());
    let edited = upsert_post(
        &repo,
        PostPayload {
            title: Some("Hello again".into()),
            ..PostPayload::new("Hello", "Body")
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(edited.status, "published");
    assert_eq!(edited.published_at, Some(stamped));
    assert_eq!(edited.slug, "hello-again");

    let explicit = upsert_post(
        &repo,
        PostPayload {
            published_at: Some("2020-01-02".into()),
            ..PostPayload::new("Hello again", "Body")
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(
        explicit.published_at.map(|at| at.to_string()),
        Some("2020-01-02 00:00:00".to_string())
    );
}

#[test]
fn edit_keeps_unsupplied_fields() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let created = upsert_post(
        &repo,
        PostPayload {
            excerpt: Some("Teaser".into()),
            featured: Some(true),
            category: Some(TermReference::from("Design")),
            cover_image: Some(MediaReference::from(InlineMedia::url(
                "https://cdn.example.com/cover.png",
            ))),
            meta: Some(serde_json::json!({"seo": {"title": "Hi"}})),
            reading_time_minutes: Some(9),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap();

    let ctx = UpsertContext::edit(common::author(), PostId::new(created.id).unwrap());
    let edited = upsert_post(&repo, PostPayload::new("Hello", "Other body"), &ctx).unwrap();

    assert_eq!(edited.excerpt.as_deref(), Some("Teaser"));
    assert!(edited.featured);
    assert_eq!(edited.category_id, created.category_id);
    assert_eq!(edited.cover_image_id, created.cover_image_id);
    assert_eq!(edited.meta, serde_json::json!({"seo": {"title": "Hi"}}));
    assert_eq!(edited.workspace_id, Some(common::WORKSPACE_A));
    assert_eq!(edited.reading_time_minutes, 1);
}

#[test]
fn rejects_invalid_payloads() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let cases = vec![
        PostPayload {
            title: None,
            ..PostPayload::new("x", "Body")
        },
        PostPayload::new("Hello", "   "),
        PostPayload {
            status: Some("live".into()),
            ..PostPayload::new("Hello", "Body")
        },
        PostPayload {
            published_at: Some("tomorrow".into()),
            ..PostPayload::new("Hello", "Body")
        },
        PostPayload {
            tags: Some(vec![TermReference::Inline(InlineTerm::default())]),
            ..PostPayload::new("Hello", "Body")
        },
        PostPayload {
            media: Some(vec![MediaReference::from(InlineMedia::default())]),
            ..PostPayload::new("Hello", "Body")
        },
    ];

    for payload in cases {
        let err = upsert_post(&repo, payload, &create_ctx(None)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{err:?}");
    }
    assert_eq!(test_db.count_rows("posts"), 0);
}

#[test]
fn editing_missing_post_is_not_found() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let ctx = UpsertContext::edit(common::author(), PostId::new(404).unwrap());
    let err = upsert_post(&repo, PostPayload::new("Hello", "Body"), &ctx).unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn delete_post_then_get_is_not_found() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let created = upsert_post(
        &repo,
        PostPayload {
            status: Some("published".into()),
            tags: Some(vec![TermReference::from("Growth")]),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(None),
    )
    .unwrap();
    let id = PostId::new(created.id).unwrap();

    delete_post(&repo, id).unwrap();

    let err = get_post(&repo, "hello", &PostListFilters::default()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(matches!(delete_post(&repo, id), Err(ServiceError::NotFound(_))));
    assert_eq!(test_db.count_rows("tags"), 1);
}

#[test]
fn term_administration_lifecycle() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let workspace = common::workspace(common::WORKSPACE_A);

    let created = create_term(&repo, TermKind::Tag, term_form("Hiring Tips"), workspace).unwrap();
    let duplicate = create_term(&repo, TermKind::Tag, term_form("Hiring Tips"), workspace).unwrap();
    assert_eq!(created.slug, "hiring-tips");
    assert_eq!(duplicate.slug, "hiring-tips-2");

    let id = TermId::new(created.id).unwrap();
    let renamed = update_term(&repo, TermKind::Tag, id, term_form("Hiring Tips")).unwrap();
    assert_eq!(renamed.slug, "hiring-tips");

    upsert_post(
        &repo,
        PostPayload {
            tags: Some(vec![TermReference::ById(created.id.into())]),
            ..PostPayload::new("Hello", "Body")
        },
        &create_ctx(Some(common::WORKSPACE_A)),
    )
    .unwrap();

    let err = delete_term(&repo, TermKind::Tag, id).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let page = list_terms(
        &repo,
        TermKind::Tag,
        &TermListFilters {
            workspace_id: Some(common::WORKSPACE_A),
            ..TermListFilters::default()
        },
    )
    .unwrap();
    assert_eq!(page.pagination.total_items, 2);
    assert_eq!(page.results[0].post_count, Some(1));
    assert_eq!(page.results[1].post_count, Some(0));

    delete_term(&repo, TermKind::Tag, TermId::new(duplicate.id).unwrap()).unwrap();
    let missing = delete_term(&repo, TermKind::Tag, TermId::new(duplicate.id).unwrap());
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
}
