use serde_json::Value;

use crate::domain::media::{Media, NewMedia};
use crate::domain::reference::{InlineMedia, MediaReference};
use crate::domain::types::{MediaId, MediaType, MediaUrl};
use crate::repository::MediaStore;

use super::{ServiceError, ServiceResult};

const DEFAULT_MEDIA_TYPE: &str = "image";

/// A persisted media record next to the reference it was resolved from.
///
/// The reference keeps the transient link fields (`position`, `role`,
/// `caption`) that only matter when attaching the media to a post.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMedia {
    pub record: Media,
    pub payload: MediaReference,
}

fn find_existing<S>(store: &mut S, raw_id: i64) -> ServiceResult<Media>
where
    S: MediaStore + ?Sized,
{
    let missing = || ServiceError::not_found(format!("media #{raw_id}"));

    let id = i32::try_from(raw_id)
        .ok()
        .and_then(|id| MediaId::new(id).ok())
        .ok_or_else(missing)?;

    store.find_media_by_id(id)?.ok_or_else(missing)
}

fn create_inline<S>(store: &mut S, inline: &InlineMedia) -> ServiceResult<Media>
where
    S: MediaStore + ?Sized,
{
    let url = inline
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ServiceError::validation("media requires an id or a url"))?;

    let media_type = inline
        .media_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_MEDIA_TYPE);

    let created = store.insert_media(&NewMedia {
        url: MediaUrl::new(url)?,
        media_type: MediaType::new(media_type)?,
        alt_text: inline.alt_text.clone(),
        caption: inline.caption.clone(),
        metadata: inline
            .metadata
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default())),
    })?;

    log::debug!("Created media #{} for {}", created.id, created.url);
    Ok(created)
}

/// Resolves a single media reference: existing id, or a fresh record for a url.
pub fn resolve_media_reference<S>(store: &mut S, reference: &MediaReference) -> ServiceResult<Media>
where
    S: MediaStore + ?Sized,
{
    match reference {
        MediaReference::ById(id) => find_existing(store, *id),
        MediaReference::Inline(inline) => match inline.id {
            Some(id) => find_existing(store, id),
            None => create_inline(store, inline),
        },
    }
}

/// Resolves every reference in order. URLs are never deduplicated.
pub fn resolve_media<S>(
    store: &mut S,
    references: &[MediaReference],
) -> ServiceResult<Vec<ResolvedMedia>>
where
    S: MediaStore + ?Sized,
{
    references
        .iter()
        .map(|reference| {
            Ok(ResolvedMedia {
                record: resolve_media_reference(store, reference)?,
                payload: reference.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestStore;

    #[test]
    fn creates_fresh_records_for_repeated_urls() {
        let mut store = TestStore::default();
        let refs = vec![
            MediaReference::from(InlineMedia::url("https://cdn.example.com/a.png")),
            MediaReference::from(InlineMedia::url("https://cdn.example.com/a.png")),
        ];

        let resolved = resolve_media(&mut store, &refs).unwrap();

        assert_eq!(resolved.len(), 2);
        assert_ne!(resolved[0].record.id, resolved[1].record.id);
        assert_eq!(resolved[0].record.media_type.as_str(), "image");
        assert_eq!(store.media.len(), 2);
    }

    #[test]
    fn keeps_payload_for_link_attributes() {
        let mut store = TestStore::default();
        let refs = vec![MediaReference::from(InlineMedia {
            position: Some(3),
            role: Some("hero".into()),
            ..InlineMedia::url("https://cdn.example.com/b.png")
        })];

        let resolved = resolve_media(&mut store, &refs).unwrap();

        assert_eq!(resolved[0].payload.position(), Some(3));
        assert_eq!(resolved[0].payload.role(), Some("hero"));
    }

    #[test]
    fn resolves_existing_ids_and_rejects_missing_ones() {
        let mut store = TestStore::default();
        let created = resolve_media_reference(
            &mut store,
            &MediaReference::from(InlineMedia::url("https://cdn.example.com/c.png")),
        )
        .unwrap();

        let by_id =
            resolve_media_reference(&mut store, &MediaReference::ById(created.id.get().into()))
                .unwrap();
        assert_eq!(by_id, created);

        let missing = resolve_media_reference(&mut store, &MediaReference::ById(42));
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn rejects_missing_or_invalid_urls() {
        let mut store = TestStore::default();

        let blank = resolve_media_reference(
            &mut store,
            &MediaReference::from(InlineMedia::url("   ")),
        );
        let invalid = resolve_media_reference(
            &mut store,
            &MediaReference::from(InlineMedia::url("not a url")),
        );

        assert!(matches!(blank, Err(ServiceError::Validation(_))));
        assert!(matches!(invalid, Err(ServiceError::Validation(_))));
        assert!(store.media.is_empty());
    }
}
