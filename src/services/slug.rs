use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::domain::types::{Slug, SlugTarget, WorkspaceId};
use crate::repository::SlugProbe;

use super::{ServiceError, ServiceResult};

/// Upper bound on probed candidates (`base`, `base-2`, … `base-10000`).
pub const MAX_SLUG_CANDIDATES: usize = 10_000;

fn fold_latin(ch: char) -> Option<&'static str> {
    Some(match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        _ => return None,
    })
}

/// Normalizes free text into slug characters.
///
/// Apostrophes vanish ("Don't" becomes "dont"); any other run of
/// non-alphanumerics becomes a single hyphen. Leading and trailing hyphens are
/// trimmed, so the result is either empty or a valid [`Slug`].
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for ch in raw.chars() {
        if matches!(ch, '\'' | '\u{2019}') {
            continue;
        }

        let folded = if ch.is_ascii_alphanumeric() {
            Some(ch.to_ascii_lowercase().to_string())
        } else {
            fold_latin(ch).map(str::to_string)
        };

        match folded {
            Some(part) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push_str(&part);
            }
            None => pending_hyphen = true,
        }
    }

    slug
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Picks the first free slug for `raw` within `(target, workspace_id)`.
///
/// `exclude_id` skips the row being edited so re-saving keeps its own slug.
pub fn allocate_slug<S>(
    store: &mut S,
    target: SlugTarget,
    raw: &str,
    workspace_id: Option<WorkspaceId>,
    exclude_id: Option<i32>,
) -> ServiceResult<Slug>
where
    S: SlugProbe + ?Sized,
{
    let mut base = slugify(raw);
    if base.is_empty() {
        base = format!("{}-{}", target.fallback_prefix(), random_suffix());
    }

    for attempt in 1..=MAX_SLUG_CANDIDATES {
        let candidate = if attempt == 1 {
            base.clone()
        } else {
            format!("{base}-{attempt}")
        };

        if !store.slug_taken(target, &candidate, workspace_id, exclude_id)? {
            return Ok(Slug::new(candidate)?);
        }
    }

    log::warn!("Slug space for `{base}` exhausted after {MAX_SLUG_CANDIDATES} candidates");
    Err(ServiceError::ResourceExhausted(format!(
        "no free slug for `{base}`"
    )))
}
