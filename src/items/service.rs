use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// Next item id: one greater than the current numeric maximum, `"1"` when
/// no items exist yet.
pub(crate) fn next_item_id(current_max: Option<i64>) -> String {
    (current_max.unwrap_or(0) + 1).to_string()
}

/// `age_days / 365`, rounded to one decimal place.
pub(crate) fn age_years_from_days(age_days: f64) -> f64 {
    (age_days / 365.0 * 10.0).round() / 10.0
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Store uploaded image bytes under a generated key. The client-supplied
/// filename never reaches storage.
pub async fn store_item_image(
    st: &AppState,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<String> {
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("items/{}.{}", Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

/// Best-effort cleanup of a stored image; a failure only logs. Keys outside
/// our own prefix are left alone.
pub async fn remove_item_image(st: &AppState, key: &str) {
    if !key.starts_with("items/") {
        return;
    }
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(key, error = %e, "failed to delete stored image");
    }
}

pub async fn presign_item_image(st: &AppState, key: &str) -> anyhow::Result<String> {
    const TTL_SECS: u64 = 30 * 60;
    st.storage
        .presign_get(key, TTL_SECS)
        .await
        .with_context(|| format!("presign url for {}", key))
}
