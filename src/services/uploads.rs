//! Asset handling shared by the services that own an image.

use crate::assets::{AssetStore, AssetUpload};
use crate::catalog::validation::{self, FieldViolation};
use tracing::{error, warn};

pub(crate) fn validate(
    field: &str,
    upload: Option<&AssetUpload>,
    max_upload_bytes: usize,
) -> Vec<FieldViolation> {
    upload.map_or_else(Vec::new, |upload| {
        validation::image_upload(
            field,
            &upload.content_type,
            upload.content.len(),
            max_upload_bytes,
        )
    })
}

/// Removes an asset written for a write that did not persist.
pub(crate) async fn compensate(assets: &dyn AssetStore, reference: &str, container: &str) {
    if let Err(e) = assets.delete(reference, container).await {
        error!(
            reference,
            container,
            error = %e,
            "Compensating asset delete failed, asset is orphaned"
        );
    } else {
        warn!(reference, container, "Discarded asset of a failed write");
    }
}

/// Releases an asset nothing refers to any more, either because its entity
/// was deleted or because a committed update replaced it. Failures are only
/// logged.
pub(crate) async fn release(assets: &dyn AssetStore, reference: Option<&str>, container: &str) {
    let Some(reference) = reference else {
        return;
    };
    if let Err(e) = assets.delete(reference, container).await {
        warn!(reference, container, error = %e, "Failed to release asset, it is orphaned");
    }
}
