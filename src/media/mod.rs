//! Media host integration: identifier codec, host client, uploads and cleanup.

mod cleanup;
mod codec;
mod host;
mod upload;

pub use cleanup::{collect_media_for_deletion, delete_all};
pub use codec::extract_media_id;
pub use host::{HttpMediaHost, MediaHost, UploadRequest};
pub use upload::{
    start_upload, validate_media_file, UploadProgress, UploadTask, MAX_IMAGE_BYTES,
    MAX_VIDEO_BYTES,
};
