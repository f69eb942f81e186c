//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bx-core for the
//! single bucket named by a profile.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier, StorageClass};
use aws_smithy_types::DateTime;
use tracing::{debug, warn};

use bx_core::path::folder_marker_key;
use bx_core::{Error, ListPage, ObjectStore, Profile, PutOptions, RawObjectRecord, Result};

/// Most keys a single DeleteObjects request accepts
const MAX_DELETE_BATCH: usize = 1000;

/// S3 client bound to one bucket
pub struct S3Store {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Create a new S3 client from a profile
    ///
    /// Profiles without static credentials fall back to the SDK's default
    /// credential chain (environment, shared config, instance metadata).
    pub async fn new(profile: &Profile) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(profile.region.clone()));

        if profile.has_static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                profile.access_key.clone(),
                profile.secret_key.clone(),
                None, // session token
                None, // expiry
                "bx-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if !profile.endpoint.is_empty() {
            loader = loader.endpoint_url(&profile.endpoint);
        }

        let config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.path_style)
            .build();

        debug!(profile = %profile.name, bucket = %profile.bucket, "created S3 client");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: profile.bucket.clone(),
        })
    }

    /// Bucket this client operates on
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(&self, prefix: &str, continuation: Option<String>) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(&self.bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = continuation {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &self.bucket))?;

        let records = response
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                Some(RawObjectRecord {
                    key: key.to_string(),
                    size: object.size().and_then(|s| u64::try_from(s).ok()),
                    last_modified: object.last_modified().and_then(to_timestamp),
                    storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
                })
            })
            .collect();

        let continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage {
            records,
            continuation_token,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, key))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, options: PutOptions) -> Result<()> {
        let mut request = self
            .inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(options.effective_content_type())
            .body(ByteStream::from(data));

        if let Some(storage_class) = &options.storage_class {
            request = request.storage_class(StorageClass::from(storage_class.as_str()));
        }

        request.send().await.map_err(|e| map_sdk_error(e, key))?;
        Ok(())
    }

    async fn create_folder(&self, folder: &str, name: &str) -> Result<String> {
        let key = folder_marker_key(folder, name)?;
        self.inner
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &key))?;
        Ok(key)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, key))?;
        Ok(())
    }

    async fn delete_objects(&self, keys: Vec<String>) -> Result<Vec<String>> {
        let mut deleted = Vec::with_capacity(keys.len());

        for batch in keys.chunks(MAX_DELETE_BATCH) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::General(e.to_string()))?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(false)
                .build()
                .map_err(|e| Error::General(e.to_string()))?;

            let response = self
                .inner
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, &self.bucket))?;

            deleted.extend(
                response
                    .deleted()
                    .iter()
                    .filter_map(|d| d.key().map(str::to_string)),
            );

            if !response.errors().is_empty() {
                let failed: Vec<&str> = response.errors().iter().filter_map(|e| e.key()).collect();
                warn!(bucket = %self.bucket, ?failed, "failed to delete some objects");
            }
        }

        Ok(deleted)
    }
}

fn to_timestamp(value: &DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(value.secs(), value.subsec_nanos() as i32).ok()
}

fn map_sdk_error<E, R>(err: SdkError<E, R>, target: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
    let message = aws_sdk_s3::error::DisplayErrorContext(&err).to_string();
    classify_error(code.as_deref(), message, target)
}

/// Map an S3 error code onto the core error taxonomy
fn classify_error(code: Option<&str>, message: String, target: &str) -> Error {
    match code {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => Error::NotFound(target.to_string()),
        Some(
            "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(message),
        Some("PreconditionFailed" | "OperationAborted") => Error::Conflict(message),
        _ => Error::Network(message),
    }
}
