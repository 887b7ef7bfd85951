use super::field::ConfigField;
use crate::mapper::FieldType;

/// Key under which the object-storage client is bound in the job.
pub const STORAGE_RESOURCE_KEY: &str = "s3";

/// A shared external dependency declared once and injected into operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    pub key: String,
    /// Python import path of the resource definition.
    pub module: String,
    pub definition: String,
    pub fields: Vec<ConfigField>,
}

impl ResourceSpec {
    /// The object-storage client used by file loads and CSV saves.
    pub fn object_storage() -> Self {
        Self {
            key: STORAGE_RESOURCE_KEY.to_string(),
            module: "dagster_aws.s3".to_string(),
            definition: "s3_resource".to_string(),
            fields: vec![
                ConfigField::optional("region_name", FieldType::String, "Storage region")
                    .with_default("us-east-1"),
                ConfigField::optional(
                    "endpoint_url",
                    FieldType::String,
                    "Custom endpoint for S3-compatible stores",
                ),
                ConfigField::secret(
                    "aws_access_key_id",
                    "AWS_ACCESS_KEY_ID".to_string(),
                    "Access key id",
                ),
                ConfigField::secret(
                    "aws_secret_access_key",
                    "AWS_SECRET_ACCESS_KEY".to_string(),
                    "Secret access key",
                ),
            ],
        }
    }
}

/// Job-wide retry policy. Fixed; not configurable per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay_seconds: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_seconds: 30,
        }
    }
}
