//! Remote sources: where a module or enabler version is fetched from.
//!
//! A [`RemoteReference`] names a repository and a version; the tag to check out
//! is derived from the version and an optional prefix. A [`Fetcher`] turns a
//! reference into a [`StagingRoot`] holding the checkout, which the
//! reconciliation engine then searches for the requested manifest.
//!
//! # Tag Construction
//!
//! | `tag_prefix`      | version | tag         |
//! |-------------------|---------|-------------|
//! | `None`            | `1.2.0` | `v1.2.0`    |
//! | `Some("")`        | `1.2.0` | `1.2.0`     |
//! | `Some("rel-")`    | `1.2.0` | `rel-1.2.0` |

use crate::constants::DEFAULT_TAG_PREFIX;
use crate::git;
use crate::utils::fs::StagingRoot;
use crate::utils::strip_auth_from_url;
use anyhow::Result;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// A repository URL plus the version to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReference {
    /// Repository URL (https, ssh, `file://` or a local path)
    pub url: String,
    /// Requested version, used verbatim in the tag
    pub version: String,
    /// Tag prefix; `None` means the default `v`, `Some("")` means no prefix
    pub tag_prefix: Option<String>,
}

impl RemoteReference {
    /// Create a reference with the default tag prefix.
    pub fn new(url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: version.into(),
            tag_prefix: None,
        }
    }

    /// Override the tag prefix.
    #[must_use]
    pub fn with_tag_prefix(mut self, prefix: Option<String>) -> Self {
        self.tag_prefix = prefix;
        self
    }

    /// The tag name to clone: prefix followed by the version.
    #[must_use]
    pub fn tag(&self) -> String {
        let prefix = self.tag_prefix.as_deref().unwrap_or(DEFAULT_TAG_PREFIX);
        format!("{prefix}{}", self.version)
    }
}

impl fmt::Display for RemoteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", strip_auth_from_url(&self.url), self.tag())
    }
}

/// Produces a staging root holding the contents of a remote reference.
///
/// The returned [`StagingRoot`] is owned by the caller and removed when dropped,
/// whether the operation that requested it succeeds or not.
pub trait Fetcher {
    /// Fetch `reference` into a fresh staging root.
    fn fetch(&self, reference: &RemoteReference) -> impl Future<Output = Result<StagingRoot>> + Send;
}

/// Fetches references with a shallow, single-branch `git clone` of the tag.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher {
    timeout: Option<Duration>,
}

impl GitFetcher {
    /// Create a fetcher whose clones are killed after `timeout` (None = wait forever).
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
        }
    }
}

/// Name the tags the remote does offer when `tag` is not among them.
async fn missing_tag_hint(url: &str, tag: &str) -> Option<String> {
    let tags = git::list_remote_tags(url).await.ok()?;
    if tags.iter().any(|t| t == tag) {
        return None;
    }
    let available = if tags.is_empty() { "none".to_string() } else { tags.join(", ") };
    Some(format!("Tag '{tag}' does not exist in {}; available tags: {available}", strip_auth_from_url(url)))
}

impl Fetcher for GitFetcher {
    async fn fetch(&self, reference: &RemoteReference) -> Result<StagingRoot> {
        git::ensure_git_available()?;

        let tag = reference.tag();
        let staging = StagingRoot::new("clone")?;
        tracing::info!("Fetching {reference}");

        if let Err(e) =
            git::shallow_clone(&reference.url, &tag, staging.path(), self.timeout, &reference.version).await
        {
            return Err(match missing_tag_hint(&reference.url, &tag).await {
                Some(hint) => e.context(hint),
                None => e,
            });
        }

        tracing::debug!("Checked out {reference} into {}", staging.path().display());
        Ok(staging)
    }
}
