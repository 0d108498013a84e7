//! Collaborators for server tests.

use std::sync::Arc;

use mockable::DefaultClock;
use pawprint::inbound::http::state::ServiceSupport;
use pawprint::outbound::security::{Argon2CredentialHasher, JwtTokenIssuer};
use pawprint::outbound::storage::CapStdUploadStore;
use tempfile::TempDir;

/// Real adapters over a temporary upload directory. Keep the directory alive
/// for as long as the support is in use.
pub(crate) fn support() -> (ServiceSupport, TempDir) {
    let dir = tempfile::tempdir().expect("temporary upload directory");
    let uploads = CapStdUploadStore::open(dir.path()).expect("open upload store");
    let support = ServiceSupport {
        hasher: Arc::new(Argon2CredentialHasher),
        tokens: Arc::new(JwtTokenIssuer::new(
            b"server-test-secret-server-test-secret",
            chrono::Duration::hours(1),
        )),
        clock: Arc::new(DefaultClock),
        uploads: Arc::new(uploads),
        upload_max_bytes: 1024,
        bootstrap_admin: None,
    };
    (support, dir)
}
