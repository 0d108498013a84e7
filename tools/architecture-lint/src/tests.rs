//! Unit tests for the architecture lint.

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource::new(file, contents)])
}

#[rstest]
#[case::handler_uses_domain(
    "inbound/http/pets.rs",
    "use crate::domain::PetId; fn handler() { let _ = PetId::random(); }",
    true
)]
#[case::handler_uses_memory_store(
    "inbound/http/pets.rs",
    "use crate::outbound::memory::MemoryStore; fn handler() { let _ = MemoryStore::new(); }",
    false
)]
#[case::handler_names_crate(
    "inbound/http/pets.rs",
    "use pawprint::outbound::persistence::DieselPetRepository; fn handler() {}",
    false
)]
#[case::handler_uses_diesel("inbound/http/pets.rs", "use diesel::prelude::*; fn handler() {}", false)]
#[case::handler_signs_tokens(
    "inbound/http/auth.rs",
    "fn handler() { let _ = jsonwebtoken::Header::default(); }",
    false
)]
#[case::domain_uses_http("domain/pet.rs", "use crate::inbound::http; fn thing() {}", false)]
#[case::domain_uses_actix("domain/pet.rs", "use actix_web::HttpResponse; fn thing() {}", false)]
#[case::domain_documents_schema(
    "domain/pet.rs",
    "use utoipa::ToSchema; #[derive(ToSchema)] struct Pet;",
    true
)]
#[case::domain_hashes_passwords("domain/auth.rs", "use argon2::Argon2; fn thing() {}", false)]
#[case::middleware_uses_domain_errors(
    "middleware/cors.rs",
    "use crate::domain::Error; use actix_web::HttpResponse; fn thing() {}",
    true
)]
#[case::middleware_reads_store(
    "middleware/trace.rs",
    "use crate::outbound::memory::MemoryStore; fn thing() {}",
    false
)]
#[case::adapter_uses_http(
    "outbound/persistence/pets.rs",
    "use super::super::super::inbound::http; fn thing() {}",
    false
)]
#[case::adapter_responds(
    "outbound/storage/uploads.rs",
    "use actix_web::HttpResponse; fn thing() {}",
    false
)]
#[case::adapter_uses_diesel(
    "outbound/persistence/pets.rs",
    "use diesel_async::RunQueryDsl; fn thing() {}",
    true
)]
fn detects_boundary_violations(#[case] file: &str, #[case] contents: &str, #[case] ok: bool) {
    let result = lint_one(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
#[case("domain/pet.rs", Some(Layer::Domain))]
#[case("domain.rs", Some(Layer::Domain))]
#[case("middleware/mod.rs", Some(Layer::Middleware))]
#[case("settings.rs", None)]
fn layers_follow_the_first_directory(#[case] file: &str, #[case] expected: Option<Layer>) {
    assert_eq!(Layer::from_path(Utf8Path::new(file)), expected);
}

#[rstest]
fn repeated_references_are_reported_once() {
    let result = lint_one(
        "domain/pet.rs",
        "use actix_web::web; fn a() { let _ = actix_web::HttpResponse::Ok(); }",
    );

    match result {
        Err(ArchitectureLintError::Violations(violations)) => {
            assert_eq!(violations.len(), 1, "{violations:?}");
        }
        other => panic!("expected a single violation, got {other:?}"),
    }
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    let result = lint_one("settings.rs", "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}
