//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: the account endpoints and the city lookup
//! - **Schemas**: request/response bodies plus the shared [`Error`] payload
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is served by Swagger UI in debug builds.
//!
//! [`Error`]: crate::domain::Error

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{City, Error, ErrorCode};
use crate::inbound::http::users::{CredentialsRequest, WhoAmIResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cities API",
        description = "Session-authenticated account management and city reference data."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::whoami,
        crate::inbound::http::cities::get_city,
    ),
    components(schemas(CredentialsRequest, WhoAmIResponse, City, Error, ErrorCode)),
    tags(
        (name = "users", description = "Account signup, login and identity"),
        (name = "cities", description = "City reference data")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} schema registered"))
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("City", &["id", "name", "countryCode", "district", "population"])]
    #[case("CredentialsRequest", &["username", "password"])]
    #[case("WhoAmIResponse", &["username"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let schema = schema(name);
        for field in fields {
            assert_object_schema_has_field(&schema, field);
        }
    }

    #[rstest]
    #[case("/signup")]
    #[case("/login")]
    #[case("/whoami")]
    #[case("/cities/{cityName}")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
