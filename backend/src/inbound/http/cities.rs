//! City reference-data endpoint.
//!
//! ```text
//! GET /cities/Rotterdam
//! ```

use actix_web::{get, web};

use crate::domain::{City, CityName, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth_gate::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Look up a city by its exact name.
/// Look up a city by its exact name.
#[utoipa::path(
    get,
    path = "/cities/{cityName}",
    params(("cityName" = String, Path, description = "Exact city name", example = "Rotterdam")),
    responses(
        (status = 200, description = "City found", body = City),
        (status = 403, description = "Not logged in", body = Error),
        (status = 404, description = "No city with that name", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["cities"],
    operation_id = "getCityByName",
    security(("SessionCookie" = []))
)]
#[get("/cities/{city_name}")]
pub async fn get_city(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<City>> {
    let name = CityName::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let city = state.cities.city_by_name(&name).await?;
    Ok(web::Json(city))
}
