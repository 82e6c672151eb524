use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::passes::PassesResponse;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::passes::list_passes),
    components(schemas(
        PassesResponse,
        ErrorResponse,
        crate::predict::Pass,
        crate::predict::TimeSample,
        crate::predict::TimeOfDay,
        crate::predict::SkippedSatellite,
    )),
    info(
        title = "Sat-O-Vis Pass API",
        description = "Visible satellite pass predictions for the configured observer",
        version = "0.1.0"
    ),
    tags(
        (name = "passes", description = "Pass prediction")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_passes_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/passes"));
    }
}
