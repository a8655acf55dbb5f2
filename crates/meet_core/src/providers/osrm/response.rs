/// Body of an OSRM `/table` response with `annotations=duration`.
#[derive(Debug, serde::Deserialize)]
pub(super) struct OsrmTableResponse {
    pub(super) code: String,
    #[serde(default)]
    pub(super) message: Option<String>,
    /// Rows per source, columns per destination. `null` marks no route.
    #[serde(default)]
    pub(super) durations: Option<Vec<Vec<Option<f64>>>>,
}
