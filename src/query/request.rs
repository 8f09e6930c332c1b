use serde::Deserialize;

/// Raw filter expressions of one request
///
/// Each field is a JSON-encoded string as received from the client, e.g.
/// `rows_filter = {"SampleDepth.Value": {"$gt": "10"}}`. Empty strings are
/// treated as absent.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FilterRequest {
    /// `{"<Path>": {"$op": <value>}}`
    pub rows_filter: Option<String>,
    /// `{"$and": [<predicate or logical node>, ...]}`
    pub rows_multiple_filter: Option<String>,
    /// `["Col1", "Col2[]"]`
    pub columns_filter: Option<String>,
    /// `["Col.sub", "mean"]`
    pub columns_aggregation: Option<String>,
}

impl FilterRequest {
    /// True when no expression is given (empty strings count as absent)
    pub fn is_empty(&self) -> bool {
        [
            &self.rows_filter,
            &self.rows_multiple_filter,
            &self.columns_filter,
            &self.columns_aggregation,
        ]
        .iter()
        .all(|raw| raw.as_deref().map_or(true, str::is_empty))
    }

    /// Same request with the columns aggregation dropped
    pub fn without_aggregation(&self) -> FilterRequest {
        FilterRequest {
            columns_aggregation: None,
            ..self.clone()
        }
    }
}
