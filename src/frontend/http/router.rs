use hyper::Method;

/// Every path the API serves. Ids are kept raw; services decide what a
/// malformed id means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Movies,
    Movie(String),
    MovieTheaters(String),
    MovieReviews(String),
    Theaters,
    Review(String),
}

impl Route {
    /// Matches a request path. A single trailing slash is tolerated.
    pub fn resolve(path: &str) -> Option<Route> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();

        match segments.as_slice() {
            ["movies"] => Some(Route::Movies),
            ["movies", id] if !id.is_empty() => Some(Route::Movie(id.to_string())),
            ["movies", id, "theaters"] if !id.is_empty() => {
                Some(Route::MovieTheaters(id.to_string()))
            }
            ["movies", id, "reviews"] if !id.is_empty() => {
                Some(Route::MovieReviews(id.to_string()))
            }
            ["theaters"] => Some(Route::Theaters),
            ["reviews", id] if !id.is_empty() => Some(Route::Review(id.to_string())),
            _ => None,
        }
    }

    /// Value for the `Allow` header.
    pub fn allow_header(&self) -> &'static str {
        match self {
            Route::Review(_) => "PUT, DELETE",
            _ => "GET, HEAD",
        }
    }

    /// HEAD is served wherever GET is.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Route::Review(_) => *method == Method::PUT || *method == Method::DELETE,
            _ => *method == Method::GET || *method == Method::HEAD,
        }
    }
}
