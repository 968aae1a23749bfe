//! Request targets for each logical operation.

use reqwest::Url;

/// `layer_id` selecting the route search.
pub const ROUTES_LAYER: u32 = 5827;

/// `layer_id` selecting the carriage lookup.
pub const CARRIAGES_LAYER: u32 = 5764;

/// Error returned when the configured base path is not a usable URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid base path {base:?}: {reason}")]
pub struct EndpointError {
    base: String,
    reason: String,
}

/// Fully-qualified targets for every operation, derived from one base path.
///
/// # Examples
///
/// ```
/// use rzd_gateway::rzd::Endpoints;
///
/// let endpoints = Endpoints::new("https://pass.rzd.ru/", "ru").unwrap();
/// assert_eq!(
///     endpoints.train_routes.as_str(),
///     "https://pass.rzd.ru/timetable/public/ru?layer_id=5827"
/// );
/// assert_eq!(endpoints.station_search.as_str(), "https://pass.rzd.ru/suggester");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Route search, one-way and round trip.
    pub train_routes: Url,
    /// Carriage lookup for one train.
    pub train_carriages: Url,
    /// Station name suggestions.
    pub station_search: Url,
}

impl Endpoints {
    /// Build the targets for a base path and response language.
    ///
    /// The base path is parsed into a fresh URL; the caller's string is
    /// left untouched.
    pub fn new(base_path: &str, language: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base_path).map_err(|e| EndpointError {
            base: base_path.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(EndpointError {
                base: base_path.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let timetable = format!("timetable/public/{language}");

        Ok(Self {
            train_routes: layered(&base, &timetable, ROUTES_LAYER),
            train_carriages: layered(&base, &timetable, CARRIAGES_LAYER),
            station_search: with_path(&base, "suggester"),
        })
    }
}

/// Append `path` to the base and tag it with a `layer_id`.
fn layered(base: &Url, path: &str, layer_id: u32) -> Url {
    let mut url = with_path(base, path);
    url.query_pairs_mut()
        .append_pair("layer_id", &layer_id.to_string());
    url
}

/// Append `path` to the base URL's path.
fn with_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&join_paths(base.path(), path));
    url
}

/// Join two path fragments with exactly one slash between them.
fn join_paths(base: &str, add: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        add.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_layered_targets() {
        let endpoints = Endpoints::new("https://pass.rzd.ru/", "ru").unwrap();

        assert_eq!(
            endpoints.train_routes.as_str(),
            "https://pass.rzd.ru/timetable/public/ru?layer_id=5827"
        );
        assert_eq!(
            endpoints.train_carriages.as_str(),
            "https://pass.rzd.ru/timetable/public/ru?layer_id=5764"
        );
        assert_eq!(
            endpoints.station_search.as_str(),
            "https://pass.rzd.ru/suggester"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let endpoints = Endpoints::new("https://pass.rzd.ru", "en").unwrap();
        assert_eq!(
            endpoints.train_routes.as_str(),
            "https://pass.rzd.ru/timetable/public/en?layer_id=5827"
        );
    }

    #[test]
    fn base_with_path_prefix() {
        let endpoints = Endpoints::new("http://localhost:8080/proxy/", "ru").unwrap();
        assert_eq!(
            endpoints.train_carriages.as_str(),
            "http://localhost:8080/proxy/timetable/public/ru?layer_id=5764"
        );
        assert_eq!(
            endpoints.station_search.as_str(),
            "http://localhost:8080/proxy/suggester"
        );
    }

    #[test]
    fn same_input_same_output() {
        let base = String::from("https://pass.rzd.ru/");
        let first = Endpoints::new(&base, "ru").unwrap();
        let second = Endpoints::new(&base, "ru").unwrap();

        assert_eq!(first, second);
        assert_eq!(base, "https://pass.rzd.ru/");
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(Endpoints::new("not a url", "ru").is_err());
        assert!(Endpoints::new("", "ru").is_err());
        assert!(Endpoints::new("mailto:someone@example.com", "ru").is_err());
    }

    #[test]
    fn join_paths_single_slash() {
        assert_eq!(join_paths("/", "suggester"), "/suggester");
        assert_eq!(join_paths("/a/", "/b"), "/a/b");
        assert_eq!(join_paths("/a", "b"), "/a/b");
    }
}
