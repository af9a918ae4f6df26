//! Path-prefix routing module
//!
//! An ordered endpoint table with first-match dispatch: endpoints are kept
//! in declaration order and the first whose mount point is a prefix of the
//! request path wins. Later registrations never override earlier ones.

use crate::handler::Handler;

/// A routable endpoint: mount point plus resolved destination
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// URL path prefix this endpoint is registered under
    pub mount_point: String,
    pub handler: Handler,
}

/// Find the first endpoint whose mount point prefixes `path`
pub fn match_endpoint<'a>(path: &str, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint> {
    endpoints
        .iter()
        .find(|endpoint| path.starts_with(&endpoint.mount_point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::NotFoundFileHandler;

    fn make_endpoint(mount_point: &str) -> Endpoint {
        Endpoint {
            mount_point: mount_point.to_string(),
            handler: Handler::NotFoundFile(NotFoundFileHandler::new("/dev/null")),
        }
    }

    #[test]
    fn test_prefix_match() {
        let endpoints = vec![make_endpoint("/api")];
        assert!(match_endpoint("/api", &endpoints).is_some());
        assert!(match_endpoint("/api/users", &endpoints).is_some());
        assert!(match_endpoint("/about", &endpoints).is_none());
    }

    #[test]
    fn test_first_match_in_declaration_order() {
        let endpoints = vec![
            make_endpoint("/api/v1"),
            make_endpoint("/api"),
            make_endpoint("/"),
        ];

        let hit = match_endpoint("/api/v1/users", &endpoints).unwrap();
        assert_eq!(hit.mount_point, "/api/v1");

        let hit = match_endpoint("/api/v2/users", &endpoints).unwrap();
        assert_eq!(hit.mount_point, "/api");

        let hit = match_endpoint("/index.html", &endpoints).unwrap();
        assert_eq!(hit.mount_point, "/");
    }

    #[test]
    fn test_earlier_registration_wins_over_later_duplicate() {
        let mut endpoints = vec![make_endpoint("/app")];
        endpoints.push(make_endpoint("/app"));
        let hit = match_endpoint("/app/x", &endpoints).unwrap();
        assert!(std::ptr::eq(hit, &endpoints[0]));
    }

    #[test]
    fn test_no_catch_all_yields_none() {
        let endpoints = vec![make_endpoint("/api"), make_endpoint("/static")];
        assert!(match_endpoint("/favicon.ico", &endpoints).is_none());
    }
}
