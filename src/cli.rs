//! Command-line argument surface

use clap::Parser;
use std::net::SocketAddr;

/// Development HTTP server: mount reverse proxies, static file roots, and a
/// custom not-found page under one listen address.
#[derive(Parser, Debug)]
#[command(name = "devmux", version, about, long_about = None)]
pub struct Args {
    /// Endpoint specification `<mountPoint>:<kind>=<argument>`, repeatable.
    /// Kinds: `proxy` (upstream URL), `file` (directory), `404` (fallback page).
    /// Example: `-e /api:proxy=http://127.0.0.1:9000 -e /:file=./dist`
    #[arg(short = 'e', long = "endpoint", value_name = "SPEC", required = true)]
    pub endpoints: Vec<String>,

    /// Address to listen on
    #[arg(short = 'l', long = "listen", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeatable_endpoints_and_default_listen() {
        let args = Args::try_parse_from([
            "devmux",
            "-e",
            "/api:proxy=http://127.0.0.1:9000",
            "-e",
            "/:file=./dist",
        ])
        .unwrap();
        assert_eq!(args.endpoints.len(), 2);
        assert_eq!(args.listen, "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn test_endpoint_is_required() {
        assert!(Args::try_parse_from(["devmux"]).is_err());
    }
}
