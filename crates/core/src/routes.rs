//! Page routing table.
//!
//! A static path -> page mapping with no guards or redirects. Front-ends
//! resolve a location to a [`Page`] and render it however they like.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Converter,
    History,
    Companies,
    Marks,
    Coa,
    Reports,
    Amortization,
    Products,
    HppBatches,
    Rentals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub page: Page,
}

pub static ROUTES: &[Route] = &[
    Route { path: "/", name: "dashboard", page: Page::Dashboard },
    Route { path: "/converter", name: "converter", page: Page::Converter },
    Route { path: "/history", name: "history", page: Page::History },
    Route { path: "/companies", name: "companies", page: Page::Companies },
    Route { path: "/marks", name: "marks", page: Page::Marks },
    Route { path: "/coa", name: "coa", page: Page::Coa },
    Route { path: "/reports", name: "reports", page: Page::Reports },
    Route { path: "/amortization", name: "amortization", page: Page::Amortization },
    Route { path: "/products", name: "products", page: Page::Products },
    Route { path: "/hpp-batches", name: "hpp-batches", page: Page::HppBatches },
    Route { path: "/rentals", name: "rentals", page: Page::Rentals },
];

/// Route for a location. The query string, fragment and a trailing slash are
/// ignored.
pub fn resolve(location: &str) -> Option<&'static Route> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    ROUTES.iter().find(|route| route.path == path)
}

/// Route by its name.
pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}
