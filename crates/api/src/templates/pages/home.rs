use maud::{html, Markup, DOCTYPE};

/// Routes that can be followed as-is
const LINKED_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
];

/// Routes that take date segments
const PARAM_ROUTES: &[&str] = &["/api/v1.0/<start>", "/api/v1.0/<start>/<end>"];

pub fn home_page(api_base: &str) -> Markup {
    let api_base = api_base.trim_end_matches('/');

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Hawaii Climate API" }
            }
            body {
                p { "Welcome to the Home Page." }
                p { "Available Routes:" }
                ul {
                    @for route in LINKED_ROUTES {
                        li { a href={ (api_base) (route) } { (route) } }
                    }
                    @for route in PARAM_ROUTES {
                        li { code { (route) } }
                    }
                }
                p {
                    "Dates may be written with or without hyphens, e.g. "
                    code { "/api/v1.0/2017-01-01" } " or " code { "/api/v1.0/20170101/20170131" } "."
                }
                p { a href={ (api_base) "/docs" } { "API Docs" } }
            }
        }
    }
}
