//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use serde_json::json;
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// Brand name shown in the header, titles and structured data.
pub const SITE_NAME: &str = "MELIUS";

/// Page title and hero headline.
pub const TAGLINE: &str = "Strategic Excellence in Business Advisory";

/// Meta description and hero copy.
pub const SITE_DESCRIPTION: &str = "Empowering businesses with expert financial guidance and strategic solutions tailored to drive sustainable growth and success.";

// =============================================================================
// Services (static content)
// =============================================================================

/// Icon drawn on a service card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceIcon {
    BarChart,
    Target,
    Briefcase,
}

/// A service offered on the landing page.
#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub title: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub icon: ServiceIcon,
}

/// Services in display order.
pub const SERVICES: [Service; 3] = [
    Service {
        title: "Financial Advisory",
        slug: "financial-advisory",
        description: "Comprehensive financial planning and analysis to optimize your business performance and maximize profitability.",
        icon: ServiceIcon::BarChart,
    },
    Service {
        title: "Strategic Planning",
        slug: "strategic-planning",
        description: "Develop robust strategies that align with your vision and position your business for long-term success.",
        icon: ServiceIcon::Target,
    },
    Service {
        title: "Business Consulting",
        slug: "business-consulting",
        description: "Expert guidance on operations, growth strategies, and organizational development to elevate your business.",
        icon: ServiceIcon::Briefcase,
    },
];

// =============================================================================
// Template
// =============================================================================

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site_name: &'static str,
    pub title: String,
    pub tagline: &'static str,
    pub description: &'static str,
    pub site_url: String,
    pub contact_email: String,
    pub services: &'static [Service],
    /// JSON-LD blocks, already serialized and safe inside `<script>`.
    pub structured_data: Vec<String>,
}

impl HomeTemplate {
    /// Build the landing page for a site served at `site_url`.
    #[must_use]
    pub fn new(site_url: &str, contact_email: &str) -> Self {
        Self {
            site_name: SITE_NAME,
            title: format!("{SITE_NAME} - {TAGLINE}"),
            tagline: TAGLINE,
            description: SITE_DESCRIPTION,
            site_url: site_url.to_string(),
            contact_email: contact_email.to_string(),
            services: &SERVICES,
            structured_data: structured_data(site_url, contact_email),
        }
    }
}

/// Display the landing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    let config = state.config();
    HomeTemplate::new(&config.site_url, config.mailtrap.recipient_email.as_str())
}

/// Organization, `WebSite` and `Service` schema.org descriptions.
fn structured_data(site_url: &str, contact_email: &str) -> Vec<String> {
    let organization = json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": SITE_NAME,
        "url": site_url,
        "logo": format!("{site_url}/static/images/melius-lion.svg"),
        "description": SITE_DESCRIPTION,
        "address": {
            "@type": "PostalAddress",
            "addressLocality": "Mumbai, Maharashtra",
            "addressCountry": "IN",
        },
        "contactPoint": {
            "@type": "ContactPoint",
            "email": contact_email,
            "contactType": "Customer Service",
        },
    });

    let website = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": SITE_NAME,
        "url": site_url,
        "description": SITE_DESCRIPTION,
    });

    let offers: Vec<_> = SERVICES
        .iter()
        .zip(1..)
        .map(|(service, position)| {
            json!({
                "@type": "Offer",
                "itemOffered": {
                    "@type": "Service",
                    "name": service.title,
                    "description": service.description,
                    "url": format!("{site_url}/#{}", service.slug),
                },
                "position": position,
            })
        })
        .collect();

    let services = json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "serviceType": "Business Advisory Services",
        "provider": { "@type": "Organization", "name": SITE_NAME },
        "areaServed": "Worldwide",
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": "Business Advisory Services",
            "itemListElement": offers,
        },
    });

    [organization, website, services]
        .iter()
        .map(|value| script_safe_json(&value.to_string()))
        .collect()
}

/// Keep serialized JSON from closing its `<script>` element.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
