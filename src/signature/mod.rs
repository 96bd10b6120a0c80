//! Technology signature registry.
//!
//! One canonical, static table of signatures per category. Each signature
//! pairs a technology name with a probe — a pure function over the page
//! snapshot that reports whether the technology's markers are present. The
//! three prober variants (full/direct/basic) are derived from these tables by
//! tier filtering, so the variants can never drift apart.
//!
//! Core signatures additionally carry raw-text markers: lowercase substrings
//! the basic prober scans for in the unparsed body, for pages where building
//! a snapshot is not worth the trouble.
//!
//! Probes favor low-false-positive markers (a uniquely-named global, a
//! generator meta tag) where one exists; a few inherently fuzzy checks
//! (utility-class prefixes, short CDN substrings) are kept because dropping
//! them would blind the scan to the most common deployments. False positives
//! from those checks are an accepted limitation.

use crate::detection::Category;
use crate::snapshot::{PageSnapshot, ProbeError};

/// A probe evaluates one technology's markers against a snapshot.
pub type Probe = fn(&PageSnapshot) -> Result<bool, ProbeError>;

/// Signature tier, controlling which prober variants evaluate it.
///
/// `Core` signatures run in every variant; `Standard` adds the direct
/// variant's coverage; `Extended` signatures run only in the full variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Evaluated by every variant, including basic
    Core,
    /// Evaluated by the direct and full variants
    Standard,
    /// Evaluated by the full variant only
    Extended,
}

/// A named heuristic asserting the presence of one technology.
pub struct Signature {
    /// Technology name as rendered to the user (wire format, verbatim)
    pub name: &'static str,
    /// Variant membership
    pub tier: Tier,
    /// Marker check
    pub probe: Probe,
    /// Lowercase substrings the basic prober scans the raw body for.
    /// Populated for `Core` signatures only.
    pub raw_markers: &'static [&'static str],
}

static FRONTEND_SIGNATURES: &[Signature] = &[
    Signature {
        name: "React",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.has_global("React")
                || s.matches_selector("[data-reactroot], [data-react]")?
                || s.script_src_contains("react"))
        },
        raw_markers: &["react"],
    },
    Signature {
        name: "Vue.js",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.has_global("Vue")
                || s.matches_selector("[data-v-app]")?
                || s.script_src_contains("vue"))
        },
        raw_markers: &["vue"],
    },
    Signature {
        name: "Angular",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.any_global(&["angular", "ng"])
                || s.matches_selector("[ng-app], [ng-version]")?
                || s.script_src_contains("angular"))
        },
        raw_markers: &["angular"],
    },
    Signature {
        name: "jQuery",
        tier: Tier::Core,
        probe: |s| Ok(s.any_global(&["jQuery", "$"]) || s.script_src_contains("jquery")),
        raw_markers: &["jquery"],
    },
    Signature {
        name: "Bootstrap",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.asset_url_contains("bootstrap")
                || s.matches_selector(r#".container, .row, [class*="col-"]"#)?)
        },
        raw_markers: &["bootstrap"],
    },
    Signature {
        name: "Next.js",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.has_global("__NEXT_DATA__")
                || s.has_script_tag_id("__NEXT_DATA__")
                || s.matches_selector("#__next")?
                || s.script_src_contains("/_next/"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Nuxt.js",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.has_global("__NUXT__")
                || s.matches_selector("#__nuxt")?
                || s.script_src_contains("/_nuxt/"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Tailwind CSS",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.asset_url_contains("tailwind")
                || s.matches_selector(r#"[class*="bg-"], [class*="text-"]"#)?)
        },
        raw_markers: &[],
    },
    Signature {
        name: "Alpine.js",
        tier: Tier::Standard,
        probe: |s| Ok(s.has_global("Alpine") || s.matches_selector("[x-data], [x-show]")?),
        raw_markers: &[],
    },
    Signature {
        name: "Svelte",
        tier: Tier::Standard,
        probe: |s| Ok(s.has_global("svelte") || s.script_src_contains("svelte")),
        raw_markers: &[],
    },
    Signature {
        name: "D3.js",
        tier: Tier::Standard,
        probe: |s| Ok(s.has_global("d3") || s.script_src_contains("d3")),
        raw_markers: &[],
    },
    Signature {
        name: "Three.js",
        tier: Tier::Standard,
        probe: |s| Ok(s.has_global("THREE") || s.script_src_contains("three")),
        raw_markers: &[],
    },
    Signature {
        name: "Lodash",
        tier: Tier::Standard,
        probe: |s| Ok(s.any_global(&["_", "lodash"]) || s.script_src_contains("lodash")),
        raw_markers: &[],
    },
    Signature {
        name: "Webpack",
        tier: Tier::Extended,
        probe: |s| Ok(s.has_global("webpackJsonp") || s.script_src_contains("webpack")),
        raw_markers: &[],
    },
    Signature {
        name: "Vite",
        tier: Tier::Extended,
        probe: |s| {
            Ok(s.matches_selector(r#"script[type="module"][src*="vite"]"#)?
                || s.script_src_contains("/@vite/"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Parcel",
        tier: Tier::Extended,
        probe: |s| Ok(s.script_src_contains("parcel")),
        raw_markers: &[],
    },
    Signature {
        name: "Rollup",
        tier: Tier::Extended,
        probe: |s| Ok(s.has_global("rollup")),
        raw_markers: &[],
    },
    Signature {
        name: "TypeScript",
        tier: Tier::Extended,
        probe: |s| s.matches_selector(r#"script[type="text/typescript"]"#),
        raw_markers: &[],
    },
    Signature {
        name: "Sass/SCSS",
        tier: Tier::Extended,
        probe: |s| Ok(s.link_href_contains(".scss") || s.link_href_contains(".sass")),
        raw_markers: &[],
    },
    Signature {
        name: "Less",
        tier: Tier::Extended,
        probe: |s| Ok(s.link_href_contains(".less")),
        raw_markers: &[],
    },
    Signature {
        name: "PWA",
        tier: Tier::Extended,
        probe: |s| {
            Ok(s.matches_selector(r#"link[rel="manifest"]"#)?
                && (s.inline_script_contains("serviceWorker")
                    || s.script_src_contains("service-worker")))
        },
        raw_markers: &[],
    },
    Signature {
        name: "AMP",
        tier: Tier::Extended,
        // The ⚡ attribute is not expressible as a CSS selector
        probe: |s| Ok(s.html_root_has_attr(&["amp", "⚡"])),
        raw_markers: &[],
    },
    Signature {
        name: "GraphQL",
        tier: Tier::Extended,
        probe: |s| Ok(s.has_global("GraphQL") || s.script_src_contains("graphql")),
        raw_markers: &[],
    },
];

static BACKEND_SIGNATURES: &[Signature] = &[
    Signature {
        name: "Django",
        tier: Tier::Standard,
        probe: |s| s.matches_selector(r#"input[name="csrfmiddlewaretoken"]"#),
        raw_markers: &[],
    },
    Signature {
        name: "ASP.NET",
        tier: Tier::Standard,
        probe: |s| s.matches_selector(r#"input[name="__VIEWSTATE"]"#),
        raw_markers: &[],
    },
    Signature {
        name: "PHP",
        tier: Tier::Standard,
        probe: |s| Ok(s.url_contains(".php")),
        raw_markers: &[],
    },
];

static ANALYTICS_SIGNATURES: &[Signature] = &[
    Signature {
        name: "Google Analytics",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.any_global(&["gtag", "ga", "GoogleAnalyticsObject"])
                || s.script_src_contains("google-analytics")
                || s.script_src_contains("gtag"))
        },
        raw_markers: &["google-analytics", "googletagmanager", "gtag("],
    },
    Signature {
        name: "Google Tag Manager",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.any_global(&["dataLayer", "google_tag_manager"])
                || s.script_src_contains("googletagmanager"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Facebook Pixel",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.any_global(&["fbq", "_fbq"]) || s.script_src_contains("connect.facebook.net"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Hotjar",
        tier: Tier::Standard,
        probe: |s| Ok(s.any_global(&["hj", "_hjSettings"]) || s.script_src_contains("hotjar")),
        raw_markers: &[],
    },
];

static CMS_SIGNATURES: &[Signature] = &[
    Signature {
        name: "WordPress",
        tier: Tier::Core,
        probe: |s| {
            Ok(s.asset_url_contains("wp-content")
                || s.meta_content_contains("generator", "WordPress")
                || s.has_global("wp"))
        },
        raw_markers: &["wp-content"],
    },
    Signature {
        name: "Shopify",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.has_global("Shopify")
                || s.script_src_contains("shopify")
                || s.matches_selector("[data-shopify]")?)
        },
        raw_markers: &[],
    },
    Signature {
        name: "Squarespace",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.script_src_contains("squarespace")
                || s.meta_content_contains("generator", "Squarespace"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Wix",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.script_src_contains("wix.com") || s.meta_content_contains("generator", "Wix"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Webflow",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.script_src_contains("webflow") || s.meta_content_contains("generator", "Webflow"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Drupal",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.has_global("Drupal")
                || s.script_src_contains("drupal")
                || s.meta_content_contains("generator", "Drupal"))
        },
        raw_markers: &[],
    },
    Signature {
        name: "Magento",
        tier: Tier::Standard,
        probe: |s| {
            Ok(s.has_global("Magento")
                || s.script_src_contains("magento")
                || s.matches_selector("[data-mage-init]")?)
        },
        raw_markers: &[],
    },
];

/// Returns the canonical signature table for `category`, in registration
/// order.
pub fn signatures(category: Category) -> &'static [Signature] {
    match category {
        Category::Frontend => FRONTEND_SIGNATURES,
        Category::Backend => BACKEND_SIGNATURES,
        Category::Analytics => ANALYTICS_SIGNATURES,
        Category::Cms => CMS_SIGNATURES,
    }
}
