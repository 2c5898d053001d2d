//! Gallery page catalog
//!
//! Every demo route and the source identifier its code panel displays. The
//! bundle step snapshots exactly these identifiers by default.

use vitrine_core::{SourceError, SourceId};

/// One page of the gallery
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Demo {
    pub route: &'static str,
    pub title: &'static str,
    /// Source shown in the code panel; `None` means the page has no panel
    pub source: Option<&'static str>,
}

impl Demo {
    pub fn source_id(&self) -> Option<Result<SourceId, SourceError>> {
        self.source.map(SourceId::new)
    }
}

pub const CATALOG: &[Demo] = &[
    Demo {
        route: "/",
        title: "Home",
        source: None,
    },
    Demo {
        route: "/button-demo",
        title: "Interactive Demo",
        source: None,
    },
    Demo {
        route: "/button-hover",
        title: "Button Hover",
        source: Some("src/components/animated-button/animated-button.tsx"),
    },
    Demo {
        route: "/text-hover",
        title: "Text Hover",
        source: Some("src/components/text-hover/text-hover.tsx"),
    },
    Demo {
        route: "/text-reveal",
        title: "Text Reveal",
        source: Some("src/components/text-reveal/text-reveal.tsx"),
    },
    Demo {
        route: "/text-highlight",
        title: "Text Highlight",
        source: Some("src/components/text-highlight/text-highlight.tsx"),
    },
    Demo {
        route: "/dropdown",
        title: "Dropdown Menu",
        source: Some("src/components/dropdown/dropdown.tsx"),
    },
    Demo {
        route: "/bottom-bar",
        title: "Asset Counter",
        source: Some("src/components/asset-counter-demo/asset-counter-demo.tsx"),
    },
    Demo {
        route: "/number-sliders",
        title: "Travel Time Calculator",
        source: Some("src/components/travel-time-calculator/travel-time-calculator.tsx"),
    },
];

/// Look up a demo by route. A missing leading slash is tolerated.
pub fn find_demo(route: &str) -> Option<&'static Demo> {
    let trimmed = route.trim_start_matches('/');
    CATALOG
        .iter()
        .find(|demo| demo.route.trim_start_matches('/') == trimmed)
}

/// Identifiers of every page that shows a code panel, in catalog order
pub fn source_ids() -> Vec<SourceId> {
    CATALOG
        .iter()
        .filter_map(|demo| demo.source)
        .filter_map(|source| SourceId::new(source).ok())
        .collect()
}
