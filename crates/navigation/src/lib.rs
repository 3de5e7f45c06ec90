// Header and footer link data consumed by the site templates

pub mod permalink;

use chrono::Datelike;
use serde::Serialize;
use site_kit_core::config::SiteConfig;

pub use permalink::Permalinks;

const LINKEDIN_URL: &str = "https://www.linkedin.com/company/innotek-kft";
const GITHUB_URL: &str = "https://github.com/innotekhq";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

impl Link {
    fn new(text: &str, href: String) -> Self {
        Self {
            text: text.to_string(),
            href,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVariant {
    Primary,
}

/// Call-to-action button in the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub text: String,
    pub href: String,
    pub variant: ActionVariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderData {
    pub links: Vec<Link>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkGroup {
    pub title: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub aria_label: String,
    pub icon: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    pub links: Vec<LinkGroup>,
    pub secondary_links: Vec<Link>,
    pub social_links: Vec<SocialLink>,
    pub foot_note: String,
}

/// Everything the page shell needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub header: HeaderData,
    pub footer: FooterData,
}

pub fn header_data(links: &Permalinks) -> HeaderData {
    HeaderData {
        links: vec![
            Link::new("Home", links.page("/")),
            Link::new("Services", links.page("/#services")),
            Link::new("Case Studies", links.page("/#case-studies")),
            Link::new("Contact", links.page("/contact")),
            Link::new("Blog", links.blog()),
        ],
        actions: vec![Action {
            text: "Work With Us".to_string(),
            href: links.page("/contact"),
            variant: ActionVariant::Primary,
        }],
    }
}

pub fn footer_data(links: &Permalinks, company: &str, year: i32) -> FooterData {
    let social = |label: &str, icon: &str, href: String| SocialLink {
        aria_label: label.to_string(),
        icon: icon.to_string(),
        href,
    };

    FooterData {
        links: vec![
            LinkGroup {
                title: "Company".to_string(),
                links: vec![
                    Link::new("Blog", links.blog()),
                    Link::new("Services", links.page("/#services")),
                    Link::new("Case Studies", links.page("/#case-studies")),
                ],
            },
            LinkGroup {
                title: "Support".to_string(),
                links: vec![Link::new("Contact", links.page("/contact"))],
            },
        ],
        secondary_links: vec![
            Link::new("Terms", links.page("/terms")),
            Link::new("Privacy Policy", links.page("/privacy")),
        ],
        social_links: vec![
            social("LinkedIn", "tabler:brand-linkedin", LINKEDIN_URL.to_string()),
            social("Github", "tabler:brand-github", GITHUB_URL.to_string()),
            social("RSS", "tabler:rss", links.asset("/rss.xml")),
        ],
        foot_note: format!("© {} {}. All rights reserved.", year, company),
    }
}

pub fn navigation(site: &SiteConfig, year: i32) -> Navigation {
    let links = Permalinks::from_site(site);
    Navigation {
        header: header_data(&links),
        footer: footer_data(&links, &site.company, year),
    }
}

/// Year used in the footnote, evaluated when the page data is built
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
