use serde::{Deserialize, Serialize};

use crate::domain::entities::project::Testimonial;
use crate::domain::publish_state::Stamp;

/// Singleton website configuration document (`settings/website`).
///
/// Every field defaults so that a sparse stored document, or one written by
/// an older build, still deserializes. The three stamps at the bottom are
/// independent: `updated_at` moves on settings writes, `project_updated_at`
/// is maintained by the project-write path, and `published_at` only moves
/// when a publish runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteSettings {
    pub title: String,
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub tagline: String,
    pub description: String,
    pub excerpt: String,
    pub logo: String,
    pub content: SiteContent,
    pub social: SocialLinks,
    pub seo: Vec<String>,
    pub updated_at: Stamp,
    pub project_updated_at: Stamp,
    pub published_at: Stamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub whatsapp: String,
    pub whatsapp_message: String,
}

/// Per-section content blocks rendered by the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteContent {
    pub hero: HeroSection,
    pub about: TextSection,
    pub services: CardsSection,
    pub benefits: CardsSection,
    pub location: TextSection,
    pub gallery: GallerySection,
    pub testimonials: TestimonialsSection,
    pub footer: FooterSection,
}

/// Hero carries visibility toggles rather than copies of the branding
/// fields; the rendered text comes from the top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub logo: bool,
    pub title: bool,
    pub tagline: bool,
    pub description: bool,
    #[serde(rename = "showCTA")]
    pub show_cta: bool,
    pub cta: Cta,
}

impl Default for HeroSection {
    fn default() -> Self {
        HeroSection {
            logo: true,
            title: true,
            tagline: true,
            description: false,
            show_cta: false,
            cta: Cta::default(),
        }
    }
}

/// Shared shape for the about and location sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSection {
    pub title: String,
    pub text: String,
    #[serde(rename = "showCTA")]
    pub show_cta: bool,
    pub cta: Cta,
}

/// Shared shape for the services and benefits sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CardsSection {
    pub title: String,
    pub text: String,
    pub cards: Vec<ContentCard>,
}

/// Gallery picks projects by id; selection is a set, order carries no
/// meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GallerySection {
    pub title: String,
    pub text: String,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TestimonialsSection {
    pub title: String,
    pub text: String,
    pub clients: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FooterSection {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Cta {
    pub text: String,
    pub button_text: String,
    pub button_variant: String,
}

/// `{title, text, image, link, order}` — order is a client-assigned display
/// sort integer with no uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContentCard {
    pub title: String,
    pub text: String,
    pub image: ImageRef,
    pub link: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImageRef {
    pub id: String,
    pub url: String,
}

/// Merge payload for `PUT /admin/settings/website`.
///
/// Absent fields leave the stored document untouched (the Firestore
/// `MergeAll` behaviour the admin relies on). Sections merge whole: the
/// admin forms always submit a complete section, so there is no deeper
/// patching level.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteSettingsPatch {
    pub title: Option<String>,
    #[serde(rename = "websiteURL")]
    pub website_url: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub logo: Option<String>,
    pub content: Option<SiteContentPatch>,
    pub social: Option<SocialLinks>,
    pub seo: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteContentPatch {
    pub hero: Option<HeroSection>,
    pub about: Option<TextSection>,
    pub services: Option<CardsSection>,
    pub benefits: Option<CardsSection>,
    pub location: Option<TextSection>,
    pub gallery: Option<GallerySection>,
    pub testimonials: Option<TestimonialsSection>,
    pub footer: Option<FooterSection>,
}

impl WebsiteSettingsPatch {
    /// Folds the patch into `doc`. Exhaustive destructuring keeps the merge
    /// honest: adding a settings field without deciding its merge behaviour
    /// fails to compile.
    pub fn apply(self, doc: &mut WebsiteSettings) {
        let WebsiteSettingsPatch {
            title,
            website_url,
            tagline,
            description,
            excerpt,
            logo,
            content,
            social,
            seo,
        } = self;

        if let Some(title) = title {
            doc.title = title;
        }
        if let Some(website_url) = website_url {
            doc.website_url = website_url;
        }
        if let Some(tagline) = tagline {
            doc.tagline = tagline;
        }
        if let Some(description) = description {
            doc.description = description;
        }
        if let Some(excerpt) = excerpt {
            doc.excerpt = excerpt;
        }
        if let Some(logo) = logo {
            doc.logo = logo;
        }
        if let Some(content) = content {
            content.apply(&mut doc.content);
        }
        if let Some(social) = social {
            doc.social = social;
        }
        if let Some(seo) = seo {
            doc.seo = seo;
        }
    }
}

impl SiteContentPatch {
    pub fn apply(self, content: &mut SiteContent) {
        let SiteContentPatch {
            hero,
            about,
            services,
            benefits,
            location,
            gallery,
            testimonials,
            footer,
        } = self;

        if let Some(hero) = hero {
            content.hero = hero;
        }
        if let Some(about) = about {
            content.about = about;
        }
        if let Some(services) = services {
            content.services = services;
        }
        if let Some(benefits) = benefits {
            content.benefits = benefits;
        }
        if let Some(location) = location {
            content.location = location;
        }
        if let Some(gallery) = gallery {
            content.gallery = gallery;
        }
        if let Some(testimonials) = testimonials {
            content.testimonials = testimonials;
        }
        if let Some(footer) = footer {
            content.footer = footer;
        }
    }
}

/// Singleton taxonomy document (`settings/projects`): the categories and
/// tags offered by the project forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub updated_at: Stamp,
}

/// Write payload for `PUT /admin/settings/projects`. The stored stamp is
/// server-owned, so the update shape deliberately has no `updatedAt`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectSettingsUpdate {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl ProjectSettingsUpdate {
    pub fn normalized(self) -> (Vec<String>, Vec<String>) {
        (
            normalize_taxonomy(self.categories),
            normalize_taxonomy(self.tags),
        )
    }
}

/// Trims entries, drops empties and deduplicates case-insensitively; the
/// first spelling wins. Keeps taxonomy values unique server-side instead of
/// trusting every client to do it.
pub fn normalize_taxonomy(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let folded = trimmed.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        out.push(trimmed.to_string());
    }
    out
}
