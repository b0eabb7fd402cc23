//! Draft-vs-baseline comparison for the save/publish workflow.
//!
//! One rule per field type, applied uniformly:
//! - scalars compare by value;
//! - set-like string lists (tags, categories, SEO keywords, gallery
//!   selection) compare as case-insensitive sets — reordering or
//!   re-casing is not an edit;
//! - sequence-like lists (project images, content cards, testimonial
//!   clients) compare as ordered sequences — reordering is an edit;
//! - server-owned stamps (`updatedAt`, `projectUpdatedAt`, `publishedAt`)
//!   never count.
//!
//! The service layer uses these checks to skip no-op writes, so saving an
//! unchanged form cannot move a stamp and manufacture a false
//! needs-publish signal.

use crate::domain::entities::project::Project;
use crate::domain::entities::settings::{ProjectSettings, SiteContent, WebsiteSettings};

pub trait DraftDiff {
    fn differs_from(&self, baseline: &Self) -> bool;
}

/// Membership-only equality, case-insensitive, duplicates collapsed.
pub fn set_eq(a: &[String], b: &[String]) -> bool {
    fn folded(values: &[String]) -> Vec<String> {
        let mut out: Vec<String> = values.iter().map(|v| v.trim().to_lowercase()).collect();
        out.sort();
        out.dedup();
        out
    }
    folded(a) == folded(b)
}

impl DraftDiff for WebsiteSettings {
    fn differs_from(&self, baseline: &Self) -> bool {
        // Destructured so a new field cannot silently escape the check.
        let WebsiteSettings {
            title,
            website_url,
            tagline,
            description,
            excerpt,
            logo,
            content,
            social,
            seo,
            updated_at: _,
            project_updated_at: _,
            published_at: _,
        } = self;

        *title != baseline.title
            || *website_url != baseline.website_url
            || *tagline != baseline.tagline
            || *description != baseline.description
            || *excerpt != baseline.excerpt
            || *logo != baseline.logo
            || content.differs_from(&baseline.content)
            || *social != baseline.social
            || !set_eq(seo, &baseline.seo)
    }
}

impl DraftDiff for SiteContent {
    fn differs_from(&self, baseline: &Self) -> bool {
        let SiteContent {
            hero,
            about,
            services,
            benefits,
            location,
            gallery,
            testimonials,
            footer,
        } = self;

        *hero != baseline.hero
            || *about != baseline.about
            || *services != baseline.services
            || *benefits != baseline.benefits
            || *location != baseline.location
            // Gallery selection is a set of project ids.
            || gallery.title != baseline.gallery.title
            || gallery.text != baseline.gallery.text
            || !set_eq(&gallery.projects, &baseline.gallery.projects)
            || *testimonials != baseline.testimonials
            || *footer != baseline.footer
    }
}

impl DraftDiff for Project {
    fn differs_from(&self, baseline: &Self) -> bool {
        let Project {
            id,
            title,
            description,
            location,
            category,
            tags,
            images,
            cover_image,
            status,
            featured,
            testimonial,
            created_at: _,
            updated_at: _,
        } = self;

        *id != baseline.id
            || *title != baseline.title
            || *description != baseline.description
            || *location != baseline.location
            || *category != baseline.category
            || !set_eq(tags, &baseline.tags)
            // Saved image order is meaningful; the public site renders in
            // sequence.
            || *images != baseline.images
            || *cover_image != baseline.cover_image
            || *status != baseline.status
            || *featured != baseline.featured
            || *testimonial != baseline.testimonial
    }
}

impl DraftDiff for ProjectSettings {
    fn differs_from(&self, baseline: &Self) -> bool {
        let ProjectSettings {
            categories,
            tags,
            updated_at: _,
        } = self;

        !set_eq(categories, &baseline.categories) || !set_eq(tags, &baseline.tags)
    }
}

/// An in-progress edit: the draft plus any files selected but not yet
/// uploaded. Pending uploads make the copy dirty even when every field
/// still matches the baseline.
#[derive(Debug, Clone)]
pub struct WorkingCopy<T> {
    pub draft: T,
    pub pending_uploads: usize,
}

impl<T: DraftDiff> WorkingCopy<T> {
    pub fn is_dirty(&self, baseline: &T) -> bool {
        self.pending_uploads > 0 || self.draft.differs_from(baseline)
    }
}
