//! Sample records shown by the in-memory store and optionally seeded into SQLite.

use crate::models::{Event, NewsItem, Resource, SiteConfig};

pub fn events() -> Vec<Event> {
    vec![
        Event {
            id: "1".to_string(),
            title: "Annual ISP Conference".to_string(),
            date: "2025-07-15".to_string(),
            description: "Join us for the largest gathering of Kenyan ISPs and telecoms."
                .to_string(),
            location: "Nairobi Convention Center".to_string(),
            image_url: Some("/events/conference.jpg".to_string()),
        },
        Event {
            id: "2".to_string(),
            title: "Cybersecurity Workshop".to_string(),
            date: "2025-08-05".to_string(),
            description: "Learn the latest in network security protocols and best practices."
                .to_string(),
            location: "Tech Hub Mombasa".to_string(),
            image_url: Some("/events/workshop.jpg".to_string()),
        },
    ]
}

pub fn news() -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: "1".to_string(),
            title: "NESPAK Partners with Government on Digital Inclusion Initiative".to_string(),
            date: "2025-05-05".to_string(),
            summary: "A new partnership aims to bring internet access to rural areas.".to_string(),
            content: "The Network Service Providers Association of Kenya has announced a landmark partnership..."
                .to_string(),
            image_url: Some("/news/digital-inclusion.jpg".to_string()),
            author: Some("NESPAK Comms Team".to_string()),
        },
        NewsItem {
            id: "2".to_string(),
            title: "New Regulatory Framework Announced".to_string(),
            date: "2025-04-22".to_string(),
            summary: "Updated guidelines for ISPs operating in Kenya.".to_string(),
            content: "The Communications Authority of Kenya has published new guidelines that will affect..."
                .to_string(),
            image_url: Some("/news/regulations.jpg".to_string()),
            author: Some("John Mwangi".to_string()),
        },
    ]
}

pub fn resources() -> Vec<Resource> {
    vec![
        Resource {
            id: "1".to_string(),
            title: "ISP Licensing Guide".to_string(),
            description: "Complete guide to obtaining and maintaining ISP licenses in Kenya."
                .to_string(),
            url: "/resources/licensing-guide.pdf".to_string(),
            category: "Regulation".to_string(),
            resource_type: "PDF".to_string(),
        },
        Resource {
            id: "2".to_string(),
            title: "Network Security Toolkit".to_string(),
            description: "Collection of tools and resources for securing ISP networks.".to_string(),
            url: "/resources/security-toolkit.zip".to_string(),
            category: "Security".to_string(),
            resource_type: "ZIP".to_string(),
        },
    ]
}

/// The persisted sample configuration, which carries a banner unlike the fallback default.
pub fn site_config() -> SiteConfig {
    SiteConfig {
        banner_text: Some(
            "Welcome to NESPAK - Connecting Kenya's Internet Service Providers".to_string(),
        ),
        ..SiteConfig::default()
    }
}
