//! Seed catalog: built-in data shown when the backend cannot be used.
//!
//! Every dataset here is shaped exactly like the matching backend response
//! and passes the same shape contract. Bump `SEED_VERSION` whenever the
//! catalog content changes.

use crate::models::{Bookmark, BookmarkSection, Collection, CollectionKey, Switch, Task};

/// Version of the bundled catalog.
pub const SEED_VERSION: u32 = 1;

/// Seed data for one collection.
pub fn seed_collection(key: CollectionKey) -> Collection {
    match key {
        CollectionKey::Bookmarks => Collection::Bookmarks(seed_bookmark_sections()),
        CollectionKey::Switches => Collection::Switches(seed_switches()),
        CollectionKey::Tasks => Collection::Tasks(seed_tasks()),
    }
}

pub fn seed_bookmark_sections() -> Vec<BookmarkSection> {
    vec![
        section(
            "admin",
            "Administración Local",
            &[
                (1, "Firewall HQ", "https://192.168.10.1", "Administración central", None),
                (2, "NAS Principal", "https://192.168.10.20", "Almacenamiento y respaldos", None),
            ],
        ),
        section(
            "mx",
            "Red MX",
            &[
                (3, "Firewall MX", "https://10.0.0.1", "Acceso remoto", None),
                (4, "Switch MX-24", "https://10.0.0.2", "Puertos y VLANs", None),
            ],
        ),
        section(
            "tools",
            "Herramientas Locales",
            &[
                (5, "Gestor de Switches", "#/switches", "Configurar puertos y VLANs", Some("local")),
                (6, "Formatos", "#/formatos", "Plantillas y reportes", Some("local")),
            ],
        ),
    ]
}

pub fn seed_switches() -> Vec<Switch> {
    vec![
        Switch {
            id: 1,
            name: "Core Switch".to_string(),
            ip: "192.168.10.2".to_string(),
            location: Some("Site HQ".to_string()),
            notes: Some("Stack principal".to_string()),
        },
        Switch {
            id: 2,
            name: "Switch Piso 2".to_string(),
            ip: "192.168.20.2".to_string(),
            location: Some("Piso 2".to_string()),
            notes: Some("VLAN 20 usuarios".to_string()),
        },
    ]
}

/// Tasks have no meaningful offline content; an empty list renders as
/// "no tasks yet".
pub fn seed_tasks() -> Vec<Task> {
    Vec::new()
}

type SeedLink<'a> = (i64, &'a str, &'a str, &'a str, Option<&'a str>);

fn section(id: &str, title: &str, links: &[SeedLink<'_>]) -> BookmarkSection {
    BookmarkSection {
        id: id.to_string(),
        title: title.to_string(),
        links: links
            .iter()
            .map(|(link_id, label, url, description, tag)| Bookmark {
                id: *link_id,
                label: label.to_string(),
                url: url.to_string(),
                section: id.to_string(),
                description: Some(description.to_string()),
                tags: tag.map(|t| vec![t.to_string()]),
            })
            .collect(),
    }
}
