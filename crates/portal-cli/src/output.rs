//! Rendering of listings and notices.

use serde::Serialize;

use portal_core::{BookmarkSection, Switch, Task};
use portal_gateway::{CacheStats, Listing, Notice, WarmReport};

fn provenance<T>(listing: &Listing<T>, noun: &str, shown: usize) -> String {
    let mut line = format!(
        "{} of {} {} ({}, {})",
        shown,
        listing.total,
        noun,
        listing.origin,
        listing.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(reason) = &listing.reason {
        line.push_str(&format!("\n  fallback reason: {}", reason));
    }
    line
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_bookmarks(listing: &Listing<BookmarkSection>) {
    let shown: usize = listing.items.iter().map(|s| s.links.len()).sum();
    println!("{}", provenance(listing, "bookmarks", shown));

    for section in &listing.items {
        println!();
        println!("[{}] {}", section.id, section.title);
        for link in &section.links {
            print!("  #{:<4} {:<24} {}", link.id, link.label, link.url);
            if let Some(tags) = link.tags.as_ref().filter(|t| !t.is_empty()) {
                print!("  [{}]", tags.join(", "));
            }
            println!();
            if let Some(description) = &link.description {
                println!("         {}", description);
            }
        }
    }
}

pub fn print_switches(listing: &Listing<Switch>) {
    println!("{}", provenance(listing, "switches", listing.items.len()));
    for switch in &listing.items {
        println!(
            "  #{:<4} {:<20} {:<16} {}",
            switch.id,
            switch.name,
            switch.ip,
            switch.location.as_deref().unwrap_or("-")
        );
        if let Some(notes) = &switch.notes {
            println!("         {}", notes);
        }
    }
}

pub fn print_tasks(listing: &Listing<Task>) {
    println!("{}", provenance(listing, "tasks", listing.items.len()));
    if listing.items.is_empty() && listing.total == 0 {
        println!("  no tasks yet");
    }
    for task in &listing.items {
        let mark = if task.completed { "x" } else { " " };
        println!("  [{}] #{:<4} {}  ({})", mark, task.id, task.title, task.created_at);
    }
}

pub fn print_status(transport: &str, report: &WarmReport, stats: &CacheStats) {
    println!("transport: {}", transport);
    println!("bookmarks: {}", report.bookmarks);
    println!("switches:  {}", report.switches);
    println!("tasks:     {}", report.tasks);
    println!(
        "cache:     {} hits, {} misses, {} invalidations",
        stats.hits, stats.misses, stats.invalidations
    );
}

pub fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{}", notice);
    } else {
        println!("{}", notice);
    }
}
