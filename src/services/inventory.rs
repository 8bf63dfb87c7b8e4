use crate::domain::{
    ContainerRuntime, ContainerSummary, DiskUsage, EngineInfo, ImageSummary, VolumeSummary,
};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;

const UNITS: &[u8] = b"KMGTPE";
const NONE: &str = "<none>";

/// Renders a byte count with binary (1024) steps: `512 B`, `1.0 KB`, `3.4 GB`.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, UNITS[exp] as char)
}

/// Cuts `s` to `max` characters, ending in `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// First 12 characters of an ID, without the `sha256:` prefix.
pub fn short_id(id: &str) -> String {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.chars().take(12).collect()
}

/// Splits `repo:tag`, leaving registry ports such as `host:5000/app` intact.
pub fn split_repo_tag(reference: &str) -> (&str, &str) {
    match reference.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (reference, NONE),
    }
}

/// A read-only snapshot of engine resources.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub engine: EngineInfo,
    pub containers: Vec<ContainerSummary>,
    pub images: Vec<ImageSummary>,
    pub volumes: Vec<VolumeSummary>,
    pub usage: Option<DiskUsage>,
}

impl Inventory {
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "📋 Docker Resources Overview")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(
            out,
            "Engine: {} ({}, {})",
            self.engine.name, self.engine.server_version, self.engine.operating_system
        )?;

        self.render_containers(out)?;
        self.render_images(out)?;
        self.render_volumes(out)?;

        if let Some(usage) = &self.usage {
            render_usage(out, usage)?;
        }

        Ok(())
    }

    fn render_containers<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\n🐳 Containers ({} total):", self.containers.len())?;
        if self.containers.is_empty() {
            writeln!(out, "   No containers found")?;
            return Ok(());
        }

        writeln!(
            out,
            "   {:<12} {:<20} {:<15} {:<10}",
            "ID", "Image", "Status", "Names"
        )?;
        writeln!(out, "   {}", "-".repeat(60))?;
        for c in &self.containers {
            let names: Vec<&str> = c.names.iter().map(|n| n.trim_start_matches('/')).collect();
            writeln!(
                out,
                "   {:<12} {:<20} {:<15} {:<10}",
                short_id(&c.id),
                truncate(&c.image, 20),
                c.status,
                truncate(&names.join(", "), 20)
            )?;
        }
        Ok(())
    }

    fn render_images<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\n🖼️  Images ({} total):", self.images.len())?;
        if self.images.is_empty() {
            writeln!(out, "   No images found")?;
            return Ok(());
        }

        writeln!(
            out,
            "   {:<12} {:<30} {:<10} {:<15}",
            "ID", "Repository", "Tag", "Size"
        )?;
        writeln!(out, "   {}", "-".repeat(70))?;
        for image in &self.images {
            let (repo, tag) = image
                .repo_tags
                .first()
                .map(|r| split_repo_tag(r))
                .unwrap_or((NONE, NONE));
            writeln!(
                out,
                "   {:<12} {:<30} {:<10} {:<15}",
                short_id(&image.id),
                truncate(repo, 30),
                tag,
                format_size(image.size)
            )?;
        }
        Ok(())
    }

    fn render_volumes<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\n💾 Volumes ({} total):", self.volumes.len())?;
        if self.volumes.is_empty() {
            writeln!(out, "   No volumes found")?;
            return Ok(());
        }

        writeln!(out, "   {:<20} {:<15} {:<30}", "Name", "Driver", "Mountpoint")?;
        writeln!(out, "   {}", "-".repeat(70))?;
        for volume in &self.volumes {
            writeln!(
                out,
                "   {:<20} {:<15} {:<30}",
                truncate(&volume.name, 20),
                volume.driver,
                truncate(&volume.mountpoint, 30)
            )?;
        }
        Ok(())
    }
}

fn render_usage<W: Write>(out: &mut W, usage: &DiskUsage) -> Result<()> {
    writeln!(out, "\n💽 Disk usage:")?;
    for (label, size) in [
        ("Images", usage.images_size),
        ("Containers", usage.containers_size),
        ("Volumes", usage.volumes_size),
        ("Build cache", usage.build_cache_size),
        ("Total", usage.total()),
    ] {
        writeln!(out, "   {:<12} {}", label, format_size(size))?;
    }
    Ok(())
}

/// Read path: fetches the current listings. Any failure aborts.
pub struct InventoryService {
    runtime: Arc<dyn ContainerRuntime>,
}

impl InventoryService {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    pub fn snapshot(&self, with_usage: bool) -> Result<Inventory> {
        let engine = self.runtime.system_info()?;
        let containers = self.runtime.list_containers(true)?;
        let images = self.runtime.list_images()?;
        let volumes = self.runtime.list_volumes()?;
        let usage = if with_usage {
            Some(self.runtime.disk_usage().context("reading disk usage")?)
        } else {
            None
        };

        Ok(Inventory {
            engine,
            containers,
            images,
            volumes,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRuntime;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_binary_steps() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
        assert_eq!(format_size(u64::MAX), "16.0 EB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("exactly-twenty-chars", 20), "exactly-twenty-chars");
        assert_eq!(truncate("a-very-long-container-name", 20), "a-very-long-conta...");
        assert_eq!(truncate("ümlaut-ümlaut-ümlaut-x", 20).chars().count(), 20);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("sha256:0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("fedcba9876543210"), "fedcba987654");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_split_repo_tag() {
        assert_eq!(split_repo_tag("nginx:1.27"), ("nginx", "1.27"));
        assert_eq!(
            split_repo_tag("localhost:5000/app:dev"),
            ("localhost:5000/app", "dev")
        );
        assert_eq!(
            split_repo_tag("localhost:5000/app"),
            ("localhost:5000/app", "<none>")
        );
        assert_eq!(split_repo_tag("plain"), ("plain", "<none>"));
    }

    #[test]
    fn test_snapshot_and_render() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("0123456789abcdef", "a-very-long-container-name", true);
        mock.add_image("sha256:aaaaaaaaaaaaaaaa", &["nginx:latest"], 2048);
        mock.add_image("sha256:bbbbbbbbbbbbbbbb", &[], 10);
        mock.add_volume("data", "local", "/var/lib/docker/volumes/data/_data");
        let service = InventoryService::new(mock.clone());

        let inventory = service.snapshot(false).unwrap();
        let mut out = Vec::new();
        inventory.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Engine: mock-host (27.0.0, MockOS)"));
        assert!(text.contains("🐳 Containers (1 total):"));
        assert!(text.contains("0123456789ab"));
        assert!(text.contains("a-very-long-conta..."));
        assert!(text.contains("🖼️  Images (2 total):"));
        assert!(text.contains("nginx"));
        assert!(text.contains("2.0 KB"));
        assert!(text.contains("<none>"));
        assert!(text.contains("💾 Volumes (1 total):"));
        assert!(text.contains("/var/lib/docker/volumes/dat..."));
        assert!(!text.contains("Disk usage"));
        assert!(!mock.get_commands().contains(&"disk_usage".to_string()));
        assert!(mock.mutating_commands().is_empty());
    }

    #[test]
    fn test_render_empty_sections() {
        let inventory = Inventory::default();
        let mut out = Vec::new();
        inventory.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("No containers found"));
        assert!(text.contains("No images found"));
        assert!(text.contains("No volumes found"));
    }

    #[test]
    fn test_usage_section() {
        let mock = Arc::new(MockRuntime::new());
        mock.set_disk_usage(DiskUsage {
            images_size: 1024,
            containers_size: 0,
            volumes_size: 1_048_576,
            build_cache_size: 0,
        });
        let service = InventoryService::new(mock);

        let inventory = service.snapshot(true).unwrap();
        let mut out = Vec::new();
        inventory.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("💽 Disk usage:"));
        assert!(text.contains("1.0 MB"));
    }

    #[test]
    fn test_listing_failure_aborts() {
        let mock = Arc::new(MockRuntime::new());
        mock.set_fail_on("list_images");
        let service = InventoryService::new(mock.clone());

        let err = service.snapshot(false).unwrap_err();
        assert!(err.to_string().contains("failed to list images"));
        assert!(!mock.get_commands().contains(&"list_volumes".to_string()));
    }
}
