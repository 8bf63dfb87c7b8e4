use anyhow::Result;
use docker_cleaner::cli::clean::{self, CleanArgs};
use docker_cleaner::cli::list::{self, ListArgs};
use docker_cleaner::domain::{CleanupStats, PruneFilter, ResourceKind};
use docker_cleaner::infra::AppConfig;
use docker_cleaner::test_support::MockRuntime;
use std::io::Cursor;
use std::sync::Arc;

fn seeded_mock() -> Arc<MockRuntime> {
    let mock = Arc::new(MockRuntime::new());
    mock.add_container("aaaaaaaaaaaaaaaa", "web", true);
    mock.add_container("bbbbbbbbbbbbbbbb", "old-job", false);
    mock.set_prunable(ResourceKind::Images, &["sha256:i1", "sha256:i2"], 2 * 1024 * 1024);
    mock.set_prunable(ResourceKind::Volumes, &["cache"], 1024 * 1024);
    mock.set_prunable(ResourceKind::Networks, &["old_net"], 0);
    mock
}

fn run_clean(
    args: &CleanArgs,
    mock: &Arc<MockRuntime>,
    answer: &str,
) -> Result<(Option<CleanupStats>, String)> {
    let mut input = Cursor::new(answer.to_string());
    let mut out = Vec::new();
    let stats = clean::execute(
        args,
        mock.clone(),
        &AppConfig::default(),
        &mut input,
        &mut out,
    )?;
    Ok((stats, String::from_utf8(out)?))
}

#[test]
fn test_declined_prompt_issues_no_mutations() -> Result<()> {
    let mock = seeded_mock();

    let (stats, output) = run_clean(&CleanArgs::default(), &mock, "n\n")?;

    assert!(stats.is_none());
    assert!(output.contains("Continue? (y/N)"));
    assert!(output.contains("Operation cancelled"));
    assert!(mock.mutating_commands().is_empty());
    Ok(())
}

#[test]
fn test_empty_answer_cancels() -> Result<()> {
    let mock = seeded_mock();

    let (stats, _) = run_clean(&CleanArgs::default(), &mock, "")?;

    assert!(stats.is_none());
    assert!(mock.get_commands().is_empty());
    Ok(())
}

#[test]
fn test_confirmed_default_cleans_containers_and_images() -> Result<()> {
    let mock = seeded_mock();

    let (stats, output) = run_clean(&CleanArgs::default(), &mock, "y\n")?;
    let stats = stats.expect("cleanup should run");

    assert_eq!(stats.containers_removed, 1);
    assert_eq!(stats.images_removed, 2);
    assert_eq!(stats.volumes_removed, 0);
    assert_eq!(stats.networks_removed, 0);

    let commands = mock.get_commands();
    assert!(commands.contains(&"prune:containers".to_string()));
    assert!(commands.contains(&"prune:images".to_string()));
    assert!(!commands.contains(&"prune:volumes".to_string()));
    assert!(!commands.contains(&"prune:networks".to_string()));
    // Running containers survive a default clean
    assert_eq!(mock.is_running("aaaaaaaaaaaaaaaa"), Some(true));

    assert!(output.contains("🧹 Cleaning containers..."));
    assert!(output.contains("   ✓ Removed 1 containers"));
    assert!(output.contains("   ✓ Removed 2 images"));
    assert!(output.contains("📊 Cleanup Summary:"));
    assert!(output.contains("   Space reclaimed: 2.00 MB"));
    Ok(())
}

#[test]
fn test_force_skips_prompt() -> Result<()> {
    let mock = seeded_mock();
    let args = CleanArgs {
        force: true,
        ..Default::default()
    };

    // No input at all: a prompt would read EOF and cancel
    let (stats, output) = run_clean(&args, &mock, "")?;

    assert!(stats.is_some());
    assert!(!output.contains("Continue?"));
    assert!(!mock.mutating_commands().is_empty());
    Ok(())
}

#[test]
fn test_all_matches_every_kind_flag() -> Result<()> {
    let all = CleanArgs {
        all: true,
        force: true,
        ..Default::default()
    };
    let each = CleanArgs {
        containers: true,
        images: true,
        volumes: true,
        networks: true,
        force: true,
        ..Default::default()
    };

    assert_eq!(all.options().kinds(), each.options().kinds());

    let mock_all = seeded_mock();
    let mock_each = seeded_mock();
    let (stats_all, _) = run_clean(&all, &mock_all, "")?;
    let (stats_each, _) = run_clean(&each, &mock_each, "")?;
    let stats_all = stats_all.unwrap();
    let stats_each = stats_each.unwrap();

    assert_eq!(stats_all.images_removed, stats_each.images_removed);
    assert_eq!(stats_all.volumes_removed, stats_each.volumes_removed);
    assert_eq!(stats_all.networks_removed, stats_each.networks_removed);
    // --all also brings running containers down before the prune
    assert_eq!(stats_all.containers_removed, 2);
    assert_eq!(stats_each.containers_removed, 1);
    Ok(())
}

#[test]
fn test_all_clean_reports_every_kind() -> Result<()> {
    let mock = seeded_mock();
    let args = CleanArgs {
        all: true,
        force: true,
        ..Default::default()
    };

    let (stats, output) = run_clean(&args, &mock, "")?;
    let stats = stats.unwrap();

    assert_eq!(stats.containers_removed, 2);
    assert_eq!(stats.images_removed, 2);
    assert_eq!(stats.volumes_removed, 1);
    assert_eq!(stats.networks_removed, 1);
    assert_eq!(stats.space_reclaimed, 3 * 1024 * 1024);
    assert!(output.contains("   Containers: 2"));
    assert!(output.contains("   Networks: 1"));
    assert!(output.contains("   Space reclaimed: 3.00 MB"));
    Ok(())
}

#[test]
fn test_dangling_flag_controls_image_filter() -> Result<()> {
    let mock = seeded_mock();
    let args = CleanArgs {
        images: true,
        force: true,
        dangling: false,
        ..Default::default()
    };

    run_clean(&args, &mock, "")?;

    assert_eq!(
        mock.filter_for(ResourceKind::Images),
        Some(PruneFilter::dangling(false))
    );
    Ok(())
}

#[test]
fn test_nothing_to_clean_reports_zero() -> Result<()> {
    let mock = Arc::new(MockRuntime::new());
    let args = CleanArgs {
        all: true,
        force: true,
        ..Default::default()
    };

    let (stats, output) = run_clean(&args, &mock, "")?;

    assert_eq!(stats, Some(CleanupStats::default()));
    for kind in ResourceKind::ALL {
        assert!(output.contains(&format!("   ✓ Removed 0 {kind}")));
    }
    assert!(output.contains("   Space reclaimed: 0.00 MB"));
    Ok(())
}

#[test]
fn test_list_is_read_only() -> Result<()> {
    let mock = seeded_mock();
    mock.add_image("sha256:cccccccccccccccc", &["redis:7"], 1_048_576);
    mock.add_volume("pgdata", "local", "/var/lib/docker/volumes/pgdata/_data");

    let mut out = Vec::new();
    list::execute(&ListArgs::default(), mock.clone(), &mut out)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains("📋 Docker Resources Overview"));
    assert!(output.contains("🐳 Containers (2 total):"));
    assert!(output.contains("old-job"));
    assert!(output.contains("redis"));
    assert!(output.contains("1.0 MB"));
    assert!(output.contains("pgdata"));
    assert!(mock.mutating_commands().is_empty());
    Ok(())
}

#[test]
fn test_list_with_usage() -> Result<()> {
    let mock = seeded_mock();

    let mut out = Vec::new();
    list::execute(&ListArgs { usage: true }, mock.clone(), &mut out)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains("💽 Disk usage:"));
    assert!(mock.get_commands().contains(&"disk_usage".to_string()));
    Ok(())
}
