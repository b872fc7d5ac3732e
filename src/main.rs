use contrast::{Dashboard, DashboardConfig, Row, Selection, StaticSource, TableKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Contrast v{}", contrast::version());
    println!("==========================================");
    println!();

    let dashboard = Dashboard::load(&demo_source(), DashboardConfig::default()).await?;

    // Demo 1: Entity catalog
    demo_catalog(&dashboard);

    // Demo 2: Selection changes
    demo_selection(&dashboard);

    // Demo 3: Full comparison as JSON
    println!("\n=== Demo 3: Comparison output ===");
    let comparison = dashboard.compare("Atlas", "Borealis");
    println!("{}", serde_json::to_string_pretty(&comparison)?);

    Ok(())
}

fn demo_source() -> StaticSource {
    let entity = |id: i64, name: &str, group: &str, kind: &str| {
        Row::new()
            .with("EntID", id)
            .with("Entity Name", name)
            .with("ModelGroup", group)
            .with("Entity Type", kind)
    };
    let rollup = |id: i64, name: &str, speed: f64, power: f64, reach: f64| {
        Row::new()
            .with("EntID", id)
            .with("Entity Name", name)
            .with("RawSpeed", speed)
            .with("Power", power)
            .with("GlobalReach", reach)
    };
    let contrast = |id: i64, name: &str, pace: f64, style: f64| {
        Row::new()
            .with("EntID", id)
            .with("Entity Name", name)
            .with("Slow to Fast", pace)
            .with("Cautious to Bold", style)
    };
    let raw = |id: i64, dims: [f64; 4]| {
        dims.iter()
            .enumerate()
            .fold(Row::new().with("EntID", id), |row, (i, v)| {
                row.with(format!("Dim{}", i + 1), *v)
            })
    };

    StaticSource::new()
        .with_table(
            TableKind::Entities,
            vec![
                entity(1, "Atlas", "Primary", "Vendor"),
                entity(2, "Borealis", "Primary", "Vendor"),
                entity(3, "Cirrus", "Primary", "Research"),
                entity(4, "Draft", "Archive", "Research"),
            ],
        )
        .with_table(
            TableKind::RollUpScores,
            vec![
                rollup(1, "Atlas", 0.8, 0.4, 0.6),
                rollup(2, "Borealis", 0.3, 0.9, 0.5),
                rollup(3, "Cirrus", 0.6, 0.6, 0.2),
            ],
        )
        .with_table(
            TableKind::ContrastScores,
            vec![
                contrast(1, "Atlas", 0.7, 0.2),
                contrast(2, "Borealis", 0.35, 0.85),
            ],
        )
        .with_table(
            TableKind::RawScorePivot,
            vec![
                raw(1, [10.0, 4.0, 0.0, 7.0]),
                raw(2, [8.0, 6.0, 0.0, 0.0]),
                raw(3, [1.0, 9.0, 3.0, 2.0]),
            ],
        )
}

fn demo_catalog(dashboard: &Dashboard) {
    println!("=== Demo 1: Entity catalog ===");
    for group in dashboard.catalog().groups() {
        println!("{}:", group.entity_type);
        for name in &group.entities {
            let id = dashboard.catalog().identity(name);
            println!("  - {} (id {:?})", name, id);
        }
    }
}

fn demo_selection(dashboard: &Dashboard) {
    println!("\n=== Demo 2: Selection changes ===");
    let mut selection = Selection::default();

    selection.set(0, "Atlas");
    let comparison = dashboard.render(&selection);
    println!("Atlas vs (none): similarity {}", comparison.similarity);

    for second in ["Borealis", "Cirrus", "Draft"] {
        selection.set(1, second);
        let comparison = dashboard.render(&selection);
        println!(
            "Atlas vs {}: similarity {}, radar series {}, continuum {}",
            second,
            comparison.similarity,
            comparison.radar.map(|r| r.series.len()).unwrap_or(0),
            if comparison.continuum.is_some() { "yes" } else { "no data" }
        );
    }
}
